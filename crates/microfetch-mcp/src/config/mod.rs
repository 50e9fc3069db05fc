//! Configuration loading and resolution.

use std::path::{Path, PathBuf};
use std::time::Duration;

use microfetch_core::{DEFAULT_CONCURRENCY, DEFAULT_TIMEOUT};

/// Env var naming the engine binary.
pub const ENGINE_ENV: &str = "MICROFETCH_BIN";

/// Env var overriding the batch concurrency ceiling.
pub const CONCURRENCY_ENV: &str = "MICROFETCH_CONCURRENCY";

/// Characters of each body shown in `fetch_batch` output.
pub const DEFAULT_PREVIEW_CHARS: usize = 2000;

/// Runtime settings shared by every dispatch.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub engine_path: PathBuf,
    pub working_dir: PathBuf,
    pub default_timeout: Duration,
    pub batch_concurrency: usize,
    pub preview_chars: usize,
}

impl ServerConfig {
    /// Build a config for `engine_path` with default limits.
    pub fn new(engine_path: impl Into<PathBuf>) -> Self {
        let engine_path = engine_path.into();
        let working_dir = working_dir_for(&engine_path);
        Self {
            engine_path,
            working_dir,
            default_timeout: DEFAULT_TIMEOUT,
            batch_concurrency: DEFAULT_CONCURRENCY,
            preview_chars: DEFAULT_PREVIEW_CHARS,
        }
    }

    /// Resolve everything from the CLI flag and the environment.
    pub fn from_env(explicit_engine: Option<&str>) -> Self {
        let mut config = Self::new(resolve_engine_path(explicit_engine));
        if let Some(concurrency) = concurrency_from_env() {
            config.batch_concurrency = concurrency;
        }
        config
    }
}

/// Resolve the engine binary path.
///
/// Order: explicit flag, `MICROFETCH_BIN`, then the release and debug build
/// outputs under the current directory. When nothing exists the last
/// candidate is returned so the caller can report it as missing.
pub fn resolve_engine_path(explicit: Option<&str>) -> PathBuf {
    if let Some(path) = explicit {
        return PathBuf::from(path);
    }

    if let Ok(env_path) = std::env::var(ENGINE_ENV) {
        if !env_path.is_empty() {
            return PathBuf::from(env_path);
        }
    }

    let candidates = [
        PathBuf::from("target/release/microfetch"),
        PathBuf::from("target/debug/microfetch"),
    ];
    for candidate in &candidates {
        if candidate.is_file() {
            return candidate.clone();
        }
    }

    PathBuf::from("target/debug/microfetch")
}

/// The project directory for a binary inside `<dir>/target/<profile>/`,
/// else the binary's own directory, else the current directory.
pub fn working_dir_for(engine_path: &Path) -> PathBuf {
    let parent = engine_path.parent().filter(|p| !p.as_os_str().is_empty());
    let Some(parent) = parent else {
        return PathBuf::from(".");
    };

    match parent.parent() {
        Some(target) if target.file_name().is_some_and(|n| n == "target") => target
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
        _ => parent.to_path_buf(),
    }
}

fn concurrency_from_env() -> Option<usize> {
    let raw = std::env::var(CONCURRENCY_ENV).ok()?;
    match raw.trim().parse::<usize>() {
        Ok(n) => Some(n.max(1)),
        Err(_) => {
            tracing::warn!("Ignoring {CONCURRENCY_ENV}={raw}: not a positive integer");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_path_wins() {
        assert_eq!(
            resolve_engine_path(Some("/usr/local/bin/microfetch")),
            PathBuf::from("/usr/local/bin/microfetch")
        );
    }

    #[test]
    fn test_working_dir_above_target_tree() {
        assert_eq!(
            working_dir_for(Path::new("/src/microfetch/target/release/microfetch")),
            PathBuf::from("/src/microfetch")
        );
        assert_eq!(
            working_dir_for(Path::new("target/debug/microfetch")),
            PathBuf::from(".")
        );
    }

    #[test]
    fn test_working_dir_outside_target_tree() {
        assert_eq!(
            working_dir_for(Path::new("/usr/local/bin/microfetch")),
            PathBuf::from("/usr/local/bin")
        );
        assert_eq!(working_dir_for(Path::new("microfetch")), PathBuf::from("."));
    }

    #[test]
    fn test_config_defaults() {
        let config = ServerConfig::new("/opt/microfetch");
        assert_eq!(config.default_timeout, Duration::from_secs(30));
        assert_eq!(config.batch_concurrency, 5);
        assert_eq!(config.preview_chars, 2000);
        assert_eq!(config.working_dir, PathBuf::from("/opt"));
    }
}
