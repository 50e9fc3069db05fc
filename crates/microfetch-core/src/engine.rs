//! Engine binary location and the command-line contract it speaks.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Timeout for fetch, auth, and fingerprint invocations.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Benchmarks run several iterations per URL.
pub const BENCH_TIMEOUT: Duration = Duration::from_secs(120);

/// Validation hits several live sites in sequence.
pub const VALIDATE_TIMEOUT: Duration = Duration::from_secs(60);

/// The engine executable, probed once for availability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineBinary {
    path: PathBuf,
    available: bool,
}

impl EngineBinary {
    /// Check whether `path` points at a regular file and remember the answer.
    pub fn probe(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let available = path.is_file();
        if !available {
            tracing::warn!("microfetch binary not found at {}", path.display());
        }
        Self { path, available }
    }

    /// Build a binary record with a known availability, skipping the probe.
    pub fn with_availability(path: impl Into<PathBuf>, available: bool) -> Self {
        Self {
            path: path.into(),
            available,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Diagnostic returned for every invocation when the binary is missing.
    pub fn missing_message(&self) -> String {
        format!("microfetch binary not found at {}", self.path.display())
    }
}

/// Output format for `fetch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text, the engine's default.
    #[default]
    Text,
    /// JSON header line followed by the raw body.
    Json,
}

/// One engine operation, rendered to an argument vector by [`EngineCommand::to_args`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCommand {
    Fetch {
        url: String,
        headers: bool,
        body: bool,
        format: OutputFormat,
        cookies: Option<String>,
    },
    Auth {
        url: String,
    },
    Bench {
        urls: String,
        iterations: u32,
    },
    Fingerprint {
        count: u32,
    },
    Validate,
}

impl EngineCommand {
    /// Plain `fetch <url>` with no flags.
    pub fn fetch(url: impl Into<String>) -> Self {
        EngineCommand::Fetch {
            url: url.into(),
            headers: false,
            body: false,
            format: OutputFormat::Text,
            cookies: None,
        }
    }

    /// `fetch <url> --body --format json [--cookies <src>]`, the form the parser understands.
    pub fn fetch_json(url: impl Into<String>, cookies: Option<String>) -> Self {
        EngineCommand::Fetch {
            url: url.into(),
            headers: false,
            body: true,
            format: OutputFormat::Json,
            cookies,
        }
    }

    pub fn to_args(&self) -> Vec<String> {
        match self {
            EngineCommand::Fetch {
                url,
                headers,
                body,
                format,
                cookies,
            } => {
                let mut args = vec!["fetch".to_string(), url.clone()];
                if *headers {
                    args.push("--headers".to_string());
                }
                if *body {
                    args.push("--body".to_string());
                }
                if *format == OutputFormat::Json {
                    args.push("--format".to_string());
                    args.push("json".to_string());
                }
                if let Some(source) = cookies {
                    args.push("--cookies".to_string());
                    args.push(source.clone());
                }
                args
            }
            EngineCommand::Auth { url } => vec!["auth".to_string(), url.clone()],
            EngineCommand::Bench { urls, iterations } => vec![
                "bench".to_string(),
                urls.clone(),
                "--iterations".to_string(),
                iterations.to_string(),
            ],
            EngineCommand::Fingerprint { count } => vec![
                "fingerprint".to_string(),
                "--count".to_string(),
                count.to_string(),
            ],
            EngineCommand::Validate => vec!["validate".to_string()],
        }
    }

    pub fn default_timeout(&self) -> Duration {
        match self {
            EngineCommand::Bench { .. } => BENCH_TIMEOUT,
            EngineCommand::Validate => VALIDATE_TIMEOUT,
            _ => DEFAULT_TIMEOUT,
        }
    }
}
