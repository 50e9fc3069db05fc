//! Single structured fetch: invoke, check the exit status, parse.

use std::time::Duration;

use crate::engine::{EngineCommand, DEFAULT_TIMEOUT};
use crate::invoker::{CommandRunner, InvocationOutcome};
use crate::parser;
use crate::types::{EngineError, EngineResult, FetchResult};

/// Per-fetch engine settings.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOptions {
    /// Browser cookie source passed as `--cookies`; `None` omits the flag.
    pub cookies: Option<String>,
    pub timeout: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            cookies: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Fetch `url` in JSON mode and parse the result.
///
/// Non-zero exits become [`EngineError::Failed`] carrying the engine's
/// diagnostic; malformed output becomes [`EngineError::Parse`].
pub async fn fetch_json(
    runner: &dyn CommandRunner,
    url: &str,
    options: &FetchOptions,
) -> EngineResult<FetchResult> {
    let command = EngineCommand::fetch_json(url, options.cookies.clone());
    let outcome = runner.invoke(command.to_args(), options.timeout).await;
    check(url, outcome).and_then(|stdout| parser::parse(&stdout, url))
}

fn check(url: &str, outcome: InvocationOutcome) -> EngineResult<String> {
    if outcome.is_success() {
        return Ok(outcome.stdout);
    }

    let reason = outcome.stderr.trim();
    let reason = if reason.is_empty() {
        format!("exit code {}", outcome.status)
    } else {
        reason.to_string()
    };

    Err(EngineError::Failed {
        url: url.to_string(),
        reason,
    })
}
