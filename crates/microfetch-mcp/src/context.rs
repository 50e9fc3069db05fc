//! Server-wide state handed to every dispatch: the engine runner, the result
//! cache, and the resolved configuration.

use std::sync::Arc;
use std::time::Duration;

use microfetch_core::{
    BatchCoordinator, CommandRunner, EngineBinary, EngineCommand, EngineError, FetchOptions,
    InvocationOutcome, ProcessInvoker, ResultCache,
};

use crate::config::ServerConfig;
use crate::types::McpResult;

pub struct ServerContext {
    runner: Arc<dyn CommandRunner>,
    cache: Arc<ResultCache>,
    config: ServerConfig,
}

impl ServerContext {
    /// Probe the configured engine once and wire up a process-backed runner.
    pub fn new(config: ServerConfig) -> Self {
        let binary = EngineBinary::probe(&config.engine_path);
        let runner = ProcessInvoker::new(binary, config.working_dir.clone());
        Self::with_runner(Arc::new(runner), config)
    }

    /// Use an existing runner, e.g. a scripted one in tests.
    pub fn with_runner(runner: Arc<dyn CommandRunner>, config: ServerConfig) -> Self {
        Self {
            runner,
            cache: Arc::new(ResultCache::new()),
            config,
        }
    }

    pub fn runner(&self) -> &Arc<dyn CommandRunner> {
        &self.runner
    }

    pub fn cache(&self) -> &Arc<ResultCache> {
        &self.cache
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn binary(&self) -> &EngineBinary {
        self.runner.binary()
    }

    /// The engine binary, or `EngineUnavailable` naming the missing path.
    pub fn require_engine(&self) -> McpResult<&EngineBinary> {
        let binary = self.binary();
        if binary.is_available() {
            Ok(binary)
        } else {
            Err(EngineError::NotFound {
                path: binary.path().display().to_string(),
            }
            .into())
        }
    }

    /// Timeout budget for `command`. Benchmarks and validation keep their
    /// wider budgets; everything else follows the configured default.
    pub fn timeout_for(&self, command: &EngineCommand) -> Duration {
        match command {
            EngineCommand::Bench { .. } | EngineCommand::Validate => command.default_timeout(),
            _ => self.config.default_timeout,
        }
    }

    /// Run one engine command.
    pub async fn invoke(&self, command: &EngineCommand) -> InvocationOutcome {
        let timeout = self.timeout_for(command);
        self.runner.invoke(command.to_args(), timeout).await
    }

    /// A batch coordinator sharing this context's runner.
    pub fn batch(&self) -> BatchCoordinator {
        BatchCoordinator::new(
            self.runner.clone(),
            FetchOptions {
                cookies: None,
                timeout: self.config.default_timeout,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::mcp_error_codes;

    #[test]
    fn test_require_engine_reports_missing_path() {
        let ctx = ServerContext::new(ServerConfig::new("/nonexistent/bin/microfetch"));
        let err = ctx.require_engine().unwrap_err();
        assert_eq!(err.code(), mcp_error_codes::ENGINE_UNAVAILABLE);
        assert!(err.to_string().contains("/nonexistent/bin/microfetch"));
    }

    #[test]
    fn test_timeouts_follow_command() {
        let mut config = ServerConfig::new("/nonexistent/bin/microfetch");
        config.default_timeout = Duration::from_secs(7);
        let ctx = ServerContext::new(config);
        assert_eq!(
            ctx.timeout_for(&EngineCommand::fetch("https://a.test")),
            Duration::from_secs(7)
        );
        assert_eq!(
            ctx.timeout_for(&EngineCommand::Validate),
            microfetch_core::VALIDATE_TIMEOUT
        );
    }
}
