//! Document loader facade for pipelines that want plain records, not a server.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::batch::{BatchCoordinator, DEFAULT_CONCURRENCY};
use crate::engine::{EngineBinary, DEFAULT_TIMEOUT};
use crate::fetch::{fetch_json, FetchOptions};
use crate::invoker::{CommandRunner, ProcessInvoker};
use crate::types::{EngineError, EngineResult, FetchResult};

/// Cookie source used unless the caller picks one.
pub const DEFAULT_COOKIES: &str = "auto";

/// A fetched page shaped for document pipelines.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub page_content: String,
    pub metadata: Map<String, Value>,
}

impl From<FetchResult> for Document {
    fn from(result: FetchResult) -> Self {
        let mut metadata = Map::new();
        metadata.insert("source".to_string(), json!(result.url));
        metadata.insert("status".to_string(), json!(result.status));
        metadata.insert("size".to_string(), json!(result.size));
        metadata.insert("time_ms".to_string(), json!(result.time_ms));
        Self {
            page_content: result.content,
            metadata,
        }
    }
}

/// Fetches URLs through the engine and returns structured results.
pub struct Loader {
    runner: Arc<dyn CommandRunner>,
    options: FetchOptions,
}

impl Loader {
    /// Create a loader for the binary at `binary`, refusing if it is missing.
    pub fn new(binary: impl Into<PathBuf>) -> EngineResult<Self> {
        let binary = EngineBinary::probe(binary);
        if !binary.is_available() {
            return Err(EngineError::NotFound {
                path: binary.path().display().to_string(),
            });
        }
        let working_dir = binary
            .path()
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));
        Ok(Self::with_runner(Arc::new(ProcessInvoker::new(
            binary,
            working_dir,
        ))))
    }

    /// Create a loader over any runner, with default cookies and timeout.
    pub fn with_runner(runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            runner,
            options: FetchOptions {
                cookies: Some(DEFAULT_COOKIES.to_string()),
                timeout: DEFAULT_TIMEOUT,
            },
        }
    }

    /// Cookie source (auto, brave, chrome, firefox, none).
    pub fn cookies(mut self, source: impl Into<String>) -> Self {
        self.options.cookies = Some(source.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = timeout;
        self
    }

    /// Fetch a single URL. Failures are reported, not downgraded.
    pub async fn fetch(&self, url: &str) -> EngineResult<FetchResult> {
        fetch_json(self.runner.as_ref(), url, &self.options).await
    }

    /// Fetch many URLs, at most `parallel` at once, in input order.
    ///
    /// Failed fetches are included as empty records with status 0.
    pub async fn fetch_batch(&self, urls: &[String], parallel: usize) -> Vec<FetchResult> {
        BatchCoordinator::new(self.runner.clone(), self.options.clone())
            .fetch_all(urls, parallel)
            .await
    }

    /// Load every URL as a [`Document`], in parallel.
    pub async fn load(&self, urls: &[String]) -> Vec<Document> {
        self.fetch_batch(urls, DEFAULT_CONCURRENCY)
            .await
            .into_iter()
            .map(Document::from)
            .collect()
    }

    /// Load URLs one at a time, keeping each item's own error.
    pub async fn lazy_load(&self, urls: &[String]) -> Vec<EngineResult<Document>> {
        let mut documents = Vec::with_capacity(urls.len());
        for url in urls {
            documents.push(self.fetch(url).await.map(Document::from));
        }
        documents
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoker::InvocationOutcome;
    use crate::testing::ScriptedRunner;

    fn args(url: &str) -> Vec<String> {
        ["fetch", url, "--body", "--format", "json", "--cookies", "auto"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn script(runner: &ScriptedRunner, url: &str, outcome: InvocationOutcome) {
        let args = args(url);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        runner.respond(&args, outcome);
    }

    #[test]
    fn test_new_refuses_missing_binary() {
        let err = Loader::new("/nonexistent/nab").err().unwrap();
        assert_eq!(err.to_string(), "microfetch binary not found at /nonexistent/nab");
    }

    #[tokio::test]
    async fn test_fetch_and_document_metadata() {
        let runner = Arc::new(ScriptedRunner::new());
        script(
            &runner,
            "https://example.com",
            InvocationOutcome {
                stdout: "{\"url\":\"https://example.com\",\"status\":200,\"size\":1256,\"time_ms\":87.3}\n# Example".to_string(),
                stderr: String::new(),
                status: 0,
            },
        );
        let loader = Loader::with_runner(runner);

        let docs = loader.load(&["https://example.com".to_string()]).await;
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].page_content, "# Example");
        assert_eq!(docs[0].metadata["source"], "https://example.com");
        assert_eq!(docs[0].metadata["status"], 200);
        assert_eq!(docs[0].metadata["size"], 1256);
        assert_eq!(docs[0].metadata["time_ms"], 87.3);
    }

    #[tokio::test]
    async fn test_single_fetch_surfaces_parse_error() {
        let runner = Arc::new(ScriptedRunner::new());
        script(
            &runner,
            "https://a.test",
            InvocationOutcome {
                stdout: "garbage".to_string(),
                stderr: String::new(),
                status: 0,
            },
        );
        let loader = Loader::with_runner(runner);
        assert!(matches!(
            loader.fetch("https://a.test").await,
            Err(EngineError::Parse { .. })
        ));

        // The same output in a batch becomes an empty record instead.
        let batch = loader.fetch_batch(&["https://a.test".to_string()], 2).await;
        assert_eq!(batch[0], FetchResult::empty("https://a.test"));
    }

    #[tokio::test]
    async fn test_lazy_load_keeps_per_item_errors() {
        let runner = Arc::new(ScriptedRunner::new());
        script(
            &runner,
            "https://ok.test",
            InvocationOutcome {
                stdout: "{}\nok".to_string(),
                stderr: String::new(),
                status: 0,
            },
        );
        script(&runner, "https://bad.test", InvocationOutcome::failure("refused"));
        let loader = Loader::with_runner(runner.clone());
        let docs = loader
            .lazy_load(&["https://bad.test".to_string(), "https://ok.test".to_string()])
            .await;
        assert!(docs[0].is_err());
        assert_eq!(docs[1].as_ref().unwrap().page_content, "ok");

        let calls = runner.calls();
        assert_eq!(calls[0][1], "https://bad.test");
        assert_eq!(calls[1][1], "https://ok.test");
    }

    #[tokio::test]
    async fn test_custom_cookie_source() {
        let runner = Arc::new(ScriptedRunner::new());
        runner.respond_ok(
            &["fetch", "https://a.test", "--body", "--format", "json", "--cookies", "firefox"],
            "{}\n",
        );
        let loader = Loader::with_runner(runner).cookies("firefox");
        assert!(loader.fetch("https://a.test").await.is_ok());
    }
}
