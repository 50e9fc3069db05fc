//! Bounded-concurrency batch fetching with input-order reassembly.
//!
//! Results are written into a slot per input position, so the output order
//! never depends on which engine process finished first.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::fetch::{fetch_json, FetchOptions};
use crate::invoker::CommandRunner;
use crate::types::{EngineError, EngineResult, FetchResult};

/// Concurrency ceiling used when the caller does not pick one.
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Outcome of one batch member before any downgrading.
pub type ItemOutcome = EngineResult<FetchResult>;

/// Fans URLs out to the engine, at most `concurrency` at a time.
#[derive(Clone)]
pub struct BatchCoordinator {
    runner: Arc<dyn CommandRunner>,
    options: FetchOptions,
}

impl BatchCoordinator {
    pub fn new(runner: Arc<dyn CommandRunner>, options: FetchOptions) -> Self {
        Self { runner, options }
    }

    pub fn options(&self) -> &FetchOptions {
        &self.options
    }

    /// Fetch every URL and return one record per input, in input order.
    ///
    /// Failed items (engine failure, timeout, unparseable output) come back
    /// as [`FetchResult::empty`] for that URL; siblings are unaffected.
    pub async fn fetch_all(&self, urls: &[String], concurrency: usize) -> Vec<FetchResult> {
        let outcomes = self.fetch_each(urls, concurrency).await;
        let mut failed = 0usize;

        let results: Vec<FetchResult> = urls
            .iter()
            .zip(outcomes)
            .map(|(url, outcome)| match outcome {
                Ok(result) => result,
                Err(e) => {
                    // Batch members never abort the batch: downgrade to an empty record.
                    tracing::debug!("Batch item {url} downgraded: {e}");
                    failed += 1;
                    FetchResult::empty(url.clone())
                }
            })
            .collect();

        tracing::info!(
            "Batch fetched {} URLs ({} ok, {} failed)",
            urls.len(),
            urls.len() - failed,
            failed
        );
        results
    }

    /// Fetch every URL and return each item's own outcome, in input order.
    pub async fn fetch_each(&self, urls: &[String], concurrency: usize) -> Vec<ItemOutcome> {
        let permits = Arc::new(Semaphore::new(concurrency.max(1)));
        let mut tasks = JoinSet::new();

        for (index, url) in urls.iter().enumerate() {
            let permits = permits.clone();
            let runner = self.runner.clone();
            let options = self.options.clone();
            let url = url.clone();

            tasks.spawn(async move {
                let outcome = match permits.acquire_owned().await {
                    Ok(_permit) => {
                        tracing::debug!("Batch item {index} started: {url}");
                        fetch_json(runner.as_ref(), &url, &options).await
                    }
                    Err(e) => Err(EngineError::Failed {
                        url: url.clone(),
                        reason: e.to_string(),
                    }),
                };
                (index, outcome)
            });
        }

        let mut slots: Vec<Option<ItemOutcome>> = Vec::with_capacity(urls.len());
        slots.resize_with(urls.len(), || None);

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, outcome)) => slots[index] = Some(outcome),
                Err(e) => tracing::error!("Batch task failed: {e}"),
            }
        }

        slots
            .into_iter()
            .zip(urls)
            .map(|(slot, url)| {
                slot.unwrap_or_else(|| {
                    Err(EngineError::Failed {
                        url: url.clone(),
                        reason: "batch task did not complete".to_string(),
                    })
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::invoker::InvocationOutcome;
    use crate::testing::ScriptedRunner;

    fn fetch_args(url: &str) -> Vec<String> {
        vec![
            "fetch".to_string(),
            url.to_string(),
            "--body".to_string(),
            "--format".to_string(),
            "json".to_string(),
        ]
    }

    fn script_ok(runner: &ScriptedRunner, url: &str, delay_ms: u64) {
        let args = fetch_args(url);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        runner.respond_after(
            &args,
            InvocationOutcome {
                stdout: format!("{{\"url\":\"{url}\",\"status\":200}}\nbody of {url}"),
                stderr: String::new(),
                status: 0,
            },
            Duration::from_millis(delay_ms),
        );
    }

    fn urls(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("https://site{i}.test/")).collect()
    }

    #[tokio::test]
    async fn test_order_follows_input_not_completion() {
        let runner = Arc::new(ScriptedRunner::new());
        let urls = urls(8);
        // Earlier URLs finish last.
        for (i, url) in urls.iter().enumerate() {
            script_ok(&runner, url, (8 - i as u64) * 15);
        }

        let coordinator = BatchCoordinator::new(runner.clone(), FetchOptions::default());
        for concurrency in [1, 3, 8, 32] {
            let results = coordinator.fetch_all(&urls, concurrency).await;
            assert_eq!(results.len(), urls.len());
            for (url, result) in urls.iter().zip(&results) {
                assert_eq!(&result.url, url);
                assert_eq!(result.content, format!("body of {url}"));
            }
        }
    }

    #[tokio::test]
    async fn test_concurrency_ceiling_respected() {
        let runner = Arc::new(ScriptedRunner::new());
        let urls = urls(10);
        for url in &urls {
            script_ok(&runner, url, 20);
        }

        let coordinator = BatchCoordinator::new(runner.clone(), FetchOptions::default());
        let results = coordinator.fetch_all(&urls, 3).await;
        assert_eq!(results.len(), 10);
        assert!(runner.peak_in_flight() <= 3);
        assert!(runner.peak_in_flight() >= 2);
    }

    #[tokio::test]
    async fn test_zero_concurrency_clamped_to_one() {
        let runner = Arc::new(ScriptedRunner::new());
        let urls = urls(3);
        for url in &urls {
            script_ok(&runner, url, 5);
        }
        let coordinator = BatchCoordinator::new(runner.clone(), FetchOptions::default());
        let results = coordinator.fetch_all(&urls, 0).await;
        assert_eq!(results.len(), 3);
        assert_eq!(runner.peak_in_flight(), 1);
    }

    #[tokio::test]
    async fn test_timeout_in_middle_is_isolated() {
        let runner = Arc::new(ScriptedRunner::new());
        let (a, b, c) = ("https://a.test", "https://b.test", "https://c.test");
        script_ok(&runner, a, 0);
        script_ok(&runner, b, 5_000);
        script_ok(&runner, c, 0);

        let options = FetchOptions {
            timeout: Duration::from_millis(50),
            ..FetchOptions::default()
        };
        let coordinator = BatchCoordinator::new(runner, options);
        let urls: Vec<String> = [a, b, c].iter().map(|s| s.to_string()).collect();
        let results = coordinator.fetch_all(&urls, DEFAULT_CONCURRENCY).await;

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].status, 200);
        assert_eq!(results[1], FetchResult::empty(b));
        assert_eq!(results[2].status, 200);
        assert_eq!(results[2].url, c);
    }

    #[tokio::test]
    async fn test_parse_and_exit_failures_downgraded() {
        let runner = Arc::new(ScriptedRunner::new());
        let good = "https://good.test";
        let garbled = "https://garbled.test";
        let broken = "https://broken.test";
        script_ok(&runner, good, 0);
        let args = fetch_args(garbled);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        runner.respond_ok(&args, "not json at all\n<html/>");
        let args = fetch_args(broken);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        runner.respond(&args, InvocationOutcome::failure("DNS failure"));

        let coordinator = BatchCoordinator::new(runner, FetchOptions::default());
        let urls: Vec<String> = [garbled, good, broken].iter().map(|s| s.to_string()).collect();

        let each = coordinator.fetch_each(&urls, 2).await;
        assert!(matches!(each[0], Err(EngineError::Parse { .. })));
        assert!(each[1].is_ok());
        assert!(matches!(each[2], Err(EngineError::Failed { ref reason, .. }) if reason == "DNS failure"));

        let all = coordinator.fetch_all(&urls, 2).await;
        assert!(all[0].is_empty());
        assert_eq!(all[0].url, garbled);
        assert_eq!(all[1].status, 200);
        assert!(all[2].is_empty());
        assert_eq!(all[2].size, 0);
        assert_eq!(all[2].time_ms, 0.0);
    }

    #[tokio::test]
    async fn test_empty_input() {
        let runner = Arc::new(ScriptedRunner::new());
        let coordinator = BatchCoordinator::new(runner.clone(), FetchOptions::default());
        assert!(coordinator.fetch_all(&[], 4).await.is_empty());
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_urls_keep_their_slots() {
        let runner = Arc::new(ScriptedRunner::new());
        script_ok(&runner, "https://dup.test", 5);
        script_ok(&runner, "https://other.test", 0);
        let coordinator = BatchCoordinator::new(runner, FetchOptions::default());
        let urls: Vec<String> = ["https://dup.test", "https://other.test", "https://dup.test"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let results = coordinator.fetch_all(&urls, 3).await;
        let got: Vec<&str> = results.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(got, vec!["https://dup.test", "https://other.test", "https://dup.test"]);
    }
}
