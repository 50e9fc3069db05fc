//! `fetch_batch` tool. Fetch many URLs concurrently, one preview per URL.

use std::time::Instant;

use serde::Deserialize;
use serde_json::json;

use microfetch_core::{EngineError, ItemOutcome};

use crate::context::ServerContext;
use crate::types::{ToolCallResult, ToolDefinition};

use super::elapsed;

pub const NAME: &str = "fetch_batch";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BatchParams {
    #[serde(default)]
    pub urls: Vec<String>,
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: NAME.to_string(),
        description: Some(
            "Fetch multiple URLs in parallel with HTTP acceleration.\n\n\
             URLs are fetched concurrently with a bounded number of engine \
             processes; results are listed in the order given.\n\n\
             Returns: Results for each URL."
                .to_string(),
        ),
        input_schema: json!({
            "type": "object",
            "properties": {
                "urls": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "List of URLs to fetch"
                }
            },
            "required": ["urls"]
        }),
    }
}

pub async fn execute(params: BatchParams, ctx: &ServerContext, started: Instant) -> ToolCallResult {
    if params.urls.is_empty() {
        return ToolCallResult::error("Error: No URLs provided".to_string());
    }

    let outcomes = ctx
        .batch()
        .fetch_each(&params.urls, ctx.config().batch_concurrency)
        .await;

    let preview_chars = ctx.config().preview_chars;
    let all_failed = outcomes.iter().all(Result::is_err);
    let sections: Vec<String> = params
        .urls
        .iter()
        .zip(&outcomes)
        .map(|(url, outcome)| section(url, outcome, preview_chars))
        .collect();

    let text = format!(
        "{}\n[Fetched {} URLs in {}s]",
        sections.join("\n"),
        params.urls.len(),
        elapsed(started)
    );

    if all_failed {
        ToolCallResult::error(text)
    } else {
        ToolCallResult::text(text)
    }
}

fn section(url: &str, outcome: &ItemOutcome, preview_chars: usize) -> String {
    match outcome {
        Ok(result) => format!("=== {url} ===\n{}\n", preview(&result.content, preview_chars)),
        Err(EngineError::Failed { reason, .. }) => format!("=== {url} ===\nError: {reason}\n"),
        Err(e) => format!("=== {url} ===\nError: {e}\n"),
    }
}

/// First `limit` characters of `content`, with `...` when cut.
pub(crate) fn preview(content: &str, limit: usize) -> String {
    match content.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &content[..cut]),
        None => content.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        assert_eq!(preview("short", 10), "short");
        assert_eq!(preview("exactly", 7), "exactly");
        assert_eq!(preview("abcdef", 3), "abc...");
        assert_eq!(preview("日本語テキスト", 3), "日本語...");
    }
}
