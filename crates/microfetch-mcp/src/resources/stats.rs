//! Resource: microfetch://stats

use serde_json::json;

use crate::context::ServerContext;
use crate::types::{McpError, McpResult, ReadResourceResult, ResourceContent};

pub const STATS_URI: &str = "microfetch://stats";

pub fn read_stats(ctx: &ServerContext) -> McpResult<ReadResourceResult> {
    let binary = ctx.binary();
    let cache = ctx.cache();

    let content = json!({
        "binary_path": binary.path().display().to_string(),
        "binary_available": binary.is_available(),
        "working_dir": ctx.config().working_dir.display().to_string(),
        "cached_resources": cache.len(),
        "batch_concurrency": ctx.config().batch_concurrency,
        "newest_fetch": cache.list().iter().map(|e| e.fetched_at).max(),
    });

    let text = serde_json::to_string_pretty(&content)
        .map_err(|e| McpError::InternalError(e.to_string()))?;

    Ok(ReadResourceResult {
        contents: vec![ResourceContent::text(STATS_URI, "application/json", text)],
    })
}
