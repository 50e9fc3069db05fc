//! `compare_sites` prompt. Batch-fetch several sites and compare them.

use serde_json::Value;

use crate::types::{McpError, McpResult, PromptGetResult, PromptMessage};

use super::arg;

pub fn expand(args: Value) -> McpResult<PromptGetResult> {
    let urls = arg(&args, "urls")
        .ok_or_else(|| McpError::InvalidParams("'urls' argument is required".to_string()))?;
    let urls: Vec<&str> = urls
        .split(',')
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .collect();

    let text = format!(
        "Please compare content from these websites:\n\n\
         URLs: {}\n\n\
         1. Use `fetch_batch` to get all pages in parallel\n\
         2. Compare their content, structure, and key information\n\
         3. Highlight similarities and differences\n\n\
         Use microfetch's batch fetching for maximum efficiency.",
        urls.join(", ")
    );

    Ok(PromptGetResult {
        description: Some("Compare content from multiple sites".to_string()),
        messages: vec![PromptMessage::user(text)],
    })
}
