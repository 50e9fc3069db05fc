//! `scrape_and_analyze` prompt. Fetch a page and analyze it.

use serde_json::Value;

use crate::types::{McpError, McpResult, PromptGetResult, PromptMessage};

use super::arg;

pub fn expand(args: Value) -> McpResult<PromptGetResult> {
    let url = arg(&args, "url")
        .ok_or_else(|| McpError::InvalidParams("'url' argument is required".to_string()))?;
    let focus = arg(&args, "focus").unwrap_or_else(|| "main content".to_string());

    let text = format!(
        "Please fetch and analyze this webpage:\n\n\
         URL: {url}\n\n\
         1. First, use the `fetch` tool to get the page content\n\
         2. Analyze the content, focusing on: {focus}\n\
         3. Summarize the key information found\n\n\
         Use microfetch's HTTP acceleration for fast fetching."
    );

    Ok(PromptGetResult {
        description: Some("Fetch and analyze a webpage".to_string()),
        messages: vec![PromptMessage::user(text)],
    })
}
