//! `auth_workflow` prompt. Look up credentials, then fetch a protected page.

use serde_json::Value;

use crate::types::{McpError, McpResult, PromptGetResult, PromptMessage};

use super::arg;

pub fn expand(args: Value) -> McpResult<PromptGetResult> {
    let url = arg(&args, "url")
        .ok_or_else(|| McpError::InvalidParams("'url' argument is required".to_string()))?;

    let text = format!(
        "Please help me access this authenticated page:\n\n\
         URL: {url}\n\n\
         1. First, use `auth_lookup` to find credentials in 1Password\n\
         2. Then use `fetch_with_auth` to access the page\n\
         3. Analyze the content and summarize what's there\n\n\
         MicroFetch integrates with 1Password for secure credential access."
    );

    Ok(PromptGetResult {
        description: Some("Authenticate and fetch protected content".to_string()),
        messages: vec![PromptMessage::user(text)],
    })
}
