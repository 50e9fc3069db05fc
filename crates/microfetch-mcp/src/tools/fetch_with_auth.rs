//! `fetch_with_auth` tool. Credential lookup followed by a full fetch.

use std::time::Instant;

use serde::Deserialize;
use serde_json::json;

use microfetch_core::{EngineCommand, OutputFormat};

use crate::context::ServerContext;
use crate::types::{ToolCallResult, ToolDefinition};

use super::elapsed;

pub const NAME: &str = "fetch_with_auth";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthFetchParams {
    pub url: String,
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: NAME.to_string(),
        description: Some(
            "Fetch a URL with 1Password credentials.\n\n\
             Searches 1Password for credentials matching the domain, then \
             fetches the page with its full body.\n\n\
             Returns: Response body with auth status."
                .to_string(),
        ),
        input_schema: json!({
            "type": "object",
            "properties": {
                "url": {
                    "type": "string",
                    "description": "URL to fetch (credentials matched by domain)"
                }
            },
            "required": ["url"]
        }),
    }
}

pub async fn execute(
    params: AuthFetchParams,
    ctx: &ServerContext,
    started: Instant,
) -> ToolCallResult {
    let auth = ctx
        .invoke(&EngineCommand::Auth {
            url: params.url.clone(),
        })
        .await;
    if !auth.is_success() {
        // A failed lookup still lets the fetch go ahead.
        tracing::warn!("Credential lookup for {} failed: {}", params.url, auth.stderr.trim());
    }

    let fetched = ctx
        .invoke(&EngineCommand::Fetch {
            url: params.url,
            headers: false,
            body: true,
            format: OutputFormat::Text,
            cookies: None,
        })
        .await;

    let mut text = format!("=== 1Password Lookup ===\n{}\n", auth.stdout);
    if fetched.is_success() {
        text.push_str(&format!("=== Fetch Result ===\n{}\n", fetched.stdout));
    } else {
        text.push_str(&format!("=== Fetch Error ===\n{}\n", fetched.stderr));
    }
    text.push_str(&format!("\n[Total time: {}s]", elapsed(started)));

    if fetched.is_success() {
        ToolCallResult::text(text)
    } else {
        ToolCallResult::error(text)
    }
}
