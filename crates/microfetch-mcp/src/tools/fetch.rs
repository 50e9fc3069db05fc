//! `fetch` tool. Fetch one URL, optionally caching the output as a resource.

use std::time::Instant;

use serde::Deserialize;
use serde_json::json;

use microfetch_core::{EngineCommand, OutputFormat};

use crate::context::ServerContext;
use crate::types::{ToolCallResult, ToolDefinition};

use super::{elapsed, engine_failure};

pub const NAME: &str = "fetch";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FetchParams {
    pub url: String,
    #[serde(default)]
    pub headers: bool,
    #[serde(default)]
    pub body: bool,
    #[serde(default)]
    pub cache: bool,
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: NAME.to_string(),
        description: Some(
            "Fetch a URL with HTTP acceleration and fingerprint spoofing.\n\n\
             HTTP/2 multiplexing, TLS 1.3, Brotli/Zstd/Gzip decompression and \
             realistic browser fingerprints.\n\n\
             Returns: Response body as text with timing info."
                .to_string(),
        ),
        input_schema: json!({
            "type": "object",
            "properties": {
                "url": { "type": "string", "description": "URL to fetch" },
                "headers": {
                    "type": "boolean",
                    "description": "Include response headers in output",
                    "default": false
                },
                "body": {
                    "type": "boolean",
                    "description": "Include full body (not just summary)",
                    "default": false
                },
                "cache": {
                    "type": "boolean",
                    "description": "Cache result as a resource for later access",
                    "default": false
                }
            },
            "required": ["url"]
        }),
    }
}

pub async fn execute(params: FetchParams, ctx: &ServerContext, started: Instant) -> ToolCallResult {
    let command = EngineCommand::Fetch {
        url: params.url.clone(),
        headers: params.headers,
        body: params.body,
        format: OutputFormat::Text,
        cookies: None,
    };
    let outcome = ctx.invoke(&command).await;
    if !outcome.is_success() {
        return engine_failure(&outcome);
    }

    let mut text = outcome.stdout.clone();
    text.push_str("\n\n");
    if params.cache && !outcome.stdout.is_empty() {
        let id = ctx.cache().put(&params.url, outcome.stdout);
        text.push_str(&format!(
            "[Cached as {}]\n",
            microfetch_core::resource_uri(&id)
        ));
    }
    text.push_str(&format!("[Total time: {}s]", elapsed(started)));

    ToolCallResult::text(text)
}
