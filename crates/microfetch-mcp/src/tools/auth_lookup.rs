//! `auth_lookup` tool. Find stored credentials for a URL.

use std::time::Instant;

use serde::Deserialize;
use serde_json::json;

use microfetch_core::EngineCommand;

use crate::context::ServerContext;
use crate::types::{ToolCallResult, ToolDefinition};

use super::{elapsed, engine_failure};

pub const NAME: &str = "auth_lookup";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthLookupParams {
    pub url: String,
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: NAME.to_string(),
        description: Some(
            "Look up credentials in 1Password for a URL.\n\n\
             Reports the username and TOTP availability of a matching item \
             without exposing the password.\n\n\
             Returns: Credential info if found."
                .to_string(),
        ),
        input_schema: json!({
            "type": "object",
            "properties": {
                "url": { "type": "string", "description": "URL to find credentials for" }
            },
            "required": ["url"]
        }),
    }
}

/// A lookup with no match is still a successful run of the engine.
pub async fn execute(
    params: AuthLookupParams,
    ctx: &ServerContext,
    started: Instant,
) -> ToolCallResult {
    let outcome = ctx.invoke(&EngineCommand::Auth { url: params.url }).await;
    tracing::debug!("Credential lookup finished in {}s", elapsed(started));

    if !outcome.is_success() {
        return engine_failure(&outcome);
    }
    ToolCallResult::text(outcome.stdout)
}
