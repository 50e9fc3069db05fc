//! `validate` tool. Run the engine's live-site validation suite.

use std::time::Instant;

use serde_json::json;

use microfetch_core::EngineCommand;

use crate::context::ServerContext;
use crate::types::{ToolCallResult, ToolDefinition};

use super::{elapsed, engine_failure};

pub const NAME: &str = "validate";

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: NAME.to_string(),
        description: Some(
            "Run validation tests against real websites.\n\n\
             Tests: HTTP/2, compression, fingerprinting, TLS 1.3, 1Password integration.\n\n\
             Returns: Validation results."
                .to_string(),
        ),
        input_schema: json!({
            "type": "object",
            "properties": {}
        }),
    }
}

pub async fn execute(ctx: &ServerContext, started: Instant) -> ToolCallResult {
    let outcome = ctx.invoke(&EngineCommand::Validate).await;
    if !outcome.is_success() {
        return engine_failure(&outcome);
    }

    ToolCallResult::text(format!(
        "{}\n\n[Validation time: {}s]",
        outcome.stdout,
        elapsed(started)
    ))
}
