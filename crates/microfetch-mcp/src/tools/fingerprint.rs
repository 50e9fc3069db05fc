//! `fingerprint` tool. Generate browser fingerprint profiles.

use std::time::Instant;

use serde::Deserialize;
use serde_json::json;

use microfetch_core::EngineCommand;

use crate::context::ServerContext;
use crate::types::{ToolCallResult, ToolDefinition};

use super::{elapsed, engine_failure};

pub const NAME: &str = "fingerprint";

pub const MAX_COUNT: i64 = 10;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FingerprintParams {
    #[serde(default = "default_count")]
    pub count: i64,
}

fn default_count() -> i64 {
    1
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: NAME.to_string(),
        description: Some(
            "Generate realistic browser fingerprints.\n\n\
             Creates Chrome, Firefox or Safari profiles with User-Agent, \
             Sec-CH-UA headers, Accept-Language and platform info.\n\n\
             Returns: Generated fingerprint profiles."
                .to_string(),
        ),
        input_schema: json!({
            "type": "object",
            "properties": {
                "count": {
                    "type": "integer",
                    "description": "Number of profiles to generate",
                    "default": 1,
                    "minimum": 1,
                    "maximum": MAX_COUNT
                }
            }
        }),
    }
}

pub async fn execute(
    params: FingerprintParams,
    ctx: &ServerContext,
    started: Instant,
) -> ToolCallResult {
    let count = params.count.clamp(1, MAX_COUNT) as u32;
    let outcome = ctx.invoke(&EngineCommand::Fingerprint { count }).await;
    tracing::debug!("Generated {count} fingerprint(s) in {}s", elapsed(started));

    if !outcome.is_success() {
        return engine_failure(&outcome);
    }
    ToolCallResult::text(outcome.stdout)
}
