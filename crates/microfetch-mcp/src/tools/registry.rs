//! Tool registration and dispatch.

use std::time::Instant;

use serde_json::Value;
use tracing::Instrument;
use uuid::Uuid;

use crate::context::ServerContext;
use crate::types::{McpError, ToolCallResult, ToolDefinition};

use super::{
    auth_lookup, benchmark, fetch, fetch_batch, fetch_with_auth, fingerprint, validate, Operation,
};

pub struct ToolRegistry;

impl ToolRegistry {
    pub fn list_tools() -> Vec<ToolDefinition> {
        vec![
            fetch::definition(),
            fetch_batch::definition(),
            fetch_with_auth::definition(),
            benchmark::definition(),
            fingerprint::definition(),
            validate::definition(),
            auth_lookup::definition(),
        ]
    }

    pub fn tool_names() -> Vec<String> {
        Self::list_tools().into_iter().map(|t| t.name).collect()
    }

    /// Dispatch a named call. Always produces a result; unknown names and
    /// malformed arguments come back as text, never as a protocol fault.
    pub async fn call(name: &str, arguments: Option<Value>, ctx: &ServerContext) -> ToolCallResult {
        let started = Instant::now();
        let args = match arguments {
            None | Some(Value::Null) => Value::Object(serde_json::Map::new()),
            Some(args) => args,
        };

        let operation = match Operation::parse(name, args) {
            Ok(Some(operation)) => operation,
            Ok(None) => {
                tracing::warn!("Unknown tool requested: {name}");
                return ToolCallResult::error(format!("Unknown tool: {name}"));
            }
            Err(McpError::InvalidParams(detail)) => {
                return ToolCallResult::error(format!(
                    "Error: invalid arguments for {name}: {detail}"
                ));
            }
            Err(e) => return ToolCallResult::error(format!("Error: {e}")),
        };

        let span = tracing::info_span!(
            "tool_call",
            tool = operation.name(),
            call_id = %Uuid::new_v4()
        );
        async move {
            let result = operation.execute(ctx, started).await;
            tracing::info!(
                is_error = result.is_error(),
                "Finished in {:.2}s",
                started.elapsed().as_secs_f64()
            );
            result
        }
        .instrument(span)
        .await
    }
}
