//! MCP tool implementations: the seven dispatchable operations.

pub mod auth_lookup;
pub mod benchmark;
pub mod fetch;
pub mod fetch_batch;
pub mod fetch_with_auth;
pub mod fingerprint;
pub mod operation;
pub mod registry;
pub mod validate;

use std::time::Instant;

use microfetch_core::InvocationOutcome;

use crate::types::ToolCallResult;

pub use operation::Operation;
pub use registry::ToolRegistry;

/// Seconds since `started`, two decimals.
pub(crate) fn elapsed(started: Instant) -> String {
    format!("{:.2}", started.elapsed().as_secs_f64())
}

/// Error result carrying the engine's diagnostic verbatim.
pub(crate) fn engine_failure(outcome: &InvocationOutcome) -> ToolCallResult {
    ToolCallResult::error(format!("Error: {}", outcome.stderr))
}
