//! `benchmark` tool. Timing statistics over repeated fetches.

use std::time::Instant;

use serde::Deserialize;
use serde_json::json;

use microfetch_core::EngineCommand;

use crate::context::ServerContext;
use crate::types::{ToolCallResult, ToolDefinition};

use super::{elapsed, engine_failure};

pub const NAME: &str = "benchmark";

pub const MIN_ITERATIONS: i64 = 1;
pub const MAX_ITERATIONS: i64 = 20;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BenchParams {
    /// Comma-separated, forwarded to the engine as one argument.
    pub urls: String,
    #[serde(default = "default_iterations")]
    pub iterations: i64,
}

fn default_iterations() -> i64 {
    3
}

impl BenchParams {
    pub fn clamped_iterations(&self) -> u32 {
        // Both bounds fit in u32.
        self.iterations.clamp(MIN_ITERATIONS, MAX_ITERATIONS) as u32
    }
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: NAME.to_string(),
        description: Some(
            "Benchmark fetching URLs with timing statistics.\n\n\
             Measures min/avg/max response times over multiple iterations.\n\n\
             Returns: Benchmark results with timing statistics."
                .to_string(),
        ),
        input_schema: json!({
            "type": "object",
            "properties": {
                "urls": {
                    "type": "string",
                    "description": "Comma-separated list of URLs to benchmark"
                },
                "iterations": {
                    "type": "integer",
                    "description": "Number of iterations per URL",
                    "default": 3,
                    "minimum": MIN_ITERATIONS,
                    "maximum": MAX_ITERATIONS
                }
            },
            "required": ["urls"]
        }),
    }
}

pub async fn execute(params: BenchParams, ctx: &ServerContext, started: Instant) -> ToolCallResult {
    let iterations = params.clamped_iterations();
    let command = EngineCommand::Bench {
        urls: params.urls,
        iterations,
    };
    let outcome = ctx.invoke(&command).await;
    if !outcome.is_success() {
        return engine_failure(&outcome);
    }

    ToolCallResult::text(format!(
        "{}\n\n[Total benchmark time: {}s]",
        outcome.stdout,
        elapsed(started)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(iterations: i64) -> BenchParams {
        BenchParams {
            urls: "https://a.test".to_string(),
            iterations,
        }
    }

    #[test]
    fn test_iterations_clamped() {
        assert_eq!(params(0).clamped_iterations(), 1);
        assert_eq!(params(-4).clamped_iterations(), 1);
        assert_eq!(params(7).clamped_iterations(), 7);
        assert_eq!(params(500).clamped_iterations(), 20);
    }

    #[test]
    fn test_default_iterations() {
        let p: BenchParams = serde_json::from_value(json!({ "urls": "https://a.test" })).unwrap();
        assert_eq!(p.iterations, 3);
    }
}
