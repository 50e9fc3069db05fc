//! The closed set of dispatchable operations, each with typed arguments.

use std::time::Instant;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::context::ServerContext;
use crate::types::{McpError, McpResult, ToolCallResult};

use super::auth_lookup::{self, AuthLookupParams};
use super::benchmark::{self, BenchParams};
use super::fetch::{self, FetchParams};
use super::fetch_batch::{self, BatchParams};
use super::fetch_with_auth::{self, AuthFetchParams};
use super::fingerprint::{self, FingerprintParams};
use super::validate;

#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Fetch(FetchParams),
    FetchBatch(BatchParams),
    FetchWithAuth(AuthFetchParams),
    Benchmark(BenchParams),
    Fingerprint(FingerprintParams),
    Validate,
    AuthLookup(AuthLookupParams),
}

impl Operation {
    /// Decode a named call. Unknown names yield `Ok(None)`; malformed
    /// arguments for a known name yield `InvalidParams`.
    pub fn parse(name: &str, args: Value) -> McpResult<Option<Self>> {
        let operation = match name {
            fetch::NAME => Operation::Fetch(decode(args)?),
            fetch_batch::NAME => Operation::FetchBatch(decode(args)?),
            fetch_with_auth::NAME => Operation::FetchWithAuth(decode(args)?),
            benchmark::NAME => Operation::Benchmark(decode(args)?),
            fingerprint::NAME => Operation::Fingerprint(decode(args)?),
            validate::NAME => Operation::Validate,
            auth_lookup::NAME => Operation::AuthLookup(decode(args)?),
            _ => return Ok(None),
        };
        Ok(Some(operation))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Operation::Fetch(_) => fetch::NAME,
            Operation::FetchBatch(_) => fetch_batch::NAME,
            Operation::FetchWithAuth(_) => fetch_with_auth::NAME,
            Operation::Benchmark(_) => benchmark::NAME,
            Operation::Fingerprint(_) => fingerprint::NAME,
            Operation::Validate => validate::NAME,
            Operation::AuthLookup(_) => auth_lookup::NAME,
        }
    }

    /// Run the operation. `started` marks dispatch entry for elapsed-time reporting.
    pub async fn execute(self, ctx: &ServerContext, started: Instant) -> ToolCallResult {
        match self {
            Operation::Fetch(params) => fetch::execute(params, ctx, started).await,
            Operation::FetchBatch(params) => fetch_batch::execute(params, ctx, started).await,
            Operation::FetchWithAuth(params) => {
                fetch_with_auth::execute(params, ctx, started).await
            }
            Operation::Benchmark(params) => benchmark::execute(params, ctx, started).await,
            Operation::Fingerprint(params) => fingerprint::execute(params, ctx, started).await,
            Operation::Validate => validate::execute(ctx, started).await,
            Operation::AuthLookup(params) => auth_lookup::execute(params, ctx, started).await,
        }
    }
}

fn decode<T: DeserializeOwned>(args: Value) -> McpResult<T> {
    serde_json::from_value(args).map_err(|e| McpError::InvalidParams(e.to_string()))
}
