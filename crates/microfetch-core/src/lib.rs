//! MicroFetch core. Drives the external fetch engine with process
//! invocation, output parsing, ordered batching, and result caching.

pub mod batch;
pub mod cache;
pub mod engine;
pub mod fetch;
pub mod invoker;
pub mod loader;
pub mod parser;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod types;

pub use batch::{BatchCoordinator, ItemOutcome, DEFAULT_CONCURRENCY};
pub use cache::{parse_resource_uri, resource_uri, CacheEntry, ResultCache, RESOURCE_SCHEME};
pub use engine::{
    EngineBinary, EngineCommand, OutputFormat, BENCH_TIMEOUT, DEFAULT_TIMEOUT, VALIDATE_TIMEOUT,
};
pub use fetch::{fetch_json, FetchOptions};
pub use invoker::{CommandRunner, Invocation, InvocationOutcome, ProcessInvoker};
pub use loader::{Document, Loader};
pub use parser::parse;
pub use types::*;
