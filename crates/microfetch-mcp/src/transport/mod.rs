//! Transport layer for MCP communication.

pub mod framing;
#[cfg(feature = "sse")]
pub mod sse;
pub mod stdio;

#[cfg(feature = "sse")]
pub use sse::SseTransport;
pub use stdio::StdioTransport;

use serde_json::{json, Value};

use crate::types::{MCP_VERSION, SERVER_NAME, SERVER_VERSION};

/// Static server description, served at `/info` and by the `info` subcommand.
pub fn info_document(transport: &str) -> Value {
    json!({
        "name": SERVER_NAME,
        "version": SERVER_VERSION,
        "description": "Ultra-minimal browser engine with HTTP acceleration",
        "features": [
            "HTTP/2 multiplexing",
            "TLS 1.3 with 0-RTT",
            "Brotli/Zstd/Gzip compression",
            "Browser fingerprint spoofing",
            "1Password integration",
            "QuickJS JavaScript engine",
        ],
        "mcp_version": MCP_VERSION,
        "transport": transport,
    })
}
