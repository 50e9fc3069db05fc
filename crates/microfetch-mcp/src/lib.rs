//! MicroFetch MCP server: exposes the microfetch engine to LLM agents as
//! tools, cached resources, and workflow prompts.

pub mod config;
pub mod context;
pub mod prompts;
pub mod protocol;
pub mod repl;
pub mod resources;
pub mod tools;
pub mod transport;
pub mod types;

pub use config::{resolve_engine_path, ServerConfig};
pub use context::ServerContext;
pub use protocol::ProtocolHandler;
pub use tools::{Operation, ToolRegistry};
pub use transport::StdioTransport;
