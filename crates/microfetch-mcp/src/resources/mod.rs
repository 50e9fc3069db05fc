//! MCP resource implementations: cached fetches and server statistics.

pub mod cached;
pub mod registry;
pub mod stats;
pub mod templates;

pub use registry::ResourceRegistry;
