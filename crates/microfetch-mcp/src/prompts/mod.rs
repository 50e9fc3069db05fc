//! MCP prompt implementations: guided fetch workflows.

pub mod auth_workflow;
pub mod compare_sites;
pub mod registry;
pub mod scrape_and_analyze;

pub use registry::PromptRegistry;

use serde_json::Value;

/// String argument `key`, if present. Non-string values are rendered as JSON.
pub(crate) fn arg(args: &Value, key: &str) -> Option<String> {
    args.get(key).map(|v| match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}
