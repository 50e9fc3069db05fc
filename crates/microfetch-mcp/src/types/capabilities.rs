//! What the server tells a client during `initialize`.
//!
//! Only features the server actually delivers are advertised. Tool, prompt
//! and resource lists are fixed per call, and cached fetches appear in
//! `resources/list` without a change notification.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const MCP_VERSION: &str = "2024-11-05";
pub const SERVER_NAME: &str = "microfetch";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

const INSTRUCTIONS: &str = "MicroFetch drives the microfetch engine: HTTP/2 fetching with \
    browser fingerprints, parallel batch fetching, and 1Password lookups. Call `fetch` with \
    `cache: true` to keep a page, then re-read it as a microfetch:// resource. The prompts \
    walk through scraping, comparing sites, and authenticated fetches.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Implementation {
    pub name: String,
    pub version: String,
}

/// The client's `initialize` request. Its capabilities are kept raw: no
/// server behavior depends on them.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    pub protocol_version: String,
    #[serde(default)]
    pub capabilities: Value,
    pub client_info: Implementation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCapability {
    pub list_changed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourcesCapability {
    pub subscribe: bool,
    pub list_changed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerCapabilities {
    pub tools: ListCapability,
    pub resources: ResourcesCapability,
    pub prompts: ListCapability,
}

impl ServerCapabilities {
    pub fn advertised() -> Self {
        Self {
            tools: ListCapability { list_changed: false },
            resources: ResourcesCapability {
                subscribe: false,
                list_changed: false,
            },
            prompts: ListCapability { list_changed: false },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    pub protocol_version: String,
    pub capabilities: ServerCapabilities,
    pub server_info: Implementation,
    pub instructions: String,
}

impl InitializeResult {
    pub fn advertised() -> Self {
        Self {
            protocol_version: MCP_VERSION.to_string(),
            capabilities: ServerCapabilities::advertised(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: SERVER_VERSION.to_string(),
            },
            instructions: INSTRUCTIONS.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_advertises_only_delivered_features() {
        let caps = serde_json::to_value(ServerCapabilities::advertised()).unwrap();
        assert_eq!(
            caps,
            json!({
                "tools": { "listChanged": false },
                "resources": { "subscribe": false, "listChanged": false },
                "prompts": { "listChanged": false }
            })
        );
    }

    #[test]
    fn test_initialize_params_tolerate_missing_capabilities() {
        let params: InitializeParams = serde_json::from_value(json!({
            "protocolVersion": MCP_VERSION,
            "clientInfo": { "name": "inspector", "version": "1.0" }
        }))
        .unwrap();
        assert!(params.capabilities.is_null());
        assert_eq!(params.client_info.name, "inspector");
    }
}
