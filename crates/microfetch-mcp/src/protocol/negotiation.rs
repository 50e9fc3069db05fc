//! MCP capability negotiation during initialization.

use crate::types::{Implementation, InitializeParams, InitializeResult, McpResult, MCP_VERSION};

/// Handshake state: who the client is and whether it confirmed `initialized`.
#[derive(Debug, Clone, Default)]
pub struct NegotiatedCapabilities {
    pub client_info: Option<Implementation>,
    pub initialized: bool,
}

impl NegotiatedCapabilities {
    /// Record the client. The server always answers with its own protocol
    /// version and capability set; a version mismatch is logged, not refused.
    pub fn negotiate(&mut self, params: InitializeParams) -> McpResult<InitializeResult> {
        if params.protocol_version != MCP_VERSION {
            tracing::warn!(
                "Client requested protocol version {}, server speaks {MCP_VERSION}",
                params.protocol_version
            );
        }

        tracing::info!(
            "Initialized with client: {} v{}",
            params.client_info.name,
            params.client_info.version
        );

        tracing::debug!("Client capabilities: {}", params.capabilities);
        self.client_info = Some(params.client_info);

        Ok(InitializeResult::advertised())
    }

    pub fn mark_initialized(&mut self) -> McpResult<()> {
        self.initialized = true;
        tracing::info!("MCP handshake complete");
        Ok(())
    }
}
