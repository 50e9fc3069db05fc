//! Error types and JSON-RPC error codes for the MCP server.

use super::message::{JsonRpcError, JsonRpcErrorObject, RequestId, JSONRPC_VERSION};

/// Standard JSON-RPC 2.0 error codes.
pub mod error_codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
}

/// MCP-specific error codes.
pub mod mcp_error_codes {
    pub const RESOURCE_NOT_FOUND: i32 = -32802;
    pub const PROMPT_NOT_FOUND: i32 = -32804;
    pub const ENGINE_UNAVAILABLE: i32 = -32850;
    pub const ENGINE_ERROR: i32 = -32851;

    /// Server: Unauthorized (missing or invalid bearer token).
    pub const UNAUTHORIZED: i32 = -32900;
}

/// All errors that can occur in the MCP server.
#[derive(thiserror::Error, Debug)]
pub enum McpError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Method not found: {0}")]
    MethodNotFound(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    #[error("Prompt not found: {0}")]
    PromptNotFound(String),

    #[error("Engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("Engine error: {0}")]
    EngineError(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Missing or invalid bearer token.
    #[error("Unauthorized")]
    Unauthorized,
}

impl McpError {
    pub fn code(&self) -> i32 {
        use error_codes::*;
        use mcp_error_codes::*;
        match self {
            McpError::ParseError(_) => PARSE_ERROR,
            McpError::InvalidRequest(_) => INVALID_REQUEST,
            McpError::MethodNotFound(_) => METHOD_NOT_FOUND,
            McpError::InvalidParams(_) => INVALID_PARAMS,
            McpError::InternalError(_) => INTERNAL_ERROR,
            McpError::ResourceNotFound(_) => RESOURCE_NOT_FOUND,
            McpError::PromptNotFound(_) => PROMPT_NOT_FOUND,
            McpError::EngineUnavailable(_) => ENGINE_UNAVAILABLE,
            McpError::EngineError(_) => ENGINE_ERROR,
            McpError::Transport(_) | McpError::Io(_) => INTERNAL_ERROR,
            McpError::Json(_) => PARSE_ERROR,
            McpError::Unauthorized => UNAUTHORIZED,
        }
    }

    pub fn to_json_rpc_error(&self, id: RequestId) -> JsonRpcError {
        JsonRpcError {
            jsonrpc: JSONRPC_VERSION,
            id,
            error: JsonRpcErrorObject {
                code: self.code(),
                message: self.to_string(),
                data: None,
            },
        }
    }
}

impl From<microfetch_core::EngineError> for McpError {
    fn from(e: microfetch_core::EngineError) -> Self {
        match e {
            microfetch_core::EngineError::NotFound { .. } => {
                McpError::EngineUnavailable(e.to_string())
            }
            other => McpError::EngineError(other.to_string()),
        }
    }
}

pub type McpResult<T> = Result<T, McpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_errors_map_to_codes() {
        let missing: McpError = microfetch_core::EngineError::NotFound {
            path: "/opt/microfetch".to_string(),
        }
        .into();
        assert_eq!(missing.code(), mcp_error_codes::ENGINE_UNAVAILABLE);
        assert!(missing.to_string().contains("/opt/microfetch"));

        let parse: McpError = microfetch_core::EngineError::Parse {
            url: "https://a.test".to_string(),
            reason: "bad header".to_string(),
        }
        .into();
        assert_eq!(parse.code(), mcp_error_codes::ENGINE_ERROR);
    }

    #[test]
    fn test_json_rpc_error_shape() {
        let err = McpError::ResourceNotFound("microfetch://nope".to_string());
        let rpc = err.to_json_rpc_error(RequestId::Number(4));
        assert_eq!(rpc.error.code, -32802);
        assert_eq!(rpc.error.message, "Resource not found: microfetch://nope");
        assert_eq!(rpc.id, RequestId::Number(4));
    }
}
