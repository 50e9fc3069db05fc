//! JSON-RPC 2.0 envelopes exchanged with MCP clients.
//!
//! The server only answers: it never issues requests of its own, so replies
//! arriving from a client are decoded just far enough to be logged.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::{McpError, McpResult};

pub const JSONRPC_VERSION: &str = "2.0";

/// Request identifier: a string, a number, or null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    String(String),
    Number(i64),
    Null,
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestId::String(s) => write!(f, "{s}"),
            RequestId::Number(n) => write!(f, "{n}"),
            RequestId::Null => write!(f, "null"),
        }
    }
}

/// A client call that expects exactly one reply.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub id: RequestId,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    /// Decode `params` into the method's parameter record.
    ///
    /// Absent params and params of the wrong shape are both `InvalidParams`;
    /// `what` names the method in the former.
    pub fn decode_params<T: DeserializeOwned>(&self, what: &str) -> McpResult<T> {
        let params = self
            .params
            .clone()
            .ok_or_else(|| McpError::InvalidParams(format!("{what} params required")))?;
        serde_json::from_value(params).map_err(|e| McpError::InvalidParams(e.to_string()))
    }
}

/// A client message with no id; never answered.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcNotification {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

/// A reply sent by the client. Only ever logged.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientReply {
    pub id: RequestId,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<JsonRpcErrorObject>,
}

/// Anything a client may put on the wire. Variant order matters: a request
/// also satisfies the notification shape.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum JsonRpcMessage {
    Request(JsonRpcRequest),
    Notification(JsonRpcNotification),
    Reply(ClientReply),
}

/// Successful reply to a request.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: &'static str,
    pub id: RequestId,
    pub result: Value,
}

/// Failed reply to a request, or to a line that never decoded (`id: null`).
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcError {
    pub jsonrpc: &'static str,
    pub id: RequestId,
    pub error: JsonRpcErrorObject,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcErrorObject {
    pub code: i32,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Encode the reply to request `id`.
pub fn reply(id: RequestId, outcome: McpResult<Value>) -> Value {
    let encoded = match outcome {
        Ok(result) => serde_json::to_value(JsonRpcResponse {
            jsonrpc: JSONRPC_VERSION,
            id,
            result,
        }),
        Err(e) => serde_json::to_value(e.to_json_rpc_error(id)),
    };
    encoded.unwrap_or_default()
}
