//! Message framing for newline-delimited JSON.

use crate::types::{JsonRpcError, JsonRpcMessage, McpError, McpResult, RequestId};

/// Parse a single line of text as a JSON-RPC message.
pub fn parse_message(line: &str) -> McpResult<JsonRpcMessage> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(McpError::ParseError("Empty message".to_string()));
    }

    serde_json::from_str(trimmed).map_err(|e| McpError::ParseError(e.to_string()))
}

/// Serialize a value to a JSON line (with trailing newline).
pub fn frame_message(value: &serde_json::Value) -> McpResult<String> {
    let mut json = serde_json::to_string(value).map_err(McpError::Json)?;
    json.push('\n');
    Ok(json)
}

/// Error reply for a line that could not be decoded; the id is unknown.
pub fn unparseable(error: &McpError) -> McpResult<serde_json::Value> {
    let reply: JsonRpcError = error.to_json_rpc_error(RequestId::Null);
    serde_json::to_value(reply).map_err(McpError::Json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_request_line() {
        let msg = parse_message("{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"ping\"}\n").unwrap();
        assert!(matches!(msg, JsonRpcMessage::Request(ref r) if r.method == "ping"));
    }

    #[test]
    fn test_parse_notification_line() {
        let msg = parse_message("{\"jsonrpc\":\"2.0\",\"method\":\"initialized\"}").unwrap();
        assert!(matches!(msg, JsonRpcMessage::Notification(_)));
    }

    #[test]
    fn test_garbage_and_blank_lines() {
        assert_eq!(parse_message("   ").unwrap_err().code(), -32700);
        let err = parse_message("{not json").unwrap_err();
        let reply = unparseable(&err).unwrap();
        assert_eq!(reply["id"], serde_json::Value::Null);
        assert_eq!(reply["error"]["code"], -32700);
    }

    #[test]
    fn test_frame_is_single_line() {
        let framed = frame_message(&serde_json::json!({ "text": "a\nb" })).unwrap();
        assert!(framed.ends_with('\n'));
        assert_eq!(framed.matches('\n').count(), 1);
    }
}
