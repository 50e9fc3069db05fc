//! Parameter records for the methods the server routes.

use serde::Deserialize;
use serde_json::Value;

use super::message::RequestId;

/// `tools/call`: one of the seven engine tools. `arguments` stays raw until
/// the tool's own parameter record decodes it.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCallParams {
    pub name: String,
    #[serde(default)]
    pub arguments: Option<Value>,
}

/// `resources/read`: a `microfetch://<id>` cache entry or `microfetch://stats`.
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceReadParams {
    pub uri: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PromptGetParams {
    pub name: String,
    #[serde(default)]
    pub arguments: Option<Value>,
}

/// `notifications/cancelled`. Engine calls are already bounded by their
/// timeouts, so this is informational.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelledParams {
    pub request_id: RequestId,
    #[serde(default)]
    pub reason: Option<String>,
}
