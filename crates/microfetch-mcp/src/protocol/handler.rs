//! Main request dispatcher: receives JSON-RPC messages and routes them to
//! the tool, resource, and prompt registries.

use std::sync::Arc;
use tokio::sync::Mutex;

use serde_json::Value;

use crate::context::ServerContext;
use crate::prompts::PromptRegistry;
use crate::resources::ResourceRegistry;
use crate::tools::ToolRegistry;
use crate::types::*;

use super::negotiation::NegotiatedCapabilities;
use super::validator::validate_request;

/// The main protocol handler that dispatches incoming JSON-RPC messages.
pub struct ProtocolHandler {
    context: Arc<ServerContext>,
    capabilities: Arc<Mutex<NegotiatedCapabilities>>,
}

impl ProtocolHandler {
    pub fn new(context: Arc<ServerContext>) -> Self {
        Self {
            context,
            capabilities: Arc::new(Mutex::new(NegotiatedCapabilities::default())),
        }
    }

    pub fn context(&self) -> &Arc<ServerContext> {
        &self.context
    }

    pub async fn handle_message(&self, msg: JsonRpcMessage) -> Option<Value> {
        match msg {
            JsonRpcMessage::Request(req) => Some(self.handle_request(req).await),
            JsonRpcMessage::Notification(notif) => {
                self.handle_notification(notif).await;
                None
            }
            JsonRpcMessage::Reply(reply) => {
                tracing::debug!("Ignoring client reply to request {}", reply.id);
                None
            }
        }
    }

    async fn handle_request(&self, request: JsonRpcRequest) -> Value {
        if let Err(e) = validate_request(&request) {
            return reply(request.id, Err(e));
        }

        tracing::debug!("-> {} (id {})", request.method, request.id);
        let result = self.dispatch_request(&request).await;
        if let Err(e) = &result {
            tracing::debug!("<- error {} for {}", e.code(), request.method);
        }
        reply(request.id, result)
    }

    async fn dispatch_request(&self, request: &JsonRpcRequest) -> McpResult<Value> {
        match request.method.as_str() {
            "initialize" => self.handle_initialize(request).await,
            "shutdown" => Ok(self.handle_shutdown()),

            "tools/list" => self.handle_tools_list(),
            "tools/call" => self.handle_tools_call(request).await,

            "resources/list" => self.handle_resources_list(),
            "resources/templates/list" => self.handle_resource_templates_list(),
            "resources/read" => self.handle_resources_read(request),

            "prompts/list" => self.handle_prompts_list(),
            "prompts/get" => self.handle_prompts_get(request),

            "ping" => Ok(Value::Object(serde_json::Map::new())),

            _ => Err(McpError::MethodNotFound(request.method.clone())),
        }
    }

    async fn handle_notification(&self, notification: JsonRpcNotification) {
        match notification.method.as_str() {
            "initialized" | "notifications/initialized" => {
                let mut caps = self.capabilities.lock().await;
                if let Err(e) = caps.mark_initialized() {
                    tracing::error!("Failed to mark initialized: {e}");
                }
            }
            "notifications/cancelled" | "$/cancelRequest" => {
                // Engine calls are bounded by their own timeouts; nothing to abort.
                match notification
                    .params
                    .map(serde_json::from_value::<CancelledParams>)
                {
                    Some(Ok(params)) => tracing::info!(
                        "Client cancelled request {} ({})",
                        params.request_id,
                        params.reason.as_deref().unwrap_or("no reason")
                    ),
                    _ => tracing::info!("Received cancellation notification"),
                }
            }
            _ => {
                tracing::debug!("Unknown notification: {}", notification.method);
            }
        }
    }

    async fn handle_initialize(&self, request: &JsonRpcRequest) -> McpResult<Value> {
        let init_params: InitializeParams = request.decode_params("Initialize")?;

        let mut caps = self.capabilities.lock().await;
        let result = caps.negotiate(init_params)?;

        if !self.context.binary().is_available() {
            tracing::warn!("{}", self.context.binary().missing_message());
        }

        serde_json::to_value(result).map_err(|e| McpError::InternalError(e.to_string()))
    }

    fn handle_shutdown(&self) -> Value {
        tracing::info!(
            "Shutdown requested ({} cached resources discarded)",
            self.context.cache().len()
        );
        Value::Object(serde_json::Map::new())
    }

    fn handle_tools_list(&self) -> McpResult<Value> {
        let result = ToolListResult {
            tools: ToolRegistry::list_tools(),
            next_cursor: None,
        };
        serde_json::to_value(result).map_err(|e| McpError::InternalError(e.to_string()))
    }

    async fn handle_tools_call(&self, request: &JsonRpcRequest) -> McpResult<Value> {
        let call_params: ToolCallParams = request.decode_params("Tool call")?;

        let result =
            ToolRegistry::call(&call_params.name, call_params.arguments, &self.context).await;

        serde_json::to_value(result).map_err(|e| McpError::InternalError(e.to_string()))
    }

    fn handle_resources_list(&self) -> McpResult<Value> {
        let result = ResourceListResult {
            resources: ResourceRegistry::list_resources(&self.context),
            next_cursor: None,
        };
        serde_json::to_value(result).map_err(|e| McpError::InternalError(e.to_string()))
    }

    fn handle_resource_templates_list(&self) -> McpResult<Value> {
        let result = ResourceTemplateListResult {
            resource_templates: ResourceRegistry::list_templates(),
            next_cursor: None,
        };
        serde_json::to_value(result).map_err(|e| McpError::InternalError(e.to_string()))
    }

    fn handle_resources_read(&self, request: &JsonRpcRequest) -> McpResult<Value> {
        let read_params: ResourceReadParams = request.decode_params("Resource read")?;

        let result = ResourceRegistry::read(&read_params.uri, &self.context)?;

        serde_json::to_value(result).map_err(|e| McpError::InternalError(e.to_string()))
    }

    fn handle_prompts_list(&self) -> McpResult<Value> {
        let result = PromptListResult {
            prompts: PromptRegistry::list_prompts(),
            next_cursor: None,
        };
        serde_json::to_value(result).map_err(|e| McpError::InternalError(e.to_string()))
    }

    fn handle_prompts_get(&self, request: &JsonRpcRequest) -> McpResult<Value> {
        let get_params: PromptGetParams = request.decode_params("Prompt get")?;

        let result = PromptRegistry::get(&get_params.name, get_params.arguments)?;

        serde_json::to_value(result).map_err(|e| McpError::InternalError(e.to_string()))
    }
}
