//! HTTP transport: JSON-RPC over `POST /mcp`, plus `/health` and `/info`.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware,
    response::{IntoResponse, Json as AxumJson, Response},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::protocol::ProtocolHandler;
use crate::types::{McpError, McpResult, SERVER_NAME};

use super::{framing, info_document};

/// Env var read when no `--token` flag is given.
pub const TOKEN_ENV: &str = "MICROFETCH_TOKEN";

/// Shared server state passed to all handlers via axum State.
pub struct ServerState {
    pub token: Option<String>,
    pub handler: Arc<ProtocolHandler>,
}

/// HTTP transport for web-based MCP clients.
pub struct SseTransport {
    state: Arc<ServerState>,
}

impl SseTransport {
    pub fn new(handler: ProtocolHandler) -> Self {
        Self::with_token(handler, None)
    }

    /// Require `Authorization: Bearer <token>` on `/mcp` when a token is set.
    pub fn with_token(handler: ProtocolHandler, token: Option<String>) -> Self {
        Self {
            state: Arc::new(ServerState {
                token,
                handler: Arc::new(handler),
            }),
        }
    }

    /// The routes, without binding a socket.
    pub fn router(&self) -> Router {
        let state = self.state.clone();

        Router::new()
            .route("/mcp", post(handle_request))
            .layer(middleware::from_fn_with_state(state.clone(), auth_layer))
            .route("/health", get(handle_health))
            .route("/info", get(handle_info))
            .layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
            .with_state(state)
    }

    /// Run the HTTP server on the given address.
    pub async fn run(&self, addr: &str) -> McpResult<()> {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(McpError::Io)?;

        tracing::info!("HTTP transport listening on {addr}");
        tracing::info!("  MCP endpoint: http://{addr}/mcp");
        tracing::info!("  Health check: http://{addr}/health");

        axum::serve(listener, self.router())
            .await
            .map_err(|e| McpError::Transport(e.to_string()))?;

        Ok(())
    }
}

/// JSON-RPC error body with `id: null`, for requests rejected before dispatch.
fn rpc_failure(status: StatusCode, error: &McpError) -> Response {
    match framing::unparseable(error) {
        Ok(body) => (status, AxumJson(body)).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

/// Checks the bearer token if one is configured. `/health` and `/info` are
/// routed outside this layer.
async fn auth_layer(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    request: axum::extract::Request,
    next: middleware::Next,
) -> Response {
    if let Some(expected) = &state.token {
        let authorized = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .is_some_and(|token| token == expected);

        if !authorized {
            tracing::warn!("Rejected unauthenticated request to /mcp");
            return rpc_failure(StatusCode::UNAUTHORIZED, &McpError::Unauthorized);
        }
    }

    next.run(request).await
}

/// The body is taken as text so malformed payloads of any content type get
/// the same `-32700` reply stdio gives.
async fn handle_request(State(state): State<Arc<ServerState>>, body: String) -> Response {
    let msg = match framing::parse_message(&body) {
        Ok(msg) => msg,
        Err(e) => {
            tracing::warn!("{e}");
            return rpc_failure(StatusCode::BAD_REQUEST, &e);
        }
    };

    match state.handler.handle_message(msg).await {
        Some(reply) => AxumJson(reply).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

/// Health check, no auth required.
async fn handle_health(State(state): State<Arc<ServerState>>) -> AxumJson<Value> {
    let ctx = state.handler.context();
    AxumJson(json!({
        "status": "healthy",
        "server": SERVER_NAME,
        "binary_available": ctx.binary().is_available(),
        "binary_path": ctx.binary().path().display().to_string(),
        "cached_resources": ctx.cache().len(),
    }))
}

async fn handle_info() -> AxumJson<Value> {
    AxumJson(info_document("HTTP"))
}
