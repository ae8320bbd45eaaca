//! HTTP transport implementation.
//!
//! Two channels share one [`McpServer`]:
//! - `POST {rpc_path}`: JSON-RPC request/response, one message per request.
//! - `GET {sse_path}`: Server-Sent Events stream. The first event (`endpoint`)
//!   names the URL the client posts its messages to
//!   (`{sse_path}/message?sessionId=<id>`); responses come back as `message`
//!   events on the same stream.
//!
//! A session lives exactly as long as its SSE stream.

use axum::{
    Json, Router,
    extract::{Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{
        IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
    routing::{get, post},
};
use futures::{
    Stream, StreamExt,
    channel::mpsc::{UnboundedReceiver, UnboundedSender, unbounded},
    stream,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{debug, info, instrument, warn};

use super::{Shutdown, TransportError, TransportResult, config::HttpConfig};
use crate::core::McpServer;
use crate::core::server::INSTRUCTIONS;

/// MCP protocol revision spoken by the HTTP transport.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// HTTP transport handler.
pub struct HttpTransport {
    config: HttpConfig,
}

/// JSON-RPC request structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    pub method: String,
    #[serde(default)]
    pub params: Option<serde_json::Value>,
}

/// JSON-RPC response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl JsonRpcResponse {
    /// Create a success response.
    pub fn success(id: Option<serde_json::Value>, result: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response.
    pub fn error(id: Option<serde_json::Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }

    /// Parse error (body is not a JSON-RPC message).
    pub fn parse_error(msg: impl Into<String>) -> Self {
        Self::error(None, -32700, msg)
    }

    /// Method not found error.
    pub fn method_not_found(id: Option<serde_json::Value>) -> Self {
        Self::error(id, -32601, "Method not found")
    }

    /// Invalid request error.
    pub fn invalid_request(id: Option<serde_json::Value>) -> Self {
        Self::error(id, -32600, "Invalid Request")
    }

    /// Invalid params error.
    pub fn invalid_params(id: Option<serde_json::Value>, msg: impl Into<String>) -> Self {
        Self::error(id, -32602, msg)
    }

    /// Internal error.
    pub fn internal_error(id: Option<serde_json::Value>, msg: impl Into<String>) -> Self {
        Self::error(id, -32603, msg)
    }
}

/// Open SSE sessions, keyed by session id.
#[derive(Clone, Default)]
struct Sessions {
    inner: Arc<Mutex<HashMap<String, UnboundedSender<Event>>>>,
}

impl Sessions {
    fn lock(&self) -> MutexGuard<'_, HashMap<String, UnboundedSender<Event>>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a new session and return its id and event receiver.
    fn open(&self) -> (String, UnboundedReceiver<Event>) {
        let id = uuid::Uuid::new_v4().to_string();
        let (tx, rx) = unbounded();
        self.lock().insert(id.clone(), tx);
        (id, rx)
    }

    fn sender(&self, id: &str) -> Option<UnboundedSender<Event>> {
        self.lock().get(id).cloned()
    }

    fn remove(&self, id: &str) -> bool {
        self.lock().remove(id).is_some()
    }

    fn len(&self) -> usize {
        self.lock().len()
    }

    /// Drop every sender so open streams end.
    fn close_all(&self) {
        self.lock().clear();
    }
}

/// Removes its session when the SSE stream is dropped.
struct SessionGuard {
    id: String,
    sessions: Sessions,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if self.sessions.remove(&self.id) {
            info!("SSE session {} closed", self.id);
        }
    }
}

/// Application state shared across HTTP handlers.
#[derive(Clone)]
struct AppState {
    /// The MCP server instance.
    server: McpServer,
    /// HTTP configuration (paths are echoed to clients).
    config: Arc<HttpConfig>,
    /// Open SSE sessions.
    sessions: Sessions,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given config.
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Run the HTTP transport until `shutdown` fires.
    pub async fn run(self, server: McpServer, shutdown: Shutdown) -> TransportResult<()> {
        let addr = self.address();
        let sessions = Sessions::default();
        let app = build_router(&self.config, server, sessions.clone());

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        let cors_status = if self.config.enable_cors {
            "enabled"
        } else {
            "disabled"
        };
        info!(
            "Ready - listening on {} (JSON-RPC over HTTP, CORS {})",
            addr, cors_status
        );
        info!("  → JSON-RPC: POST {}", self.config.rpc_path);
        info!("  → SSE:      GET {}", self.config.sse_path);
        info!("  → Health:   GET /health");

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown.wait().await;
                // Open SSE streams would otherwise keep the server alive.
                sessions.close_all();
            })
            .await
            .map_err(|e| TransportError::http(e.to_string()))?;

        Ok(())
    }
}

/// Build the HTTP router for `server`.
pub fn router(config: &HttpConfig, server: McpServer) -> Router {
    build_router(config, server, Sessions::default())
}

fn build_router(config: &HttpConfig, server: McpServer, sessions: Sessions) -> Router {
    let state = AppState {
        server,
        config: Arc::new(config.clone()),
        sessions,
    };

    let message_path = format!("{}/message", config.sse_path);

    let app = Router::new()
        .route(&config.rpc_path, post(handle_rpc))
        .route(&config.sse_path, get(handle_sse))
        .route(&message_path, post(handle_sse_message))
        .route("/health", get(health_check))
        .route("/", get(root_handler))
        .fallback(not_found)
        .with_state(state)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

    if config.enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app.layer(cors)
    } else {
        app
    }
}

/// Root handler - provides API info.
async fn root_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "name": state.server.name(),
        "version": state.server.version(),
        "transport": "HTTP",
        "endpoints": {
            "rpc": state.config.rpc_path,
            "sse": state.config.sse_path,
            "health": "/health"
        },
        "protocol": "JSON-RPC 2.0",
        "documentation": format!(
            "Send POST requests to {} with JSON-RPC messages, or open {} for a streaming session",
            state.config.rpc_path, state.config.sse_path
        )
    }))
}

/// Health check endpoint.
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "sessions": state.sessions.len(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not found")
}

/// Handle JSON-RPC requests on the request/response channel.
#[instrument(skip_all, fields(method))]
async fn handle_rpc(
    State(state): State<AppState>,
    payload: Result<Json<JsonRpcRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(request) => request,
        Err(rejection) => {
            warn!("Rejected JSON-RPC body: {}", rejection.body_text());
            return (StatusCode::BAD_REQUEST, Json(rejection_response(&rejection))).into_response();
        }
    };

    tracing::Span::current().record("method", request.method.as_str());
    info!("Received JSON-RPC request: {}", request.method);

    match process_request(&state.server, request).await {
        Some(response) => (StatusCode::OK, Json(response)).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

/// Valid JSON that is not a JSON-RPC request is an invalid request;
/// anything else is a parse error.
fn rejection_response(rejection: &JsonRejection) -> JsonRpcResponse {
    match rejection {
        JsonRejection::JsonDataError(_) => JsonRpcResponse::invalid_request(None),
        _ => JsonRpcResponse::parse_error(rejection.body_text()),
    }
}

/// Open an SSE session.
async fn handle_sse(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let (session_id, events) = state.sessions.open();
    info!("SSE session {} opened", session_id);

    let endpoint = Event::default().event("endpoint").data(format!(
        "{}/message?sessionId={}",
        state.config.sse_path, session_id
    ));

    let guard = SessionGuard {
        id: session_id,
        sessions: state.sessions.clone(),
    };

    let stream = stream::once(futures::future::ready(endpoint))
        .chain(events)
        .map(move |event| {
            let _session = &guard;
            Ok::<_, Infallible>(event)
        });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

#[derive(Debug, Deserialize)]
struct MessageQuery {
    #[serde(rename = "sessionId")]
    session_id: String,
}

/// Accept a JSON-RPC message for an SSE session.
///
/// Answers `202 Accepted`; the JSON-RPC response is pushed on the stream.
#[instrument(skip_all)]
async fn handle_sse_message(
    State(state): State<AppState>,
    Query(query): Query<MessageQuery>,
    payload: Result<Json<JsonRpcRequest>, JsonRejection>,
) -> Response {
    let Some(sender) = state.sessions.sender(&query.session_id) else {
        warn!("Message for unknown session");
        return (StatusCode::NOT_FOUND, "Session not found").into_response();
    };

    if sender.is_closed() {
        state.sessions.remove(&query.session_id);
        return (StatusCode::GONE, "Session closed").into_response();
    }

    let Json(request) = match payload {
        Ok(request) => request,
        Err(rejection) => {
            warn!("Rejected SSE message body: {}", rejection.body_text());
            return (StatusCode::BAD_REQUEST, rejection.body_text()).into_response();
        }
    };

    info!(
        "Received SSE message for session {}: {}",
        query.session_id, request.method
    );

    let server = state.server.clone();
    tokio::spawn(async move {
        let Some(response) = process_request(&server, request).await else {
            return;
        };

        match serde_json::to_string(&response) {
            Ok(data) => {
                if sender
                    .unbounded_send(Event::default().event("message").data(data))
                    .is_err()
                {
                    debug!("SSE stream closed before the response was delivered");
                }
            }
            Err(e) => warn!("Failed to serialize JSON-RPC response: {}", e),
        }
    });

    StatusCode::ACCEPTED.into_response()
}

/// Process a JSON-RPC message.
///
/// Returns `None` for notifications, which get no response.
pub async fn process_request(
    server: &McpServer,
    request: JsonRpcRequest,
) -> Option<JsonRpcResponse> {
    if request.method.starts_with("notifications/") {
        handle_notification(&request);
        return None;
    }

    // Validate JSON-RPC version
    if request.jsonrpc != "2.0" {
        return Some(JsonRpcResponse::invalid_request(request.id));
    }

    let response = match request.method.as_str() {
        "initialize" => handle_initialize(server, request),
        "ping" => JsonRpcResponse::success(request.id, serde_json::json!({})),
        "tools/list" => handle_tools_list(server, request),
        "tools/call" => handle_tools_call(server, request).await,
        _ => {
            warn!("Unknown method: {}", request.method);
            JsonRpcResponse::method_not_found(request.id)
        }
    };

    Some(response)
}

/// Handle initialize request.
fn handle_initialize(server: &McpServer, request: JsonRpcRequest) -> JsonRpcResponse {
    info!("Processing initialize request");

    let client = request
        .params
        .as_ref()
        .and_then(|p| p.get("clientInfo"))
        .and_then(|c| c.get("name"))
        .and_then(|n| n.as_str())
        .unwrap_or("unknown");
    debug!("Client: {}", client);

    let result = serde_json::json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": {
            "tools": {}
        },
        "serverInfo": {
            "name": server.name(),
            "version": server.version()
        },
        "instructions": INSTRUCTIONS
    });

    JsonRpcResponse::success(request.id, result)
}

/// Handle tools/list request.
fn handle_tools_list(server: &McpServer, request: JsonRpcRequest) -> JsonRpcResponse {
    JsonRpcResponse::success(
        request.id,
        serde_json::json!({
            "tools": server.list_tools()
        }),
    )
}

/// Handle tools/call request.
async fn handle_tools_call(server: &McpServer, request: JsonRpcRequest) -> JsonRpcResponse {
    let params = match request.params {
        Some(p) => p,
        None => return JsonRpcResponse::invalid_params(request.id, "Missing params"),
    };

    let name = match params.get("name").and_then(|v| v.as_str()) {
        Some(n) => n.to_string(),
        None => return JsonRpcResponse::invalid_params(request.id, "Missing tool name"),
    };

    info!("Processing tools/call: {}", name);

    let arguments = params
        .get("arguments")
        .cloned()
        .unwrap_or(serde_json::Value::Null);

    match server.call_tool(&name, arguments).await {
        Ok(result) => JsonRpcResponse::success(request.id, result),
        Err(e) if e.is_invalid_request() => JsonRpcResponse::invalid_params(request.id, e.to_string()),
        Err(e) => JsonRpcResponse::internal_error(request.id, e.to_string()),
    }
}

fn handle_notification(request: &JsonRpcRequest) {
    match request.method.as_str() {
        "notifications/initialized" => info!("Client sent initialized notification"),
        method => debug!("Received notification: {}", method),
    }
}
