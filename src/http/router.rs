//! Transport routing for the streamable HTTP MCP surface.
//!
//! One path, three verbs. POST carries JSON-RPC messages; GET opens
//! the session's SSE stream; DELETE ends the session. The session id
//! travels in the `mcp-session-id` header, assigned by the server on
//! the initialize handshake and required on every call after it.

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    middleware,
    response::{
        IntoResponse, Response,
        sse::{KeepAlive, Sse},
    },
    routing::{get, post},
};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::mcp::Session;
use crate::mcp::protocol::{ClientMessage, JSONRPC_VERSION, ServerMessage, codes};

use super::auth::require_bearer;
use super::state::AppState;

/// Session header name, lowercase as it travels on the wire.
pub const SESSION_HEADER: &str = "mcp-session-id";

pub fn create_router(state: AppState) -> Router {
    let mcp = Router::new()
        .route("/mcp", post(post_mcp).get(get_mcp).delete(delete_mcp))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_bearer,
        ));

    Router::new()
        .merge(mcp)
        .route("/health", get(health))
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

async fn health(State(state): State<AppState>) -> Response {
    match state.store().probe().await {
        Ok(()) => (StatusCode::OK, Json(HealthResponse { status: "ok" })).into_response(),
        Err(e) => {
            warn!(error = %e, "health probe failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse { status: "degraded" }),
            )
                .into_response()
        }
    }
}

async fn post_mcp(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let raw: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(e) => {
            return rpc_failure(
                StatusCode::BAD_REQUEST,
                codes::PARSE_ERROR,
                format!("Parse error: {}", e),
            );
        }
    };
    let message: ClientMessage = match serde_json::from_value(raw) {
        Ok(message) => message,
        Err(_) => {
            return rpc_failure(
                StatusCode::BAD_REQUEST,
                codes::INVALID_REQUEST,
                "Invalid Request",
            );
        }
    };

    match session_id(&headers) {
        None if message.is_initialize() => initialize_session(&state, message).await,
        None => bad_session(),
        Some(id) => match state.sessions().resolve(id) {
            Some(session) => {
                if message.is_initialize() {
                    return rpc_failure(
                        StatusCode::BAD_REQUEST,
                        codes::INVALID_REQUEST,
                        "Invalid Request: server already initialized",
                    );
                }
                serve_message(&state, &session, message).await
            }
            None => bad_session(),
        },
    }
}

async fn get_mcp(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let Some(session) = session_id(&headers).and_then(|id| state.sessions().resolve(id)) else {
        return bad_session();
    };

    let Some(stream) = session.attach_stream() else {
        warn!(session = %session.id(), "second live stream refused");
        return (
            StatusCode::CONFLICT,
            Json(json!({"error": "SSE stream already attached for this session"})),
        )
            .into_response();
    };

    debug!(session = %session.id(), "stream attached");
    Sse::new(stream).keep_alive(KeepAlive::default()).into_response()
}

async fn delete_mcp(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let Some(id) = session_id(&headers) else {
        return bad_session();
    };

    if state.sessions().terminate(id) {
        debug!(session = %id, "session terminated");
        StatusCode::OK.into_response()
    } else {
        bad_session()
    }
}

/// Create a session, answer the handshake, and hand out the id.
async fn initialize_session(state: &AppState, message: ClientMessage) -> Response {
    let ClientMessage::Request(request) = message else {
        return rpc_failure(
            StatusCode::BAD_REQUEST,
            codes::INVALID_REQUEST,
            "Invalid Request",
        );
    };
    if request.jsonrpc != JSONRPC_VERSION {
        return rpc_failure(
            StatusCode::BAD_REQUEST,
            codes::INVALID_REQUEST,
            "Invalid Request: unsupported jsonrpc version",
        );
    }

    let session = state.sessions().create();
    let reply = state.handler().initialize(&session, &request);

    match HeaderValue::from_str(session.id()) {
        Ok(value) => (
            StatusCode::OK,
            [(HeaderName::from_static(SESSION_HEADER), value)],
            Json(reply),
        )
            .into_response(),
        Err(_) => {
            state.sessions().terminate(session.id());
            rpc_failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                codes::INTERNAL_ERROR,
                "Internal error",
            )
        }
    }
}

async fn serve_message(state: &AppState, session: &Arc<Session>, message: ClientMessage) -> Response {
    match state.handler().handle(session, message).await {
        Some(reply) => (StatusCode::OK, Json(reply)).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

fn session_id(headers: &HeaderMap) -> Option<&str> {
    headers.get(SESSION_HEADER).and_then(|value| value.to_str().ok())
}

fn bad_session() -> Response {
    rpc_failure(
        StatusCode::BAD_REQUEST,
        codes::BAD_SESSION,
        "Bad Request: No valid session ID provided",
    )
}

fn rpc_failure(status: StatusCode, code: i64, message: impl Into<String>) -> Response {
    (status, Json(ServerMessage::error(None, code, message))).into_response()
}
