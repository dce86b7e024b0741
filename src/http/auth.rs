//! Shared-secret bearer authentication for the MCP routes.

use axum::{
    Json,
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::warn;

use super::state::AppState;

/// Accepts `Authorization: Bearer <key>` or the bare `token` header
/// carrying the same value. The whole value must match, scheme
/// included; a key without the scheme is rejected.
pub async fn require_bearer(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let headers = request.headers();
    let presented = headers
        .get("token")
        .or_else(|| headers.get(header::AUTHORIZATION))
        .and_then(|value| value.to_str().ok());

    let expected = format!("Bearer {}", state.api_key());
    match presented {
        Some(value) if value == expected => next.run(request).await,
        Some(_) => {
            warn!("rejected request with an invalid credential");
            unauthorized()
        }
        None => {
            warn!("rejected request with no credential");
            unauthorized()
        }
    }
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"error": "Unauthorized"})),
    )
        .into_response()
}
