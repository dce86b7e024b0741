//! Per-session JSON-RPC method routing.
//!
//! The transport router owns HTTP concerns (headers, status codes,
//! session resolution); this handler owns everything after a message
//! is parsed and bound to a session.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, warn};

use crate::db::SqliteStore;

use super::dispatch::Dispatcher;
use super::protocol::{
    CallToolParams, ClientMessage, ClientNotification, ClientRequest, InitializeResult,
    JSONRPC_VERSION, ListToolsResult, ServerMessage, codes, methods,
};
use super::registry;
use super::session::{Session, SessionState};

/// Routes parsed client messages against one session's state.
pub struct McpHandler {
    dispatcher: Dispatcher,
}

impl McpHandler {
    pub fn new(store: Arc<SqliteStore>) -> Self {
        Self {
            dispatcher: Dispatcher::new(store),
        }
    }

    /// Answer the handshake for a freshly created session. The client's
    /// offered protocol version is not negotiated; the server states
    /// its own and the client may disconnect if it cannot follow.
    pub fn initialize(&self, session: &Arc<Session>, request: &ClientRequest) -> ServerMessage {
        debug!(session = %session.id(), "initialize handshake");
        match serde_json::to_value(InitializeResult::current()) {
            Ok(result) => ServerMessage::result(request.id.clone(), result),
            Err(e) => ServerMessage::error(
                Some(request.id.clone()),
                codes::INTERNAL_ERROR,
                e.to_string(),
            ),
        }
    }

    /// Handle one message. `None` means nothing goes back in the POST
    /// body, which the transport reports as 202 Accepted.
    pub async fn handle(
        &self,
        session: &Arc<Session>,
        message: ClientMessage,
    ) -> Option<ServerMessage> {
        match message {
            ClientMessage::Request(request) => Some(self.handle_request(session, request).await),
            ClientMessage::Notification(note) => {
                self.handle_notification(session, note);
                None
            }
            ClientMessage::Response(_) => {
                debug!(session = %session.id(), "dropping unsolicited client response");
                None
            }
        }
    }

    async fn handle_request(&self, session: &Arc<Session>, request: ClientRequest) -> ServerMessage {
        if request.jsonrpc != JSONRPC_VERSION {
            return ServerMessage::error(
                Some(request.id),
                codes::INVALID_REQUEST,
                "Invalid Request: unsupported jsonrpc version",
            );
        }

        match request.method.as_str() {
            // A session only exists once initialize has been answered,
            // so reaching this arm means a repeat handshake.
            methods::INITIALIZE => ServerMessage::error(
                Some(request.id),
                codes::INVALID_REQUEST,
                "Invalid Request: server already initialized",
            ),
            methods::PING => ServerMessage::result(request.id, json!({})),
            methods::TOOLS_LIST => {
                if let Some(refusal) = gate(session, &request) {
                    return refusal;
                }
                match serde_json::to_value(ListToolsResult {
                    tools: registry::descriptors(),
                }) {
                    Ok(result) => ServerMessage::result(request.id, result),
                    Err(e) => ServerMessage::error(
                        Some(request.id),
                        codes::INTERNAL_ERROR,
                        e.to_string(),
                    ),
                }
            }
            methods::TOOLS_CALL => {
                if let Some(refusal) = gate(session, &request) {
                    return refusal;
                }
                let params: CallToolParams = match serde_json::from_value(request.params) {
                    Ok(params) => params,
                    Err(e) => {
                        return ServerMessage::error(
                            Some(request.id),
                            codes::INVALID_PARAMS,
                            format!("Invalid params: {}", e),
                        );
                    }
                };
                match self.dispatcher.dispatch(session.id(), params).await {
                    Ok(result) => match serde_json::to_value(result) {
                        Ok(value) => ServerMessage::result(request.id, value),
                        Err(e) => ServerMessage::error(
                            Some(request.id),
                            codes::INTERNAL_ERROR,
                            e.to_string(),
                        ),
                    },
                    Err(err) => {
                        ServerMessage::error(Some(request.id), err.jsonrpc_code(), err.to_string())
                    }
                }
            }
            other => ServerMessage::error(
                Some(request.id),
                codes::METHOD_NOT_FOUND,
                format!("Method not found: {}", other),
            ),
        }
    }

    fn handle_notification(&self, session: &Arc<Session>, note: ClientNotification) {
        match note.method.as_str() {
            methods::INITIALIZED => {
                if session.mark_active() {
                    debug!(session = %session.id(), "session active");
                } else {
                    warn!(session = %session.id(), "repeat initialized notification ignored");
                }
            }
            methods::CANCELLED => {
                // Queries are bounded by the store timeout; there is no
                // per-request cancellation to propagate.
                debug!(session = %session.id(), "cancellation notification acknowledged");
            }
            other => {
                debug!(session = %session.id(), method = %other, "ignoring notification");
            }
        }
    }
}

/// Everything except ping waits for the initialized notification.
fn gate(session: &Arc<Session>, request: &ClientRequest) -> Option<ServerMessage> {
    match session.state() {
        SessionState::Active => None,
        _ => Some(ServerMessage::error(
            Some(request.id.clone()),
            codes::NOT_INITIALIZED,
            "Server not initialized",
        )),
    }
}
