//! Shared application state.

use std::sync::Arc;

use crate::db::SqliteStore;
use crate::mcp::{McpHandler, SessionStore};

/// State shared by every request handler. Cloning is cheap; everything
/// of substance sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    store: Arc<SqliteStore>,
    sessions: Arc<SessionStore>,
    handler: Arc<McpHandler>,
    api_key: Arc<str>,
}

impl AppState {
    pub fn new(store: SqliteStore, api_key: String) -> Self {
        let store = Arc::new(store);
        Self {
            handler: Arc::new(McpHandler::new(Arc::clone(&store))),
            sessions: Arc::new(SessionStore::new()),
            store,
            api_key: api_key.into(),
        }
    }

    pub fn store(&self) -> &SqliteStore {
        &self.store
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn handler(&self) -> &McpHandler {
        &self.handler
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}
