//! Tool dispatch.
//!
//! The dispatcher sits between the JSON-RPC handler and the tool
//! implementations. It owns the boundary where store failures stop
//! being errors: a query that fails or times out comes back as an
//! `isError` tool result, not a protocol error, so a bad invocation
//! never tears down the session.

use std::sync::Arc;
use std::time::Instant;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::db::SqliteStore;

use super::error::ToolError;
use super::protocol::{CallToolParams, CallToolResult};
use super::registry::ToolName;
use super::tools;

/// Routes `tools/call` requests to implementations.
pub struct Dispatcher {
    store: Arc<SqliteStore>,
}

impl Dispatcher {
    pub fn new(store: Arc<SqliteStore>) -> Self {
        Self { store }
    }

    /// Run one invocation end to end.
    ///
    /// Unknown tools and undecodable arguments surface as `Err` so the
    /// handler can answer with the matching JSON-RPC code. Execution
    /// failures come back as `Ok` results flagged `isError`.
    #[instrument(skip_all, fields(session = %session_id, tool = %params.name))]
    pub async fn dispatch(
        &self,
        session_id: &str,
        params: CallToolParams,
    ) -> Result<CallToolResult, ToolError> {
        let Some(tool) = ToolName::parse(&params.name) else {
            warn!("unknown tool requested");
            return Err(ToolError::UnknownTool { name: params.name });
        };

        let started = Instant::now();
        let outcome = self.run(tool, params.arguments).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match outcome {
            Ok(result) => {
                info!(elapsed_ms, is_error = result.is_error, "tool call completed");
                Ok(result)
            }
            Err(ToolError::Execution(db)) => {
                warn!(elapsed_ms, error = %db, "tool call failed against the store");
                Ok(CallToolResult::failure(format!("Query failed: {}", db)))
            }
            Err(err) => {
                warn!(elapsed_ms, error = %err, "tool call rejected");
                Err(err)
            }
        }
    }

    async fn run(&self, tool: ToolName, arguments: Value) -> Result<CallToolResult, ToolError> {
        match tool {
            ToolName::SearchAssets => {
                tools::assets::search(&self.store, parse_args(arguments)?).await
            }
            ToolName::GetAsset => tools::assets::get(&self.store, parse_args(arguments)?).await,
            ToolName::SearchDocuments => {
                tools::documents::search(&self.store, parse_args(arguments)?).await
            }
            ToolName::SearchProjects => {
                tools::projects::search(&self.store, parse_args(arguments)?).await
            }
            ToolName::ListAssetDocuments => {
                tools::links::asset_documents(&self.store, parse_args(arguments)?).await
            }
            ToolName::ListDocumentAssets => {
                tools::links::document_assets(&self.store, parse_args(arguments)?).await
            }
            ToolName::DescribeTable => {
                tools::schema::describe(&self.store, parse_args(arguments)?).await
            }
        }
    }
}

/// Decode tool arguments, treating omitted arguments as an empty object.
fn parse_args<T: DeserializeOwned>(arguments: Value) -> Result<T, ToolError> {
    let value = match arguments {
        Value::Null => Value::Object(serde_json::Map::new()),
        other => other,
    };
    serde_json::from_value(value).map_err(|e| ToolError::InvalidArguments {
        message: e.to_string(),
    })
}
