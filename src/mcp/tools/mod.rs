//! Tool implementations, one module per register surface.

pub mod assets;
pub mod documents;
pub mod links;
pub mod projects;
pub mod schema;

#[cfg(test)]
mod assets_test;

use serde::Serialize;
use serde_json::json;

use crate::db::Page;

use super::error::{ToolError, ToolResult};
use super::protocol::CallToolResult;

/// Render a page of rows as the shared result envelope.
fn page_result<T: Serialize>(page: &Page<T>) -> ToolResult<CallToolResult> {
    json_result(&json!({
        "total": page.total,
        "returned": page.items.len(),
        "limit": page.limit,
        "items": page.items,
    }))
}

/// Pretty-print a payload into a single text content block.
fn json_result<T: Serialize>(payload: &T) -> ToolResult<CallToolResult> {
    let text = serde_json::to_string_pretty(payload).map_err(|e| ToolError::Internal {
        message: e.to_string(),
    })?;
    Ok(CallToolResult::text(text))
}
