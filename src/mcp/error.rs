//! Error types for tool resolution and execution.

use miette::Diagnostic;
use thiserror::Error;

use crate::db::DbError;

use super::protocol::codes;

/// Failures raised while resolving or running a tool call.
///
/// `Execution` wraps store-level failures (including query timeouts);
/// the dispatcher folds those into `isError` tool results so the
/// caller sees them as tool output. The other variants are protocol
/// errors and surface as JSON-RPC error responses.
#[derive(Error, Diagnostic, Debug)]
pub enum ToolError {
    #[error("Unknown tool: {name}")]
    #[diagnostic(code(tagreg::mcp::unknown_tool))]
    UnknownTool { name: String },

    #[error("Invalid arguments: {message}")]
    #[diagnostic(code(tagreg::mcp::invalid_arguments))]
    InvalidArguments { message: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Execution(#[from] DbError),

    #[error("Internal error: {message}")]
    #[diagnostic(code(tagreg::mcp::internal))]
    Internal { message: String },
}

impl ToolError {
    /// JSON-RPC error code for variants that surface as protocol errors.
    pub fn jsonrpc_code(&self) -> i64 {
        match self {
            ToolError::UnknownTool { .. } => codes::METHOD_NOT_FOUND,
            ToolError::InvalidArguments { .. } => codes::INVALID_PARAMS,
            ToolError::Execution(_) | ToolError::Internal { .. } => codes::INTERNAL_ERROR,
        }
    }

    pub(crate) fn invalid_arguments(message: impl Into<String>) -> Self {
        ToolError::InvalidArguments {
            message: message.into(),
        }
    }
}

/// Result type for tool operations.
pub type ToolResult<T> = Result<T, ToolError>;
