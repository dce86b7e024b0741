//! Model Context Protocol server over the asset register.
//!
//! The transport is streamable HTTP: clients POST JSON-RPC messages,
//! optionally hold a GET-based SSE stream for server-initiated
//! messages, and DELETE to end the session. Layers, outermost first:
//!
//! - **protocol**: JSON-RPC 2.0 wire types and the MCP payloads
//! - **session**: session lifecycle, store, and the outbound stream
//! - **handler**: method routing against one session's state
//! - **registry**: the closed set of tools and their schemas
//! - **dispatch**: argument decoding and tool execution
//! - **tools**: one module per register surface, all read-only

pub mod dispatch;
pub mod error;
pub mod handler;
pub mod protocol;
pub mod registry;
pub mod session;
pub mod tools;

#[cfg(test)]
mod protocol_test;
#[cfg(test)]
mod session_test;

pub use dispatch::Dispatcher;
pub use error::{ToolError, ToolResult};
pub use handler::McpHandler;
pub use session::{Session, SessionStore};
