//! JSON-RPC 2.0 wire types for the MCP surface.
//!
//! Only the subset this server speaks is modelled: requests,
//! notifications, and client responses inbound; results, errors, and
//! notifications outbound. Everything rides `serde_json::Value` at the
//! params/result level so handlers decide their own shapes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Protocol revision this server implements.
pub const PROTOCOL_VERSION: &str = "2025-06-18";

pub const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC error codes used on this surface.
pub mod codes {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;
    /// Transport-level session failure: missing, unknown, or expired
    /// session id.
    pub const BAD_SESSION: i64 = -32000;
    /// Request arrived before the initialize handshake completed.
    pub const NOT_INITIALIZED: i64 = -32002;
}

/// Method names served on this surface.
pub mod methods {
    pub const INITIALIZE: &str = "initialize";
    pub const INITIALIZED: &str = "notifications/initialized";
    pub const CANCELLED: &str = "notifications/cancelled";
    pub const PING: &str = "ping";
    pub const TOOLS_LIST: &str = "tools/list";
    pub const TOOLS_CALL: &str = "tools/call";
}

/// Request id; the wire allows integers and strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    Number(i64),
    String(String),
}

/// A client call expecting a response.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientRequest {
    pub jsonrpc: String,
    pub id: RequestId,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

/// A client notification; never answered.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientNotification {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

/// A client response to a server-initiated request. Accepted and
/// dropped, since this server never issues one.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientResponse {
    pub jsonrpc: String,
    pub id: RequestId,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
}

/// Any message a client may POST.
///
/// Variant order matters for untagged deserialization: a request is a
/// notification plus an id, so requests must be tried first.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ClientMessage {
    Request(ClientRequest),
    Notification(ClientNotification),
    Response(ClientResponse),
}

impl ClientMessage {
    pub fn jsonrpc_version(&self) -> &str {
        match self {
            ClientMessage::Request(r) => &r.jsonrpc,
            ClientMessage::Notification(n) => &n.jsonrpc,
            ClientMessage::Response(r) => &r.jsonrpc,
        }
    }

    /// True for the one request allowed to arrive without a session.
    pub fn is_initialize(&self) -> bool {
        matches!(self, ClientMessage::Request(r) if r.method == methods::INITIALIZE)
    }
}

/// Error payload of a failed call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

/// A server→client message.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ServerMessage {
    Result {
        jsonrpc: &'static str,
        id: RequestId,
        result: Value,
    },
    Error {
        jsonrpc: &'static str,
        id: Option<RequestId>,
        error: RpcError,
    },
    Notification {
        jsonrpc: &'static str,
        method: String,
        #[serde(skip_serializing_if = "Value::is_null")]
        params: Value,
    },
}

impl ServerMessage {
    pub fn result(id: RequestId, result: Value) -> Self {
        ServerMessage::Result {
            jsonrpc: JSONRPC_VERSION,
            id,
            result,
        }
    }

    /// `id` is `None` when the failure predates id extraction; it
    /// serializes as an explicit null, as clients expect.
    pub fn error(id: Option<RequestId>, code: i64, message: impl Into<String>) -> Self {
        ServerMessage::Error {
            jsonrpc: JSONRPC_VERSION,
            id,
            error: RpcError {
                code,
                message: message.into(),
            },
        }
    }

    pub fn notification(method: impl Into<String>, params: Value) -> Self {
        ServerMessage::Notification {
            jsonrpc: JSONRPC_VERSION,
            method: method.into(),
            params,
        }
    }
}

// ===== Payloads =====

/// `initialize` result.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    pub protocol_version: &'static str,
    pub capabilities: ServerCapabilities,
    pub server_info: ServerInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServerCapabilities {
    pub tools: ToolsCapability,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolsCapability {
    #[serde(rename = "listChanged")]
    pub list_changed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServerInfo {
    pub name: &'static str,
    pub version: &'static str,
}

impl InitializeResult {
    pub fn current() -> Self {
        Self {
            protocol_version: PROTOCOL_VERSION,
            capabilities: ServerCapabilities {
                tools: ToolsCapability {
                    list_changed: false,
                },
            },
            server_info: ServerInfo {
                name: env!("CARGO_PKG_NAME"),
                version: env!("CARGO_PKG_VERSION"),
            },
            instructions: Some(
                "Read-only view of an engineering asset register. Start with \
                 search_assets or search_documents; use describe_table to see \
                 what each table holds."
                    .to_string(),
            ),
        }
    }
}

/// `tools/call` params.
#[derive(Debug, Clone, Deserialize)]
pub struct CallToolParams {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

/// One content block of a tool result. This server only emits text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

impl Content {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: "text".to_string(),
            text: text.into(),
        }
    }
}

/// `tools/call` result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallToolResult {
    pub content: Vec<Content>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_error: bool,
}

impl CallToolResult {
    /// Successful result carrying one text block.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![Content::text(text)],
            is_error: false,
        }
    }

    /// Failed invocation; the message is the only content.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            content: vec![Content::text(message)],
            is_error: true,
        }
    }
}

fn is_false(v: &bool) -> bool {
    !*v
}

/// Tool metadata served by `tools/list`.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// `tools/list` result.
#[derive(Debug, Clone, Serialize)]
pub struct ListToolsResult {
    pub tools: Vec<ToolDescriptor>,
}
