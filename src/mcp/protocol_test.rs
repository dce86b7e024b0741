//! Tests for the wire types.

use serde_json::{json, Value};

use crate::mcp::protocol::{
    CallToolResult, ClientMessage, RequestId, ServerMessage, codes,
};

fn parse(value: Value) -> ClientMessage {
    serde_json::from_value(value).expect("message should parse")
}

#[test]
fn request_wins_over_notification_when_id_present() {
    let msg = parse(json!({"jsonrpc": "2.0", "id": 1, "method": "ping"}));
    let ClientMessage::Request(request) = msg else {
        panic!("expected a request");
    };
    assert_eq!(request.id, RequestId::Number(1));
    assert_eq!(request.method, "ping");
    assert!(request.params.is_null());
}

#[test]
fn notification_has_no_id() {
    let msg = parse(json!({"jsonrpc": "2.0", "method": "notifications/initialized"}));
    let ClientMessage::Notification(note) = msg else {
        panic!("expected a notification");
    };
    assert_eq!(note.method, "notifications/initialized");
}

#[test]
fn client_response_is_recognized() {
    let msg = parse(json!({"jsonrpc": "2.0", "id": "req-9", "result": {}}));
    let ClientMessage::Response(response) = msg else {
        panic!("expected a response");
    };
    assert_eq!(response.id, RequestId::String("req-9".to_string()));
    assert!(response.result.is_some());
    assert!(response.error.is_none());
}

#[test]
fn string_ids_parse_and_compare() {
    let msg = parse(json!({"jsonrpc": "2.0", "id": "abc", "method": "tools/list"}));
    let ClientMessage::Request(request) = msg else {
        panic!("expected a request");
    };
    assert_eq!(request.id, RequestId::String("abc".to_string()));
}

#[test]
fn initialize_is_the_only_sessionless_request() {
    let init = parse(json!({
        "jsonrpc": "2.0", "id": 0, "method": "initialize",
        "params": {"protocolVersion": "2025-06-18"}
    }));
    assert!(init.is_initialize());

    let list = parse(json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"}));
    assert!(!list.is_initialize());
}

#[test]
fn garbage_objects_do_not_parse() {
    assert!(serde_json::from_value::<ClientMessage>(json!({"foo": 1})).is_err());
    assert!(serde_json::from_value::<ClientMessage>(json!([1, 2, 3])).is_err());
}

#[test]
fn error_serializes_with_explicit_null_id() {
    let msg = ServerMessage::error(
        None,
        codes::BAD_SESSION,
        "Bad Request: No valid session ID provided",
    );
    let value = serde_json::to_value(&msg).expect("serialize should succeed");
    assert_eq!(
        value,
        json!({
            "jsonrpc": "2.0",
            "id": null,
            "error": {
                "code": -32000,
                "message": "Bad Request: No valid session ID provided"
            }
        })
    );
}

#[test]
fn result_serializes_flat() {
    let msg = ServerMessage::result(RequestId::Number(7), json!({"ok": true}));
    let value = serde_json::to_value(&msg).expect("serialize should succeed");
    assert_eq!(
        value,
        json!({"jsonrpc": "2.0", "id": 7, "result": {"ok": true}})
    );
}

#[test]
fn tool_result_omits_is_error_only_when_false() {
    let ok = serde_json::to_value(CallToolResult::text("{}")).expect("serialize");
    assert!(ok.get("isError").is_none());
    assert_eq!(ok["content"][0]["type"], "text");

    let failed = serde_json::to_value(CallToolResult::failure("query failed")).expect("serialize");
    assert_eq!(failed["isError"], json!(true));
    assert_eq!(failed["content"][0]["text"], "query failed");
}
