//! Tests for the session registry.

use std::collections::HashSet;

use futures_util::StreamExt;
use serde_json::json;

use crate::mcp::protocol::{RequestId, ServerMessage};
use crate::mcp::session::{SessionState, SessionStore};

#[test]
fn created_sessions_get_unique_unguessable_ids() {
    let store = SessionStore::new();
    let started = chrono::Utc::now();
    let mut ids = HashSet::new();
    for _ in 0..100 {
        let session = store.create();
        assert_eq!(session.state(), SessionState::Initializing);
        assert!(session.created_at() >= started);
        assert!(ids.insert(session.id().to_string()), "duplicate session id");
    }
    assert_eq!(store.len(), 100);
}

#[test]
fn resolve_finds_live_sessions_only() {
    let store = SessionStore::new();
    let session = store.create();

    let found = store.resolve(session.id()).expect("session should resolve");
    assert_eq!(found.id(), session.id());
    assert!(store.resolve("not-a-session").is_none());
}

#[test]
fn terminate_closes_and_removes() {
    let store = SessionStore::new();
    let session = store.create();
    let id = session.id().to_string();

    assert!(store.terminate(&id));
    assert!(store.resolve(&id).is_none());
    assert!(!store.terminate(&id), "second delete should find nothing");
    assert_eq!(session.state(), SessionState::Closed);
    assert!(!session.mark_active(), "closed sessions never transition");
}

#[test]
fn handshake_flips_state_exactly_once() {
    let store = SessionStore::new();
    let session = store.create();

    assert!(session.mark_active());
    assert_eq!(session.state(), SessionState::Active);
    assert!(!session.mark_active(), "repeat handshake is a no-op");
    assert_eq!(session.state(), SessionState::Active);
}

#[test]
fn only_one_stream_holds_the_binding() {
    let store = SessionStore::new();
    let session = store.create();

    let first = session.attach_stream().expect("first attach should win");
    assert!(session.attach_stream().is_none(), "binding is single");

    drop(first);
    assert!(
        session.attach_stream().is_some(),
        "dropping the stream must return the binding"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn stream_yields_messages_then_ends_on_close() {
    let store = SessionStore::new();
    let session = store.create();
    let mut stream = session.attach_stream().expect("attach should succeed");

    session.notify(ServerMessage::result(RequestId::Number(1), json!({"ok": true})));
    let event = stream.next().await.expect("stream should yield");
    assert!(event.is_ok());

    store.terminate(session.id());
    assert!(stream.next().await.is_none(), "close must end the stream");
}

#[tokio::test(flavor = "multi_thread")]
async fn messages_buffer_across_reconnect() {
    let store = SessionStore::new();
    let session = store.create();

    // Queued with no stream attached.
    session.notify(ServerMessage::notification("notifications/message", json!({"n": 1})));

    let mut stream = session.attach_stream().expect("attach should succeed");
    let event = stream.next().await.expect("buffered message should arrive");
    assert!(event.is_ok());
}

#[test]
fn close_all_empties_the_store() {
    let store = SessionStore::new();
    let a = store.create();
    let b = store.create();

    store.close_all();

    assert!(store.is_empty());
    assert_eq!(a.state(), SessionState::Closed);
    assert_eq!(b.state(), SessionState::Closed);
}
