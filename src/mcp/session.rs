//! Session lifecycle and registry.
//!
//! A session is created by the transport when an `initialize` request
//! arrives without a session id, advances to active on the
//! `notifications/initialized` notification, and dies on DELETE or
//! server shutdown. Ids are UUIDv4: unguessable, never reused.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use axum::response::sse::Event;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use futures_util::Stream;
use tokio::sync::mpsc;
use tokio_util::sync::{CancellationToken, WaitForCancellationFutureOwned};
use tracing::debug;
use uuid::Uuid;

use super::protocol::ServerMessage;

/// Outbound messages buffered per session until the SSE stream drains
/// them.
const OUTBOUND_BUFFER: usize = 32;

/// Lifecycle of one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// `initialize` answered; `notifications/initialized` pending.
    Initializing,
    Active,
    Closed,
}

/// One client session, shared between the POST handler and the SSE
/// stream bound to it.
pub struct Session {
    id: String,
    created_at: DateTime<Utc>,
    state: Mutex<SessionState>,
    outbound_tx: mpsc::Sender<ServerMessage>,
    outbound_rx: Mutex<Option<mpsc::Receiver<ServerMessage>>>,
    closed: CancellationToken,
}

impl Session {
    fn new(id: String) -> Self {
        let (outbound_tx, outbound_rx) = mpsc::channel(OUTBOUND_BUFFER);
        Self {
            id,
            created_at: Utc::now(),
            state: Mutex::new(SessionState::Initializing),
            outbound_tx,
            outbound_rx: Mutex::new(Some(outbound_rx)),
            closed: CancellationToken::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn state(&self) -> SessionState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn is_closed(&self) -> bool {
        self.state() == SessionState::Closed
    }

    /// Flip Initializing→Active. False when the handshake already
    /// completed or the session is closed; closed sessions never
    /// transition again.
    pub fn mark_active(&self) -> bool {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if *state == SessionState::Initializing {
            *state = SessionState::Active;
            true
        } else {
            false
        }
    }

    /// Queue a message for the SSE stream. Fire and forget: with no
    /// stream attached and the buffer full, the message is dropped.
    pub fn notify(&self, message: ServerMessage) {
        if self.outbound_tx.try_send(message).is_err() {
            debug!(session = %self.id, "outbound buffer unavailable, dropping message");
        }
    }

    /// Claim the single live SSE binding. `None` while another stream
    /// holds it; dropping that stream returns the binding.
    pub fn attach_stream(self: &Arc<Self>) -> Option<OutboundStream> {
        let rx = self
            .outbound_rx
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()?;
        Some(OutboundStream {
            session: Arc::clone(self),
            rx: Some(rx),
            closed: Box::pin(self.closed.clone().cancelled_owned()),
        })
    }

    fn restore_outbound(&self, rx: mpsc::Receiver<ServerMessage>) {
        if !self.is_closed() {
            *self.outbound_rx.lock().unwrap_or_else(|e| e.into_inner()) = Some(rx);
        }
    }

    fn close(&self) {
        *self.state.lock().unwrap_or_else(|e| e.into_inner()) = SessionState::Closed;
        self.closed.cancel();
    }
}

/// Registry of live sessions keyed by id.
pub struct SessionStore {
    sessions: DashMap<String, Arc<Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Create a session under a fresh id. Insertion goes through the
    /// vacant entry so a colliding id can never clobber a live
    /// session.
    pub fn create(&self) -> Arc<Session> {
        loop {
            let id = Uuid::new_v4().to_string();
            match self.sessions.entry(id.clone()) {
                Entry::Occupied(_) => continue,
                Entry::Vacant(slot) => {
                    let session = Arc::new(Session::new(id));
                    slot.insert(Arc::clone(&session));
                    debug!(session = %session.id(), "session created");
                    return session;
                }
            }
        }
    }

    /// Look up a live session. Closed sessions resolve as absent.
    pub fn resolve(&self, id: &str) -> Option<Arc<Session>> {
        let session = self.sessions.get(id)?;
        if session.is_closed() {
            None
        } else {
            Some(Arc::clone(session.value()))
        }
    }

    /// Close and drop a session. True if it existed.
    pub fn terminate(&self, id: &str) -> bool {
        match self.sessions.remove(id) {
            Some((_, session)) => {
                session.close();
                let lived = Utc::now() - session.created_at();
                debug!(session = %id, lived_s = lived.num_seconds(), "session terminated");
                true
            }
            None => false,
        }
    }

    /// Close every session, ending any attached streams. Shutdown
    /// path.
    pub fn close_all(&self) {
        for entry in self.sessions.iter() {
            entry.value().close();
        }
        self.sessions.clear();
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

/// SSE adapter over a session's outbound channel.
///
/// Ends when the session closes; on drop the receiver goes back to
/// the session so a dropped connection can reattach.
pub struct OutboundStream {
    session: Arc<Session>,
    rx: Option<mpsc::Receiver<ServerMessage>>,
    closed: Pin<Box<WaitForCancellationFutureOwned>>,
}

impl Stream for OutboundStream {
    type Item = Result<Event, axum::Error>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.rx.is_none() {
            return Poll::Ready(None);
        }
        if this.closed.as_mut().poll(cx).is_ready() {
            this.rx = None;
            return Poll::Ready(None);
        }
        let Some(rx) = this.rx.as_mut() else {
            return Poll::Ready(None);
        };
        match rx.poll_recv(cx) {
            Poll::Ready(Some(message)) => {
                Poll::Ready(Some(Event::default().event("message").json_data(&message)))
            }
            Poll::Ready(None) => {
                this.rx = None;
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Drop for OutboundStream {
    fn drop(&mut self) {
        if let Some(rx) = self.rx.take() {
            self.session.restore_outbound(rx);
        }
    }
}
