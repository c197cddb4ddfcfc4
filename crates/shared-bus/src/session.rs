//! # Sessions
//!
//! A session is a bidirectional, ordered message pipe between two nodes.

use async_trait::async_trait;
use shared_types::{Identity, Message};
use thiserror::Error;
use tokio::sync::{mpsc, Mutex};
use tracing::debug;

/// Errors from session operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// No endpoint is registered for the party.
    #[error("No endpoint registered for party {party}")]
    UnknownParty { party: String },

    /// The other side of the session is gone.
    #[error("Session {session_id} closed")]
    Closed { session_id: String },
}

/// A point-to-point session with one counterparty.
#[async_trait]
pub trait Session: Send + Sync {
    /// Session identifier, shared by both ends.
    fn id(&self) -> &str;

    /// The node on the other end.
    fn counterparty(&self) -> &Identity;

    /// Send a payload tagged `Ok`.
    async fn send(&self, payload: Vec<u8>) -> Result<(), SessionError>;

    /// Send an application-level error tagged `Error`.
    async fn send_error(&self, reason: &str) -> Result<(), SessionError>;

    /// Receive the next message, `None` once the other side is gone.
    async fn receive(&self) -> Option<Message>;
}

/// One end of an in-memory session.
pub struct InMemorySession {
    id: String,
    counterparty: Identity,
    outbound: mpsc::Sender<Message>,
    inbound: Mutex<mpsc::Receiver<Message>>,
}

impl InMemorySession {
    /// Create both ends of a session between `a` and `b`.
    ///
    /// The first end talks to `b`, the second to `a`.
    pub fn pair(id: &str, a: Identity, b: Identity, capacity: usize) -> (Self, Self) {
        let (a_tx, b_rx) = mpsc::channel(capacity);
        let (b_tx, a_rx) = mpsc::channel(capacity);
        let a_end = Self {
            id: id.to_string(),
            counterparty: b,
            outbound: a_tx,
            inbound: Mutex::new(a_rx),
        };
        let b_end = Self {
            id: id.to_string(),
            counterparty: a,
            outbound: b_tx,
            inbound: Mutex::new(b_rx),
        };
        (a_end, b_end)
    }

    async fn deliver(&self, message: Message) -> Result<(), SessionError> {
        self.outbound
            .send(message)
            .await
            .map_err(|_| SessionError::Closed {
                session_id: self.id.clone(),
            })
    }
}

#[async_trait]
impl Session for InMemorySession {
    fn id(&self) -> &str {
        &self.id
    }

    fn counterparty(&self) -> &Identity {
        &self.counterparty
    }

    async fn send(&self, payload: Vec<u8>) -> Result<(), SessionError> {
        debug!(session = %self.id, to = %self.counterparty, bytes = payload.len(), "Session send");
        self.deliver(Message::ok(self.id.clone(), payload)).await
    }

    async fn send_error(&self, reason: &str) -> Result<(), SessionError> {
        debug!(session = %self.id, to = %self.counterparty, reason, "Session send error");
        self.deliver(Message::error(self.id.clone(), reason)).await
    }

    async fn receive(&self) -> Option<Message> {
        self.inbound.lock().await.recv().await
    }
}
