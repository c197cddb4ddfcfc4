//! # Session Hub
//!
//! In-memory router that connects flows running on different nodes of the
//! same process. Each node registers once and accepts incoming sessions;
//! initiators open sessions to parties, which the hub routes to the node
//! owning the party.

use crate::endpoint::{EndpointBindings, EndpointService};
use crate::session::{InMemorySession, Session, SessionError};
use crate::DEFAULT_SESSION_CAPACITY;
use parking_lot::RwLock;
use shared_types::Identity;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

/// Routes session requests between registered nodes.
pub struct SessionHub {
    bindings: Arc<EndpointBindings>,
    nodes: RwLock<HashMap<Identity, mpsc::Sender<InMemorySession>>>,
    capacity: usize,
}

impl SessionHub {
    pub fn new(bindings: Arc<EndpointBindings>) -> Self {
        Self::with_capacity(bindings, DEFAULT_SESSION_CAPACITY)
    }

    /// Create a hub whose sessions buffer `capacity` messages per direction.
    pub fn with_capacity(bindings: Arc<EndpointBindings>, capacity: usize) -> Self {
        Self {
            bindings,
            nodes: RwLock::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    pub fn bindings(&self) -> &Arc<EndpointBindings> {
        &self.bindings
    }

    /// Register a node. Re-registering replaces the previous listener.
    pub fn register(&self, node: Identity) -> IncomingSessions {
        let (tx, rx) = mpsc::channel(self.capacity);
        self.nodes.write().insert(node.clone(), tx);
        debug!(node = %node, "Node registered on session hub");
        IncomingSessions { node, receiver: rx }
    }

    /// Open a session from node `from` to the node owning `party`.
    pub async fn open(
        &self,
        from: &Identity,
        party: &Identity,
    ) -> Result<Arc<dyn Session>, SessionError> {
        let node = self.bindings.resolve(party);
        let sender = self
            .nodes
            .read()
            .get(&node)
            .cloned()
            .ok_or_else(|| SessionError::UnknownParty {
                party: party.to_string(),
            })?;

        let session_id = Uuid::new_v4().to_string();
        let (local, remote) =
            InMemorySession::pair(&session_id, from.clone(), node.clone(), self.capacity);
        sender
            .send(remote)
            .await
            .map_err(|_| SessionError::Closed {
                session_id: session_id.clone(),
            })?;

        debug!(session = %session_id, from = %from, to = %node, "Session opened");
        Ok(Arc::new(local))
    }
}

/// Receiving side of a node registration.
pub struct IncomingSessions {
    node: Identity,
    receiver: mpsc::Receiver<InMemorySession>,
}

impl IncomingSessions {
    pub fn node(&self) -> &Identity {
        &self.node
    }

    /// Wait for the next session opened towards this node.
    pub async fn accept(&mut self) -> Option<InMemorySession> {
        self.receiver.recv().await
    }
}
