//! # Flow Context
//!
//! What a running flow sees of its node: its identity, the sessions it may
//! open, the session it was started on (responders), and the error
//! callbacks to run if it fails.

use crate::endpoint::EndpointService;
use crate::hub::SessionHub;
use crate::session::{Session, SessionError};
use async_trait::async_trait;
use parking_lot::Mutex;
use shared_types::Identity;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Callback run when a flow exits with an error or a panic.
pub type ErrorCallback = Box<dyn FnOnce() + Send>;

#[async_trait]
pub trait FlowContext: Send + Sync {
    /// Flow instance id.
    fn id(&self) -> &str;

    /// Node identity this flow runs as.
    fn me(&self) -> &Identity;

    /// Whether `identity` belongs to this node.
    fn is_me(&self, identity: &Identity) -> bool;

    /// Session to `party`, opened on first use and reused afterwards.
    async fn get_session(&self, party: &Identity) -> Result<Arc<dyn Session>, SessionError>;

    /// The session this flow was started on, if it is a responder.
    fn session(&self) -> Option<Arc<dyn Session>>;

    /// Register a callback to run if the flow fails.
    fn on_error(&self, callback: ErrorCallback);
}

/// Flow context backed by a `SessionHub`.
pub struct LocalFlowContext {
    id: String,
    me: Identity,
    hub: Arc<SessionHub>,
    session: Option<Arc<dyn Session>>,
    sessions: Mutex<HashMap<Identity, Arc<dyn Session>>>,
    error_callbacks: Mutex<Vec<ErrorCallback>>,
}

impl LocalFlowContext {
    pub fn new(me: Identity, hub: Arc<SessionHub>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            me,
            hub,
            session: None,
            sessions: Mutex::new(HashMap::new()),
            error_callbacks: Mutex::new(Vec::new()),
        }
    }

    /// Context of a responder started on `session`.
    pub fn responder(me: Identity, hub: Arc<SessionHub>, session: Arc<dyn Session>) -> Self {
        Self {
            session: Some(session),
            ..Self::new(me, hub)
        }
    }

    /// Take the registered error callbacks, leaving none behind.
    pub fn take_error_callbacks(&self) -> Vec<ErrorCallback> {
        std::mem::take(&mut *self.error_callbacks.lock())
    }
}

#[async_trait]
impl FlowContext for LocalFlowContext {
    fn id(&self) -> &str {
        &self.id
    }

    fn me(&self) -> &Identity {
        &self.me
    }

    fn is_me(&self, identity: &Identity) -> bool {
        identity == &self.me || self.hub.bindings().resolve(identity) == self.me
    }

    async fn get_session(&self, party: &Identity) -> Result<Arc<dyn Session>, SessionError> {
        if let Some(session) = self.sessions.lock().get(party) {
            return Ok(session.clone());
        }
        let session = self.hub.open(&self.me, party).await?;
        self.sessions.lock().insert(party.clone(), session.clone());
        Ok(session)
    }

    fn session(&self) -> Option<Arc<dyn Session>> {
        self.session.clone()
    }

    fn on_error(&self, callback: ErrorCallback) {
        self.error_callbacks.lock().push(callback);
    }
}
