//! # Scoped Sub-Flows
//!
//! `run_scoped` runs a flow in a child context of its caller. Error
//! callbacks registered on the child run when the flow returns an error or
//! panics; a panic is caught and returned as `ScopeError::Panicked`.
//! Callbacks run one by one, and a panicking callback does not prevent the
//! remaining ones from running.

use crate::context::{ErrorCallback, FlowContext};
use crate::session::{Session, SessionError};
use async_trait::async_trait;
use futures::FutureExt;
use parking_lot::Mutex;
use shared_types::Identity;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Outcome of a scoped flow that did not succeed.
#[derive(Debug, Error)]
pub enum ScopeError<E> {
    #[error(transparent)]
    Flow(E),

    #[error("Flow panicked: {0}")]
    Panicked(String),
}

/// Context handed to a scoped flow.
///
/// Delegates identity and session lookup to its parent, optionally
/// overrides the current session, and keeps its own error callbacks.
pub struct ChildContext {
    parent: Arc<dyn FlowContext>,
    session: Option<Arc<dyn Session>>,
    error_callbacks: Mutex<Vec<ErrorCallback>>,
}

impl ChildContext {
    fn new(parent: Arc<dyn FlowContext>, session: Option<Arc<dyn Session>>) -> Self {
        Self {
            parent,
            session,
            error_callbacks: Mutex::new(Vec::new()),
        }
    }

    fn cleanup(&self) {
        let callbacks = std::mem::take(&mut *self.error_callbacks.lock());
        debug!(flow = %self.parent.id(), callbacks = callbacks.len(), "Running error callbacks");
        for callback in callbacks {
            if let Err(panic) = std::panic::catch_unwind(AssertUnwindSafe(callback)) {
                warn!(
                    flow = %self.parent.id(),
                    reason = %panic_message(panic.as_ref()),
                    "Error callback panicked"
                );
            }
        }
    }
}

#[async_trait]
impl FlowContext for ChildContext {
    fn id(&self) -> &str {
        self.parent.id()
    }

    fn me(&self) -> &Identity {
        self.parent.me()
    }

    fn is_me(&self, identity: &Identity) -> bool {
        self.parent.is_me(identity)
    }

    async fn get_session(&self, party: &Identity) -> Result<Arc<dyn Session>, SessionError> {
        self.parent.get_session(party).await
    }

    fn session(&self) -> Option<Arc<dyn Session>> {
        self.session.clone().or_else(|| self.parent.session())
    }

    fn on_error(&self, callback: ErrorCallback) {
        self.error_callbacks.lock().push(callback);
    }
}

/// Run `flow` in a child context of `parent`.
pub async fn run_scoped<T, E, F, Fut>(
    parent: Arc<dyn FlowContext>,
    session: Option<Arc<dyn Session>>,
    flow: F,
) -> Result<T, ScopeError<E>>
where
    F: FnOnce(Arc<ChildContext>) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let child = Arc::new(ChildContext::new(parent, session));
    let flow_ctx = child.clone();

    let outcome = AssertUnwindSafe(async move { flow(flow_ctx).await })
        .catch_unwind()
        .await;

    match outcome {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => {
            child.cleanup();
            Err(ScopeError::Flow(err))
        }
        Err(panic) => {
            let reason = panic_message(panic.as_ref());
            warn!(flow = %child.id(), %reason, "Scoped flow panicked");
            child.cleanup();
            Err(ScopeError::Panicked(reason))
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
