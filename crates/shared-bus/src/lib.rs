//! # Shared Bus - Point-to-Point Sessions
//!
//! Transport plumbing used by the endorsement flows: sessions between two
//! nodes, the binding of signing identities to nodes, and the flow context
//! a running flow sees.
//!
//! ## Session Model
//!
//! ```text
//! ┌──────────────┐        open()          ┌──────────────┐
//! │  Initiator   │ ─────────────────────→ │  SessionHub  │
//! │              │                        │              │
//! │  send() ─────┼──── Message ─────────→ │  accept() ───┼──→ Responder
//! │  receive() ←─┼──── Message ────────── │              │
//! └──────────────┘                        └──────────────┘
//! ```
//!
//! Every message carries a status tag (`Ok` / `Error`) and an opaque payload.
//!
//! ## Scoped Flows
//!
//! `run_scoped` runs a sub-flow in a child context. Error callbacks
//! registered by the sub-flow run on every failing exit path, including a
//! panic, which is converted into an error.

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod context;
pub mod endpoint;
pub mod hub;
pub mod scope;
pub mod session;

// Re-export main types
pub use context::{ErrorCallback, FlowContext, LocalFlowContext};
pub use endpoint::{EndpointBindings, EndpointService};
pub use hub::{IncomingSessions, SessionHub};
pub use scope::{run_scoped, ChildContext, ScopeError};
pub use session::{InMemorySession, Session, SessionError};

/// Maximum messages buffered per session direction before backpressure.
pub const DEFAULT_SESSION_CAPACITY: usize = 100;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_capacity() {
        assert_eq!(DEFAULT_SESSION_CAPACITY, 100);
    }
}
