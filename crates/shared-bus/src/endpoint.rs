//! # Endpoint Bindings
//!
//! Maps signing identities to the node that owns them. An endorsement is
//! accepted from a party only if its endorser identity is bound to that
//! party.

use parking_lot::RwLock;
use shared_types::Identity;
use std::collections::HashMap;

/// Resolves which node an identity belongs to.
pub trait EndpointService: Send + Sync {
    /// Whether `identity` is bound to `party` (or is `party` itself).
    fn is_bound_to(&self, identity: &Identity, party: &Identity) -> bool;

    /// The node owning `identity`. Unbound identities resolve to themselves.
    fn resolve(&self, identity: &Identity) -> Identity;
}

/// In-memory binding table.
#[derive(Default)]
pub struct EndpointBindings {
    bindings: RwLock<HashMap<Identity, Identity>>,
}

impl EndpointBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `identity` to `node`.
    pub fn bind(&self, identity: Identity, node: Identity) {
        self.bindings.write().insert(identity, node);
    }
}

impl EndpointService for EndpointBindings {
    fn is_bound_to(&self, identity: &Identity, party: &Identity) -> bool {
        identity == party || self.resolve(identity) == self.resolve(party)
    }

    fn resolve(&self, identity: &Identity) -> Identity {
        self.bindings
            .read()
            .get(identity)
            .cloned()
            .unwrap_or_else(|| identity.clone())
    }
}
