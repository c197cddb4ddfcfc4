use crate::ports::outbound::{MembershipService, VerifierProvider};
use parking_lot::RwLock;
use shared_crypto::{Ed25519PublicKey, Verifier};
use shared_types::Identity;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Membership table of known endorsers.
#[derive(Default)]
pub struct InMemoryMembership {
    verifiers: RwLock<HashMap<Identity, Arc<dyn Verifier>>>,
}

impl InMemoryMembership {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, identity: Identity, verifier: Arc<dyn Verifier>) {
        self.verifiers.write().insert(identity, verifier);
    }

    /// Register an Ed25519 identity whose bytes are its public key.
    pub fn register_ed25519(&self, identity: &Identity) -> bool {
        match Ed25519PublicKey::from_slice(identity.as_bytes()) {
            Ok(key) => {
                self.register(identity.clone(), Arc::new(key));
                true
            }
            Err(_) => false,
        }
    }
}

impl MembershipService for InMemoryMembership {
    fn get_verifier(&self, identity: &Identity) -> Option<Arc<dyn Verifier>> {
        self.verifiers.read().get(identity).cloned()
    }
}

/// Treats identity bytes as an Ed25519 public key.
///
/// Accepts any endorser whose identity is a well-formed key, so it is only
/// suitable behind a membership check or in closed test networks.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeyDerivedVerifierProvider;

impl VerifierProvider for KeyDerivedVerifierProvider {
    fn get_verifier(&self, identity: &Identity) -> Option<Arc<dyn Verifier>> {
        match Ed25519PublicKey::from_slice(identity.as_bytes()) {
            Ok(key) => Some(Arc::new(key)),
            Err(err) => {
                debug!(identity = %identity, error = %err, "[lc-01] identity is not an ed25519 key");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_crypto::Ed25519KeyPair;

    #[test]
    fn test_membership_lookup() {
        let keys = Ed25519KeyPair::from_seed([7; 32]);
        let id = Identity::new(keys.public_key().as_bytes().to_vec());
        let membership = InMemoryMembership::new();

        assert!(membership.get_verifier(&id).is_none());
        assert!(membership.register_ed25519(&id));
        assert!(membership.get_verifier(&id).is_some());
        assert!(!membership.register_ed25519(&Identity::from("not-a-key")));
    }

    #[test]
    fn test_key_derived_provider() {
        let keys = Ed25519KeyPair::from_seed([9; 32]);
        let id = Identity::new(keys.public_key().as_bytes().to_vec());

        assert!(KeyDerivedVerifierProvider.get_verifier(&id).is_some());
        assert!(KeyDerivedVerifierProvider
            .get_verifier(&Identity::from("bob"))
            .is_none());
    }
}
