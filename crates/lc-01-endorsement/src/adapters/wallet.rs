use crate::ports::outbound::SignerService;
use parking_lot::RwLock;
use shared_crypto::{Ed25519KeyPair, Signer};
use shared_types::Identity;
use std::collections::HashMap;
use std::sync::Arc;

/// Ed25519 signing identities held by this node.
///
/// An identity is the raw public key of its keypair. The first identity
/// added is the default one.
pub struct LocalWallet {
    default: Identity,
    keys: RwLock<HashMap<Identity, Arc<Ed25519KeyPair>>>,
}

impl LocalWallet {
    /// Wallet with a freshly generated default identity.
    pub fn generate() -> Self {
        Self::with_default(Ed25519KeyPair::generate())
    }

    pub fn with_default(keys: Ed25519KeyPair) -> Self {
        let default = identity_of(&keys);
        let mut map = HashMap::new();
        map.insert(default.clone(), Arc::new(keys));
        Self {
            default,
            keys: RwLock::new(map),
        }
    }

    /// Add another identity and return it.
    pub fn add(&self, keys: Ed25519KeyPair) -> Identity {
        let identity = identity_of(&keys);
        self.keys.write().insert(identity.clone(), Arc::new(keys));
        identity
    }

    pub fn identities(&self) -> Vec<Identity> {
        self.keys.read().keys().cloned().collect()
    }
}

fn identity_of(keys: &Ed25519KeyPair) -> Identity {
    Identity::new(keys.public_key().as_bytes().to_vec())
}

impl SignerService for LocalWallet {
    fn get_signer(&self, identity: &Identity) -> Option<Arc<dyn Signer>> {
        self.keys
            .read()
            .get(identity)
            .map(|keys| keys.clone() as Arc<dyn Signer>)
    }

    fn default_identity(&self) -> Identity {
        self.default.clone()
    }
}
