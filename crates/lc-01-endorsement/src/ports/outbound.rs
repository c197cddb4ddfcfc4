//! Driven Ports (SPI - Outbound Dependencies)

use crate::error::EndorsementResult;
use shared_crypto::{Signer, Verifier};
use shared_types::Identity;
use std::sync::Arc;

/// Channel membership: the primary source of endorser verification keys.
pub trait MembershipService: Send + Sync {
    fn get_verifier(&self, identity: &Identity) -> Option<Arc<dyn Verifier>>;
}

/// Fallback source of verification keys, consulted after membership.
pub trait VerifierProvider: Send + Sync {
    fn get_verifier(&self, identity: &Identity) -> Option<Arc<dyn Verifier>>;
}

/// Local signing identities.
pub trait SignerService: Send + Sync {
    fn get_signer(&self, identity: &Identity) -> Option<Arc<dyn Signer>>;

    /// Identity used when a responder is not told which one to endorse with.
    fn default_identity(&self) -> Identity;
}

/// Local vault storage for transactions a responder endorsed.
pub trait TransactionStore: Send + Sync {
    fn store_transaction(&self, tx_id: &str, raw: &[u8]) -> EndorsementResult<()>;

    /// Forget a stored transaction whose endorsement never reached the
    /// initiator. No-op for unknown ids.
    fn discard_transaction(&self, tx_id: &str);
}
