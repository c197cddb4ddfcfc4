//! # Signer / Verifier Seams
//!
//! Object-safe traits behind which concrete algorithms are hidden. The
//! membership and wallet services hand out `Arc<dyn Signer>` and
//! `Arc<dyn Verifier>` keyed by identity.

use crate::CryptoError;

/// Produces signatures for one identity.
pub trait Signer: Send + Sync {
    /// Sign `message`.
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, CryptoError>;
}

/// Checks signatures for one identity.
pub trait Verifier: Send + Sync {
    /// Verify `signature` over `message`.
    fn verify(&self, message: &[u8], signature: &[u8]) -> Result<(), CryptoError>;
}
