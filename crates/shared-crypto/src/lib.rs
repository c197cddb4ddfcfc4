//! # Shared Crypto - Signing and Verification Primitives
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `signatures` | Ed25519 | Endorsement signing and verification |
//! | `hashing` | SHA-256 | Proposal and block digests |
//! | `traits` | - | `Signer` / `Verifier` seams used by the membership services |
//!
//! ## Security Properties
//!
//! - **Ed25519**: Deterministic nonces, no RNG dependency
//! - Secret key material is zeroized on drop

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod hashing;
pub mod signatures;
pub mod traits;

// Re-exports
pub use errors::CryptoError;
pub use hashing::{sha256, Sha256Hasher};
pub use signatures::{Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature};
pub use traits::{Signer, Verifier};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
