//! # Adapters Layer (Hexagonal Architecture)
//!
//! In-memory implementations of the outbound ports, used by the node
//! runtime's in-memory driver and by tests.

mod membership;
mod store;
mod wallet;

pub use membership::{InMemoryMembership, KeyDerivedVerifierProvider};
pub use store::InMemoryTransactionStore;
pub use wallet::LocalWallet;
