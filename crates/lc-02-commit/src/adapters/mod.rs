//! # Adapters Layer (Hexagonal Architecture)
//!
//! In-memory vault and ledger implementing the outbound ports.

mod ledger;
mod vault;

pub use ledger::InMemoryLedger;
pub use vault::InMemoryVault;
