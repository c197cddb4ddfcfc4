//! # lc-01-endorsement
//!
//! Endorsement collection: gathers cryptographically verifiable approvals
//! of a proposed transaction from every required party.
//!
//! ## Overview
//!
//! - **Local parties** are endorsed in-process with the node's own signer.
//! - **Remote parties** are contacted one after the other over a session.
//!   Each reply is a JSON array of serialized proposal responses.
//! - **Fail closed**: a timeout, a remote error, an unbound endorser, a bad
//!   signature or diverging results abort the whole collection.
//!
//! ## Protocol
//!
//! ```text
//! Initiator                                  Party
//!    │                                          │
//!    │──── Transaction (bincode) ──────────────→│
//!    │                                          │ endorse with each identity
//!    │                                          │ store raw transaction
//!    │←─── [ProposalResponse, ...] (JSON) ──────│
//!    │                                          │
//!    │ bound to party?  verifier?  signature?  results equal?
//! ```
//!
//! The signed message of every response is `payload || endorser`.
//!
//! ## Example
//!
//! ```rust,ignore
//! use lc_01_endorsement::{EndorsementCollector, EndorsementConfig};
//!
//! let collector = EndorsementCollector::new(
//!     EndorsementConfig::default(),
//!     membership,
//!     endpoints,
//!     wallet,
//! );
//!
//! collector.collect(&ctx, &mut tx, &[alice, bob]).await?;
//! ```

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod service;
pub mod types;

pub use adapters::{
    InMemoryMembership, InMemoryTransactionStore, KeyDerivedVerifierProvider, LocalWallet,
};
pub use domain::{decode_reply, encode_reply, endorse_with_identity, verify_response};
pub use error::{EndorsementError, EndorsementResult};
pub use ports::inbound::EndorsementApi;
pub use ports::outbound::{MembershipService, SignerService, TransactionStore, VerifierProvider};
pub use service::{
    receive_transaction, CollectOptions, EndorsementCollector, EndorsementResponder,
    EndorsementSession,
};
pub use types::EndorsementConfig;
