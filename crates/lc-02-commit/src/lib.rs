//! # lc-02-commit
//!
//! Block commit and finality resolution.
//!
//! ## Overview
//!
//! - **BlockProcessor**: walks a committed block in order, hands config
//!   transactions to the `ConfigCommitHandler` and endorser transactions to
//!   the `EndorserTxHandler`, and notifies listeners after every entry.
//! - **ListenerRegistry**: transaction id → subscriber channels. Each
//!   subscription is a guard that unregisters itself when dropped.
//! - **FinalityResolver**: answers "is this transaction final?" from the
//!   vault status, from its dependencies, or by waiting for an event.
//!
//! ## Architecture
//!
//! ```text
//! Ledger ──Block──→ BlockProcessor ──TxEvent──→ ListenerRegistry
//!                        │                            │
//!                        ├── ConfigCommitHandler      │ (subscribe / notify)
//!                        └── EndorserTxHandler        │
//!                                                     ↓
//!        Client ──is_final(tx)──→ FinalityResolver ───┘
//!                                      │
//!                                      └── StatusOracle (vault)
//! ```
//!
//! ## Finality Resolution
//!
//! ```text
//! [QUERYING] ──VALID────────────→ Ok
//!     │──────INVALID────────────→ Err(TxInvalid)
//!     │──────BUSY/HAS_DEPS + ids → resolve each dependency, fail fast
//!     └──────otherwise──────────→ [LISTENING] ──event──→ Ok / Err
//!                                      │
//!                                      └──timeout──→ re-query once
//! ```
//!
//! ## Halt Breaker
//!
//! ```text
//! [RUNNING] ──fatal condition──→ [HALTED] ──manual intervention──→ [RUNNING]
//! ```
//!
//! A halted processor rejects every block until `reset_from_halted()`.
//!
//! ## Example
//!
//! ```rust,ignore
//! use lc_02_commit::{BlockProcessor, CommitConfig, FinalityResolver, ListenerRegistry};
//!
//! let registry = ListenerRegistry::from_config(&config);
//! let mut processor = BlockProcessor::new("mychannel", registry.clone(), ledger, vault.clone(), vault.clone());
//! let resolver = FinalityResolver::new(&config, vault, registry);
//!
//! processor.commit(&block).await?;
//! resolver.is_final("tx-1").await?;
//! ```

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod adapters;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;
pub mod types;

pub use adapters::{InMemoryLedger, InMemoryVault};
pub use domain::{HaltBreaker, ListenerRegistry, ProcessorEvent, ProcessorState, Subscription, TxEvent};
pub use error::{
    CommitError, CommitResult, FinalityError, FinalityResult, ServiceError, TxEventError,
};
pub use ports::inbound::{CommitApi, FinalityApi};
pub use ports::outbound::{CommittedTx, ConfigCommitSink, LedgerReader, LedgerStateSink, StatusOracle};
pub use service::{BlockProcessor, ConfigCommitHandler, EndorserTxHandler, FinalityResolver};
pub use types::CommitConfig;
