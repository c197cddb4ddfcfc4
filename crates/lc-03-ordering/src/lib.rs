//! # lc-03-ordering
//!
//! Submission of endorsed transactions to the ordering service.
//!
//! ## Overview
//!
//! - **OrderingFlow**: broadcasts the transaction envelope on the
//!   transaction's network.
//! - **OrderingAndFinalityFlow**: broadcasts, then waits until the
//!   transaction is final on the transaction's channel.
//! - **InMemoryOrderer**: a single-node orderer that batches envelopes into
//!   numbered blocks, stamps validation codes and delivers the blocks to the
//!   committing side.
//!
//! ## Flow
//!
//! ```text
//! Client ──tx──→ OrderingAndFinalityFlow
//!                    │
//!                    ├── NetworkProvider::network(name, channel)
//!                    ├── Network::broadcast(envelope) ──→ Orderer ──Block──→ BlockProcessor
//!                    └── Network::is_final(tx_id)    ←── FinalityResolver ←── TxEvent
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use lc_03_ordering::{OrderingAndFinalityFlow, StaticNetworks};
//!
//! OrderingAndFinalityFlow::new(&tx).run(&networks).await?;
//! ```

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod adapters;
pub mod error;
pub mod ports;
pub mod service;
pub mod types;

pub use adapters::{
    header_hash, AcceptAll, ChannelNetwork, InMemoryOrderer, PresetValidator, StaticNetworks,
};
pub use error::{OrderingError, OrderingResult};
pub use ports::inbound::OrderingApi;
pub use ports::outbound::{Broadcaster, Network, NetworkProvider, TxValidator};
pub use service::{OrderingAndFinalityFlow, OrderingFlow, OrderingService};
pub use types::OrdererConfig;
