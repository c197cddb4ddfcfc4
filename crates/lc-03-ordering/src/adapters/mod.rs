//! # Adapters Layer (Hexagonal Architecture)
//!
//! In-memory orderer and network wiring, used by the node runtime's
//! in-memory driver and by tests.

mod network;
mod orderer;
mod validator;

pub use network::{ChannelNetwork, StaticNetworks};
pub use orderer::{header_hash, InMemoryOrderer};
pub use validator::{AcceptAll, PresetValidator};
