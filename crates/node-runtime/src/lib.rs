//! # Node Runtime
//!
//! Composition root of the commit pipeline.
//!
//! ## Modular Structure
//!
//! - `container/` - Node configuration (defaults, TOML file, `LC_*` env)
//! - `registry/` - Network driver registry and the in-memory driver
//! - `handlers/` - Block delivery handler, one task per channel
//! - `telemetry` - Logging initialization
//! - `runtime` - `NodeRuntime`: opens channels and owns their tasks
//!
//! ## Commit Flow
//!
//! ```text
//! Client ──endorse──→ EndorsementCollector ──tx──→ OrderingAndFinalityFlow
//!                                                      │
//!                     ┌────── broadcast ───────────────┤
//!                     ↓                                │ is_final
//!                  Orderer ──Block──→ DeliveryHandler  │
//!                                          │           ↓
//!                                    BlockProcessor ──TxEvent──→ FinalityResolver
//! ```

pub mod container;
pub mod handlers;
pub mod registry;
pub mod runtime;
pub mod telemetry;

pub use container::{ConfigError, NodeConfig};
pub use handlers::DeliveryHandler;
pub use registry::{DriverError, DriverRegistry, InMemoryChannel, InMemoryDriver, NetworkDriver, OpenedChannel};
pub use runtime::NodeRuntime;
pub use telemetry::init_tracing;
