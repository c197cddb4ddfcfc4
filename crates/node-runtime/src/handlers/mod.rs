//! # Event Handlers
//!
//! Long-running loops spawned by the runtime, one per opened channel.

pub mod delivery;

pub use delivery::DeliveryHandler;
