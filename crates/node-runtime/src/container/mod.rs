//! # Configuration Container
//!
//! Node-level configuration, split into one section per subsystem and
//! converted into each crate's own config type at wiring time.

pub mod config;

pub use config::{
    CommitSection, ConfigError, EndorsementSection, LoggingSection, NetworkSection, NodeConfig,
    OrderingSection,
};
