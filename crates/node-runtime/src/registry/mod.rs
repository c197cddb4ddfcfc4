//! # Network Driver Registry
//!
//! Network drivers are factories that open a channel: they build the
//! channel's ordering and finality services and the block processor that
//! feeds them. Drivers are registered by name in a `DriverRegistry` owned
//! by the composition root and looked up when a channel is opened.
//!
//! ```text
//! NodeConfig.network.driver ──→ DriverRegistry::get(name)
//!                                     │
//!                                     └── NetworkDriver::open(network, channel)
//!                                              │
//!                                              ├── Arc<dyn Network>   → StaticNetworks
//!                                              └── DeliveryHandler    → spawned task
//! ```

mod in_memory;

pub use in_memory::{InMemoryChannel, InMemoryDriver};

use crate::container::NodeConfig;
use crate::handlers::DeliveryHandler;
use lc_03_ordering::{Network, OrderingError};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("network driver [{name}] already registered")]
    Duplicate { name: String },

    #[error("network driver [{name}] not found")]
    NotFound { name: String },

    #[error("channel [{channel}] of network [{network}] already open")]
    ChannelOpen { network: String, channel: String },

    #[error("failed opening channel [{channel}] of network [{network}]")]
    Open {
        network: String,
        channel: String,
        #[source]
        source: OrderingError,
    },
}

/// Services of an opened channel.
pub struct OpenedChannel {
    pub network: Arc<dyn Network>,
    pub delivery: DeliveryHandler,
}

pub trait NetworkDriver: Send + Sync {
    fn name(&self) -> &str;

    fn open(
        &self,
        network: &str,
        channel: &str,
        config: &NodeConfig,
    ) -> Result<OpenedChannel, DriverError>;
}

#[derive(Default)]
pub struct DriverRegistry {
    drivers: RwLock<HashMap<String, Arc<dyn NetworkDriver>>>,
}

impl DriverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make a driver available under its name. Names are unique.
    pub fn register(&self, driver: Arc<dyn NetworkDriver>) -> Result<(), DriverError> {
        let mut drivers = self.drivers.write();
        let name = driver.name().to_string();
        if drivers.contains_key(&name) {
            return Err(DriverError::Duplicate { name });
        }
        info!(driver = %name, "network driver registered");
        drivers.insert(name, driver);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn NetworkDriver>, DriverError> {
        self.drivers
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| DriverError::NotFound {
                name: name.to_string(),
            })
    }

    /// Sorted names of the registered drivers.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.drivers.read().keys().cloned().collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_lookup() {
        let registry = DriverRegistry::new();
        registry.register(Arc::new(InMemoryDriver::named("zeta"))).unwrap();
        registry.register(Arc::new(InMemoryDriver::new())).unwrap();

        assert_eq!(registry.names(), vec!["memory", "zeta"]);
        assert_eq!(registry.get("zeta").unwrap().name(), "zeta");
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let registry = DriverRegistry::new();
        registry.register(Arc::new(InMemoryDriver::new())).unwrap();

        let err = registry.register(Arc::new(InMemoryDriver::new())).unwrap_err();
        assert!(matches!(err, DriverError::Duplicate { ref name } if name == "memory"));
    }

    #[test]
    fn test_unknown_driver() {
        let err = DriverRegistry::new().get("fabric").err().unwrap();
        assert!(matches!(err, DriverError::NotFound { .. }));
    }
}
