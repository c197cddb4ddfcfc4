//! In-memory network driver.
//!
//! Every channel gets its own ledger, vault, listener registry and
//! single-node orderer. The channel handles stay reachable through
//! `InMemoryDriver::channel` so that tests and local tools can cut blocks
//! and inspect the vault.

use super::{DriverError, NetworkDriver, OpenedChannel};
use crate::container::NodeConfig;
use crate::handlers::DeliveryHandler;
use lc_02_commit::{
    BlockProcessor, FinalityResolver, InMemoryLedger, InMemoryVault, ListenerRegistry,
};
use lc_03_ordering::{AcceptAll, ChannelNetwork, InMemoryOrderer, TxValidator};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Handles on the components of an in-memory channel.
#[derive(Clone)]
pub struct InMemoryChannel {
    pub orderer: Arc<InMemoryOrderer>,
    pub ledger: Arc<InMemoryLedger>,
    pub vault: Arc<InMemoryVault>,
    pub registry: Arc<ListenerRegistry>,
    pub resolver: Arc<FinalityResolver>,
}

pub struct InMemoryDriver {
    name: String,
    validator: Arc<dyn TxValidator>,
    channels: RwLock<HashMap<(String, String), InMemoryChannel>>,
}

impl InMemoryDriver {
    pub fn new() -> Self {
        Self::named("memory")
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            validator: Arc::new(AcceptAll),
            channels: RwLock::new(HashMap::new()),
        }
    }

    /// Validation applied by the orderers of channels opened afterwards.
    pub fn with_validator(mut self, validator: Arc<dyn TxValidator>) -> Self {
        self.validator = validator;
        self
    }

    pub fn channel(&self, network: &str, channel: &str) -> Option<InMemoryChannel> {
        self.channels
            .read()
            .get(&(network.to_string(), channel.to_string()))
            .cloned()
    }
}

impl Default for InMemoryDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl NetworkDriver for InMemoryDriver {
    fn name(&self) -> &str {
        &self.name
    }

    fn open(
        &self,
        network: &str,
        channel: &str,
        config: &NodeConfig,
    ) -> Result<OpenedChannel, DriverError> {
        let key = (network.to_string(), channel.to_string());
        let mut channels = self.channels.write();
        if channels.contains_key(&key) {
            return Err(DriverError::ChannelOpen {
                network: key.0,
                channel: key.1,
            });
        }

        let commit = config.commit_config();
        let ledger = Arc::new(InMemoryLedger::new());
        let vault = Arc::new(InMemoryVault::new());
        let registry = ListenerRegistry::from_config(&commit);

        let processor = BlockProcessor::new(
            channel,
            registry.clone(),
            ledger.clone(),
            vault.clone(),
            vault.clone(),
        );
        let (orderer, blocks) = InMemoryOrderer::new(config.orderer_config(), channel, ledger.clone());
        let orderer = Arc::new(orderer.with_validator(self.validator.clone()));
        let resolver = Arc::new(FinalityResolver::new(&commit, vault.clone(), registry.clone()));

        let handle = Arc::new(ChannelNetwork::new(
            network,
            channel,
            orderer.clone(),
            resolver.clone(),
        ));
        channels.insert(
            key,
            InMemoryChannel {
                orderer,
                ledger,
                vault,
                registry,
                resolver,
            },
        );
        info!(network, channel, "in-memory channel opened");

        Ok(OpenedChannel {
            network: handle,
            delivery: DeliveryHandler::new(processor, blocks),
        })
    }
}
