use crate::error::OrderingResult;
use crate::ports::outbound::{Broadcaster, Network, NetworkProvider};
use async_trait::async_trait;
use lc_02_commit::{FinalityApi, FinalityResult};
use parking_lot::RwLock;
use shared_types::Envelope;
use std::sync::Arc;

/// A channel backed by a broadcaster and a finality service.
pub struct ChannelNetwork {
    name: String,
    channel: String,
    broadcaster: Arc<dyn Broadcaster>,
    finality: Arc<dyn FinalityApi>,
}

impl ChannelNetwork {
    pub fn new(
        name: impl Into<String>,
        channel: impl Into<String>,
        broadcaster: Arc<dyn Broadcaster>,
        finality: Arc<dyn FinalityApi>,
    ) -> Self {
        Self {
            name: name.into(),
            channel: channel.into(),
            broadcaster,
            finality,
        }
    }
}

#[async_trait]
impl Network for ChannelNetwork {
    fn name(&self) -> &str {
        &self.name
    }

    fn channel(&self) -> &str {
        &self.channel
    }

    async fn broadcast(&self, envelope: &Envelope) -> OrderingResult<()> {
        self.broadcaster.broadcast(envelope).await
    }

    async fn is_final(&self, tx_id: &str) -> FinalityResult<()> {
        self.finality.is_final(tx_id).await
    }
}

/// Fixed set of networks. The first channel registered for a name is its
/// default channel.
#[derive(Default)]
pub struct StaticNetworks {
    networks: RwLock<Vec<Arc<dyn Network>>>,
}

impl StaticNetworks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a channel, replacing an earlier one with the same name and
    /// channel.
    pub fn register(&self, network: Arc<dyn Network>) {
        let mut networks = self.networks.write();
        match networks
            .iter_mut()
            .find(|n| n.name() == network.name() && n.channel() == network.channel())
        {
            Some(existing) => *existing = network,
            None => networks.push(network),
        }
    }
}

impl NetworkProvider for StaticNetworks {
    fn network(&self, name: &str, channel: &str) -> Option<Arc<dyn Network>> {
        self.networks
            .read()
            .iter()
            .find(|n| n.name() == name && (channel.is_empty() || n.channel() == channel))
            .cloned()
    }
}
