//! Driven Ports (SPI - Outbound Dependencies)

use crate::error::OrderingResult;
use async_trait::async_trait;
use lc_02_commit::FinalityResult;
use shared_types::{ChannelHeader, Envelope, TxValidationCode};
use std::sync::Arc;

/// Submits envelopes to an ordering service.
#[async_trait]
pub trait Broadcaster: Send + Sync {
    async fn broadcast(&self, envelope: &Envelope) -> OrderingResult<()>;
}

/// A channel of a network, as seen by the ordering flows.
#[async_trait]
pub trait Network: Send + Sync {
    fn name(&self) -> &str;

    fn channel(&self) -> &str;

    async fn broadcast(&self, envelope: &Envelope) -> OrderingResult<()>;

    async fn is_final(&self, tx_id: &str) -> FinalityResult<()>;
}

/// Looks networks up by name.
pub trait NetworkProvider: Send + Sync {
    /// An empty `channel` selects the network's default channel.
    fn network(&self, name: &str, channel: &str) -> Option<Arc<dyn Network>>;
}

/// Assigns the validation code of an ordered envelope.
pub trait TxValidator: Send + Sync {
    fn validate(&self, header: &ChannelHeader, envelope: &Envelope) -> TxValidationCode;
}
