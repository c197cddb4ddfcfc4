//! Driving Ports (API - Inbound)

use crate::error::OrderingResult;
use async_trait::async_trait;
use shared_types::Transaction;

/// Ordering API
#[async_trait]
pub trait OrderingApi: Send + Sync {
    /// Broadcast the transaction to the ordering service.
    async fn order(&self, tx: &Transaction) -> OrderingResult<()>;

    /// Broadcast, then wait until the transaction is final.
    async fn order_and_finalize(&self, tx: &Transaction) -> OrderingResult<()>;
}
