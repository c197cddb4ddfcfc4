//! Driven Ports (SPI - Outbound Dependencies)

use crate::error::ServiceError;
use async_trait::async_trait;
use shared_types::{Block, Status, TxId, TxValidationCode};

/// Vault status lookup
#[async_trait]
pub trait StatusOracle: Send + Sync {
    /// Status of `tx_id` and the transactions that decide it.
    async fn status(&self, tx_id: &str) -> Result<(Status, Vec<TxId>), ServiceError>;
}

/// Access to full ledger blocks
#[async_trait]
pub trait LedgerReader: Send + Sync {
    async fn get_block_by_number(&self, number: u64) -> Result<Block, ServiceError>;
}

/// Applies channel configuration updates
#[async_trait]
pub trait ConfigCommitSink: Send + Sync {
    async fn commit_config(&self, block_number: u64, envelope: &[u8]) -> Result<(), ServiceError>;
}

/// A transaction as handed to the ledger state sink.
#[derive(Clone, Copy, Debug)]
pub struct CommittedTx<'a> {
    pub tx_id: &'a str,
    pub block_number: u64,
    pub index: usize,
    pub validation_code: TxValidationCode,
    /// Serialized envelope; `None` for filtered blocks.
    pub envelope: Option<&'a [u8]>,
}

/// Applies or discards endorser transactions in the local ledger state.
///
/// Both operations return the ids of transactions that share the outcome.
/// They must be idempotent, since a block aborted midway is retried from
/// its first transaction.
#[async_trait]
pub trait LedgerStateSink: Send + Sync {
    async fn commit_transaction(&self, tx: CommittedTx<'_>) -> Result<Vec<TxId>, ServiceError>;

    async fn discard_transaction(&self, tx: CommittedTx<'_>) -> Result<Vec<TxId>, ServiceError>;
}
