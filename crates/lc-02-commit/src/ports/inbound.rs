//! Driving Ports (API - Inbound)

use crate::domain::ProcessorState;
use crate::error::{CommitResult, FinalityResult};
use async_trait::async_trait;
use shared_types::{Block, FilteredBlock};

/// Block commit API
///
/// Takes `&mut self`: one processor per channel, never re-entered.
#[async_trait]
pub trait CommitApi: Send {
    /// Process every transaction of a committed block, in order.
    async fn commit(&mut self, block: &Block) -> CommitResult<()>;

    /// Process a filtered block (ids, header types and validation codes).
    async fn commit_filtered(&mut self, block: &FilteredBlock) -> CommitResult<()>;

    fn state(&self) -> ProcessorState;

    /// Manual intervention after a halt.
    fn reset_from_halted(&mut self) -> CommitResult<()>;
}

/// Finality API
#[async_trait]
pub trait FinalityApi: Send + Sync {
    /// Wait until `tx_id` is known committed (Ok) or rejected (Err).
    async fn is_final(&self, tx_id: &str) -> FinalityResult<()>;
}
