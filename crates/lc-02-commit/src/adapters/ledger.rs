use crate::error::ServiceError;
use crate::ports::outbound::LedgerReader;
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::Block;
use std::collections::BTreeMap;

/// Blocks kept in memory by number.
#[derive(Default)]
pub struct InMemoryLedger {
    blocks: RwLock<BTreeMap<u64, Block>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, block: Block) {
        self.blocks.write().insert(block.number(), block);
    }

    pub fn height(&self) -> u64 {
        self.blocks
            .read()
            .keys()
            .next_back()
            .map_or(0, |n| n + 1)
    }
}

#[async_trait]
impl LedgerReader for InMemoryLedger {
    async fn get_block_by_number(&self, number: u64) -> Result<Block, ServiceError> {
        self.blocks
            .read()
            .get(&number)
            .cloned()
            .ok_or_else(|| ServiceError::new("ledger", format!("block {number} not found")))
    }
}
