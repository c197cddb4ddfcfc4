use crate::error::EndorsementResult;
use crate::ports::outbound::TransactionStore;
use parking_lot::RwLock;
use shared_types::TxId;
use std::collections::HashMap;

/// Raw transactions kept in memory, keyed by id.
#[derive(Default)]
pub struct InMemoryTransactionStore {
    transactions: RwLock<HashMap<TxId, Vec<u8>>>,
}

impl InMemoryTransactionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, tx_id: &str) -> Option<Vec<u8>> {
        self.transactions.read().get(tx_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.transactions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TransactionStore for InMemoryTransactionStore {
    fn store_transaction(&self, tx_id: &str, raw: &[u8]) -> EndorsementResult<()> {
        self.transactions
            .write()
            .insert(tx_id.to_string(), raw.to_vec());
        Ok(())
    }

    fn discard_transaction(&self, tx_id: &str) {
        self.transactions.write().remove(tx_id);
    }
}
