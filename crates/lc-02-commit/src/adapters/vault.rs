use crate::error::ServiceError;
use crate::ports::outbound::{CommittedTx, ConfigCommitSink, LedgerStateSink, StatusOracle};
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{Status, TxId, TxValidationCode};
use std::collections::HashMap;

#[derive(Default)]
struct VaultState {
    statuses: HashMap<TxId, (Status, Vec<TxId>)>,
    dependents: HashMap<TxId, Vec<TxId>>,
    configs: Vec<(u64, Vec<u8>)>,
}

/// In-memory vault: status oracle and sink for commits.
#[derive(Default)]
pub struct InMemoryVault {
    state: RwLock<VaultState>,
}

impl InMemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a known status, for example `Busy` right after broadcast.
    pub fn set_status(&self, tx_id: &str, status: Status, dependencies: Vec<TxId>) {
        self.state
            .write()
            .statuses
            .insert(tx_id.to_string(), (status, dependencies));
    }

    /// Transactions decided together with `tx_id` once it commits.
    pub fn set_dependents(&self, tx_id: &str, dependents: Vec<TxId>) {
        self.state
            .write()
            .dependents
            .insert(tx_id.to_string(), dependents);
    }

    pub fn configs(&self) -> Vec<(u64, Vec<u8>)> {
        self.state.read().configs.clone()
    }

    fn settle(&self, tx_id: &str, status: Status) -> Vec<TxId> {
        let mut state = self.state.write();
        let dependents = state.dependents.get(tx_id).cloned().unwrap_or_default();
        state.statuses.insert(tx_id.to_string(), (status, Vec::new()));
        for dependent in &dependents {
            state.statuses.insert(dependent.clone(), (status, Vec::new()));
        }
        dependents
    }
}

#[async_trait]
impl StatusOracle for InMemoryVault {
    async fn status(&self, tx_id: &str) -> Result<(Status, Vec<TxId>), ServiceError> {
        Ok(self
            .state
            .read()
            .statuses
            .get(tx_id)
            .cloned()
            .unwrap_or((Status::Unknown, Vec::new())))
    }
}

#[async_trait]
impl LedgerStateSink for InMemoryVault {
    async fn commit_transaction(&self, tx: CommittedTx<'_>) -> Result<Vec<TxId>, ServiceError> {
        Ok(self.settle(tx.tx_id, Status::Valid))
    }

    async fn discard_transaction(&self, tx: CommittedTx<'_>) -> Result<Vec<TxId>, ServiceError> {
        // A replayed id must not overwrite the outcome of the original
        if tx.validation_code == TxValidationCode::DuplicateTxId {
            return Ok(Vec::new());
        }
        Ok(self.settle(tx.tx_id, Status::Invalid))
    }
}

#[async_trait]
impl ConfigCommitSink for InMemoryVault {
    async fn commit_config(&self, block_number: u64, envelope: &[u8]) -> Result<(), ServiceError> {
        let mut state = self.state.write();
        if !state.configs.iter().any(|(n, _)| *n == block_number) {
            state.configs.push((block_number, envelope.to_vec()));
        }
        Ok(())
    }
}
