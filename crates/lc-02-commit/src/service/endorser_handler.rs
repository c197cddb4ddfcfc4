use crate::domain::TxEvent;
use crate::error::{CommitError, CommitResult, TxEventError};
use crate::ports::outbound::{CommittedTx, LedgerStateSink};
use std::sync::Arc;
use tracing::debug;

/// Applies endorser transactions to the local ledger state.
///
/// Valid transactions are committed, all others discarded. The sink's
/// dependent ids are carried on the resulting event.
pub struct EndorserTxHandler {
    sink: Arc<dyn LedgerStateSink>,
}

impl EndorserTxHandler {
    pub fn new(sink: Arc<dyn LedgerStateSink>) -> Self {
        Self { sink }
    }

    pub async fn handle(&self, tx: CommittedTx<'_>) -> CommitResult<TxEvent> {
        let sink_error = |source| CommitError::StateSink {
            tx_id: tx.tx_id.to_string(),
            source,
        };

        if tx.validation_code.is_valid() {
            let dependents = self.sink.commit_transaction(tx).await.map_err(sink_error)?;
            debug!(tx_id = tx.tx_id, dependents = dependents.len(), "[lc-02] transaction committed");
            Ok(TxEvent::valid(tx.tx_id, dependents))
        } else {
            let dependents = self.sink.discard_transaction(tx).await.map_err(sink_error)?;
            debug!(tx_id = tx.tx_id, code = ?tx.validation_code, "[lc-02] transaction discarded");
            let error = TxEventError::Invalid {
                tx_id: tx.tx_id.to_string(),
                code: tx.validation_code,
            };
            Ok(TxEvent::failed(tx.tx_id, error, dependents))
        }
    }
}
