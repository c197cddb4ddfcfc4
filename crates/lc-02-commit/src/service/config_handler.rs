use crate::error::{CommitError, CommitResult};
use crate::ports::outbound::{ConfigCommitSink, LedgerReader};
use shared_types::{Block, TxValidationCode};
use std::sync::Arc;
use tracing::{debug, info};

/// A config transaction found in a block.
#[derive(Clone, Copy, Debug)]
pub struct ConfigEntry<'a> {
    pub block_number: u64,
    /// The full block; `None` when committing from a filtered block.
    pub block: Option<&'a Block>,
    pub tx_count: usize,
    pub index: usize,
    pub tx_id: &'a str,
    pub validation_code: TxValidationCode,
}

/// Commits channel configuration transactions.
///
/// Every failure here is fatal: the channel configuration would otherwise
/// diverge from the ledger.
pub struct ConfigCommitHandler {
    ledger: Arc<dyn LedgerReader>,
    sink: Arc<dyn ConfigCommitSink>,
}

impl ConfigCommitHandler {
    pub fn new(ledger: Arc<dyn LedgerReader>, sink: Arc<dyn ConfigCommitSink>) -> Self {
        Self { ledger, sink }
    }

    pub async fn handle(&self, entry: ConfigEntry<'_>) -> CommitResult<()> {
        let fatal = |reason: String| CommitError::Fatal {
            block: entry.block_number,
            reason,
        };

        debug!(tx_id = entry.tx_id, block = entry.block_number, "[lc-02] committing config transaction");

        if entry.tx_count != 1 {
            return Err(fatal(format!(
                "config block should contain only one transaction [{}], found {}",
                entry.tx_id, entry.tx_count
            )));
        }

        if !entry.validation_code.is_valid() {
            debug!(
                tx_id = entry.tx_id,
                code = ?entry.validation_code,
                "[lc-02] config transaction not valid, skipped"
            );
            return Ok(());
        }

        let fetched;
        let block = match entry.block {
            Some(block) => block,
            None => {
                fetched = self
                    .ledger
                    .get_block_by_number(entry.block_number)
                    .await
                    .map_err(|e| fatal(format!("cannot get block: {e}")))?;
                &fetched
            }
        };

        let envelope = block
            .data_at(entry.index)
            .ok_or_else(|| fatal(format!("block has no transaction at index {}", entry.index)))?;

        self.sink
            .commit_config(entry.block_number, envelope)
            .await
            .map_err(|e| fatal(format!("cannot commit config envelope: {e}")))?;

        info!(tx_id = entry.tx_id, block = entry.block_number, "[lc-02] config committed");
        Ok(())
    }
}
