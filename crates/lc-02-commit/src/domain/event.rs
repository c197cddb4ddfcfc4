use crate::error::TxEventError;
use shared_types::TxId;

/// Outcome of one processed transaction.
///
/// An event with an empty id is produced for entries that need no
/// notification and reaches no listener.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TxEvent {
    pub tx_id: TxId,
    /// `None` when the transaction is valid.
    pub error: Option<TxEventError>,
    /// Transactions decided together with this one.
    pub dependent_tx_ids: Vec<TxId>,
}

impl TxEvent {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn valid(tx_id: impl Into<TxId>, dependent_tx_ids: Vec<TxId>) -> Self {
        Self {
            tx_id: tx_id.into(),
            error: None,
            dependent_tx_ids,
        }
    }

    pub fn failed(tx_id: impl Into<TxId>, error: TxEventError, dependent_tx_ids: Vec<TxId>) -> Self {
        Self {
            tx_id: tx_id.into(),
            error: Some(error),
            dependent_tx_ids,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tx_id.is_empty()
    }

    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }
}
