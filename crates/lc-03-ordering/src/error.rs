//! Error types for ordering submission

use lc_02_commit::FinalityError;
use shared_types::{CodecError, TxId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrderingError {
    /// No network registered under that name (and channel)
    #[error("network [{network}] not found")]
    NetworkNotFound { network: String },

    /// Envelope addressed to a channel this orderer does not serve
    #[error("envelope for channel [{actual}] sent to orderer of channel [{expected}]")]
    ChannelMismatch { expected: String, actual: String },

    /// Envelope could not be built or decoded
    #[error(transparent)]
    Envelope(#[from] CodecError),

    /// The committing side stopped taking blocks
    #[error("block delivery for channel [{channel}] closed")]
    DeliveryClosed { channel: String },

    /// Broadcast succeeded but the transaction did not become final
    #[error("transaction [{tx_id}] did not reach finality")]
    Finality {
        tx_id: TxId,
        #[source]
        source: FinalityError,
    },
}

pub type OrderingResult<T> = Result<T, OrderingError>;
