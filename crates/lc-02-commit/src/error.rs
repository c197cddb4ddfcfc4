//! Error types for the commit subsystem

use shared_types::{CodecError, Status, TxId, TxValidationCode};
use thiserror::Error;

/// Failure reported by an external collaborator (vault, ledger).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{service}: {reason}")]
pub struct ServiceError {
    pub service: &'static str,
    pub reason: String,
}

impl ServiceError {
    pub fn new(service: &'static str, reason: impl Into<String>) -> Self {
        Self {
            service,
            reason: reason.into(),
        }
    }
}

/// Terminal error carried by a `TxEvent`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TxEventError {
    /// The ledger marked the transaction invalid
    #[error("transaction [{tx_id}] is not valid ({code:?})")]
    Invalid { tx_id: TxId, code: TxValidationCode },
}

/// Block processing errors
#[derive(Debug, Error)]
pub enum CommitError {
    /// Processor halted after a fatal condition, awaiting manual intervention
    #[error("Block processor halted awaiting intervention: {reason}")]
    Halted { reason: String },

    /// Channel state can no longer be trusted; the processor halts
    #[error("Fatal commit error in block {block}: {reason}")]
    Fatal { block: u64, reason: String },

    /// Endorser transaction without a validation code
    #[error("Block {block} lacks a validation code for transaction {index}")]
    MissingValidationCodes { block: u64, index: usize },

    /// Envelope, payload or channel header could not be decoded
    #[error("Malformed transaction {index} in block {block}")]
    Malformed {
        block: u64,
        index: usize,
        #[source]
        source: CodecError,
    },

    /// Applying a transaction to the local ledger state failed
    #[error("Failed applying transaction {tx_id} to ledger state")]
    StateSink {
        tx_id: TxId,
        #[source]
        source: ServiceError,
    },
}

impl CommitError {
    /// Whether the processor must halt on this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal { .. })
    }
}

/// Finality resolution errors
#[derive(Debug, Error)]
pub enum FinalityError {
    /// The vault reports the transaction invalid
    #[error("transaction [{tx_id}] is not valid")]
    TxInvalid { tx_id: TxId },

    /// The commit event for the transaction carried an error
    #[error("transaction [{tx_id}] was rejected at commit")]
    Rejected {
        tx_id: TxId,
        #[source]
        source: TxEventError,
    },

    /// A dependency did not become final
    #[error("dependency [{dependency}] of transaction [{tx_id}] failed")]
    DependencyFailed {
        tx_id: TxId,
        dependency: TxId,
        #[source]
        source: Box<FinalityError>,
    },

    /// The dependency graph loops back onto a transaction being resolved
    #[error("dependency cycle through transaction [{tx_id}]")]
    DependencyCycle { tx_id: TxId },

    /// The status oracle failed
    #[error("failed getting transaction status from vault [{tx_id}]")]
    StatusQuery {
        tx_id: TxId,
        #[source]
        source: ServiceError,
    },

    /// No event before the timeout and the vault still has no verdict.
    /// `source` is set when the final status query itself failed.
    #[error("failed to listen to transaction [{tx_id}] for timeout, last status {last_status}")]
    Timeout {
        tx_id: TxId,
        last_status: Status,
        #[source]
        source: Option<ServiceError>,
    },
}

impl FinalityError {
    /// Innermost error of a dependency chain.
    pub fn root_cause(&self) -> &FinalityError {
        match self {
            Self::DependencyFailed { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Result type for commit operations
pub type CommitResult<T> = Result<T, CommitError>;

/// Result type for finality operations
pub type FinalityResult<T> = Result<T, FinalityError>;
