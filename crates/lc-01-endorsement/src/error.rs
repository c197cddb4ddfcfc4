//! Error types for the endorsement subsystem

use shared_bus::SessionError;
use shared_crypto::CryptoError;
use shared_types::CodecError;
use thiserror::Error;

/// Endorsement errors
#[derive(Debug, Error)]
pub enum EndorsementError {
    /// No reply within the response timeout
    #[error("Timeout from party {party} while collecting endorsement for transaction {tx_id}")]
    Timeout { party: String, tx_id: String },

    /// The party answered with an application-level error
    #[error("Party {party} rejected transaction {tx_id}: {reason}")]
    Rejected {
        party: String,
        tx_id: String,
        reason: String,
    },

    /// The session ended before a reply arrived
    #[error("Session with party {party} closed before a reply was received")]
    SessionClosed { party: String },

    /// Transport failure
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// The reply could not be decoded
    #[error("Failed to decode reply from party {party}: {reason}")]
    MalformedReply { party: String, reason: String },

    /// No response in the reply is bound to the requested party
    #[error("Invalid endorsement, expected one signed by [{party}]")]
    InvalidEndorsement { party: String },

    /// Neither membership nor any verifier provider knows the endorser
    #[error("Failed getting verifier for identity {endorser}")]
    VerifierNotFound { endorser: String },

    /// Endorser signature did not verify
    #[error("Failed verifying endorsement for identity {endorser}")]
    InvalidSignature {
        endorser: String,
        #[source]
        source: CryptoError,
    },

    /// Simulation results differ from the locally computed ones
    #[error("Received different results from identity {endorser}")]
    ResultsMismatch { endorser: String },

    /// Identity already endorsed this transaction
    #[error("Duplicate endorsement from identity {endorser}")]
    DuplicateEndorsement { endorser: String },

    /// No local signer for the identity
    #[error("No signer available for identity {identity}")]
    SignerNotFound { identity: String },

    /// Local signing failed
    #[error("Signing failed: {0}")]
    Signing(#[from] CryptoError),

    /// Transaction store failure
    #[error("Failed storing transaction {tx_id}: {reason}")]
    Store { tx_id: String, reason: String },

    /// Responder flow started without an incoming session
    #[error("Responder has no incoming session")]
    NoSession,

    /// Entity encoding failure
    #[error("Codec error: {0}")]
    Codec(CodecError),
}

impl From<CodecError> for EndorsementError {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::DuplicateEndorsement { endorser } => Self::DuplicateEndorsement { endorser },
            other => Self::Codec(other),
        }
    }
}

/// Result type for endorsement operations
pub type EndorsementResult<T> = Result<T, EndorsementError>;
