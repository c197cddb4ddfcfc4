//! # Error Types
//!
//! Defines error types used across subsystems.

use thiserror::Error;

/// Errors raised while encoding or decoding shared entities.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CodecError {
    /// Bytes could not be decoded into the expected entity.
    #[error("Failed to decode {entity}: {reason}")]
    Decode {
        entity: &'static str,
        reason: String,
    },

    /// Entity could not be encoded.
    #[error("Failed to encode {entity}: {reason}")]
    Encode {
        entity: &'static str,
        reason: String,
    },

    /// The same identity tried to endorse a transaction twice.
    #[error("Duplicate endorsement from identity {endorser}")]
    DuplicateEndorsement { endorser: String },
}

impl CodecError {
    pub(crate) fn decode(entity: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Decode {
            entity,
            reason: err.to_string(),
        }
    }

    pub(crate) fn encode(entity: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Encode {
            entity,
            reason: err.to_string(),
        }
    }
}

/// Decode a bincode-encoded entity.
pub(crate) fn decode<T: serde::de::DeserializeOwned>(
    entity: &'static str,
    bytes: &[u8],
) -> Result<T, CodecError> {
    bincode::deserialize(bytes).map_err(|e| CodecError::decode(entity, e))
}

/// Encode an entity with bincode.
pub(crate) fn encode<T: serde::Serialize>(
    entity: &'static str,
    value: &T,
) -> Result<Vec<u8>, CodecError> {
    bincode::serialize(value).map_err(|e| CodecError::encode(entity, e))
}
