//! # Identities
//!
//! A party or signer on the network is identified by an opaque byte string.
//! Node identities (who we open sessions with) and signing identities (who
//! produced an endorsement) share the same representation; the binding
//! between the two is owned by the endpoint service.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Transaction identifier, unique per channel.
pub type TxId = String;

/// Opaque serialized identity.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Identity(Vec<u8>);

impl Identity {
    /// Wrap raw identity bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Raw bytes of the identity.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_none(&self) -> bool {
        self.0.is_empty()
    }

    /// Hex rendering used in logs and error messages.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl From<&str> for Identity {
    fn from(value: &str) -> Self {
        Self(value.as_bytes().to_vec())
    }
}

impl From<Vec<u8>> for Identity {
    fn from(value: Vec<u8>) -> Self {
        Self(value)
    }
}

impl AsRef<[u8]> for Identity {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Printable node names are shown as-is, key material as hex.
        match std::str::from_utf8(&self.0) {
            Ok(s) if !s.is_empty() && s.chars().all(|c| c.is_ascii_graphic()) => f.write_str(s),
            _ => f.write_str(&self.to_hex()),
        }
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity({})", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_printable_identity_display() {
        let id = Identity::from("alice");
        assert_eq!(id.to_string(), "alice");
    }

    #[test]
    fn test_binary_identity_display_is_hex() {
        let id = Identity::new(vec![0x00, 0xff]);
        assert_eq!(id.to_string(), "00ff");
    }

    #[test]
    fn test_empty_identity() {
        assert!(Identity::default().is_none());
        assert!(!Identity::from("bob").is_none());
    }
}
