//! # Transaction Status
//!
//! Status of a transaction as known to the local vault. Read-only from the
//! point of view of the commit pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Vault status of a transaction.
///
/// `Busy` and `HasDependencies` are reported together with the ids of the
/// transactions whose outcome decides this one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Status {
    /// Committed and valid.
    Valid,
    /// Rejected by the ledger.
    Invalid,
    /// Known locally, outcome pending.
    Busy,
    /// Unknown locally, outcome decided by other transactions.
    HasDependencies,
    /// Never seen.
    #[default]
    Unknown,
}

impl Status {
    /// Whether the outcome is final.
    pub fn is_decided(self) -> bool {
        matches!(self, Self::Valid | Self::Invalid)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Valid => "VALID",
            Self::Invalid => "INVALID",
            Self::Busy => "BUSY",
            Self::HasDependencies => "HAS_DEPENDENCIES",
            Self::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}
