use std::time::Duration;

/// Endorsement configuration
#[derive(Clone, Debug)]
pub struct EndorsementConfig {
    /// How long to wait for each remote party's reply (seconds)
    pub response_timeout_secs: u64,
    /// Strip transient fields before sending the transaction
    pub delete_transient: bool,
}

impl EndorsementConfig {
    pub fn response_timeout(&self) -> Duration {
        Duration::from_secs(self.response_timeout_secs)
    }
}

impl Default for EndorsementConfig {
    fn default() -> Self {
        Self {
            response_timeout_secs: 60,
            delete_transient: false,
        }
    }
}
