use std::time::Duration;

/// Commit configuration
#[derive(Clone, Debug)]
pub struct CommitConfig {
    /// Buffer depth of each listener channel
    pub listener_capacity: usize,
    /// How long `is_final` waits for an event before re-querying (seconds)
    pub wait_for_event_timeout_secs: u64,
    /// Do not log error events at warn level
    pub quiet_notifier: bool,
}

impl CommitConfig {
    pub fn wait_for_event_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_for_event_timeout_secs)
    }
}

impl Default for CommitConfig {
    fn default() -> Self {
        Self {
            listener_capacity: 100,
            wait_for_event_timeout_secs: 300,
            quiet_notifier: false,
        }
    }
}
