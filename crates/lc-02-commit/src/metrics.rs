//! # Commit Metrics
//!
//! Prometheus metrics for block commit and finality resolution.
//!
//! ## Usage
//!
//! Enable with the `metrics` feature:
//! ```toml
//! lc-02-commit = { path = "...", features = ["metrics"] }
//! ```
//!
//! ## Metrics Exported
//!
//! - `commit_transactions_processed_total` - Transactions processed, by outcome
//! - `commit_notifications_delivered_total` - Events delivered to listeners
//! - `commit_finality_resolutions_total` - `is_final` calls, by outcome
//! - `commit_processor_halted` - 1 while the processor is halted

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{
    register_gauge, register_int_counter, register_int_counter_vec, Gauge, IntCounter,
    IntCounterVec,
};

#[cfg(feature = "metrics")]
lazy_static! {
    /// Transactions processed, labeled by outcome
    pub static ref TRANSACTIONS_PROCESSED: IntCounterVec = register_int_counter_vec!(
        "commit_transactions_processed_total",
        "Total number of block entries processed",
        &["outcome"]
    )
    .expect("Failed to create TRANSACTIONS_PROCESSED metric");

    /// Events delivered to listeners
    pub static ref NOTIFICATIONS_DELIVERED: IntCounter = register_int_counter!(
        "commit_notifications_delivered_total",
        "Total number of finality events delivered to listeners"
    )
    .expect("Failed to create NOTIFICATIONS_DELIVERED metric");

    /// Finality resolutions, labeled by outcome
    pub static ref FINALITY_RESOLUTIONS: IntCounterVec = register_int_counter_vec!(
        "commit_finality_resolutions_total",
        "Total number of finality resolutions",
        &["outcome"]
    )
    .expect("Failed to create FINALITY_RESOLUTIONS metric");

    /// Processor halted flag
    pub static ref PROCESSOR_HALTED: Gauge = register_gauge!(
        "commit_processor_halted",
        "Whether the block processor is halted (0=no, 1=yes)"
    )
    .expect("Failed to create PROCESSOR_HALTED metric");
}

// =============================================================================
// METRIC RECORDING FUNCTIONS
// =============================================================================

/// Record one processed block entry
#[cfg(feature = "metrics")]
pub fn record_transaction(outcome: &str) {
    TRANSACTIONS_PROCESSED.with_label_values(&[outcome]).inc();
}

/// Record deliveries of one notification
#[cfg(feature = "metrics")]
pub fn record_notifications(delivered: usize) {
    NOTIFICATIONS_DELIVERED.inc_by(delivered as u64);
}

/// Record the outcome of an `is_final` call
#[cfg(feature = "metrics")]
pub fn record_finality(outcome: &str) {
    FINALITY_RESOLUTIONS.with_label_values(&[outcome]).inc();
}

/// Record halted flag
#[cfg(feature = "metrics")]
pub fn record_halted(halted: bool) {
    PROCESSOR_HALTED.set(if halted { 1.0 } else { 0.0 });
}

// =============================================================================
// NO-OP IMPLEMENTATIONS (when metrics feature is disabled)
// =============================================================================

#[cfg(not(feature = "metrics"))]
pub fn record_transaction(_outcome: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_notifications(_delivered: usize) {}

#[cfg(not(feature = "metrics"))]
pub fn record_finality(_outcome: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_halted(_halted: bool) {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_never_panics() {
        record_transaction("valid");
        record_notifications(3);
        record_finality("timeout");
        record_halted(true);
        record_halted(false);
    }
}
