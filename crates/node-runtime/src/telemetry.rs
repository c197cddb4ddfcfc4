//! Logging initialization.
//!
//! `RUST_LOG` wins over the configured level. JSON output is one object per
//! line, for log shippers.

use crate::container::LoggingSection;
use tracing_subscriber::EnvFilter;

/// Filter from `RUST_LOG`, or from `level` when the variable is unset.
pub fn build_filter(level: &str) -> anyhow::Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => Ok(EnvFilter::try_new(level)?),
    }
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_tracing(config: &LoggingSection) -> anyhow::Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(build_filter(&config.level)?)
        .with_target(true)
        .with_thread_ids(true);

    if config.json {
        builder
            .json()
            .try_init()
            .map_err(|e| anyhow::anyhow!(e))?;
    } else {
        builder.try_init().map_err(|e| anyhow::anyhow!(e))?;
    }
    Ok(())
}
