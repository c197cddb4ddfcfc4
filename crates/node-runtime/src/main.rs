//! Node runtime binary.
//!
//! Usage: `node-runtime [config.toml]`

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use node_runtime::{init_tracing, DriverRegistry, InMemoryDriver, NodeConfig, NodeRuntime};

#[tokio::main]
async fn main() -> Result<()> {
    let path = std::env::args().nth(1).map(PathBuf::from);
    let config = NodeConfig::load(path.as_deref()).context("Failed to load configuration")?;

    init_tracing(&config.logging).context("Failed to initialize logging")?;

    let drivers = Arc::new(DriverRegistry::new());
    drivers
        .register(Arc::new(InMemoryDriver::new()))
        .context("Failed to register network drivers")?;

    let runtime = NodeRuntime::new(config, drivers);
    runtime.start().context("Failed to open channel")?;

    info!("Node is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;

    runtime.shutdown().await;
    Ok(())
}
