//! # Node Runtime
//!
//! Owns the driver registry and the open networks, and runs one delivery
//! handler task per opened channel.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (defaults, file, environment)
//! 2. Initialize logging
//! 3. Register network drivers
//! 4. Open the configured channel through its driver
//! 5. Spawn the channel's delivery handler

use crate::container::NodeConfig;
use crate::registry::{DriverError, DriverRegistry};
use lc_01_endorsement::{EndorsementCollector, MembershipService, SignerService};
use lc_02_commit::{CommitApi, ProcessorState};
use lc_03_ordering::{Network, NetworkProvider, OrderingService, StaticNetworks};
use parking_lot::Mutex;
use shared_bus::EndpointService;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

pub struct NodeRuntime {
    config: NodeConfig,
    drivers: Arc<DriverRegistry>,
    networks: Arc<StaticNetworks>,
    deliveries: Mutex<Vec<JoinHandle<()>>>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

impl NodeRuntime {
    pub fn new(config: NodeConfig, drivers: Arc<DriverRegistry>) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self {
            config,
            drivers,
            networks: Arc::new(StaticNetworks::new()),
            deliveries: Mutex::new(Vec::new()),
            shutdown_tx,
            shutdown_rx,
        }
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn drivers(&self) -> &Arc<DriverRegistry> {
        &self.drivers
    }

    pub fn networks(&self) -> Arc<StaticNetworks> {
        Arc::clone(&self.networks)
    }

    /// Open the channel named in the configuration.
    pub fn start(&self) -> Result<Arc<dyn Network>, DriverError> {
        let network = &self.config.network;
        info!(
            network = %network.name,
            channel = %network.channel,
            driver = %network.driver,
            "Starting node runtime"
        );
        self.open_channel(&network.driver, &network.name, &network.channel)
    }

    /// Open a channel through a registered driver and start feeding its
    /// blocks to the channel's processor. Must run inside a Tokio runtime.
    pub fn open_channel(
        &self,
        driver: &str,
        network: &str,
        channel: &str,
    ) -> Result<Arc<dyn Network>, DriverError> {
        if self.networks.network(network, channel).is_some() {
            return Err(DriverError::ChannelOpen {
                network: network.to_string(),
                channel: channel.to_string(),
            });
        }

        let opened = self.drivers.get(driver)?.open(network, channel, &self.config)?;
        self.networks.register(Arc::clone(&opened.network));

        let delivery = opened.delivery;
        let mut shutdown = self.shutdown_rx.clone();
        let channel_name = channel.to_string();
        let handle = tokio::spawn(async move {
            tokio::select! {
                handler = delivery.run() => {
                    if matches!(handler.processor().state(), ProcessorState::Halted { .. }) {
                        warn!(channel = %channel_name, "Delivery stopped on a halted processor");
                    }
                }
                _ = shutdown.changed() => {
                    info!(channel = %channel_name, "Shutdown signal received");
                }
            }
        });
        self.deliveries.lock().push(handle);

        Ok(opened.network)
    }

    /// Ordering flows over every open network.
    pub fn ordering(&self) -> OrderingService {
        OrderingService::new(self.networks())
    }

    /// Endorsement collector using the configured timeouts.
    pub fn endorsement_collector(
        &self,
        membership: Arc<dyn MembershipService>,
        endpoints: Arc<dyn EndpointService>,
        signers: Arc<dyn SignerService>,
    ) -> EndorsementCollector {
        EndorsementCollector::new(
            self.config.endorsement_config(),
            membership,
            endpoints,
            signers,
        )
    }

    /// Stop the delivery handlers.
    pub async fn shutdown(&self) {
        info!("Initiating graceful shutdown...");

        if let Err(e) = self.shutdown_tx.send(true) {
            error!("Failed to send shutdown signal: {}", e);
        }

        let handles = std::mem::take(&mut *self.deliveries.lock());
        for handle in handles {
            if tokio::time::timeout(Duration::from_secs(2), handle).await.is_err() {
                warn!("Delivery handler did not stop in time");
            }
        }

        info!("Shutdown complete");
    }
}
