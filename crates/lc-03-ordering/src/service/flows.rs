use crate::error::{OrderingError, OrderingResult};
use crate::ports::outbound::{Network, NetworkProvider};
use shared_types::Transaction;
use std::sync::Arc;
use tracing::{debug, info};

fn lookup(
    networks: &dyn NetworkProvider,
    tx: &Transaction,
    channel: &str,
) -> OrderingResult<Arc<dyn Network>> {
    networks
        .network(tx.network(), channel)
        .ok_or_else(|| OrderingError::NetworkNotFound {
            network: tx.network().to_string(),
        })
}

/// Broadcasts a transaction on its network's default channel.
pub struct OrderingFlow<'a> {
    tx: &'a Transaction,
}

impl<'a> OrderingFlow<'a> {
    pub fn new(tx: &'a Transaction) -> Self {
        Self { tx }
    }

    pub async fn run(&self, networks: &dyn NetworkProvider) -> OrderingResult<()> {
        let network = lookup(networks, self.tx, "")?;
        network.broadcast(&self.tx.envelope()?).await?;
        info!(tx_id = self.tx.id(), network = network.name(), "[lc-03] transaction broadcast");
        Ok(())
    }
}

/// Broadcasts a transaction on its channel, then waits for its finality.
pub struct OrderingAndFinalityFlow<'a> {
    tx: &'a Transaction,
}

impl<'a> OrderingAndFinalityFlow<'a> {
    pub fn new(tx: &'a Transaction) -> Self {
        Self { tx }
    }

    pub async fn run(&self, networks: &dyn NetworkProvider) -> OrderingResult<()> {
        let network = lookup(networks, self.tx, self.tx.channel())?;
        network.broadcast(&self.tx.envelope()?).await?;
        debug!(tx_id = self.tx.id(), "[lc-03] broadcast, waiting for finality");

        network
            .is_final(self.tx.id())
            .await
            .map_err(|source| OrderingError::Finality {
                tx_id: self.tx.id().to_string(),
                source,
            })?;
        info!(tx_id = self.tx.id(), channel = network.channel(), "[lc-03] transaction final");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::StaticNetworks;
    use async_trait::async_trait;
    use lc_02_commit::{FinalityError, FinalityResult};
    use parking_lot::Mutex;
    use shared_types::{ChannelHeader, Envelope, Identity, Payload};

    /// Records broadcast tx ids; finality answers from a fixed verdict.
    struct MockNetwork {
        channel: String,
        broadcasts: Mutex<Vec<String>>,
        finality_checks: Mutex<Vec<String>>,
        fail_broadcast: bool,
        invalid: bool,
    }

    impl MockNetwork {
        fn new(channel: &str) -> Self {
            Self {
                channel: channel.to_string(),
                broadcasts: Mutex::new(Vec::new()),
                finality_checks: Mutex::new(Vec::new()),
                fail_broadcast: false,
                invalid: false,
            }
        }
    }

    #[async_trait]
    impl Network for MockNetwork {
        fn name(&self) -> &str {
            "net"
        }

        fn channel(&self) -> &str {
            &self.channel
        }

        async fn broadcast(&self, envelope: &Envelope) -> OrderingResult<()> {
            if self.fail_broadcast {
                return Err(OrderingError::DeliveryClosed {
                    channel: self.channel.clone(),
                });
            }
            let payload = Payload::from_bytes(&envelope.payload)?;
            let header = ChannelHeader::from_bytes(&payload.header.channel_header)?;
            self.broadcasts.lock().push(header.tx_id);
            Ok(())
        }

        async fn is_final(&self, tx_id: &str) -> FinalityResult<()> {
            self.finality_checks.lock().push(tx_id.to_string());
            if self.invalid {
                return Err(FinalityError::TxInvalid {
                    tx_id: tx_id.to_string(),
                });
            }
            Ok(())
        }
    }

    fn tx(network: &str, channel: &str) -> Transaction {
        Transaction::new("tx-1", network, channel, Identity::from("alice"))
    }

    fn networks(mocks: Vec<Arc<MockNetwork>>) -> StaticNetworks {
        let networks = StaticNetworks::new();
        for mock in mocks {
            networks.register(mock);
        }
        networks
    }

    #[tokio::test]
    async fn test_ordering_broadcasts_on_default_channel() {
        let default = Arc::new(MockNetwork::new("ch"));
        let networks = networks(vec![default.clone()]);

        OrderingFlow::new(&tx("net", "ch")).run(&networks).await.unwrap();

        assert_eq!(*default.broadcasts.lock(), vec!["tx-1"]);
        assert!(default.finality_checks.lock().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_network() {
        let networks = networks(vec![Arc::new(MockNetwork::new("ch"))]);

        let err = OrderingFlow::new(&tx("elsewhere", "ch"))
            .run(&networks)
            .await
            .unwrap_err();
        assert!(matches!(err, OrderingError::NetworkNotFound { ref network } if network == "elsewhere"));
    }

    #[tokio::test]
    async fn test_ordering_and_finality_uses_tx_channel() {
        let first = Arc::new(MockNetwork::new("first"));
        let second = Arc::new(MockNetwork::new("second"));
        let networks = networks(vec![first.clone(), second.clone()]);

        OrderingAndFinalityFlow::new(&tx("net", "second"))
            .run(&networks)
            .await
            .unwrap();

        assert!(first.broadcasts.lock().is_empty());
        assert_eq!(*second.broadcasts.lock(), vec!["tx-1"]);
        assert_eq!(*second.finality_checks.lock(), vec!["tx-1"]);
    }

    #[tokio::test]
    async fn test_finality_failure_is_reported() {
        let mut mock = MockNetwork::new("ch");
        mock.invalid = true;
        let networks = networks(vec![Arc::new(mock)]);

        let err = OrderingAndFinalityFlow::new(&tx("net", "ch"))
            .run(&networks)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            OrderingError::Finality {
                source: FinalityError::TxInvalid { .. },
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_failed_broadcast_skips_finality() {
        let mut mock = MockNetwork::new("ch");
        mock.fail_broadcast = true;
        let mock = Arc::new(mock);
        let networks = networks(vec![mock.clone()]);

        let err = OrderingAndFinalityFlow::new(&tx("net", "ch"))
            .run(&networks)
            .await
            .unwrap_err();
        assert!(matches!(err, OrderingError::DeliveryClosed { .. }));
        assert!(mock.finality_checks.lock().is_empty());
    }
}
