//! Ordering flows and the service exposing them.

mod flows;

pub use flows::{OrderingAndFinalityFlow, OrderingFlow};

use crate::error::OrderingResult;
use crate::ports::inbound::OrderingApi;
use crate::ports::outbound::NetworkProvider;
use async_trait::async_trait;
use shared_types::Transaction;
use std::sync::Arc;

pub struct OrderingService {
    networks: Arc<dyn NetworkProvider>,
}

impl OrderingService {
    pub fn new(networks: Arc<dyn NetworkProvider>) -> Self {
        Self { networks }
    }
}

#[async_trait]
impl OrderingApi for OrderingService {
    async fn order(&self, tx: &Transaction) -> OrderingResult<()> {
        OrderingFlow::new(tx).run(self.networks.as_ref()).await
    }

    async fn order_and_finalize(&self, tx: &Transaction) -> OrderingResult<()> {
        OrderingAndFinalityFlow::new(tx)
            .run(self.networks.as_ref())
            .await
    }
}
