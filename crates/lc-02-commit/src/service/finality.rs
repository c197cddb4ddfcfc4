//! Finality Resolver
//!
//! Decides whether a transaction is final, from the vault status when it
//! can, from its dependencies when the vault names them, and otherwise by
//! listening for the commit event.
//!
//! Dependencies are resolved depth-first on the caller's task. A
//! per-call visit record turns a dependency loop into `DependencyCycle`
//! and skips dependencies already proven final by a sibling branch.

use crate::domain::ListenerRegistry;
use crate::error::{FinalityError, FinalityResult};
use crate::metrics;
use crate::ports::inbound::FinalityApi;
use crate::ports::outbound::StatusOracle;
use crate::types::CommitConfig;
use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt};
use shared_types::{Status, TxId};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

#[derive(Default)]
struct Visit {
    /// Transactions on the current dependency path
    in_path: HashSet<TxId>,
    /// Transactions already proven final during this call
    resolved: HashSet<TxId>,
}

pub struct FinalityResolver {
    oracle: Arc<dyn StatusOracle>,
    registry: Arc<ListenerRegistry>,
    wait_for_event_timeout: Duration,
}

impl FinalityResolver {
    pub fn new(
        config: &CommitConfig,
        oracle: Arc<dyn StatusOracle>,
        registry: Arc<ListenerRegistry>,
    ) -> Self {
        Self {
            oracle,
            registry,
            wait_for_event_timeout: config.wait_for_event_timeout(),
        }
    }

    async fn query(&self, tx_id: &str) -> FinalityResult<(Status, Vec<TxId>)> {
        self.oracle
            .status(tx_id)
            .await
            .map_err(|source| FinalityError::StatusQuery {
                tx_id: tx_id.to_string(),
                source,
            })
    }

    fn resolve<'a>(&'a self, tx_id: &'a str, visit: &'a mut Visit) -> BoxFuture<'a, FinalityResult<()>> {
        async move {
            if visit.resolved.contains(tx_id) {
                return Ok(());
            }
            if !visit.in_path.insert(tx_id.to_string()) {
                return Err(FinalityError::DependencyCycle {
                    tx_id: tx_id.to_string(),
                });
            }

            let outcome: FinalityResult<()> = async {
                let (status, dependencies) = self.query(tx_id).await?;
                match status {
                    Status::Valid => {
                        debug!(tx_id, "[lc-02] transaction is valid");
                        Ok(())
                    }
                    Status::Invalid => {
                        debug!(tx_id, "[lc-02] transaction is not valid");
                        Err(FinalityError::TxInvalid {
                            tx_id: tx_id.to_string(),
                        })
                    }
                    Status::Busy | Status::HasDependencies if !dependencies.is_empty() => {
                        debug!(tx_id, %status, ?dependencies, "[lc-02] resolving dependencies");
                        for dependency in &dependencies {
                            self.resolve(dependency, visit).await.map_err(|source| {
                                FinalityError::DependencyFailed {
                                    tx_id: tx_id.to_string(),
                                    dependency: dependency.clone(),
                                    source: Box::new(source),
                                }
                            })?;
                        }
                        Ok(())
                    }
                    Status::Busy | Status::HasDependencies | Status::Unknown => {
                        self.listen(tx_id).await
                    }
                }
            }
            .await;

            visit.in_path.remove(tx_id);
            if outcome.is_ok() {
                visit.resolved.insert(tx_id.to_string());
            }
            outcome
        }
        .boxed()
    }

    /// Wait for the commit event, then fall back to one more status query.
    async fn listen(&self, tx_id: &str) -> FinalityResult<()> {
        debug!(tx_id, "[lc-02] listening for finality");
        let mut subscription = self.registry.subscribe(tx_id);

        match tokio::time::timeout(self.wait_for_event_timeout, subscription.recv()).await {
            Ok(Some(event)) => {
                debug!(tx_id, from = %event.tx_id, valid = event.is_valid(), "[lc-02] finality event received");
                match event.error {
                    None => Ok(()),
                    Some(source) => Err(FinalityError::Rejected {
                        tx_id: tx_id.to_string(),
                        source,
                    }),
                }
            }
            Ok(None) | Err(_) => {
                drop(subscription);
                debug!(tx_id, "[lc-02] no finality event before timeout, checking status");
                match self.oracle.status(tx_id).await {
                    Ok((Status::Valid, _)) => Ok(()),
                    Ok((Status::Invalid, _)) => Err(FinalityError::TxInvalid {
                        tx_id: tx_id.to_string(),
                    }),
                    Ok((last_status, _)) => Err(FinalityError::Timeout {
                        tx_id: tx_id.to_string(),
                        last_status,
                        source: None,
                    }),
                    Err(source) => Err(FinalityError::Timeout {
                        tx_id: tx_id.to_string(),
                        last_status: Status::Unknown,
                        source: Some(source),
                    }),
                }
            }
        }
    }
}

#[async_trait]
impl FinalityApi for FinalityResolver {
    async fn is_final(&self, tx_id: &str) -> FinalityResult<()> {
        debug!(tx_id, "[lc-02] is final?");
        let mut visit = Visit::default();
        let result = self.resolve(tx_id, &mut visit).await;
        metrics::record_finality(match &result {
            Ok(()) => "final",
            Err(FinalityError::Timeout { .. }) => "timeout",
            Err(_) => "failed",
        });
        result
    }
}
