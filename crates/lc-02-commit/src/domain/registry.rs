//! # Listener Registry
//!
//! Maps transaction ids to the channels of tasks waiting for their outcome.
//!
//! ## Locking
//!
//! One mutex guards the map. `notify` copies the target senders while
//! holding it, releases it, and only then awaits the sends, so a slow
//! subscriber never blocks `subscribe` or `unsubscribe`.
//!
//! ## Invariants
//!
//! - Each subscription owns its own channel, so a channel is listed under
//!   an id at most once.
//! - Dropping a `Subscription` removes its entry exactly once.

use crate::domain::event::TxEvent;
use crate::metrics;
use crate::types::CommitConfig;
use parking_lot::Mutex;
use shared_types::TxId;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

struct Listener {
    id: u64,
    sender: mpsc::Sender<TxEvent>,
}

pub struct ListenerRegistry {
    listeners: Mutex<HashMap<TxId, Vec<Listener>>>,
    next_id: AtomicU64,
    capacity: usize,
    quiet: bool,
}

impl ListenerRegistry {
    pub fn new(capacity: usize, quiet: bool) -> Arc<Self> {
        Arc::new(Self {
            listeners: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(0),
            capacity: capacity.max(1),
            quiet,
        })
    }

    pub fn from_config(config: &CommitConfig) -> Arc<Self> {
        Self::new(config.listener_capacity, config.quiet_notifier)
    }

    /// Register a new listener for `tx_id`.
    pub fn subscribe(self: &Arc<Self>, tx_id: &str) -> Subscription {
        let (sender, receiver) = mpsc::channel(self.capacity);
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.listeners
            .lock()
            .entry(tx_id.to_string())
            .or_default()
            .push(Listener { id, sender });
        debug!(tx_id, listener = id, "[lc-02] listener added");

        Subscription {
            registry: Arc::clone(self),
            tx_id: tx_id.to_string(),
            id,
            receiver,
        }
    }

    /// Remove the listener `id` registered under `tx_id`. No-op if absent.
    pub fn unsubscribe(&self, tx_id: &str, id: u64) {
        let mut listeners = self.listeners.lock();
        let Some(entries) = listeners.get_mut(tx_id) else {
            return;
        };
        if let Some(pos) = entries.iter().position(|l| l.id == id) {
            entries.remove(pos);
            debug!(tx_id, listener = id, "[lc-02] listener removed");
        }
        if entries.is_empty() {
            listeners.remove(tx_id);
        }
    }

    /// Deliver `event` to the listeners of its id and of every dependent id.
    ///
    /// Returns the number of deliveries. Listeners whose receiver is gone
    /// are skipped.
    pub async fn notify(&self, event: &TxEvent) -> usize {
        if let Some(err) = &event.error {
            if !self.quiet {
                warn!(tx_id = %event.tx_id, error = %err, "[lc-02] an error occurred for transaction");
            }
        }
        if event.is_empty() {
            return 0;
        }

        let targets: Vec<(TxId, mpsc::Sender<TxEvent>)> = {
            let listeners = self.listeners.lock();
            std::iter::once(&event.tx_id)
                .chain(event.dependent_tx_ids.iter())
                .flat_map(|id| {
                    listeners
                        .get(id)
                        .into_iter()
                        .flatten()
                        .map(move |l| (id.clone(), l.sender.clone()))
                })
                .collect()
        };

        let mut delivered = 0;
        for (id, sender) in targets {
            if sender.send(event.clone()).await.is_ok() {
                delivered += 1;
            } else {
                debug!(tx_id = %id, "[lc-02] listener went away before delivery");
            }
        }

        debug!(
            tx_id = %event.tx_id,
            dependents = event.dependent_tx_ids.len(),
            delivered,
            "[lc-02] finality notified"
        );
        metrics::record_notifications(delivered);
        delivered
    }

    /// Number of listeners registered under `tx_id`.
    pub fn listener_count(&self, tx_id: &str) -> usize {
        self.listeners.lock().get(tx_id).map_or(0, Vec::len)
    }

    /// Total number of listeners.
    pub fn len(&self) -> usize {
        self.listeners.lock().values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A registered listener. Unsubscribes when dropped.
pub struct Subscription {
    registry: Arc<ListenerRegistry>,
    tx_id: TxId,
    id: u64,
    receiver: mpsc::Receiver<TxEvent>,
}

impl Subscription {
    pub fn tx_id(&self) -> &str {
        &self.tx_id
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Wait for the next event.
    pub async fn recv(&mut self) -> Option<TxEvent> {
        self.receiver.recv().await
    }

    /// Next event if one is already queued.
    pub fn try_recv(&mut self) -> Option<TxEvent> {
        self.receiver.try_recv().ok()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.registry.unsubscribe(&self.tx_id, self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TxEventError;
    use shared_types::TxValidationCode;

    #[tokio::test]
    async fn test_fan_out_to_every_subscriber() {
        let registry = ListenerRegistry::new(100, false);
        let mut subs: Vec<Subscription> = (0..5).map(|_| registry.subscribe("tx1")).collect();

        let delivered = registry.notify(&TxEvent::valid("tx1", vec![])).await;

        assert_eq!(delivered, 5);
        for sub in &mut subs {
            assert_eq!(sub.recv().await.unwrap().tx_id, "tx1");
        }
    }

    #[tokio::test]
    async fn test_drop_unsubscribes_only_that_listener() {
        let registry = ListenerRegistry::new(100, false);
        let first = registry.subscribe("tx1");
        let mut second = registry.subscribe("tx1");
        assert_eq!(registry.listener_count("tx1"), 2);

        drop(first);
        assert_eq!(registry.listener_count("tx1"), 1);

        assert_eq!(registry.notify(&TxEvent::valid("tx1", vec![])).await, 1);
        assert!(second.recv().await.is_some());

        drop(second);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_unsubscribe_is_idempotent() {
        let registry = ListenerRegistry::new(100, false);
        let sub = registry.subscribe("tx1");
        registry.unsubscribe("tx1", sub.id());
        registry.unsubscribe("tx1", sub.id());
        registry.unsubscribe("unknown", 42);
        drop(sub);
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_dependents_receive_the_same_outcome() {
        let registry = ListenerRegistry::new(100, false);
        let mut own = registry.subscribe("tx1");
        let mut dependent = registry.subscribe("tx2");
        let mut unrelated = registry.subscribe("tx3");

        let error = TxEventError::Invalid {
            tx_id: "tx1".into(),
            code: TxValidationCode::MvccReadConflict,
        };
        let event = TxEvent::failed("tx1", error, vec!["tx2".into()]);
        assert_eq!(registry.notify(&event).await, 2);

        assert_eq!(own.recv().await.unwrap(), event);
        assert_eq!(dependent.recv().await.unwrap(), event);
        assert!(unrelated.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_empty_event_reaches_no_one() {
        let registry = ListenerRegistry::new(100, true);
        let mut sub = registry.subscribe("");
        assert_eq!(registry.notify(&TxEvent::empty()).await, 0);
        assert!(sub.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_closed_receiver_is_skipped() {
        let registry = ListenerRegistry::new(100, false);
        let mut sub = registry.subscribe("tx1");
        sub.receiver.close();

        assert_eq!(registry.notify(&TxEvent::valid("tx1", vec![])).await, 0);
    }
}
