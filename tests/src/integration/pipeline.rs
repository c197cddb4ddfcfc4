//! # Commit Pipeline Scenarios
//!
//! A transaction endorsed by two parties is broadcast to the in-memory
//! orderer, cut into a block, committed by the channel's block processor and
//! reported final to every waiter.
//!
//! ## Flow Tested:
//!
//! ```text
//! collect ──→ order_and_finalize ──→ InMemoryOrderer ──Block──→ DeliveryHandler
//!                    ↑                                              │
//!                    └──────── TxEvent ← ListenerRegistry ←─ BlockProcessor
//! ```

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use lc_01_endorsement::EndorsementApi;
    use lc_02_commit::{
        FinalityApi, FinalityError, StatusOracle, Subscription, TxEvent, TxEventError,
    };
    use lc_03_ordering::{OrderingApi, OrderingError};
    use shared_types::{Status, TxValidationCode};

    use crate::integration::fixtures::{proposal, Ledger, Parties};

    async fn next_event(sub: &mut Subscription) -> TxEvent {
        tokio::time::timeout(Duration::from_secs(5), sub.recv())
            .await
            .expect("event before timeout")
            .expect("registry alive")
    }

    #[tokio::test]
    async fn test_endorse_order_commit_finalize() {
        let parties = Parties::new();
        let alice = parties.node("alice", 1);
        let bob = parties.node("bob", 2);
        let server = parties.serve(&bob, vec![]);
        let ledger = Arc::new(Ledger::open());

        let mut tx = proposal("tx-e2e", &alice);
        ledger
            .collector(&parties, &alice)
            .collect(&parties.context(&alice), &mut tx, &[alice.key.clone(), bob.key.clone()])
            .await
            .unwrap();
        server.await.unwrap().unwrap();
        assert_eq!(tx.responses().len(), 2);

        let waiter = tokio::spawn({
            let ledger = ledger.clone();
            async move { ledger.runtime.ordering().order_and_finalize(&tx).await }
        });
        ledger.wait_for_listener("tx-e2e").await;
        assert_eq!(ledger.channel.orderer.cut_block().await.unwrap(), Some(0));

        waiter.await.unwrap().unwrap();
        assert_eq!(ledger.channel.ledger.height(), 1);
        let (status, _) = ledger.channel.vault.status("tx-e2e").await.unwrap();
        assert_eq!(status, Status::Valid);
        assert!(ledger.channel.registry.is_empty());

        // Already final: answered from the vault
        ledger.channel.resolver.is_final("tx-e2e").await.unwrap();
        ledger.runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_block_with_invalid_transaction_notifies_in_order() {
        let parties = Parties::new();
        let alice = parties.node("alice", 1);
        let ledger = Ledger::open();
        ledger
            .validator
            .reject("tx-b", TxValidationCode::MvccReadConflict);

        let mut subs: Vec<Subscription> = ["tx-a", "tx-b", "tx-c"]
            .iter()
            .map(|id| ledger.channel.registry.subscribe(id))
            .collect();

        let ordering = ledger.runtime.ordering();
        for id in ["tx-a", "tx-b", "tx-c"] {
            ordering.order(&proposal(id, &alice)).await.unwrap();
        }
        ledger.channel.orderer.cut_block().await.unwrap();

        let a = next_event(&mut subs[0]).await;
        let b = next_event(&mut subs[1]).await;
        let c = next_event(&mut subs[2]).await;
        assert!(a.is_valid());
        assert_eq!(
            b.error,
            Some(TxEventError::Invalid {
                tx_id: "tx-b".into(),
                code: TxValidationCode::MvccReadConflict,
            })
        );
        assert!(c.is_valid());

        let err = ledger.channel.resolver.is_final("tx-b").await.unwrap_err();
        assert!(matches!(err, FinalityError::TxInvalid { .. }));
        ledger.channel.resolver.is_final("tx-c").await.unwrap();
    }

    #[tokio::test]
    async fn test_rejected_transaction_fails_finality_flow() {
        let parties = Parties::new();
        let alice = parties.node("alice", 1);
        let ledger = Arc::new(Ledger::open());
        ledger
            .validator
            .reject("tx-bad", TxValidationCode::EndorsementPolicyFailure);

        let tx = proposal("tx-bad", &alice);
        let waiter = tokio::spawn({
            let ledger = ledger.clone();
            async move { ledger.runtime.ordering().order_and_finalize(&tx).await }
        });
        ledger.wait_for_listener("tx-bad").await;
        ledger.channel.orderer.cut_block().await.unwrap();

        let err = waiter.await.unwrap().unwrap_err();
        assert!(matches!(
            err,
            OrderingError::Finality {
                source: FinalityError::Rejected { .. },
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_dependent_transaction_final_with_its_parent() {
        let parties = Parties::new();
        let alice = parties.node("alice", 1);
        let ledger = Arc::new(Ledger::open());
        ledger
            .channel
            .vault
            .set_dependents("tx-parent", vec!["tx-child".into()]);

        let waiter = tokio::spawn({
            let ledger = ledger.clone();
            async move { ledger.channel.resolver.is_final("tx-child").await }
        });
        ledger.wait_for_listener("tx-child").await;

        ledger
            .runtime
            .ordering()
            .order(&proposal("tx-parent", &alice))
            .await
            .unwrap();
        ledger.channel.orderer.cut_block().await.unwrap();

        waiter.await.unwrap().unwrap();
        let (status, _) = ledger.channel.vault.status("tx-child").await.unwrap();
        assert_eq!(status, Status::Valid);
    }

    #[tokio::test]
    async fn test_finality_resolves_busy_dependencies() {
        let parties = Parties::new();
        let alice = parties.node("alice", 1);
        let ledger = Ledger::open();
        let vault = &ledger.channel.vault;
        vault.set_status("tx-top", Status::Busy, vec!["tx-d1".into(), "tx-d2".into()]);

        let ordering = ledger.runtime.ordering();
        for id in ["tx-d1", "tx-d2"] {
            ordering.order(&proposal(id, &alice)).await.unwrap();
        }
        let mut last = ledger.channel.registry.subscribe("tx-d2");
        ledger.channel.orderer.cut_block().await.unwrap();
        next_event(&mut last).await;

        ledger.channel.resolver.is_final("tx-top").await.unwrap();
    }

    #[tokio::test]
    async fn test_duplicate_broadcast_is_rejected_at_commit() {
        let parties = Parties::new();
        let alice = parties.node("alice", 1);
        let ledger = Ledger::open();
        let tx = proposal("tx-dup", &alice);

        let mut sub = ledger.channel.registry.subscribe("tx-dup");
        let ordering = ledger.runtime.ordering();
        ordering.order(&tx).await.unwrap();
        ordering.order(&tx).await.unwrap();
        ledger.channel.orderer.cut_block().await.unwrap();

        // First occurrence commits, the replay is discarded
        assert!(next_event(&mut sub).await.is_valid());
        let replay = next_event(&mut sub).await;
        assert_eq!(
            replay.error,
            Some(TxEventError::Invalid {
                tx_id: "tx-dup".into(),
                code: TxValidationCode::DuplicateTxId,
            })
        );
    }
}
