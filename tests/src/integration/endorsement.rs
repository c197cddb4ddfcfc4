//! # Endorsement Scenarios
//!
//! Multi-party endorsement over in-memory sessions, run as scoped
//! sub-flows of the initiator's flow.
//!
//! ## Flow Tested:
//!
//! 1. Initiator endorses locally, then asks each remote party in order
//! 2. Each responder endorses, stores the transaction and replies
//! 3. The initiator verifies every reply before appending it

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use lc_01_endorsement::{EndorsementApi, EndorsementError};
    use shared_bus::{run_scoped, FlowContext, ScopeError};
    use shared_crypto::Ed25519KeyPair;
    use shared_types::{Identity, Transaction};

    use crate::integration::fixtures::{proposal, Ledger, Parties};

    #[tokio::test]
    async fn test_three_party_endorsement_in_scoped_flow() {
        let parties = Parties::new();
        let alice = parties.node("alice", 1);
        let bob = parties.node("bob", 2);
        let carol = parties.node("carol", 3);
        let bob_server = parties.serve(&bob, vec![]);
        let carol_server = parties.serve(&carol, vec![]);
        let ledger = Ledger::open();
        let collector = ledger.collector(&parties, &alice);

        let mut tx = proposal("tx-3p", &alice);
        let required = vec![alice.key.clone(), bob.key.clone(), carol.key.clone()];
        let parent: Arc<dyn FlowContext> = Arc::new(parties.context(&alice));
        let failed = Arc::new(AtomicBool::new(false));

        let tx_ref = &mut tx;
        let collector = &collector;
        let required_ref = &required;
        let flag = failed.clone();
        run_scoped(parent, None, |ctx| async move {
            ctx.on_error(Box::new(move || flag.store(true, Ordering::SeqCst)));
            collector.collect(ctx.as_ref(), tx_ref, required_ref).await
        })
        .await
        .unwrap();

        let endorsers: Vec<&Identity> = tx.responses().iter().map(|r| r.endorser()).collect();
        assert_eq!(endorsers, vec![&alice.key, &bob.key, &carol.key]);
        assert!(!failed.load(Ordering::SeqCst));

        bob_server.await.unwrap().unwrap();
        carol_server.await.unwrap().unwrap();
        assert!(bob.store.get("tx-3p").is_some());
        assert!(carol.store.get("tx-3p").is_some());
    }

    #[tokio::test]
    async fn test_unbound_endorsement_fails_scoped_flow() {
        let parties = Parties::new();
        let alice = parties.node("alice", 1);
        let bob = parties.node("bob", 2);
        let carol = parties.node("carol", 3);
        // Bob answers with Carol's key, which is bound to Carol's node.
        bob.wallet.add(Ed25519KeyPair::from_seed([3; 32]));
        let _server = parties.serve(&bob, vec![carol.key.clone()]);
        let ledger = Ledger::open();
        let collector = ledger.collector(&parties, &alice);

        let mut tx = proposal("tx-unbound", &alice);
        let required = vec![alice.key.clone(), bob.key.clone()];
        let parent: Arc<dyn FlowContext> = Arc::new(parties.context(&alice));
        let failed = Arc::new(AtomicBool::new(false));

        let tx_ref = &mut tx;
        let collector = &collector;
        let required_ref = &required;
        let flag = failed.clone();
        let err = run_scoped(parent, None, |ctx| async move {
            ctx.on_error(Box::new(move || flag.store(true, Ordering::SeqCst)));
            collector.collect(ctx.as_ref(), tx_ref, required_ref).await
        })
        .await
        .unwrap_err();

        match err {
            ScopeError::Flow(e) => {
                assert!(matches!(e, EndorsementError::InvalidEndorsement { .. }));
                assert!(e.to_string().starts_with("Invalid endorsement"));
            }
            other => panic!("unexpected outcome: {other}"),
        }
        assert!(failed.load(Ordering::SeqCst));
        assert_eq!(tx.responses().len(), 1);
        assert!(!tx.is_endorsed_by(&carol.key));

        // Nothing reached the ordering service
        assert_eq!(ledger.channel.ledger.height(), 0);
        assert_eq!(ledger.channel.orderer.pending().await, 0);
    }

    #[tokio::test]
    async fn test_approvals_keep_transient_data_local() {
        let parties = Parties::new();
        let alice = parties.node("alice", 1);
        let bob = parties.node("bob", 2);
        let server = parties.serve(&bob, vec![]);
        let ledger = Ledger::open();

        let mut tx = proposal("tx-private", &alice);
        tx.set_transient("opening", b"secret".to_vec());
        ledger
            .collector(&parties, &alice)
            .collect_approvals(&parties.context(&alice), &mut tx, &[bob.key.clone()])
            .await
            .unwrap();

        server.await.unwrap().unwrap();
        let stored = Transaction::from_bytes(&bob.store.get("tx-private").unwrap()).unwrap();
        assert!(stored.transient().is_empty());
        assert_eq!(tx.transient().len(), 1);
        assert!(tx.is_endorsed_by(&bob.key));
    }
}
