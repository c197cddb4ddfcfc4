//! Shared fixtures: endorsing nodes on an in-memory session hub, and a
//! node runtime with one in-memory channel.

use std::sync::Arc;
use std::time::Duration;

use lc_01_endorsement::{
    EndorsementCollector, EndorsementError, EndorsementResponder, InMemoryMembership,
    InMemoryTransactionStore, LocalWallet, SignerService,
};
use lc_03_ordering::PresetValidator;
use node_runtime::{DriverRegistry, InMemoryChannel, InMemoryDriver, NodeConfig, NodeRuntime};
use shared_bus::{EndpointBindings, FlowContext, LocalFlowContext, ScopeError, SessionHub};
use shared_crypto::Ed25519KeyPair;
use shared_types::{Identity, Transaction};
use tokio::task::JoinHandle;

pub const NETWORK: &str = "net";
pub const CHANNEL: &str = "ch";

pub struct Node {
    pub name: Identity,
    pub key: Identity,
    pub wallet: Arc<LocalWallet>,
    pub store: Arc<InMemoryTransactionStore>,
}

/// Endorsing nodes sharing a session hub, endpoint bindings and membership.
pub struct Parties {
    pub hub: Arc<SessionHub>,
    pub bindings: Arc<EndpointBindings>,
    pub membership: Arc<InMemoryMembership>,
}

impl Parties {
    pub fn new() -> Self {
        let bindings = Arc::new(EndpointBindings::new());
        Self {
            hub: Arc::new(SessionHub::new(bindings.clone())),
            bindings,
            membership: Arc::new(InMemoryMembership::new()),
        }
    }

    /// A node whose signing key is bound to it and known to membership.
    pub fn node(&self, name: &str, seed: u8) -> Node {
        let wallet = Arc::new(LocalWallet::with_default(Ed25519KeyPair::from_seed(
            [seed; 32],
        )));
        let key = wallet.default_identity();
        self.bindings.bind(key.clone(), Identity::from(name));
        self.membership.register_ed25519(&key);
        Node {
            name: Identity::from(name),
            key,
            wallet,
            store: Arc::new(InMemoryTransactionStore::new()),
        }
    }

    pub fn context(&self, node: &Node) -> LocalFlowContext {
        LocalFlowContext::new(node.name.clone(), self.hub.clone())
    }

    /// Answer one endorsement request on `node` as a scoped flow, signing
    /// with `identities` (the node's default identity when empty).
    pub fn serve(
        &self,
        node: &Node,
        identities: Vec<Identity>,
    ) -> JoinHandle<Result<Transaction, ScopeError<EndorsementError>>> {
        let mut incoming = self.hub.register(node.name.clone());
        let hub = self.hub.clone();
        let me = node.name.clone();
        let responder = EndorsementResponder::new(node.wallet.clone(), node.store.clone());
        tokio::spawn(async move {
            let session = incoming.accept().await.expect("session");
            let ctx: Arc<dyn FlowContext> =
                Arc::new(LocalFlowContext::responder(me, hub, Arc::new(session)));
            responder.respond_scoped(ctx, &identities).await
        })
    }
}

/// Node runtime with one open in-memory channel.
pub struct Ledger {
    pub runtime: NodeRuntime,
    pub channel: InMemoryChannel,
    pub validator: Arc<PresetValidator>,
}

impl Ledger {
    pub fn open() -> Self {
        let validator = Arc::new(PresetValidator::new());
        let driver = Arc::new(InMemoryDriver::new().with_validator(validator.clone()));
        let drivers = Arc::new(DriverRegistry::new());
        drivers.register(driver.clone()).expect("register driver");

        let mut config = NodeConfig::default();
        config.network.name = NETWORK.to_string();
        config.network.channel = CHANNEL.to_string();
        config.commit.wait_for_event_timeout_secs = 5;

        let runtime = NodeRuntime::new(config, drivers);
        runtime.start().expect("open channel");
        let channel = driver.channel(NETWORK, CHANNEL).expect("channel handles");

        Self {
            runtime,
            channel,
            validator,
        }
    }

    /// Collector configured from the runtime, for `node`'s wallet.
    pub fn collector(&self, parties: &Parties, node: &Node) -> EndorsementCollector {
        self.runtime.endorsement_collector(
            parties.membership.clone(),
            parties.bindings.clone(),
            node.wallet.clone(),
        )
    }

    pub async fn wait_for_listener(&self, tx_id: &str) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while self.channel.registry.listener_count(tx_id) == 0 {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("listener registered");
    }
}

pub fn proposal(id: &str, creator: &Node) -> Transaction {
    Transaction::new(id, NETWORK, CHANNEL, creator.key.clone()).with_results(b"rwset".to_vec())
}
