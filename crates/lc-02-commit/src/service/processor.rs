//! Block Processor
//!
//! Walks committed blocks transaction by transaction:
//!
//! 1. Decode envelope → payload → channel header of every entry; any failure,
//!    or a config transaction sharing its block, aborts before anything is applied
//! 2. Route each entry by header type: config, endorser, or skip
//! 3. Notify listeners with the entry's `TxEvent`, even an empty one
//!
//! A fatal condition halts the processor; see `HaltBreaker`.

use crate::domain::{
    decode_entry, HaltBreaker, ListenerRegistry, ProcessorEvent, ProcessorState, TxEvent,
};
use crate::error::{CommitError, CommitResult};
use crate::metrics;
use crate::ports::inbound::CommitApi;
use crate::ports::outbound::{CommittedTx, ConfigCommitSink, LedgerReader, LedgerStateSink};
use crate::service::config_handler::{ConfigCommitHandler, ConfigEntry};
use crate::service::endorser_handler::EndorserTxHandler;
use async_trait::async_trait;
use shared_types::{Block, FilteredBlock, HeaderType, TxValidationCode};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub struct BlockProcessor {
    channel: String,
    registry: Arc<ListenerRegistry>,
    config_handler: ConfigCommitHandler,
    endorser_handler: EndorserTxHandler,
    breaker: HaltBreaker,
}

impl BlockProcessor {
    pub fn new(
        channel: impl Into<String>,
        registry: Arc<ListenerRegistry>,
        ledger: Arc<dyn LedgerReader>,
        config_sink: Arc<dyn ConfigCommitSink>,
        state_sink: Arc<dyn LedgerStateSink>,
    ) -> Self {
        Self {
            channel: channel.into(),
            registry,
            config_handler: ConfigCommitHandler::new(ledger, config_sink),
            endorser_handler: EndorserTxHandler::new(state_sink),
            breaker: HaltBreaker::new(),
        }
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn registry(&self) -> &Arc<ListenerRegistry> {
        &self.registry
    }

    fn ensure_running(&self) -> CommitResult<()> {
        match self.breaker.state() {
            ProcessorState::Running => Ok(()),
            ProcessorState::Halted { reason } => Err(CommitError::Halted {
                reason: reason.clone(),
            }),
        }
    }

    async fn commit_entries(&self, block: &Block) -> CommitResult<()> {
        let number = block.number();
        let tx_count = block.tx_count();

        let entries = block
            .data
            .data
            .iter()
            .enumerate()
            .map(|(index, raw)| {
                decode_entry(raw).map_err(|source| {
                    error!(channel = %self.channel, block = number, index, error = %source, "[lc-02] malformed transaction");
                    CommitError::Malformed {
                        block: number,
                        index,
                        source,
                    }
                })
            })
            .collect::<CommitResult<Vec<_>>>()?;
        ensure_config_alone(
            number,
            entries
                .iter()
                .map(|entry| (entry.header_type(), entry.header.tx_id.as_str())),
        )?;

        for (index, (raw, entry)) in block.data.data.iter().zip(&entries).enumerate() {
            let tx_id = entry.header.tx_id.as_str();

            let event = match entry.header_type() {
                Some(HeaderType::Config) => {
                    debug!(channel = %self.channel, tx_id, "[lc-02] config transaction received");
                    // Blocks without a filter carry a single, already validated config tx.
                    let validation_code = block
                        .validation_code(index)
                        .unwrap_or(TxValidationCode::Valid);
                    self.config_handler
                        .handle(ConfigEntry {
                            block_number: number,
                            block: Some(block),
                            tx_count,
                            index,
                            tx_id,
                            validation_code,
                        })
                        .await?;
                    TxEvent::empty()
                }
                Some(HeaderType::EndorserTransaction) => {
                    debug!(channel = %self.channel, tx_id, "[lc-02] endorser transaction received");
                    let validation_code = block.validation_code(index).ok_or(
                        CommitError::MissingValidationCodes {
                            block: number,
                            index,
                        },
                    )?;
                    self.endorser_handler
                        .handle(CommittedTx {
                            tx_id,
                            block_number: number,
                            index,
                            validation_code,
                            envelope: Some(raw.as_slice()),
                        })
                        .await?
                }
                _ => {
                    debug!(channel = %self.channel, kind = entry.header.kind, "[lc-02] unhandled transaction type");
                    TxEvent::empty()
                }
            };

            self.deliver(event).await;
            debug!(channel = %self.channel, tx_id, block = number, "[lc-02] transaction processed");
        }
        Ok(())
    }

    async fn commit_filtered_entries(&self, block: &FilteredBlock) -> CommitResult<()> {
        let tx_count = block.transactions.len();
        ensure_config_alone(
            block.number,
            block
                .transactions
                .iter()
                .map(|tx| (tx.header_type(), tx.tx_id.as_str())),
        )?;

        for (index, tx) in block.transactions.iter().enumerate() {
            let event = match tx.header_type() {
                Some(HeaderType::Config) => {
                    self.config_handler
                        .handle(ConfigEntry {
                            block_number: block.number,
                            block: None,
                            tx_count,
                            index,
                            tx_id: &tx.tx_id,
                            validation_code: tx.validation_code,
                        })
                        .await?;
                    TxEvent::empty()
                }
                Some(HeaderType::EndorserTransaction) => {
                    self.endorser_handler
                        .handle(CommittedTx {
                            tx_id: &tx.tx_id,
                            block_number: block.number,
                            index,
                            validation_code: tx.validation_code,
                            envelope: None,
                        })
                        .await?
                }
                _ => {
                    debug!(channel = %self.channel, kind = tx.kind, "[lc-02] unhandled transaction type");
                    TxEvent::empty()
                }
            };
            self.deliver(event).await;
        }
        Ok(())
    }

    async fn deliver(&self, event: TxEvent) {
        let outcome = if event.is_empty() {
            "skipped"
        } else if event.is_valid() {
            "valid"
        } else {
            "invalid"
        };
        metrics::record_transaction(outcome);
        self.registry.notify(&event).await;
    }

    /// Feed the block outcome to the breaker.
    fn finish(&mut self, block: u64, result: CommitResult<()>) -> CommitResult<()> {
        match result {
            Ok(()) => {
                self.breaker.process_event(ProcessorEvent::BlockCommitted);
                debug!(channel = %self.channel, block, "[lc-02] block committed");
                Ok(())
            }
            Err(err) if err.is_fatal() => {
                error!(channel = %self.channel, block, error = %err, "[lc-02] fatal commit error, halting");
                self.breaker.process_event(ProcessorEvent::Fatal {
                    reason: err.to_string(),
                });
                metrics::record_halted(true);
                Err(err)
            }
            Err(err) => {
                warn!(channel = %self.channel, block, error = %err, "[lc-02] block aborted");
                Err(err)
            }
        }
    }
}

/// A config transaction must be the only transaction of its block. Checked
/// before any entry of the block is applied or notified.
fn ensure_config_alone<'a>(
    block: u64,
    mut entries: impl ExactSizeIterator<Item = (Option<HeaderType>, &'a str)>,
) -> CommitResult<()> {
    let tx_count = entries.len();
    if tx_count <= 1 {
        return Ok(());
    }
    match entries.find(|(kind, _)| *kind == Some(HeaderType::Config)) {
        Some((_, tx_id)) => Err(CommitError::Fatal {
            block,
            reason: format!(
                "config block should contain only one transaction [{tx_id}], found {tx_count}"
            ),
        }),
        None => Ok(()),
    }
}

#[async_trait]
impl CommitApi for BlockProcessor {
    async fn commit(&mut self, block: &Block) -> CommitResult<()> {
        self.ensure_running()?;
        let result = self.commit_entries(block).await;
        self.finish(block.number(), result)
    }

    async fn commit_filtered(&mut self, block: &FilteredBlock) -> CommitResult<()> {
        self.ensure_running()?;
        let result = self.commit_filtered_entries(block).await;
        self.finish(block.number, result)
    }

    fn state(&self) -> ProcessorState {
        self.breaker.state().clone()
    }

    fn reset_from_halted(&mut self) -> CommitResult<()> {
        if !self.breaker.is_halted() {
            return Ok(());
        }
        self.breaker.process_event(ProcessorEvent::ManualIntervention);
        metrics::record_halted(false);
        info!(channel = %self.channel, "[lc-02] processor resumed after manual intervention");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryLedger, InMemoryVault};
    use crate::error::{ServiceError, TxEventError};
    use parking_lot::Mutex;
    use shared_types::{Envelope, FilteredTransaction, TxId};

    /// Records every sink call; fails for one chosen transaction.
    #[derive(Default)]
    struct RecordingSink {
        calls: Mutex<Vec<(String, bool)>>,
        fail_on: Option<String>,
        dependents: Vec<TxId>,
    }

    impl RecordingSink {
        fn record(&self, tx: CommittedTx<'_>, committed: bool) -> Result<Vec<TxId>, ServiceError> {
            if self.fail_on.as_deref() == Some(tx.tx_id) {
                return Err(ServiceError::new("vault", "disk full"));
            }
            self.calls.lock().push((tx.tx_id.to_string(), committed));
            Ok(self.dependents.clone())
        }
    }

    #[async_trait]
    impl LedgerStateSink for RecordingSink {
        async fn commit_transaction(&self, tx: CommittedTx<'_>) -> Result<Vec<TxId>, ServiceError> {
            self.record(tx, true)
        }

        async fn discard_transaction(&self, tx: CommittedTx<'_>) -> Result<Vec<TxId>, ServiceError> {
            self.record(tx, false)
        }
    }

    struct Fixture {
        processor: BlockProcessor,
        registry: Arc<ListenerRegistry>,
        vault: Arc<InMemoryVault>,
        ledger: Arc<InMemoryLedger>,
        sink: Arc<RecordingSink>,
    }

    fn fixture_with_sink(sink: RecordingSink) -> Fixture {
        let registry = ListenerRegistry::new(100, true);
        let vault = Arc::new(InMemoryVault::new());
        let ledger = Arc::new(InMemoryLedger::new());
        let sink = Arc::new(sink);
        let processor = BlockProcessor::new(
            "ch",
            registry.clone(),
            ledger.clone(),
            vault.clone(),
            sink.clone(),
        );
        Fixture {
            processor,
            registry,
            vault,
            ledger,
            sink,
        }
    }

    fn fixture() -> Fixture {
        fixture_with_sink(RecordingSink::default())
    }

    fn env(kind: HeaderType, tx_id: &str) -> Envelope {
        Envelope::with_header(kind, "ch", tx_id, tx_id.as_bytes().to_vec()).unwrap()
    }

    fn endorser_block(number: u64, ids: &[&str], codes: &[TxValidationCode]) -> Block {
        let envs: Vec<Envelope> = ids
            .iter()
            .map(|id| env(HeaderType::EndorserTransaction, id))
            .collect();
        Block::new(number, &envs).unwrap().with_validation_codes(codes)
    }

    #[tokio::test]
    async fn test_valid_invalid_valid_block_notifies_in_order() {
        // Every transaction reports "watch" as a dependent, so its subscriber
        // sees each notification the block produces.
        let mut f = fixture_with_sink(RecordingSink {
            dependents: vec!["watch".into()],
            ..RecordingSink::default()
        });
        let mut watch = f.registry.subscribe("watch");
        let mut subs: Vec<_> = ["t1", "t2", "t3"].iter().map(|id| f.registry.subscribe(id)).collect();
        let block = endorser_block(
            7,
            &["t1", "t2", "t3"],
            &[
                TxValidationCode::Valid,
                TxValidationCode::MvccReadConflict,
                TxValidationCode::Valid,
            ],
        );

        f.processor.commit(&block).await.unwrap();

        assert_eq!(
            *f.sink.calls.lock(),
            vec![("t1".into(), true), ("t2".into(), false), ("t3".into(), true)]
        );
        let events: Vec<TxEvent> = futures::future::join_all(subs.iter_mut().map(|s| s.recv()))
            .await
            .into_iter()
            .map(Option::unwrap)
            .collect();
        assert!(events[0].is_valid());
        assert_eq!(
            events[1].error,
            Some(TxEventError::Invalid {
                tx_id: "t2".into(),
                code: TxValidationCode::MvccReadConflict
            })
        );
        assert!(events[2].is_valid());

        let mut notified = Vec::new();
        while let Some(event) = watch.try_recv() {
            notified.push((event.tx_id.clone(), event.is_valid()));
        }
        assert_eq!(
            notified,
            vec![("t1".into(), true), ("t2".into(), false), ("t3".into(), true)]
        );
    }

    #[tokio::test]
    async fn test_missing_validation_codes_is_recoverable() {
        let mut f = fixture();
        let envs = vec![env(HeaderType::EndorserTransaction, "t1")];
        let block = Block::new(3, &envs).unwrap();

        let err = f.processor.commit(&block).await.unwrap_err();

        assert!(matches!(err, CommitError::MissingValidationCodes { block: 3, index: 0 }));
        assert_eq!(f.processor.state(), ProcessorState::Running);

        // Retry with a complete block
        let block = endorser_block(3, &["t1"], &[TxValidationCode::Valid]);
        f.processor.commit(&block).await.unwrap();
    }

    #[tokio::test]
    async fn test_config_block_with_two_transactions_halts() {
        let mut f = fixture();
        let envs = vec![env(HeaderType::Config, "c1"), env(HeaderType::Config, "c2")];
        let block = Block::new(1, &envs).unwrap();

        let err = f.processor.commit(&block).await.unwrap_err();
        assert!(err.is_fatal());
        assert!(matches!(f.processor.state(), ProcessorState::Halted { .. }));
        assert!(f.vault.configs().is_empty());

        let next = endorser_block(2, &["t1"], &[TxValidationCode::Valid]);
        let err = f.processor.commit(&next).await.unwrap_err();
        assert!(matches!(err, CommitError::Halted { .. }));

        f.processor.reset_from_halted().unwrap();
        f.processor.commit(&next).await.unwrap();
    }

    #[tokio::test]
    async fn test_valid_config_is_committed_with_its_envelope() {
        let mut f = fixture();
        let config = env(HeaderType::Config, "c1");
        let block = Block::new(4, &[config.clone()])
            .unwrap()
            .with_validation_codes(&[TxValidationCode::Valid]);

        f.processor.commit(&block).await.unwrap();

        assert_eq!(f.vault.configs(), vec![(4, config.to_bytes().unwrap())]);
    }

    #[tokio::test]
    async fn test_invalid_config_is_not_committed() {
        let mut f = fixture();
        let block = Block::new(4, &[env(HeaderType::Config, "c1")])
            .unwrap()
            .with_validation_codes(&[TxValidationCode::InvalidConfigTransaction]);

        f.processor.commit(&block).await.unwrap();
        assert!(f.vault.configs().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_header_type_is_skipped() {
        let mut f = fixture();
        let mut sub = f.registry.subscribe("odd");
        let odd = Envelope::with_raw_header(42, "ch", "odd", vec![]).unwrap();
        let block = Block::new(5, &[odd, env(HeaderType::EndorserTransaction, "t1")])
            .unwrap()
            .with_validation_codes(&[TxValidationCode::Valid, TxValidationCode::Valid]);

        f.processor.commit(&block).await.unwrap();

        assert_eq!(*f.sink.calls.lock(), vec![("t1".into(), true)]);
        assert!(sub.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_malformed_entry_aborts_block_before_any_commit() {
        let mut f = fixture();
        let mut first = f.registry.subscribe("t1");
        let mut block = endorser_block(6, &["t1", "t2"], &[TxValidationCode::Valid; 2]);
        block.data.data[1] = vec![0xff];

        let err = f.processor.commit(&block).await.unwrap_err();

        assert!(matches!(err, CommitError::Malformed { block: 6, index: 1, .. }));
        assert!(f.sink.calls.lock().is_empty());
        assert!(first.try_recv().is_none());
        assert_eq!(f.processor.state(), ProcessorState::Running);
    }

    #[tokio::test]
    async fn test_config_sharing_block_with_endorser_tx_applies_nothing() {
        let mut f = fixture();
        let mut sub = f.registry.subscribe("t1");
        let envs = vec![
            env(HeaderType::EndorserTransaction, "t1"),
            env(HeaderType::Config, "c1"),
        ];
        let block = Block::new(1, &envs)
            .unwrap()
            .with_validation_codes(&[TxValidationCode::Valid; 2]);

        let err = f.processor.commit(&block).await.unwrap_err();

        match &err {
            CommitError::Fatal { block: 1, reason } => assert!(reason.contains("[c1], found 2")),
            other => panic!("unexpected error: {other}"),
        }
        assert!(f.sink.calls.lock().is_empty());
        assert!(f.vault.configs().is_empty());
        assert!(sub.try_recv().is_none());
        assert!(matches!(f.processor.state(), ProcessorState::Halted { .. }));
    }

    #[tokio::test]
    async fn test_filtered_config_sharing_block_applies_nothing() {
        let mut f = fixture();
        let mut sub = f.registry.subscribe("t1");
        let filtered = FilteredBlock {
            channel_id: "ch".into(),
            number: 12,
            transactions: vec![
                FilteredTransaction {
                    tx_id: "t1".into(),
                    kind: HeaderType::EndorserTransaction.as_i32(),
                    validation_code: TxValidationCode::Valid,
                },
                FilteredTransaction {
                    tx_id: "c1".into(),
                    kind: HeaderType::Config.as_i32(),
                    validation_code: TxValidationCode::Valid,
                },
            ],
        };

        let err = f.processor.commit_filtered(&filtered).await.unwrap_err();

        assert!(matches!(err, CommitError::Fatal { block: 12, .. }));
        assert!(f.sink.calls.lock().is_empty());
        assert!(sub.try_recv().is_none());
        assert!(matches!(f.processor.state(), ProcessorState::Halted { .. }));
    }

    #[tokio::test]
    async fn test_state_sink_failure_aborts_block() {
        let mut f = fixture_with_sink(RecordingSink {
            fail_on: Some("t2".into()),
            ..RecordingSink::default()
        });
        let block = endorser_block(8, &["t1", "t2", "t3"], &[TxValidationCode::Valid; 3]);

        let err = f.processor.commit(&block).await.unwrap_err();

        assert!(matches!(err, CommitError::StateSink { ref tx_id, .. } if tx_id == "t2"));
        assert_eq!(*f.sink.calls.lock(), vec![("t1".into(), true)]);
        assert_eq!(f.processor.state(), ProcessorState::Running);
    }

    #[tokio::test]
    async fn test_filtered_config_fetches_full_block() {
        let mut f = fixture();
        let config = env(HeaderType::Config, "c1");
        f.ledger.append(Block::new(9, &[config.clone()]).unwrap());

        let filtered = FilteredBlock {
            channel_id: "ch".into(),
            number: 9,
            transactions: vec![FilteredTransaction {
                tx_id: "c1".into(),
                kind: HeaderType::Config.as_i32(),
                validation_code: TxValidationCode::Valid,
            }],
        };
        f.processor.commit_filtered(&filtered).await.unwrap();
        assert_eq!(f.vault.configs(), vec![(9, config.to_bytes().unwrap())]);
    }

    #[tokio::test]
    async fn test_filtered_config_without_ledger_block_halts() {
        let mut f = fixture();
        let filtered = FilteredBlock {
            channel_id: "ch".into(),
            number: 10,
            transactions: vec![FilteredTransaction {
                tx_id: "c1".into(),
                kind: HeaderType::Config.as_i32(),
                validation_code: TxValidationCode::Valid,
            }],
        };

        let err = f.processor.commit_filtered(&filtered).await.unwrap_err();
        assert!(err.is_fatal());
        assert!(matches!(f.processor.state(), ProcessorState::Halted { .. }));
    }

    #[tokio::test]
    async fn test_filtered_endorser_transactions_notify() {
        let mut f = fixture();
        let mut sub = f.registry.subscribe("t1");
        let block = endorser_block(11, &["t1"], &[TxValidationCode::BadPayload]);

        f.processor
            .commit_filtered(&block.filter("ch").unwrap())
            .await
            .unwrap();

        let event = sub.recv().await.unwrap();
        assert!(!event.is_valid());
        assert_eq!(*f.sink.calls.lock(), vec![("t1".into(), false)]);
    }
}
