//! Single-node orderer.
//!
//! Envelopes are queued in arrival order and cut into a block once
//! `max_message_count` is reached, or on `cut_block()`. Every cut block is
//! stamped with validation codes, appended to the ledger and handed to the
//! committing side in block-number order.
//!
//! Blocks are sealed: `data_hash` is the SHA-256 of the entries, and
//! `previous_hash` the header hash of the block before.

use crate::adapters::AcceptAll;
use crate::error::{OrderingError, OrderingResult};
use crate::ports::outbound::{Broadcaster, TxValidator};
use crate::types::OrdererConfig;
use async_trait::async_trait;
use lc_02_commit::InMemoryLedger;
use shared_crypto::hashing::{Hash, Sha256Hasher};
use shared_types::{Block, BlockHeader, ChannelHeader, Envelope, Payload, TxId, TxValidationCode};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info};

struct OrdererState {
    pending: Vec<(ChannelHeader, Envelope)>,
    seen: HashSet<TxId>,
    next_block: u64,
    previous_hash: Hash,
}

/// Digest chaining a block to its successor.
pub fn header_hash(header: &BlockHeader) -> Hash {
    let mut hasher = Sha256Hasher::new();
    hasher
        .update(&header.number.to_be_bytes())
        .update(&header.previous_hash)
        .update(&header.data_hash);
    hasher.finalize()
}

fn seal(block: &mut Block, previous_hash: Hash) {
    let mut data = Sha256Hasher::new();
    for entry in &block.data.data {
        data.update(entry);
    }
    block.header.previous_hash = previous_hash;
    block.header.data_hash = data.finalize();
}

pub struct InMemoryOrderer {
    config: OrdererConfig,
    channel: String,
    ledger: Arc<InMemoryLedger>,
    validator: Arc<dyn TxValidator>,
    deliver: mpsc::Sender<Block>,
    // Held across delivery so blocks leave in number order
    state: Mutex<OrdererState>,
}

impl InMemoryOrderer {
    /// Orderer for `channel` and the receiving end of its block delivery.
    pub fn new(
        config: OrdererConfig,
        channel: impl Into<String>,
        ledger: Arc<InMemoryLedger>,
    ) -> (Self, mpsc::Receiver<Block>) {
        let (deliver, blocks) = mpsc::channel(config.delivery_capacity.max(1));
        let next_block = ledger.height();
        let orderer = Self {
            config,
            channel: channel.into(),
            ledger,
            validator: Arc::new(AcceptAll),
            deliver,
            state: Mutex::new(OrdererState {
                pending: Vec::new(),
                seen: HashSet::new(),
                next_block,
                previous_hash: [0u8; 32],
            }),
        };
        (orderer, blocks)
    }

    pub fn with_validator(mut self, validator: Arc<dyn TxValidator>) -> Self {
        self.validator = validator;
        self
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub async fn pending(&self) -> usize {
        self.state.lock().await.pending.len()
    }

    /// Cut whatever is queued. Returns the new block number, if any.
    pub async fn cut_block(&self) -> OrderingResult<Option<u64>> {
        let mut state = self.state.lock().await;
        if state.pending.is_empty() {
            return Ok(None);
        }
        self.cut(&mut state).await.map(Some)
    }

    async fn cut(&self, state: &mut OrdererState) -> OrderingResult<u64> {
        let batch = std::mem::take(&mut state.pending);
        let number = state.next_block;

        let mut codes = Vec::with_capacity(batch.len());
        let mut envelopes = Vec::with_capacity(batch.len());
        for (header, envelope) in batch {
            let code = if state.seen.insert(header.tx_id.clone()) {
                self.validator.validate(&header, &envelope)
            } else {
                TxValidationCode::DuplicateTxId
            };
            debug!(tx_id = %header.tx_id, block = number, ?code, "[lc-03] ordered");
            codes.push(code);
            envelopes.push(envelope);
        }

        let mut block = Block::new(number, &envelopes)?.with_validation_codes(&codes);
        seal(&mut block, state.previous_hash);
        state.previous_hash = header_hash(&block.header);
        state.next_block += 1;
        self.ledger.append(block.clone());

        self.deliver
            .send(block)
            .await
            .map_err(|_| OrderingError::DeliveryClosed {
                channel: self.channel.clone(),
            })?;

        info!(channel = %self.channel, block = number, txs = codes.len(), "[lc-03] block cut");
        Ok(number)
    }
}

#[async_trait]
impl Broadcaster for InMemoryOrderer {
    async fn broadcast(&self, envelope: &Envelope) -> OrderingResult<()> {
        let payload = Payload::from_bytes(&envelope.payload)?;
        let header = ChannelHeader::from_bytes(&payload.header.channel_header)?;
        if header.channel_id != self.channel {
            return Err(OrderingError::ChannelMismatch {
                expected: self.channel.clone(),
                actual: header.channel_id,
            });
        }

        debug!(tx_id = %header.tx_id, "[lc-03] broadcast received");
        let mut state = self.state.lock().await;
        state.pending.push((header, envelope.clone()));
        if state.pending.len() >= self.config.max_message_count {
            self.cut(&mut state).await?;
        }
        Ok(())
    }
}
