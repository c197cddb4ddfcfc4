//! Block delivery handler.
//!
//! Feeds the blocks delivered for a channel to its `BlockProcessor`, in
//! order, on a single task. A halted processor stops the loop: blocks are
//! left in the channel until an operator resets the processor and runs the
//! handler again.

use lc_02_commit::{BlockProcessor, CommitApi, ProcessorState};
use shared_types::Block;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

pub struct DeliveryHandler {
    processor: BlockProcessor,
    blocks: mpsc::Receiver<Block>,
}

impl DeliveryHandler {
    pub fn new(processor: BlockProcessor, blocks: mpsc::Receiver<Block>) -> Self {
        Self { processor, blocks }
    }

    pub fn processor(&self) -> &BlockProcessor {
        &self.processor
    }

    pub fn processor_mut(&mut self) -> &mut BlockProcessor {
        &mut self.processor
    }

    /// Run until the delivery closes or the processor halts.
    pub async fn run(mut self) -> Self {
        info!(channel = self.processor.channel(), "[lc-02] delivery handler started");

        while let Some(block) = self.blocks.recv().await {
            match self.processor.commit(&block).await {
                Ok(()) => debug!(block = block.number(), "[lc-02] block committed"),
                Err(e) => warn!(block = block.number(), "[lc-02] block commit failed: {}", e),
            }

            if let ProcessorState::Halted { reason } = self.processor.state() {
                error!(
                    channel = self.processor.channel(),
                    "[lc-02] processor halted, delivery paused: {}", reason
                );
                return self;
            }
        }

        info!(channel = self.processor.channel(), "[lc-02] delivery closed");
        self
    }
}
