/// Batching parameters of the in-memory orderer
#[derive(Clone, Debug)]
pub struct OrdererConfig {
    /// Envelopes per block; reaching it cuts a block
    pub max_message_count: usize,
    /// Blocks buffered towards the committing side
    pub delivery_capacity: usize,
}

impl Default for OrdererConfig {
    fn default() -> Self {
        Self {
            max_message_count: 10,
            delivery_capacity: 16,
        }
    }
}
