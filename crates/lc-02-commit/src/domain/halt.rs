//! Halt breaker for the block processor
//!
//! A fatal condition (for example a config block with more than one
//! transaction) leaves the channel state untrustworthy. The breaker stops
//! the processor until an operator intervenes.

/// Processor state
///
/// ```text
/// [RUNNING] ──fatal──→ [HALTED] ──manual intervention──→ [RUNNING]
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum ProcessorState {
    /// Processing blocks
    #[default]
    Running,
    /// Rejecting blocks until manual intervention
    Halted { reason: String },
}

/// Events that drive breaker transitions
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProcessorEvent {
    /// A block committed cleanly
    BlockCommitted,
    /// A fatal condition was detected
    Fatal { reason: String },
    /// Operator reset
    ManualIntervention,
}

#[derive(Debug, Default)]
pub struct HaltBreaker {
    state: ProcessorState,
    blocks_committed: u64,
    halt_count: u64,
    intervention_count: u64,
}

impl HaltBreaker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ProcessorState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, ProcessorState::Running)
    }

    pub fn is_halted(&self) -> bool {
        matches!(self.state, ProcessorState::Halted { .. })
    }

    /// Apply an event and return the new state.
    pub fn process_event(&mut self, event: ProcessorEvent) -> &ProcessorState {
        let running = self.is_running();
        match event {
            ProcessorEvent::BlockCommitted if running => {
                self.blocks_committed += 1;
            }
            ProcessorEvent::Fatal { reason } if running => {
                self.halt_count += 1;
                self.state = ProcessorState::Halted { reason };
            }
            ProcessorEvent::ManualIntervention if !running => {
                self.intervention_count += 1;
                self.state = ProcessorState::Running;
            }
            // Halted ignores everything but intervention; Running ignores resets.
            _ => {}
        }
        &self.state
    }

    pub fn blocks_committed(&self) -> u64 {
        self.blocks_committed
    }

    pub fn halt_count(&self) -> u64 {
        self.halt_count
    }

    pub fn intervention_count(&self) -> u64 {
        self.intervention_count
    }
}
