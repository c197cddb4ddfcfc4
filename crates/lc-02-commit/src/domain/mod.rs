//! Commit domain: events, listener registry, halt breaker and entry
//! decoding.

mod entry;
mod event;
mod halt;
mod registry;

pub use entry::{decode_entry, DecodedEntry};
pub use event::TxEvent;
pub use halt::{HaltBreaker, ProcessorEvent, ProcessorState};
pub use registry::{ListenerRegistry, Subscription};
