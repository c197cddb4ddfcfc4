//! Endorsement services: the initiator side (collector and per-party
//! session) and the responder side.

mod collector;
mod responder;
mod session;

pub use collector::{CollectOptions, EndorsementCollector};
pub use responder::{receive_transaction, EndorsementResponder};
pub use session::EndorsementSession;
