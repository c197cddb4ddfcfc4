//! Commit services

mod config_handler;
mod endorser_handler;
mod finality;
mod processor;

pub use config_handler::{ConfigCommitHandler, ConfigEntry};
pub use endorser_handler::EndorserTxHandler;
pub use finality::FinalityResolver;
pub use processor::BlockProcessor;
