//! # Shared Types Crate
//!
//! This crate contains the domain entities exchanged between the subsystems
//! of the commit pipeline.
//!
//! ## Clusters
//!
//! - **Identity**: `Identity`, `TxId`
//! - **Endorsement**: `Transaction`, `ProposalResponse`, `ResponsePayload`
//! - **Ledger**: `Block`, `Envelope`, `ChannelHeader`, `TxValidationCode`, `FilteredBlock`
//! - **Vault**: `Status`
//! - **Sessions**: `Message`, `MessageStatus`
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-subsystem types are defined here.
//! - **Opaque Encoding**: Byte-level encodings use `bincode`; no component may
//!   depend on the layout of another component's bytes beyond the decode
//!   helpers provided here.

pub mod block;
pub mod errors;
pub mod identity;
pub mod message;
pub mod status;
pub mod transaction;

pub use block::{
    Block, BlockData, BlockHeader, BlockMetadata, ChannelHeader, Envelope, FilteredBlock,
    FilteredTransaction, Header, HeaderType, Payload, TxValidationCode,
};
pub use errors::CodecError;
pub use identity::{Identity, TxId};
pub use message::{Message, MessageStatus};
pub use status::Status;
pub use transaction::{ProposalResponse, ResponsePayload, Transaction};
