//! # Ledger Blocks
//!
//! Committed blocks as delivered by the ledger. A block carries an ordered
//! list of serialized envelopes plus metadata; the metadata slot
//! `TRANSACTIONS_FILTER` holds one validation code per envelope.
//!
//! ```text
//! Block
//!  ├── header   { number, previous_hash, data_hash }
//!  ├── data     [ Envelope bytes, ... ]
//!  └── metadata [ signatures, last_config, TRANSACTIONS_FILTER, ... ]
//!
//! Envelope { payload, signature }
//!  └── Payload { header { channel_header, creator }, data }
//!       └── ChannelHeader { type, channel_id, tx_id, epoch }
//! ```

use crate::errors::{decode, encode, CodecError};
use crate::identity::{Identity, TxId};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};

/// Metadata slot holding the per-transaction validation codes.
pub const TRANSACTIONS_FILTER: usize = 2;

/// Number of metadata slots in a complete block.
pub const METADATA_SLOTS: usize = 5;

/// Kind of transaction carried by an envelope.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeaderType {
    Message = 0,
    Config = 1,
    ConfigUpdate = 2,
    EndorserTransaction = 3,
    OrdererTransaction = 4,
    DeliverSeekInfo = 5,
    ChaincodePackage = 6,
}

impl HeaderType {
    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::Message),
            1 => Some(Self::Config),
            2 => Some(Self::ConfigUpdate),
            3 => Some(Self::EndorserTransaction),
            4 => Some(Self::OrdererTransaction),
            5 => Some(Self::DeliverSeekInfo),
            6 => Some(Self::ChaincodePackage),
            _ => None,
        }
    }

    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

/// Per-transaction validation outcome assigned by the committing peers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum TxValidationCode {
    Valid = 0,
    NilEnvelope = 1,
    BadPayload = 2,
    BadCommonHeader = 3,
    BadCreatorSignature = 4,
    InvalidEndorserTransaction = 5,
    InvalidConfigTransaction = 6,
    UnsupportedTxPayload = 7,
    BadProposalTxId = 8,
    DuplicateTxId = 9,
    EndorsementPolicyFailure = 10,
    MvccReadConflict = 11,
    PhantomReadConflict = 12,
    UnknownTxType = 13,
    InvalidOtherReason = 255,
}

impl TxValidationCode {
    /// Decode a filter byte. Unassigned values map to `InvalidOtherReason`.
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Valid,
            1 => Self::NilEnvelope,
            2 => Self::BadPayload,
            3 => Self::BadCommonHeader,
            4 => Self::BadCreatorSignature,
            5 => Self::InvalidEndorserTransaction,
            6 => Self::InvalidConfigTransaction,
            7 => Self::UnsupportedTxPayload,
            8 => Self::BadProposalTxId,
            9 => Self::DuplicateTxId,
            10 => Self::EndorsementPolicyFailure,
            11 => Self::MvccReadConflict,
            12 => Self::PhantomReadConflict,
            13 => Self::UnknownTxType,
            _ => Self::InvalidOtherReason,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn is_valid(self) -> bool {
        self == Self::Valid
    }
}

/// Channel-level header of a transaction payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelHeader {
    /// Raw header type; see `HeaderType`.
    pub kind: i32,
    pub channel_id: String,
    pub tx_id: TxId,
    pub epoch: u64,
}

impl ChannelHeader {
    pub fn new(kind: HeaderType, channel_id: &str, tx_id: &str) -> Self {
        Self {
            kind: kind.as_i32(),
            channel_id: channel_id.to_string(),
            tx_id: tx_id.to_string(),
            epoch: 0,
        }
    }

    /// Known header type, `None` for unrecognized values.
    pub fn header_type(&self) -> Option<HeaderType> {
        HeaderType::from_i32(self.kind)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        encode("channel header", self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        decode("channel header", bytes)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub channel_header: Vec<u8>,
    pub creator: Identity,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    pub header: Header,
    pub data: Vec<u8>,
}

impl Payload {
    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        encode("payload", self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        decode("payload", bytes)
    }
}

/// Signed transaction container as stored in a block.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub payload: Vec<u8>,
    pub signature: Vec<u8>,
}

impl Envelope {
    /// Build an envelope around a channel header and opaque data.
    pub fn with_header(
        kind: HeaderType,
        channel_id: &str,
        tx_id: &str,
        data: Vec<u8>,
    ) -> Result<Self, CodecError> {
        Self::with_raw_header(kind.as_i32(), channel_id, tx_id, data)
    }

    /// As `with_header`, for header types outside `HeaderType`.
    pub fn with_raw_header(
        kind: i32,
        channel_id: &str,
        tx_id: &str,
        data: Vec<u8>,
    ) -> Result<Self, CodecError> {
        let header = ChannelHeader {
            kind,
            channel_id: channel_id.to_string(),
            tx_id: tx_id.to_string(),
            epoch: 0,
        };
        let payload = Payload {
            header: Header {
                channel_header: header.to_bytes()?,
                creator: Identity::default(),
            },
            data,
        };
        Ok(Self {
            payload: payload.to_bytes()?,
            signature: Vec::new(),
        })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        encode("envelope", self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        decode("envelope", bytes)
    }
}

#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BlockHeader {
    pub number: u64,
    #[serde_as(as = "Bytes")]
    pub previous_hash: [u8; 32],
    #[serde_as(as = "Bytes")]
    pub data_hash: [u8; 32],
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BlockData {
    pub data: Vec<Vec<u8>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BlockMetadata {
    pub metadata: Vec<Vec<u8>>,
}

/// A committed ledger block.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Block {
    pub header: BlockHeader,
    pub data: BlockData,
    pub metadata: BlockMetadata,
}

impl Block {
    /// Build a block from envelopes, without validation codes.
    pub fn new(number: u64, envelopes: &[Envelope]) -> Result<Self, CodecError> {
        let data = envelopes
            .iter()
            .map(Envelope::to_bytes)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            header: BlockHeader {
                number,
                ..BlockHeader::default()
            },
            data: BlockData { data },
            metadata: BlockMetadata::default(),
        })
    }

    /// Attach the validation code array.
    pub fn with_validation_codes(mut self, codes: &[TxValidationCode]) -> Self {
        if self.metadata.metadata.len() < METADATA_SLOTS {
            self.metadata.metadata.resize(METADATA_SLOTS, Vec::new());
        }
        self.metadata.metadata[TRANSACTIONS_FILTER] = codes.iter().map(|c| c.as_u8()).collect();
        self
    }

    pub fn number(&self) -> u64 {
        self.header.number
    }

    pub fn tx_count(&self) -> usize {
        self.data.data.len()
    }

    /// Serialized envelope at `index`.
    pub fn data_at(&self, index: usize) -> Option<&[u8]> {
        self.data.data.get(index).map(Vec::as_slice)
    }

    /// The validation code array, if the block carries one.
    pub fn validation_codes(&self) -> Option<&[u8]> {
        self.metadata
            .metadata
            .get(TRANSACTIONS_FILTER)
            .map(Vec::as_slice)
    }

    /// Validation code of the transaction at `index`, if covered.
    pub fn validation_code(&self, index: usize) -> Option<TxValidationCode> {
        self.validation_codes()
            .and_then(|codes| codes.get(index))
            .map(|b| TxValidationCode::from_u8(*b))
    }

    /// Derive the filtered view of this block.
    ///
    /// Transactions not covered by the filter are reported as
    /// `InvalidOtherReason`.
    pub fn filter(&self, channel_id: &str) -> Result<FilteredBlock, CodecError> {
        let mut transactions = Vec::with_capacity(self.tx_count());
        for (index, raw) in self.data.data.iter().enumerate() {
            let env = Envelope::from_bytes(raw)?;
            let payload = Payload::from_bytes(&env.payload)?;
            let header = ChannelHeader::from_bytes(&payload.header.channel_header)?;
            transactions.push(FilteredTransaction {
                tx_id: header.tx_id,
                kind: header.kind,
                validation_code: self
                    .validation_code(index)
                    .unwrap_or(TxValidationCode::InvalidOtherReason),
            });
        }
        Ok(FilteredBlock {
            channel_id: channel_id.to_string(),
            number: self.number(),
            transactions,
        })
    }
}

/// Transaction summary in a filtered block.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilteredTransaction {
    pub tx_id: TxId,
    /// Raw header type; see `HeaderType`.
    pub kind: i32,
    pub validation_code: TxValidationCode,
}

impl FilteredTransaction {
    pub fn header_type(&self) -> Option<HeaderType> {
        HeaderType::from_i32(self.kind)
    }
}

/// A block stripped down to ids, types and validation codes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilteredBlock {
    pub channel_id: String,
    pub number: u64,
    pub transactions: Vec<FilteredTransaction>,
}
