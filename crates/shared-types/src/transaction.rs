//! # Transactions and Proposal Responses
//!
//! A `Transaction` is the unit driven through endorsement, ordering and
//! finality. It accumulates one `ProposalResponse` per endorsing identity.
//!
//! ## Invariants
//!
//! - An identity endorses a transaction at most once.
//! - Responses are kept in collection order.
//! - The signed message of a response is `payload || endorser`.

use crate::block::{ChannelHeader, Envelope, Header, HeaderType, Payload};
use crate::errors::{decode, encode, CodecError};
use crate::identity::{Identity, TxId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The content an endorser signs: the transaction it simulated and the
/// results it obtained.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponsePayload {
    pub tx_id: TxId,
    pub results: Vec<u8>,
}

impl ResponsePayload {
    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        encode("response payload", self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        decode("response payload", bytes)
    }
}

/// A single endorser's signed approval plus the payload it approved.
///
/// Never mutated after creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalResponse {
    endorser: Identity,
    payload: Vec<u8>,
    signature: Vec<u8>,
}

impl ProposalResponse {
    pub fn new(endorser: Identity, payload: Vec<u8>, signature: Vec<u8>) -> Self {
        Self {
            endorser,
            payload,
            signature,
        }
    }

    pub fn endorser(&self) -> &Identity {
        &self.endorser
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn endorser_signature(&self) -> &[u8] {
        &self.signature
    }

    /// The bytes covered by the endorser signature: `payload || endorser`.
    pub fn signed_message(&self) -> Vec<u8> {
        signed_message(&self.payload, &self.endorser)
    }

    /// Simulation results embedded in the payload.
    pub fn results(&self) -> Result<Vec<u8>, CodecError> {
        Ok(ResponsePayload::from_bytes(&self.payload)?.results)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        encode("proposal response", self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        decode("proposal response", bytes)
    }
}

/// Build the message an endorser signs.
pub fn signed_message(payload: &[u8], endorser: &Identity) -> Vec<u8> {
    let mut message = Vec::with_capacity(payload.len() + endorser.as_bytes().len());
    message.extend_from_slice(payload);
    message.extend_from_slice(endorser.as_bytes());
    message
}

/// A proposed transaction together with the endorsements collected so far.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    id: TxId,
    network: String,
    channel: String,
    creator: Identity,
    /// Ordered list of parties whose endorsement is required.
    parties: Vec<Identity>,
    proposal: Vec<u8>,
    results: Vec<u8>,
    /// Private data that must not leave the initiator when approvals are
    /// collected without transient fields.
    transient: BTreeMap<String, Vec<u8>>,
    responses: Vec<ProposalResponse>,
}

impl Transaction {
    pub fn new(
        id: impl Into<TxId>,
        network: impl Into<String>,
        channel: impl Into<String>,
        creator: Identity,
    ) -> Self {
        Self {
            id: id.into(),
            network: network.into(),
            channel: channel.into(),
            creator,
            parties: Vec::new(),
            proposal: Vec::new(),
            results: Vec::new(),
            transient: BTreeMap::new(),
            responses: Vec::new(),
        }
    }

    pub fn with_parties(mut self, parties: Vec<Identity>) -> Self {
        self.parties = parties;
        self
    }

    pub fn with_proposal(mut self, proposal: Vec<u8>) -> Self {
        self.proposal = proposal;
        self
    }

    pub fn with_results(mut self, results: Vec<u8>) -> Self {
        self.results = results;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn network(&self) -> &str {
        &self.network
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn creator(&self) -> &Identity {
        &self.creator
    }

    pub fn parties(&self) -> &[Identity] {
        &self.parties
    }

    pub fn proposal(&self) -> &[u8] {
        &self.proposal
    }

    /// Locally computed simulation results.
    pub fn results(&self) -> &[u8] {
        &self.results
    }

    pub fn set_transient(&mut self, key: impl Into<String>, value: Vec<u8>) {
        self.transient.insert(key.into(), value);
    }

    pub fn transient(&self) -> &BTreeMap<String, Vec<u8>> {
        &self.transient
    }

    pub fn responses(&self) -> &[ProposalResponse] {
        &self.responses
    }

    pub fn is_endorsed_by(&self, endorser: &Identity) -> bool {
        self.responses.iter().any(|r| r.endorser() == endorser)
    }

    /// Append a verified response.
    ///
    /// Rejects a second response from an identity that already endorsed.
    pub fn append_response(&mut self, response: ProposalResponse) -> Result<(), CodecError> {
        if self.is_endorsed_by(response.endorser()) {
            return Err(CodecError::DuplicateEndorsement {
                endorser: response.endorser().to_string(),
            });
        }
        self.responses.push(response);
        Ok(())
    }

    /// Payload an endorser of this transaction signs.
    pub fn response_payload(&self) -> ResponsePayload {
        ResponsePayload {
            tx_id: self.id.clone(),
            results: self.results.clone(),
        }
    }

    /// Full serialization, transient fields included.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        encode("transaction", self)
    }

    /// Serialization with the transient map stripped.
    pub fn to_bytes_no_transient(&self) -> Result<Vec<u8>, CodecError> {
        let mut stripped = self.clone();
        stripped.transient.clear();
        encode("transaction", &stripped)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        decode("transaction", bytes)
    }

    /// Envelope submitted to the ordering service.
    pub fn envelope(&self) -> Result<Envelope, CodecError> {
        let header = ChannelHeader::new(HeaderType::EndorserTransaction, &self.channel, &self.id);
        let mut stripped = self.clone();
        stripped.transient.clear();
        let payload = Payload {
            header: Header {
                channel_header: header.to_bytes()?,
                creator: self.creator.clone(),
            },
            data: encode("transaction", &stripped)?,
        };
        Ok(Envelope {
            payload: payload.to_bytes()?,
            signature: Vec::new(),
        })
    }
}
