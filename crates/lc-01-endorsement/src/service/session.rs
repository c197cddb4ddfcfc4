use crate::domain::decode_reply;
use crate::error::{EndorsementError, EndorsementResult};
use shared_bus::FlowContext;
use shared_types::{Identity, ProposalResponse};
use std::time::Duration;
use tracing::debug;

/// One request/response exchange with a remote party.
///
/// Sends the serialized transaction and waits, bounded by the response
/// timeout, for the party's reply. The decoded responses are returned
/// unverified.
pub struct EndorsementSession<'a> {
    party: &'a Identity,
    tx_id: &'a str,
    response_timeout: Duration,
}

impl<'a> EndorsementSession<'a> {
    pub fn new(party: &'a Identity, tx_id: &'a str, response_timeout: Duration) -> Self {
        Self {
            party,
            tx_id,
            response_timeout,
        }
    }

    pub async fn exchange(
        &self,
        ctx: &dyn FlowContext,
        tx_raw: Vec<u8>,
    ) -> EndorsementResult<Vec<ProposalResponse>> {
        let session = ctx.get_session(self.party).await?;
        session.send(tx_raw).await?;
        debug!(party = %self.party, tx_id = self.tx_id, session = session.id(), "[lc-01] proposal sent");

        let message = tokio::time::timeout(self.response_timeout, session.receive())
            .await
            .map_err(|_| EndorsementError::Timeout {
                party: self.party.to_string(),
                tx_id: self.tx_id.to_string(),
            })?
            .ok_or_else(|| EndorsementError::SessionClosed {
                party: self.party.to_string(),
            })?;

        if message.is_error() {
            return Err(EndorsementError::Rejected {
                party: self.party.to_string(),
                tx_id: self.tx_id.to_string(),
                reason: message.payload_text(),
            });
        }

        debug!(party = %self.party, tx_id = self.tx_id, "[lc-01] reply received");
        decode_reply(self.party, &message.payload)
    }
}
