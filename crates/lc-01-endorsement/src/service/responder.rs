use crate::domain::{encode_reply, endorse_with_identity};
use crate::error::{EndorsementError, EndorsementResult};
use crate::ports::outbound::{SignerService, TransactionStore};
use shared_bus::{run_scoped, FlowContext, ScopeError, Session};
use shared_types::{Identity, ProposalResponse, Transaction};
use std::sync::Arc;
use tracing::{debug, warn};

/// Remote side of endorsement collection.
///
/// Receives a transaction on the flow's session, endorses it with the
/// requested identities, stores it, and replies with the responses.
pub struct EndorsementResponder {
    signers: Arc<dyn SignerService>,
    store: Arc<dyn TransactionStore>,
}

impl EndorsementResponder {
    pub fn new(signers: Arc<dyn SignerService>, store: Arc<dyn TransactionStore>) -> Self {
        Self { signers, store }
    }

    /// `respond` as a scoped sub-flow of `ctx`.
    ///
    /// A transaction stored before the reply failed is discarded again, and
    /// a panic while endorsing comes back as `ScopeError::Panicked`.
    pub async fn respond_scoped(
        &self,
        ctx: Arc<dyn FlowContext>,
        identities: &[Identity],
    ) -> Result<Transaction, ScopeError<EndorsementError>> {
        run_scoped(ctx, None, |child| async move {
            self.respond(child.as_ref(), identities).await
        })
        .await
    }

    /// Receive, endorse and reply in one go.
    ///
    /// Any failure after the transaction arrived is reported to the
    /// initiator as an error message before being returned. Once stored, the
    /// transaction is registered for discard with the context's error
    /// callbacks.
    pub async fn respond(
        &self,
        ctx: &dyn FlowContext,
        identities: &[Identity],
    ) -> EndorsementResult<Transaction> {
        let session = ctx.session().ok_or(EndorsementError::NoSession)?;
        let mut tx = receive_transaction(session.as_ref()).await?;

        let outcome = async {
            let responses = self.sign(&mut tx, identities)?;
            self.store_transaction(&tx)?;

            let store = Arc::clone(&self.store);
            let tx_id = tx.id().to_string();
            ctx.on_error(Box::new(move || store.discard_transaction(&tx_id)));

            self.reply(session.as_ref(), &tx, &responses).await
        }
        .await;

        match outcome {
            Ok(()) => Ok(tx),
            Err(err) => {
                warn!(tx_id = tx.id(), error = %err, "[lc-01] endorsement refused");
                if let Err(send_err) = session.send_error(&err.to_string()).await {
                    debug!(error = %send_err, "[lc-01] could not report error to initiator");
                }
                Err(err)
            }
        }
    }

    /// Endorse `tx` with each identity (the default one when empty), store
    /// it and send the responses back on `session`.
    pub async fn endorse(
        &self,
        session: &dyn Session,
        tx: &mut Transaction,
        identities: &[Identity],
    ) -> EndorsementResult<()> {
        let responses = self.sign(tx, identities)?;
        self.store_transaction(tx)?;
        self.reply(session, tx, &responses).await
    }

    fn sign(
        &self,
        tx: &mut Transaction,
        identities: &[Identity],
    ) -> EndorsementResult<Vec<ProposalResponse>> {
        let identities = if identities.is_empty() {
            vec![self.signers.default_identity()]
        } else {
            identities.to_vec()
        };

        let mut responses = Vec::with_capacity(identities.len());
        for identity in &identities {
            let signer = self.signers.get_signer(identity).ok_or_else(|| {
                EndorsementError::SignerNotFound {
                    identity: identity.to_string(),
                }
            })?;
            responses.push(endorse_with_identity(tx, identity, signer.as_ref())?);
        }
        Ok(responses)
    }

    fn store_transaction(&self, tx: &Transaction) -> EndorsementResult<()> {
        let raw = tx.to_bytes()?;
        self.store.store_transaction(tx.id(), &raw)
    }

    async fn reply(
        &self,
        session: &dyn Session,
        tx: &Transaction,
        responses: &[ProposalResponse],
    ) -> EndorsementResult<()> {
        session.send(encode_reply(responses)?).await?;
        debug!(tx_id = tx.id(), responses = responses.len(), "[lc-01] endorsement sent");
        Ok(())
    }
}

/// Wait for the initiator's transaction on `session`.
pub async fn receive_transaction(session: &dyn Session) -> EndorsementResult<Transaction> {
    let message = session
        .receive()
        .await
        .ok_or_else(|| EndorsementError::SessionClosed {
            party: session.counterparty().to_string(),
        })?;
    if message.is_error() {
        return Err(EndorsementError::Rejected {
            party: session.counterparty().to_string(),
            tx_id: String::new(),
            reason: message.payload_text(),
        });
    }
    Ok(Transaction::from_bytes(&message.payload)?)
}
