use crate::domain::{endorse_with_identity, verify_response};
use crate::error::{EndorsementError, EndorsementResult};
use crate::ports::inbound::EndorsementApi;
use crate::ports::outbound::{MembershipService, SignerService, VerifierProvider};
use crate::service::session::EndorsementSession;
use crate::types::EndorsementConfig;
use async_trait::async_trait;
use shared_bus::{EndpointService, FlowContext};
use shared_crypto::Verifier;
use shared_types::{Identity, ProposalResponse, Transaction};
use std::sync::Arc;
use tracing::{debug, info};

/// Per-call collection options.
#[derive(Clone, Default)]
pub struct CollectOptions {
    /// Strip transient fields before sending the transaction.
    pub delete_transient: bool,
    /// Verifier providers tried after the collector's own.
    pub verifier_providers: Vec<Arc<dyn VerifierProvider>>,
}

/// Collects endorsements from an ordered list of parties.
///
/// Parties are contacted one at a time. The local node endorses in-process.
pub struct EndorsementCollector {
    config: EndorsementConfig,
    membership: Arc<dyn MembershipService>,
    endpoints: Arc<dyn EndpointService>,
    signers: Arc<dyn SignerService>,
    verifier_providers: Vec<Arc<dyn VerifierProvider>>,
}

impl EndorsementCollector {
    pub fn new(
        config: EndorsementConfig,
        membership: Arc<dyn MembershipService>,
        endpoints: Arc<dyn EndpointService>,
        signers: Arc<dyn SignerService>,
    ) -> Self {
        Self {
            config,
            membership,
            endpoints,
            signers,
            verifier_providers: Vec::new(),
        }
    }

    pub fn with_verifier_providers(mut self, providers: Vec<Arc<dyn VerifierProvider>>) -> Self {
        self.verifier_providers = providers;
        self
    }

    pub fn config(&self) -> &EndorsementConfig {
        &self.config
    }

    /// Collect with explicit options.
    pub async fn collect_with(
        &self,
        ctx: &dyn FlowContext,
        tx: &mut Transaction,
        parties: &[Identity],
        options: CollectOptions,
    ) -> EndorsementResult<()> {
        let providers: Vec<Arc<dyn VerifierProvider>> = self
            .verifier_providers
            .iter()
            .chain(options.verifier_providers.iter())
            .cloned()
            .collect();
        let results = tx.results().to_vec();

        for party in parties {
            debug!(party = %party, tx_id = tx.id(), "[lc-01] collecting endorsement");

            if ctx.is_me(party) {
                let signer = self.signers.get_signer(party).ok_or_else(|| {
                    EndorsementError::SignerNotFound {
                        identity: party.to_string(),
                    }
                })?;
                endorse_with_identity(tx, party, signer.as_ref())?;
                debug!(party = %party, tx_id = tx.id(), "[lc-01] endorsed locally");
                continue;
            }

            let tx_raw = if options.delete_transient {
                tx.to_bytes_no_transient()?
            } else {
                tx.to_bytes()?
            };

            let tx_id = tx.id().to_string();
            let responses = EndorsementSession::new(party, &tx_id, self.config.response_timeout())
                .exchange(ctx, tx_raw)
                .await?;

            let staged = self.verify_party_reply(tx, party, responses, &results, &providers)?;
            for response in staged {
                tx.append_response(response)?;
            }
            debug!(party = %party, tx_id = tx.id(), "[lc-01] endorsement collected");
        }

        info!(
            tx_id = tx.id(),
            parties = parties.len(),
            responses = tx.responses().len(),
            "[lc-01] endorsements collected"
        );
        Ok(())
    }

    /// Verify every response in one party's reply.
    ///
    /// Nothing is appended here; the caller appends the returned responses
    /// only once the whole reply is known to be good.
    fn verify_party_reply(
        &self,
        tx: &Transaction,
        party: &Identity,
        responses: Vec<ProposalResponse>,
        results: &[u8],
        providers: &[Arc<dyn VerifierProvider>],
    ) -> EndorsementResult<Vec<ProposalResponse>> {
        let mut staged: Vec<ProposalResponse> = Vec::with_capacity(responses.len());
        let mut bound = false;

        for response in responses {
            let endorser = response.endorser();
            if self.endpoints.is_bound_to(endorser, party) {
                bound = true;
            }

            let verifier = self.resolve_verifier(endorser, providers)?;
            verify_response(&response, results, verifier.as_ref())?;

            if tx.is_endorsed_by(endorser) || staged.iter().any(|r| r.endorser() == endorser) {
                return Err(EndorsementError::DuplicateEndorsement {
                    endorser: endorser.to_string(),
                });
            }
            staged.push(response);
        }

        if !bound {
            return Err(EndorsementError::InvalidEndorsement {
                party: party.to_string(),
            });
        }
        Ok(staged)
    }

    /// Membership first, then each provider in order.
    fn resolve_verifier(
        &self,
        endorser: &Identity,
        providers: &[Arc<dyn VerifierProvider>],
    ) -> EndorsementResult<Arc<dyn Verifier>> {
        if let Some(verifier) = self.membership.get_verifier(endorser) {
            return Ok(verifier);
        }
        for (index, provider) in providers.iter().enumerate() {
            if let Some(verifier) = provider.get_verifier(endorser) {
                debug!(endorser = %endorser, provider = index, "[lc-01] verifier found by provider");
                return Ok(verifier);
            }
        }
        Err(EndorsementError::VerifierNotFound {
            endorser: endorser.to_string(),
        })
    }
}

#[async_trait]
impl EndorsementApi for EndorsementCollector {
    async fn collect(
        &self,
        ctx: &dyn FlowContext,
        tx: &mut Transaction,
        parties: &[Identity],
    ) -> EndorsementResult<()> {
        let options = CollectOptions {
            delete_transient: self.config.delete_transient,
            ..CollectOptions::default()
        };
        self.collect_with(ctx, tx, parties, options).await
    }

    async fn collect_approvals(
        &self,
        ctx: &dyn FlowContext,
        tx: &mut Transaction,
        parties: &[Identity],
    ) -> EndorsementResult<()> {
        let options = CollectOptions {
            delete_transient: true,
            ..CollectOptions::default()
        };
        self.collect_with(ctx, tx, parties, options).await
    }
}
