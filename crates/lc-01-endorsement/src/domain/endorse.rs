use crate::error::{EndorsementError, EndorsementResult};
use shared_crypto::{Signer, Verifier};
use shared_types::transaction::signed_message;
use shared_types::{Identity, ProposalResponse, Transaction};

/// Endorse `tx` as `identity` and append the response to it.
///
/// Returns the appended response so responders can send it back.
pub fn endorse_with_identity(
    tx: &mut Transaction,
    identity: &Identity,
    signer: &dyn Signer,
) -> EndorsementResult<ProposalResponse> {
    let payload = tx.response_payload().to_bytes()?;
    let signature = signer.sign(&signed_message(&payload, identity))?;
    let response = ProposalResponse::new(identity.clone(), payload, signature);
    tx.append_response(response.clone())?;
    Ok(response)
}

/// Check a response's signature and that its results equal `expected_results`.
pub fn verify_response(
    response: &ProposalResponse,
    expected_results: &[u8],
    verifier: &dyn Verifier,
) -> EndorsementResult<()> {
    verifier
        .verify(&response.signed_message(), response.endorser_signature())
        .map_err(|source| EndorsementError::InvalidSignature {
            endorser: response.endorser().to_string(),
            source,
        })?;

    if response.results()? != expected_results {
        return Err(EndorsementError::ResultsMismatch {
            endorser: response.endorser().to_string(),
        });
    }
    Ok(())
}
