use crate::error::{EndorsementError, EndorsementResult};
use shared_types::{CodecError, Identity, ProposalResponse};

/// Encode responses as a JSON array of serialized responses.
pub fn encode_reply(responses: &[ProposalResponse]) -> EndorsementResult<Vec<u8>> {
    let raw = responses
        .iter()
        .map(ProposalResponse::to_bytes)
        .collect::<Result<Vec<_>, _>>()?;
    serde_json::to_vec(&raw).map_err(|e| {
        EndorsementError::Codec(CodecError::Encode {
            entity: "endorsement reply",
            reason: e.to_string(),
        })
    })
}

/// Decode a reply received from `party`.
pub fn decode_reply(party: &Identity, payload: &[u8]) -> EndorsementResult<Vec<ProposalResponse>> {
    let malformed = |reason: String| EndorsementError::MalformedReply {
        party: party.to_string(),
        reason,
    };

    let raw: Vec<Vec<u8>> = serde_json::from_slice(payload).map_err(|e| malformed(e.to_string()))?;
    raw.iter()
        .map(|bytes| ProposalResponse::from_bytes(bytes).map_err(|e| malformed(e.to_string())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_is_json_array() {
        let r = ProposalResponse::new(Identity::from("bob"), vec![1, 2], vec![3]);
        let bytes = encode_reply(&[r.clone(), r.clone()]).unwrap();

        assert_eq!(bytes.first(), Some(&b'['));
        assert_eq!(decode_reply(&Identity::from("bob"), &bytes).unwrap(), vec![r.clone(), r]);
    }

    #[test]
    fn test_garbage_reply_rejected() {
        let err = decode_reply(&Identity::from("bob"), b"not json").unwrap_err();
        assert!(matches!(err, EndorsementError::MalformedReply { ref party, .. } if party == "bob"));
    }

    #[test]
    fn test_undecodable_record_rejected() {
        let err = decode_reply(&Identity::from("bob"), b"[[1,2,3]]").unwrap_err();
        assert!(matches!(err, EndorsementError::MalformedReply { .. }));
    }
}
