use crate::ports::outbound::TxValidator;
use parking_lot::RwLock;
use shared_types::{ChannelHeader, Envelope, TxId, TxValidationCode};
use std::collections::HashMap;

/// Marks every envelope valid.
#[derive(Clone, Copy, Debug, Default)]
pub struct AcceptAll;

impl TxValidator for AcceptAll {
    fn validate(&self, _header: &ChannelHeader, _envelope: &Envelope) -> TxValidationCode {
        TxValidationCode::Valid
    }
}

/// Valid unless a code was preset for the transaction id.
#[derive(Default)]
pub struct PresetValidator {
    codes: RwLock<HashMap<TxId, TxValidationCode>>,
}

impl PresetValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reject(&self, tx_id: &str, code: TxValidationCode) {
        self.codes.write().insert(tx_id.to_string(), code);
    }
}

impl TxValidator for PresetValidator {
    fn validate(&self, header: &ChannelHeader, _envelope: &Envelope) -> TxValidationCode {
        self.codes
            .read()
            .get(&header.tx_id)
            .copied()
            .unwrap_or(TxValidationCode::Valid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::HeaderType;

    #[test]
    fn test_preset_validator() {
        let validator = PresetValidator::new();
        validator.reject("bad", TxValidationCode::MvccReadConflict);
        let env = Envelope {
            payload: Vec::new(),
            signature: Vec::new(),
        };

        let good = ChannelHeader::new(HeaderType::EndorserTransaction, "ch", "good");
        let bad = ChannelHeader::new(HeaderType::EndorserTransaction, "ch", "bad");

        assert_eq!(validator.validate(&good, &env), TxValidationCode::Valid);
        assert_eq!(validator.validate(&bad, &env), TxValidationCode::MvccReadConflict);
    }
}
