//! # Session Messages
//!
//! Messages exchanged over a point-to-point session. The payload is opaque;
//! the status tag tells the receiver whether it carries a result or an
//! application-level error description.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageStatus {
    Ok,
    Error,
}

/// A message received on a session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Id of the session the message travelled on.
    pub session_id: String,
    pub status: MessageStatus,
    pub payload: Vec<u8>,
}

impl Message {
    pub fn ok(session_id: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            session_id: session_id.into(),
            status: MessageStatus::Ok,
            payload,
        }
    }

    pub fn error(session_id: impl Into<String>, reason: &str) -> Self {
        Self {
            session_id: session_id.into(),
            status: MessageStatus::Error,
            payload: reason.as_bytes().to_vec(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.status == MessageStatus::Error
    }

    /// Payload rendered as text, used for error messages.
    pub fn payload_text(&self) -> String {
        String::from_utf8_lossy(&self.payload).into_owned()
    }
}
