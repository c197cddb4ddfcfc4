//! Endorsement domain logic: producing and checking proposal responses.

mod endorse;
mod reply;

pub use endorse::{endorse_with_identity, verify_response};
pub use reply::{decode_reply, encode_reply};
