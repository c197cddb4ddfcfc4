//! Ports (Hexagonal Architecture)

pub mod inbound;
pub mod outbound;
