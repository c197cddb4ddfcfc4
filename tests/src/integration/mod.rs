//! # Integration Scenarios

#[cfg(test)]
mod fixtures;

pub mod endorsement;
pub mod pipeline;
