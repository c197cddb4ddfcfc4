//! Driving Ports (API - Inbound)

use crate::error::EndorsementResult;
use async_trait::async_trait;
use shared_bus::FlowContext;
use shared_types::{Identity, Transaction};

/// Endorsement collection API
#[async_trait]
pub trait EndorsementApi: Send + Sync {
    /// Collect one verified endorsement bound to each of `parties`.
    ///
    /// Responses are appended to `tx` as each party verifies. On error,
    /// endorsements already appended stay in place and the caller must
    /// discard the transaction.
    async fn collect(
        &self,
        ctx: &dyn FlowContext,
        tx: &mut Transaction,
        parties: &[Identity],
    ) -> EndorsementResult<()>;

    /// As `collect`, never sending transient fields to remote parties.
    async fn collect_approvals(
        &self,
        ctx: &dyn FlowContext,
        tx: &mut Transaction,
        parties: &[Identity],
    ) -> EndorsementResult<()>;
}
