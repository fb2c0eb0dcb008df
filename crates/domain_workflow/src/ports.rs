//! Workflow and chain store ports

use async_trait::async_trait;

use core_kernel::{ChainId, ClaimId, DomainPort, PortError, WorkflowId};
use crate::chain::ApprovalChain;
use crate::workflow::Workflow;

/// Port for workflow template persistence
#[async_trait]
pub trait WorkflowsPort: DomainPort {
    /// Single-entity lookup; absence is `Ok(None)`
    async fn get_workflow(&self, id: WorkflowId) -> Result<Option<Workflow>, PortError>;

    async fn list_workflows(&self) -> Result<Vec<Workflow>, PortError>;

    async fn create_workflow(&self, workflow: &Workflow) -> Result<(), PortError>;
}

/// Port for approval chain persistence
///
/// Chain writes are versioned: `update_chain` must fail with
/// `PortError::ConcurrentModification` when the stored version differs
/// from `expected_version`. This is what keeps two admins from silently
/// overwriting each other's decision on the same step.
#[async_trait]
pub trait ChainsPort: DomainPort {
    /// Single-entity lookup; absence is `Ok(None)`
    async fn get_chain(&self, id: ChainId) -> Result<Option<ApprovalChain>, PortError>;

    /// A claim owns at most one chain
    async fn find_chain_for_claim(
        &self,
        claim_id: ClaimId,
    ) -> Result<Option<ApprovalChain>, PortError>;

    async fn create_chain(&self, chain: &ApprovalChain) -> Result<(), PortError>;

    /// Compare-and-swap replace; `chain.version` must already be bumped
    async fn update_chain(
        &self,
        chain: &ApprovalChain,
        expected_version: u64,
    ) -> Result<(), PortError>;
}
