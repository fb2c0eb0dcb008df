//! Approval chain service
//!
//! Orchestrates chain persistence around the pure state machine in
//! [`crate::chain`]. All entry points take the acting identity as a
//! parameter; there is no ambient current user.

use std::sync::Arc;
use tracing::{info, instrument};

use core_kernel::{ApproverId, ChainId, ClaimId, WorkflowId};

use crate::chain::{Approval, ApprovalChain, ChainProgress, Decision};
use crate::error::WorkflowError;
use crate::ports::{ChainsPort, WorkflowsPort};

/// Service for starting workflows and recording approval decisions
pub struct ApprovalChainService {
    workflows: Arc<dyn WorkflowsPort>,
    chains: Arc<dyn ChainsPort>,
}

impl ApprovalChainService {
    pub fn new(workflows: Arc<dyn WorkflowsPort>, chains: Arc<dyn ChainsPort>) -> Self {
        Self { workflows, chains }
    }

    /// Instantiates the named workflow as a new chain for a claim
    #[instrument(skip(self))]
    pub async fn start_workflow(
        &self,
        claim_id: ClaimId,
        workflow_id: WorkflowId,
        initiated_by: ApproverId,
    ) -> Result<ApprovalChain, WorkflowError> {
        let workflow = self
            .workflows
            .get_workflow(workflow_id)
            .await?
            .ok_or_else(|| WorkflowError::WorkflowNotFound(workflow_id.to_string()))?;

        let chain = ApprovalChain::start(claim_id, &workflow, initiated_by)?;
        self.chains.create_chain(&chain).await?;

        info!(
            chain_id = %chain.id,
            claim_id = %claim_id,
            steps = chain.steps.len(),
            "approval chain started"
        );
        Ok(chain)
    }

    /// Records one approver decision on a chain's current step
    ///
    /// The read-modify-write is guarded by the chain version: if another
    /// submission landed between our read and write, the store rejects the
    /// update and this returns `ConcurrentSubmission` for the caller to
    /// retry against the fresh chain state.
    #[instrument(skip(self, comment))]
    pub async fn submit_approval(
        &self,
        chain_id: ChainId,
        approver_id: ApproverId,
        approver_name: &str,
        decision: Decision,
        comment: Option<String>,
    ) -> Result<(ApprovalChain, ChainProgress), WorkflowError> {
        let mut chain = self
            .chains
            .get_chain(chain_id)
            .await?
            .ok_or_else(|| WorkflowError::ChainNotFound(chain_id.to_string()))?;

        let expected_version = chain.version;
        let approval = Approval::new(approver_id, approver_name, decision, comment);
        let progress = chain.record_decision(approval)?;

        chain.version = expected_version + 1;
        self.chains.update_chain(&chain, expected_version).await?;

        info!(
            chain_id = %chain.id,
            step = chain.current_step,
            ?progress,
            "approval recorded"
        );
        Ok((chain, progress))
    }

    /// The chain currently attached to a claim, if any
    pub async fn chain_for_claim(
        &self,
        claim_id: ClaimId,
    ) -> Result<Option<ApprovalChain>, WorkflowError> {
        Ok(self.chains.find_chain_for_claim(claim_id).await?)
    }
}
