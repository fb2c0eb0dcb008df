//! In-memory workflow and approval chain store
//!
//! Chain updates are version-checked: the write only lands when the stored
//! chain still carries the version the caller read. This is the same
//! compare-and-set contract a document store would enforce with a
//! conditional update.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tracing::debug;

use core_kernel::{ChainId, ClaimId, DomainPort, PortError, WorkflowId};
use domain_workflow::{ApprovalChain, ChainsPort, Workflow, WorkflowsPort};

/// Hash-map backed [`WorkflowsPort`] and [`ChainsPort`] adapter
#[derive(Default)]
pub struct MemoryWorkflowStore {
    workflows: Mutex<HashMap<WorkflowId, Workflow>>,
    chains: Mutex<HashMap<ChainId, ApprovalChain>>,
}

fn lock<'a, T>(mutex: &'a Mutex<T>) -> Result<MutexGuard<'a, T>, PortError> {
    mutex
        .lock()
        .map_err(|_: PoisonError<_>| PortError::internal("workflow store lock poisoned"))
}

impl MemoryWorkflowStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DomainPort for MemoryWorkflowStore {}

#[async_trait]
impl WorkflowsPort for MemoryWorkflowStore {
    async fn get_workflow(&self, id: WorkflowId) -> Result<Option<Workflow>, PortError> {
        Ok(lock(&self.workflows)?.get(&id).cloned())
    }

    async fn list_workflows(&self) -> Result<Vec<Workflow>, PortError> {
        Ok(lock(&self.workflows)?.values().cloned().collect())
    }

    async fn create_workflow(&self, workflow: &Workflow) -> Result<(), PortError> {
        lock(&self.workflows)?.insert(workflow.id, workflow.clone());
        Ok(())
    }
}

#[async_trait]
impl ChainsPort for MemoryWorkflowStore {
    async fn get_chain(&self, id: ChainId) -> Result<Option<ApprovalChain>, PortError> {
        Ok(lock(&self.chains)?.get(&id).cloned())
    }

    async fn find_chain_for_claim(
        &self,
        claim_id: ClaimId,
    ) -> Result<Option<ApprovalChain>, PortError> {
        Ok(lock(&self.chains)?
            .values()
            .find(|c| c.claim_id == claim_id)
            .cloned())
    }

    async fn create_chain(&self, chain: &ApprovalChain) -> Result<(), PortError> {
        lock(&self.chains)?.insert(chain.id, chain.clone());
        debug!(chain_id = %chain.id, claim_id = %chain.claim_id, "chain created");
        Ok(())
    }

    async fn update_chain(
        &self,
        chain: &ApprovalChain,
        expected_version: u64,
    ) -> Result<(), PortError> {
        let mut chains = lock(&self.chains)?;
        let stored = chains
            .get(&chain.id)
            .ok_or_else(|| PortError::not_found("ApprovalChain", chain.id))?;
        if stored.version != expected_version {
            return Err(PortError::concurrent_modification(
                "ApprovalChain",
                chain.id,
                expected_version,
                stored.version,
            ));
        }
        chains.insert(chain.id, chain.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::ApproverId;
    use domain_workflow::{ApprovalPolicy, StepType, WorkflowStep};

    fn workflow() -> Workflow {
        Workflow::new(
            "single sign-off",
            "",
            vec![WorkflowStep {
                name: "supervisor".to_string(),
                step_type: StepType::Approval,
                approver_ids: vec![ApproverId::new()],
                policy: ApprovalPolicy::Any,
                timeout_hours: Some(24),
            }],
        )
    }

    #[tokio::test]
    async fn test_chain_update_checks_version() {
        let store = MemoryWorkflowStore::new();
        let workflow = workflow();
        let chain =
            ApprovalChain::start(ClaimId::new(), &workflow, ApproverId::new()).unwrap();
        store.create_chain(&chain).await.unwrap();

        let mut bumped = chain.clone();
        bumped.version = 1;
        store.update_chain(&bumped, 0).await.unwrap();

        // A writer still holding version 0 loses the race
        let result = store.update_chain(&chain, 0).await;
        assert!(matches!(
            result,
            Err(PortError::ConcurrentModification { actual: 1, .. })
        ));
    }

    #[tokio::test]
    async fn test_find_chain_for_claim() {
        let store = MemoryWorkflowStore::new();
        let workflow = workflow();
        let claim_id = ClaimId::new();
        let chain = ApprovalChain::start(claim_id, &workflow, ApproverId::new()).unwrap();
        store.create_chain(&chain).await.unwrap();

        let found = store.find_chain_for_claim(claim_id).await.unwrap().unwrap();
        assert_eq!(found.id, chain.id);
        assert!(store
            .find_chain_for_claim(ClaimId::new())
            .await
            .unwrap()
            .is_none());
    }
}
