//! Workflow domain errors

use thiserror::Error;
use core_kernel::PortError;

/// Errors that can occur in the workflow domain
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Workflow not found: {0}")]
    WorkflowNotFound(String),

    #[error("Approval chain not found: {0}")]
    ChainNotFound(String),

    #[error("Workflow {0} has no approval steps")]
    NoApprovalSteps(String),

    #[error("Chain {chain_id} already decided: {status}")]
    ChainAlreadyDecided { chain_id: String, status: String },

    #[error("Chain {0} is in an invalid state")]
    InvalidChainState(String),

    #[error("Concurrent submission on chain {0}; reload and retry")]
    ConcurrentSubmission(String),

    #[error("Store error: {0}")]
    Store(PortError),
}

impl From<PortError> for WorkflowError {
    fn from(error: PortError) -> Self {
        match error {
            PortError::ConcurrentModification { ref id, .. } => {
                WorkflowError::ConcurrentSubmission(id.clone())
            }
            other => WorkflowError::Store(other),
        }
    }
}
