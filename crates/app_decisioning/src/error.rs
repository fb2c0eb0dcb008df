//! Decisioning pipeline errors

use thiserror::Error;

use core_kernel::PortError;
use domain_claims::ClaimError;
use domain_fraud::FraudError;
use domain_workflow::WorkflowError;

/// Errors surfaced by the decisioning pipeline
#[derive(Debug, Error)]
pub enum DecisioningError {
    #[error("Claim not found: {0}")]
    ClaimNotFound(String),

    #[error("Claim {0} is not awaiting a decision")]
    NotDecidable(String),

    #[error(transparent)]
    Claim(#[from] ClaimError),

    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error(transparent)]
    Fraud(#[from] FraudError),

    #[error("Store error: {0}")]
    Store(#[from] PortError),
}
