//! Fraud domain errors

use thiserror::Error;
use core_kernel::PortError;

/// Errors that can occur in the fraud domain
#[derive(Debug, Error)]
pub enum FraudError {
    #[error("Alert not found: {0}")]
    AlertNotFound(String),

    #[error("Invalid status transition from {from} to {to}")]
    InvalidStatusTransition { from: String, to: String },

    #[error("Store error: {0}")]
    Store(#[from] PortError),
}
