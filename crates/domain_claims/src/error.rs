//! Claims domain errors

use thiserror::Error;
use core_kernel::PortError;

/// Errors that can occur in the claims domain
#[derive(Debug, Error)]
pub enum ClaimError {
    #[error("Claim not found: {0}")]
    ClaimNotFound(String),

    #[error("Invalid status transition from {from} to {to}")]
    InvalidStatusTransition { from: String, to: String },

    #[error("Claim amount must not be negative: {0}")]
    NegativeAmount(String),

    #[error("Claim already decided")]
    AlreadyDecided,

    #[error("Store error: {0}")]
    Store(#[from] PortError),
}
