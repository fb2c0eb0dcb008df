//! Claims Decisioning Orchestration
//!
//! Composes the rule engine, fraud scorer, and approval chain service into
//! the claim intake pipeline: a submitted claim is first evaluated against
//! the admin-managed rules, then fraud-screened if no rule matched, and
//! routed into an approval chain when a rule demands one. Chain verdicts
//! are written back to the claim through the same store ports.

pub mod service;
pub mod error;

pub use service::{DecisioningService, DecisionOutcome};
pub use error::DecisioningError;
