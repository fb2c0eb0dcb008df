//! Approval Workflow Domain
//!
//! Workflows are immutable templates of ordered approval steps. Starting a
//! workflow for a claim instantiates an approval chain: a state machine
//! that records approver decisions, evaluates step-completion policies, and
//! advances until a terminal decision.
//!
//! # Chain Lifecycle
//!
//! ```text
//! steps:  [in_progress, pending, pending]
//!              | approved
//!         [approved, in_progress, pending]
//!              | ...          | any rejection
//!         chain approved      chain rejected, no further step activates
//! ```

pub mod workflow;
pub mod chain;
pub mod service;
pub mod ports;
pub mod error;

pub use workflow::{ApprovalPolicy, StepType, Workflow, WorkflowStep};
pub use chain::{
    Approval, ApprovalChain, ApprovalStep, ChainProgress, ChainStatus, Decision, StepStatus,
};
pub use service::ApprovalChainService;
pub use ports::{ChainsPort, WorkflowsPort};
pub use error::WorkflowError;
