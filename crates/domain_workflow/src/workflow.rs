//! Workflow templates
//!
//! A workflow is reusable configuration. Chains reference it but never
//! mutate it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{ApproverId, WorkflowId};

/// Step type within a template; only approval steps become chain steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepType {
    Approval,
    Notification,
    /// Step types from newer templates we do not recognize; skipped
    #[serde(other)]
    Unknown,
}

/// How many decisions a step needs before it completes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalPolicy {
    /// One decision completes the step
    Any,
    /// Every listed approver must decide
    All,
    /// At least ceil(n/2) decisions
    Majority,
    /// Policies we do not recognize; the step never completes
    #[serde(other)]
    Unknown,
}

/// One configured step of a workflow template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowStep {
    pub name: String,
    pub step_type: StepType,
    pub approver_ids: Vec<ApproverId>,
    pub policy: ApprovalPolicy,
    /// Informational deadline; nothing enforces or escalates on expiry
    pub timeout_hours: Option<i64>,
}

/// A reusable approval workflow template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    pub id: WorkflowId,
    pub name: String,
    pub description: String,
    pub steps: Vec<WorkflowStep>,
    pub created_at: DateTime<Utc>,
}

impl Workflow {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        steps: Vec<WorkflowStep>,
    ) -> Self {
        Self {
            id: WorkflowId::new_v7(),
            name: name.into(),
            description: description.into(),
            steps,
            created_at: Utc::now(),
        }
    }

    /// The steps a chain will be built from
    pub fn approval_steps(&self) -> impl Iterator<Item = &WorkflowStep> {
        self.steps
            .iter()
            .filter(|s| s.step_type == StepType::Approval)
    }
}
