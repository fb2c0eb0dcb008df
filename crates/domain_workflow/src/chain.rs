//! Approval chains
//!
//! The live state machine instantiated from a workflow template for one
//! claim. All transition logic lives here as pure methods; persistence and
//! concurrency control are the service's concern.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{ApproverId, ChainId, ClaimId, WorkflowId};
use crate::error::WorkflowError;
use crate::workflow::{ApprovalPolicy, Workflow, WorkflowStep};

/// An approver's recorded decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Approve,
    Reject,
    /// Asks the submitter for more information; never counts toward
    /// step completion
    RequestInfo,
}

/// One decision recorded on a step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Approval {
    pub approver_id: ApproverId,
    pub approver_name: String,
    pub decision: Decision,
    pub comment: Option<String>,
    pub decided_at: DateTime<Utc>,
}

impl Approval {
    pub fn new(
        approver_id: ApproverId,
        approver_name: impl Into<String>,
        decision: Decision,
        comment: Option<String>,
    ) -> Self {
        Self {
            approver_id,
            approver_name: approver_name.into(),
            decision,
            comment,
            decided_at: Utc::now(),
        }
    }
}

/// Step status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Pending,
    InProgress,
    Approved,
    Rejected,
}

/// Chain status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChainStatus {
    Pending,
    Approved,
    Rejected,
}

/// One stage of an approval chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalStep {
    pub step_number: usize,
    pub name: String,
    pub approver_ids: Vec<ApproverId>,
    pub policy: ApprovalPolicy,
    pub approvals: Vec<Approval>,
    pub status: StepStatus,
    /// Informational only; nothing acts on expiry
    pub due_date: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl ApprovalStep {
    fn from_template(step_number: usize, template: &WorkflowStep, now: DateTime<Utc>) -> Self {
        Self {
            step_number,
            name: template.name.clone(),
            approver_ids: template.approver_ids.clone(),
            policy: template.policy,
            approvals: Vec::new(),
            status: if step_number == 0 {
                StepStatus::InProgress
            } else {
                StepStatus::Pending
            },
            due_date: template
                .timeout_hours
                .map(|hours| now + Duration::hours(hours)),
            completed_at: None,
        }
    }

    /// Approve/reject decisions recorded so far; request_info is excluded
    pub fn decision_count(&self) -> usize {
        self.approvals
            .iter()
            .filter(|a| matches!(a.decision, Decision::Approve | Decision::Reject))
            .count()
    }

    /// Whether the step has enough decisions under its policy
    ///
    /// Completion counts approve and reject decisions together; the step's
    /// terminal status is then derived from the last decision submitted,
    /// not from a vote tally. A mixed all/majority step can therefore
    /// complete on whichever decision arrives last. Deliberately preserved
    /// behavior; see DESIGN.md before changing this to a tally.
    pub fn is_complete(&self) -> bool {
        let decisions = self.decision_count();
        match self.policy {
            ApprovalPolicy::Any => decisions >= 1,
            ApprovalPolicy::All => decisions == self.approver_ids.len(),
            ApprovalPolicy::Majority => {
                // ceil(n / 2)
                decisions >= (self.approver_ids.len() + 1) / 2
            }
            ApprovalPolicy::Unknown => false,
        }
    }
}

/// What a recorded decision did to the chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainProgress {
    /// The current step still needs more decisions
    AwaitingMoreDecisions,
    /// The step approved and the next step is now in progress
    StepAdvanced { next_step: usize },
    /// The chain reached a terminal status
    Completed(ChainStatus),
}

/// A live approval chain for one claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalChain {
    pub id: ChainId,
    pub claim_id: ClaimId,
    pub workflow_id: WorkflowId,
    pub current_step: usize,
    pub steps: Vec<ApprovalStep>,
    pub status: ChainStatus,
    /// Optimistic-concurrency token; bumped on every persisted change
    pub version: u64,
    /// Who started the workflow for this claim
    pub initiated_by: ApproverId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ApprovalChain {
    /// Instantiates a chain from a workflow template
    ///
    /// Only approval-typed steps become chain steps; step 0 is seeded
    /// in_progress, everything else pending.
    pub fn start(
        claim_id: ClaimId,
        workflow: &Workflow,
        initiated_by: ApproverId,
    ) -> Result<Self, WorkflowError> {
        let now = Utc::now();
        let steps: Vec<ApprovalStep> = workflow
            .approval_steps()
            .enumerate()
            .map(|(number, template)| ApprovalStep::from_template(number, template, now))
            .collect();

        if steps.is_empty() {
            return Err(WorkflowError::NoApprovalSteps(workflow.id.to_string()));
        }

        Ok(Self {
            id: ChainId::new_v7(),
            claim_id,
            workflow_id: workflow.id,
            current_step: 0,
            steps,
            status: ChainStatus::Pending,
            version: 0,
            initiated_by,
            created_at: now,
            updated_at: now,
        })
    }

    /// The step currently accepting decisions
    pub fn active_step(&self) -> Option<&ApprovalStep> {
        self.steps.get(self.current_step)
    }

    /// Records a decision on the current step and advances the machine
    pub fn record_decision(&mut self, approval: Approval) -> Result<ChainProgress, WorkflowError> {
        if self.status != ChainStatus::Pending {
            return Err(WorkflowError::ChainAlreadyDecided {
                chain_id: self.id.to_string(),
                status: format!("{:?}", self.status),
            });
        }

        let now = Utc::now();
        let decision = approval.decision;
        let step_count = self.steps.len();
        let current = self.current_step;

        let step = self
            .steps
            .get_mut(current)
            .ok_or_else(|| WorkflowError::InvalidChainState(self.id.to_string()))?;
        step.approvals.push(approval);

        if !step.is_complete() {
            self.updated_at = now;
            return Ok(ChainProgress::AwaitingMoreDecisions);
        }

        // Terminal step status comes from the decision just submitted
        let step_outcome = if decision == Decision::Approve {
            StepStatus::Approved
        } else {
            StepStatus::Rejected
        };
        step.status = step_outcome;
        step.completed_at = Some(now);
        self.updated_at = now;

        if step_outcome == StepStatus::Approved && current + 1 < step_count {
            self.current_step = current + 1;
            self.steps[self.current_step].status = StepStatus::InProgress;
            return Ok(ChainProgress::StepAdvanced {
                next_step: self.current_step,
            });
        }

        // Rejection anywhere, or the last step approving, ends the chain
        self.status = if step_outcome == StepStatus::Approved {
            ChainStatus::Approved
        } else {
            ChainStatus::Rejected
        };
        Ok(ChainProgress::Completed(self.status))
    }
}
