//! Claim decision rules

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{ApproverId, RuleId, WorkflowId};
use crate::condition::RuleCondition;

/// Rule status; inactive rules are skipped entirely
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleStatus {
    Active,
    Inactive,
}

/// The decision a matched rule applies to a claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuleAction {
    /// Approve without human involvement
    AutoApprove,
    /// Reject with the configured reason
    AutoReject { reason: String },
    /// Route into an approval chain built from the named workflow
    RequireApproval { workflow_id: WorkflowId },
    /// Assign to a specific approver for manual review
    AssignTo { approver_id: ApproverId },
}

/// A named, prioritized decision rule
///
/// Conditions are evaluated as an ordered left-to-right fold (see
/// [`crate::condition::evaluate_conditions`]). Only the first action of a
/// matched rule is ever executed; trailing actions are configuration the
/// engine ignores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimRule {
    pub id: RuleId,
    pub name: String,
    pub description: String,
    /// Lower priority evaluates first
    pub priority: i32,
    pub status: RuleStatus,
    pub conditions: Vec<RuleCondition>,
    pub actions: Vec<RuleAction>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ClaimRule {
    /// Creates an active rule
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        priority: i32,
        conditions: Vec<RuleCondition>,
        actions: Vec<RuleAction>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: RuleId::new_v7(),
            name: name.into(),
            description: description.into(),
            priority,
            status: RuleStatus::Active,
            conditions,
            actions,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == RuleStatus::Active
    }

    /// The one action the engine will execute for this rule
    pub fn first_action(&self) -> Option<&RuleAction> {
        self.actions.first()
    }

    /// Deactivates the rule; it will be skipped during evaluation
    pub fn deactivate(&mut self) {
        self.status = RuleStatus::Inactive;
        self.updated_at = Utc::now();
    }
}
