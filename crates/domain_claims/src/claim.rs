//! Claim aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{ApproverId, ClaimId, CustomerId, Money};
use crate::error::ClaimError;

/// Claim status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimStatus {
    /// Captured but not yet submitted
    Draft,
    /// Submitted, awaiting decisioning
    Submitted,
    /// Under manual review
    UnderReview,
    /// Routed into an approval chain
    PendingApproval,
    /// Approved
    Approved,
    /// Rejected, with a recorded reason
    Rejected,
}

/// Type of service request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimType {
    Warranty,
    Exchange,
    Return,
    Repair,
}

impl ClaimType {
    /// Wire name, matching the serde representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimType::Warranty => "warranty",
            ClaimType::Exchange => "exchange",
            ClaimType::Return => "return",
            ClaimType::Repair => "repair",
        }
    }
}

/// Claim priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimPriority {
    Low,
    Medium,
    High,
    Urgent,
}

/// The customer a claim belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub email: String,
}

/// A service/warranty claim
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claim {
    /// Unique identifier
    pub id: ClaimId,
    /// Human-readable claim number, immutable once assigned
    pub claim_number: String,
    /// Customer identity
    pub customer: Customer,
    /// Claimed amount, never negative
    pub amount: Money,
    /// Type of request
    pub claim_type: ClaimType,
    /// Free-text category (e.g. "compressor", "thermostat")
    pub category: String,
    /// Description of the problem
    pub description: String,
    /// Status
    pub status: ClaimStatus,
    /// Priority
    pub priority: ClaimPriority,
    /// Assigned approver, if any
    pub assigned_to: Option<ApproverId>,
    /// Rejection reason, present only when status is Rejected
    pub rejection_reason: Option<String>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Submission timestamp, unset for drafts
    pub submitted_at: Option<DateTime<Utc>>,
    /// Review start timestamp
    pub reviewed_at: Option<DateTime<Utc>>,
    /// Approval timestamp
    pub approved_at: Option<DateTime<Utc>>,
    /// Rejection timestamp
    pub rejected_at: Option<DateTime<Utc>>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Claim {
    /// Creates a draft claim
    ///
    /// # Errors
    ///
    /// Returns `ClaimError::NegativeAmount` if the amount is negative.
    pub fn draft(
        customer: Customer,
        amount: Money,
        claim_type: ClaimType,
        category: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, ClaimError> {
        if amount.amount().is_sign_negative() && !amount.is_zero() {
            return Err(ClaimError::NegativeAmount(amount.amount().to_string()));
        }
        let now = Utc::now();

        Ok(Self {
            id: ClaimId::new_v7(),
            claim_number: generate_claim_number(),
            customer,
            amount,
            claim_type,
            category: category.into(),
            description: description.into(),
            status: ClaimStatus::Draft,
            priority: ClaimPriority::Medium,
            assigned_to: None,
            rejection_reason: None,
            created_at: now,
            submitted_at: None,
            reviewed_at: None,
            approved_at: None,
            rejected_at: None,
            updated_at: now,
        })
    }

    /// Creates a claim directly in Submitted status
    pub fn submitted(
        customer: Customer,
        amount: Money,
        claim_type: ClaimType,
        category: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, ClaimError> {
        let mut claim = Self::draft(customer, amount, claim_type, category, description)?;
        claim.status = ClaimStatus::Submitted;
        claim.submitted_at = Some(claim.created_at);
        Ok(claim)
    }

    /// Updates the status, stamping the matching timestamp
    pub fn update_status(&mut self, status: ClaimStatus) -> Result<(), ClaimError> {
        if !self.can_transition_to(status) {
            return Err(ClaimError::InvalidStatusTransition {
                from: format!("{:?}", self.status),
                to: format!("{:?}", status),
            });
        }
        let now = Utc::now();
        match status {
            ClaimStatus::Submitted => self.submitted_at = Some(now),
            ClaimStatus::UnderReview => self.reviewed_at = Some(now),
            ClaimStatus::Approved => self.approved_at = Some(now),
            ClaimStatus::Rejected => self.rejected_at = Some(now),
            _ => {}
        }
        self.status = status;
        self.updated_at = now;
        Ok(())
    }

    /// Approves the claim
    pub fn approve(&mut self) -> Result<(), ClaimError> {
        self.update_status(ClaimStatus::Approved)
    }

    /// Rejects the claim with a reason
    pub fn reject(&mut self, reason: impl Into<String>) -> Result<(), ClaimError> {
        self.update_status(ClaimStatus::Rejected)?;
        self.rejection_reason = Some(reason.into());
        Ok(())
    }

    /// Assigns the claim to an approver and moves it under review
    pub fn assign_to(&mut self, approver: ApproverId) -> Result<(), ClaimError> {
        if self.status == ClaimStatus::Submitted {
            self.update_status(ClaimStatus::UnderReview)?;
        }
        self.assigned_to = Some(approver);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Whether the claim has reached a terminal status
    pub fn is_decided(&self) -> bool {
        matches!(self.status, ClaimStatus::Approved | ClaimStatus::Rejected)
    }

    /// Checks if transition is valid; transitions are monotonic
    fn can_transition_to(&self, target: ClaimStatus) -> bool {
        use ClaimStatus::*;
        matches!(
            (self.status, target),
            (Draft, Submitted)
                | (Submitted, UnderReview)
                | (Submitted, PendingApproval)
                | (Submitted, Approved)
                | (Submitted, Rejected)
                | (UnderReview, PendingApproval)
                | (UnderReview, Approved)
                | (UnderReview, Rejected)
                | (PendingApproval, Approved)
                | (PendingApproval, Rejected)
        )
    }
}

fn generate_claim_number() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let duration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("HVC-{}", duration.as_millis() % 10_000_000_000)
}
