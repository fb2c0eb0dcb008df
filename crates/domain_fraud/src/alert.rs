//! Fraud alerts
//!
//! A scored claim that crosses the review threshold is persisted as an
//! alert for human follow-up. Severity is a pure function of the risk
//! score; alert status moves one direction only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{AlertId, ClaimId};
use crate::error::FraudError;
use crate::scorer::ScoreFactor;

/// Severity thresholds for persisted alerts. These are NOT the scorer's
/// recommendation thresholds; see the note in [`crate::scorer`].
const SEVERITY_CRITICAL_AT: f64 = 90.0;
const SEVERITY_HIGH_AT: f64 = 70.0;
const SEVERITY_MEDIUM_AT: f64 = 40.0;

/// What pattern triggered the alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    DuplicateClaim,
    UnusualAmount,
    FrequentClaims,
    SuspiciousPattern,
    IdentityMismatch,
    TimingAnomaly,
}

/// Severity band derived from the risk score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AlertSeverity {
    /// Classifies a 0-100 risk score; boundary scores take the higher band
    pub fn from_score(score: f64) -> Self {
        if score >= SEVERITY_CRITICAL_AT {
            AlertSeverity::Critical
        } else if score >= SEVERITY_HIGH_AT {
            AlertSeverity::High
        } else if score >= SEVERITY_MEDIUM_AT {
            AlertSeverity::Medium
        } else {
            AlertSeverity::Low
        }
    }
}

/// Alert review status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertStatus {
    Open,
    Investigating,
    Confirmed,
    FalsePositive,
    Resolved,
}

/// A persisted record of a claim flagged as suspicious
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FraudAlert {
    pub id: AlertId,
    pub claim_id: ClaimId,
    pub claim_number: String,
    pub alert_type: AlertType,
    /// 0-100
    pub risk_score: f64,
    pub severity: AlertSeverity,
    /// Weighted reasons, highest contribution first
    pub reasons: Vec<ScoreFactor>,
    pub status: AlertStatus,
    pub detected_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl FraudAlert {
    /// Creates an open alert; severity is derived from the score
    pub fn new(
        claim_id: ClaimId,
        claim_number: impl Into<String>,
        alert_type: AlertType,
        risk_score: f64,
        mut reasons: Vec<ScoreFactor>,
    ) -> Self {
        reasons.sort_by(|a, b| b.weight.total_cmp(&a.weight));
        Self {
            id: AlertId::new_v7(),
            claim_id,
            claim_number: claim_number.into(),
            alert_type,
            risk_score,
            severity: AlertSeverity::from_score(risk_score),
            reasons,
            status: AlertStatus::Open,
            detected_at: Utc::now(),
            resolved_at: None,
        }
    }

    /// Advances the review status
    ///
    /// Transitions are one-directional: open -> investigating ->
    /// {confirmed | false_positive} -> resolved. A confirmed alert can
    /// never regress to open.
    pub fn update_status(&mut self, status: AlertStatus) -> Result<(), FraudError> {
        if !self.can_transition_to(status) {
            return Err(FraudError::InvalidStatusTransition {
                from: format!("{:?}", self.status),
                to: format!("{:?}", status),
            });
        }
        if status == AlertStatus::Resolved {
            self.resolved_at = Some(Utc::now());
        }
        self.status = status;
        Ok(())
    }

    fn can_transition_to(&self, target: AlertStatus) -> bool {
        use AlertStatus::*;
        matches!(
            (self.status, target),
            (Open, Investigating)
                | (Investigating, Confirmed)
                | (Investigating, FalsePositive)
                | (Confirmed, Resolved)
                | (FalsePositive, Resolved)
        )
    }
}
