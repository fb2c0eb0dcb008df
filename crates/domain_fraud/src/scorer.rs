//! Anomaly scoring heuristics
//!
//! Four independent factors contribute points which are summed and capped
//! at 100. The recommendation thresholds here (70/40) are deliberately
//! different from the persisted alert severity thresholds (90/70/40) in
//! [`crate::alert`]; the two tables serve different surfaces and must not
//! be unified.

use chrono::Duration;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use core_kernel::{ClaimId, Timezone, OVERNIGHT_QUIET_HOURS};
use domain_claims::Claim;

use crate::similarity::claim_similarity;

/// Similarity above which another claim counts as a duplicate, percent
const DUPLICATE_SIMILARITY_THRESHOLD: f64 = 70.0;
/// Amount ratio to the historical mean above which the amount factor fires
const AMOUNT_RATIO_TRIGGER: f64 = 3.0;
const AMOUNT_FACTOR_CAP: f64 = 40.0;
const DUPLICATE_FACTOR_CAP: f64 = 50.0;
const FREQUENCY_FACTOR_CAP: f64 = 30.0;
const FREQUENCY_WINDOW_DAYS: i64 = 30;
const FREQUENCY_TRIGGER_COUNT: usize = 3;
const TIMING_FACTOR_POINTS: f64 = 10.0;
const OVERALL_CAP: f64 = 100.0;

const RECOMMEND_REJECT_AT: f64 = 70.0;
const RECOMMEND_REVIEW_AT: f64 = 40.0;

/// One contributing reason within an anomaly score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreFactor {
    /// Stable code for the factor (e.g. "unusual_amount")
    pub code: String,
    /// Human-readable description
    pub description: String,
    /// Points this factor contributed
    pub weight: f64,
}

/// What the scorer suggests doing with the claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Approve,
    Review,
    Reject,
}

/// Composite fraud-likelihood score for a single claim
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnomalyScore {
    pub claim_id: ClaimId,
    /// 0-100
    pub overall_score: f64,
    pub factors: Vec<ScoreFactor>,
    pub recommendation: Recommendation,
}

impl AnomalyScore {
    /// Whether the score warrants persisting an alert
    pub fn is_suspicious(&self) -> bool {
        self.overall_score >= RECOMMEND_REVIEW_AT
    }
}

/// Heuristic fraud scorer
#[derive(Debug, Clone, Default)]
pub struct FraudScorer {
    timezone: Timezone,
}

impl FraudScorer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the local timezone used by the timing-anomaly factor
    pub fn with_timezone(mut self, timezone: Timezone) -> Self {
        self.timezone = timezone;
        self
    }

    /// Scores a claim against the customer's historical claims
    ///
    /// `historical` is the comparison population; the claim under analysis
    /// is excluded by id wherever it appears.
    pub fn analyze(&self, claim: &Claim, historical: &[Claim]) -> AnomalyScore {
        let mut factors = Vec::new();

        if let Some(factor) = self.amount_factor(claim, historical) {
            factors.push(factor);
        }
        if let Some(factor) = self.duplicate_factor(claim, historical) {
            factors.push(factor);
        }
        if let Some(factor) = self.frequency_factor(claim, historical) {
            factors.push(factor);
        }
        if let Some(factor) = self.timing_factor(claim) {
            factors.push(factor);
        }

        let overall_score = factors
            .iter()
            .map(|f| f.weight)
            .sum::<f64>()
            .min(OVERALL_CAP);

        let recommendation = if overall_score >= RECOMMEND_REJECT_AT {
            Recommendation::Reject
        } else if overall_score >= RECOMMEND_REVIEW_AT {
            Recommendation::Review
        } else {
            Recommendation::Approve
        };

        debug!(
            claim_id = %claim.id,
            score = overall_score,
            ?recommendation,
            "fraud analysis complete"
        );

        AnomalyScore {
            claim_id: claim.id,
            overall_score,
            factors,
            recommendation,
        }
    }

    /// Amount more than 3x the historical mean
    fn amount_factor(&self, claim: &Claim, historical: &[Claim]) -> Option<ScoreFactor> {
        let others: Vec<Decimal> = historical
            .iter()
            .filter(|c| c.id != claim.id)
            .map(|c| c.amount.amount())
            .collect();
        if others.is_empty() {
            return None;
        }

        let mean = others.iter().sum::<Decimal>() / Decimal::from(others.len());
        if mean.is_zero() {
            return None;
        }

        let ratio = (claim.amount.amount() / mean).to_f64()?;
        if ratio <= AMOUNT_RATIO_TRIGGER {
            return None;
        }

        let weight = ((ratio - AMOUNT_RATIO_TRIGGER) * 20.0).min(AMOUNT_FACTOR_CAP);
        Some(ScoreFactor {
            code: "unusual_amount".to_string(),
            description: format!("Amount is {:.1}x the historical mean", ratio),
            weight,
        })
    }

    /// Near-duplicate claims by the same customer
    fn duplicate_factor(&self, claim: &Claim, historical: &[Claim]) -> Option<ScoreFactor> {
        let duplicates = historical
            .iter()
            .filter(|c| c.id != claim.id && c.customer.id == claim.customer.id)
            .filter(|c| claim_similarity(claim, c) > DUPLICATE_SIMILARITY_THRESHOLD)
            .count();
        if duplicates == 0 {
            return None;
        }

        let weight = (duplicates as f64 * 30.0).min(DUPLICATE_FACTOR_CAP);
        Some(ScoreFactor {
            code: "duplicate_claim".to_string(),
            description: format!("{} similar claim(s) by the same customer", duplicates),
            weight,
        })
    }

    /// Burst of same-customer claims in the trailing 30 days
    fn frequency_factor(&self, claim: &Claim, historical: &[Claim]) -> Option<ScoreFactor> {
        let window_start = claim.created_at - Duration::days(FREQUENCY_WINDOW_DAYS);
        let recent = historical
            .iter()
            .filter(|c| c.id != claim.id && c.customer.id == claim.customer.id)
            .filter(|c| c.created_at >= window_start && c.created_at <= claim.created_at)
            .count();
        if recent < FREQUENCY_TRIGGER_COUNT {
            return None;
        }

        let weight = ((recent as f64 - 2.0) * 15.0).min(FREQUENCY_FACTOR_CAP);
        Some(ScoreFactor {
            code: "frequent_claims".to_string(),
            description: format!(
                "{} claims in the trailing {} days",
                recent, FREQUENCY_WINDOW_DAYS
            ),
            weight,
        })
    }

    /// Submission during overnight quiet hours
    fn timing_factor(&self, claim: &Claim) -> Option<ScoreFactor> {
        let submitted_at = claim.submitted_at?;
        if !OVERNIGHT_QUIET_HOURS.contains(self.timezone, submitted_at) {
            return None;
        }

        Some(ScoreFactor {
            code: "timing_anomaly".to_string(),
            description: format!(
                "Submitted at {:02}:00 local",
                self.timezone.local_hour(submitted_at)
            ),
            weight: TIMING_FACTOR_POINTS,
        })
    }
}
