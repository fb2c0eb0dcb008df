//! Decisioning pipeline service
//!
//! Orchestrates the claim intake flow over the store ports. Rule matches
//! act immediately; unmatched claims pass through fraud screening, which
//! persists an alert when the score crosses the review threshold but never
//! blocks the claim on its own.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use core_kernel::{ApproverId, ChainId, ClaimId, Timezone};
use domain_claims::{Claim, ClaimFilter, ClaimStatus, ClaimsPort};
use domain_fraud::{AlertType, AlertsPort, AnomalyScore, FraudAlert, FraudScorer};
use domain_rules::{RuleAction, RuleEngine, RulesPort};
use domain_workflow::{
    ApprovalChain, ApprovalChainService, ChainProgress, ChainStatus, ChainsPort, Decision,
    WorkflowsPort,
};

use crate::error::DecisioningError;

/// How the pipeline disposed of a submitted claim
#[derive(Debug, Clone)]
pub enum DecisionOutcome {
    /// A rule approved the claim outright
    AutoApproved { rule_name: String },
    /// A rule rejected the claim outright
    AutoRejected { rule_name: String, reason: String },
    /// A rule assigned the claim to an approver for manual review
    Assigned {
        rule_name: String,
        approver_id: ApproverId,
    },
    /// A rule routed the claim into an approval chain
    ApprovalStarted {
        rule_name: String,
        chain_id: ChainId,
    },
    /// No rule matched; fraud screening flagged the claim
    Flagged { score: AnomalyScore },
    /// No rule matched and fraud screening found nothing
    Cleared { score: AnomalyScore },
}

/// Orchestrates rules, fraud screening, and approval routing
pub struct DecisioningService {
    claims: Arc<dyn ClaimsPort>,
    alerts: Arc<dyn AlertsPort>,
    engine: RuleEngine,
    scorer: FraudScorer,
    chains: ApprovalChainService,
}

impl DecisioningService {
    pub fn new(
        claims: Arc<dyn ClaimsPort>,
        rules: Arc<dyn RulesPort>,
        alerts: Arc<dyn AlertsPort>,
        workflows: Arc<dyn WorkflowsPort>,
        chains: Arc<dyn ChainsPort>,
    ) -> Self {
        Self {
            claims,
            alerts,
            engine: RuleEngine::new(rules),
            scorer: FraudScorer::new(),
            chains: ApprovalChainService::new(workflows, chains),
        }
    }

    /// Sets the local timezone used by time-of-day rules and scoring
    pub fn with_timezone(mut self, timezone: Timezone) -> Self {
        self.engine = self.engine.with_timezone(timezone);
        self.scorer = self.scorer.with_timezone(timezone);
        self
    }

    /// Runs the intake pipeline for a submitted claim
    ///
    /// `actor` identifies the admin (or system principal) driving the
    /// submission; chains started here record it as the initiator.
    #[instrument(skip(self))]
    pub async fn process_submission(
        &self,
        claim_id: ClaimId,
        actor: ApproverId,
    ) -> Result<DecisionOutcome, DecisioningError> {
        let mut claim = self
            .claims
            .get_claim(claim_id)
            .await?
            .ok_or_else(|| DecisioningError::ClaimNotFound(claim_id.to_string()))?;

        if claim.status != ClaimStatus::Submitted {
            return Err(DecisioningError::NotDecidable(claim_id.to_string()));
        }

        let outcome = self.engine.evaluate(&claim).await;
        if let (Some(rule), Some(action)) = (outcome.rule, outcome.action) {
            let disposed = match action {
                RuleAction::AutoApprove => {
                    claim.approve()?;
                    self.claims.update_claim(&claim).await?;
                    DecisionOutcome::AutoApproved {
                        rule_name: rule.name,
                    }
                }
                RuleAction::AutoReject { reason } => {
                    claim.reject(reason.clone())?;
                    self.claims.update_claim(&claim).await?;
                    DecisionOutcome::AutoRejected {
                        rule_name: rule.name,
                        reason,
                    }
                }
                RuleAction::AssignTo { approver_id } => {
                    claim.assign_to(approver_id)?;
                    self.claims.update_claim(&claim).await?;
                    DecisionOutcome::Assigned {
                        rule_name: rule.name,
                        approver_id,
                    }
                }
                RuleAction::RequireApproval { workflow_id } => {
                    let chain = self
                        .chains
                        .start_workflow(claim.id, workflow_id, actor)
                        .await?;
                    claim.update_status(ClaimStatus::PendingApproval)?;
                    self.claims.update_claim(&claim).await?;
                    DecisionOutcome::ApprovalStarted {
                        rule_name: rule.name,
                        chain_id: chain.id,
                    }
                }
            };
            info!(claim_id = %claim.id, ?disposed, "rule disposed claim");
            return Ok(disposed);
        }

        self.screen_for_fraud(&claim).await
    }

    /// Records an approver decision and writes terminal chain verdicts
    /// back to the claim
    #[instrument(skip(self, comment))]
    pub async fn record_approval(
        &self,
        chain_id: ChainId,
        approver_id: ApproverId,
        approver_name: &str,
        decision: Decision,
        comment: Option<String>,
    ) -> Result<(ApprovalChain, ChainProgress), DecisioningError> {
        let reason = comment.clone();
        let (chain, progress) = self
            .chains
            .submit_approval(chain_id, approver_id, approver_name, decision, comment)
            .await?;

        if let ChainProgress::Completed(status) = progress {
            let mut claim = self
                .claims
                .get_claim(chain.claim_id)
                .await?
                .ok_or_else(|| DecisioningError::ClaimNotFound(chain.claim_id.to_string()))?;
            match status {
                ChainStatus::Approved => claim.approve()?,
                ChainStatus::Rejected => {
                    claim.reject(reason.unwrap_or_else(|| "Rejected by approval chain".to_string()))?
                }
                ChainStatus::Pending => {}
            }
            self.claims.update_claim(&claim).await?;
            info!(
                claim_id = %claim.id,
                chain_id = %chain.id,
                ?status,
                "chain verdict written back to claim"
            );
        }

        Ok((chain, progress))
    }

    /// Scores the claim against the customer's history, persisting an
    /// alert when the score warrants one
    async fn screen_for_fraud(
        &self,
        claim: &Claim,
    ) -> Result<DecisionOutcome, DecisioningError> {
        let history = match self
            .claims
            .list_claims(ClaimFilter::for_customer(claim.customer.id))
            .await
        {
            Ok(history) => history,
            Err(error) => {
                warn!(
                    claim_id = %claim.id,
                    %error,
                    "history fetch failed; scoring against empty history"
                );
                Vec::new()
            }
        };

        let score = self.scorer.analyze(claim, &history);
        if !score.is_suspicious() {
            return Ok(DecisionOutcome::Cleared { score });
        }

        let alert = FraudAlert::new(
            claim.id,
            claim.claim_number.clone(),
            dominant_alert_type(&score),
            score.overall_score,
            score.factors.clone(),
        );
        self.alerts.create_alert(&alert).await?;
        info!(
            claim_id = %claim.id,
            alert_id = %alert.id,
            score = score.overall_score,
            "fraud alert raised"
        );
        Ok(DecisionOutcome::Flagged { score })
    }
}

/// Alert type for the heaviest contributing factor
fn dominant_alert_type(score: &AnomalyScore) -> AlertType {
    let heaviest = score
        .factors
        .iter()
        .max_by(|a, b| a.weight.total_cmp(&b.weight));
    match heaviest.map(|f| f.code.as_str()) {
        Some("duplicate_claim") => AlertType::DuplicateClaim,
        Some("unusual_amount") => AlertType::UnusualAmount,
        Some("frequent_claims") => AlertType::FrequentClaims,
        Some("timing_anomaly") => AlertType::TimingAnomaly,
        _ => AlertType::SuspiciousPattern,
    }
}
