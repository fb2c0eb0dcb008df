//! End-to-end decisioning pipeline tests over the in-memory stores

use std::sync::Arc;

use rust_decimal_macros::dec;

use app_decisioning::{DecisionOutcome, DecisioningError, DecisioningService};
use core_kernel::ApproverId;
use domain_claims::{Claim, ClaimStatus, ClaimsPort};
use domain_fraud::{AlertFilter, AlertType, AlertsPort};
use domain_rules::{
    ConditionField, ConditionOperator, ConditionValue, RuleAction, RulesPort,
};
use domain_workflow::{
    ApprovalPolicy, ChainProgress, ChainStatus, ChainsPort, Decision, StepStatus, Workflow,
    WorkflowsPort,
};
use infra_memory::{MemoryAlertStore, MemoryClaimStore, MemoryRuleStore, MemoryWorkflowStore};
use test_utils::{
    init_test_tracing, random_customer, CustomerFixtures, TemporalFixtures, TestClaimBuilder,
    TestRuleBuilder, TestWorkflowBuilder,
};

struct Harness {
    claims: Arc<MemoryClaimStore>,
    rules: Arc<MemoryRuleStore>,
    alerts: Arc<MemoryAlertStore>,
    workflows: Arc<MemoryWorkflowStore>,
    service: DecisioningService,
    actor: ApproverId,
}

impl Harness {
    fn new() -> Self {
        init_test_tracing();
        let claims = Arc::new(MemoryClaimStore::new());
        let rules = Arc::new(MemoryRuleStore::new());
        let alerts = Arc::new(MemoryAlertStore::new());
        let workflows = Arc::new(MemoryWorkflowStore::new());
        let service = DecisioningService::new(
            claims.clone(),
            rules.clone(),
            alerts.clone(),
            workflows.clone(),
            workflows.clone(),
        );
        Self {
            claims,
            rules,
            alerts,
            workflows,
            service,
            actor: ApproverId::new(),
        }
    }

    async fn submit(&self, claim: &Claim) -> DecisionOutcome {
        self.claims.create_claim(claim).await.unwrap();
        self.service
            .process_submission(claim.id, self.actor)
            .await
            .unwrap()
    }

    async fn stored(&self, claim: &Claim) -> Claim {
        self.claims.get_claim(claim.id).await.unwrap().unwrap()
    }
}

fn high_value_workflow(approvers: &[ApproverId]) -> Workflow {
    let mut builder = TestWorkflowBuilder::new("high-value sign-off");
    for (i, approver) in approvers.iter().enumerate() {
        builder = builder.approval_step(
            format!("level {}", i + 1),
            vec![*approver],
            ApprovalPolicy::Any,
        );
    }
    builder.build()
}

#[tokio::test]
async fn test_auto_approve_rule_approves_claim() {
    let harness = Harness::new();
    let rule = TestRuleBuilder::new("small claims fast path")
        .with_priority(10)
        .when(
            ConditionField::Amount,
            ConditionOperator::LessThan,
            ConditionValue::Number(dec!(500)),
        )
        .with_action(RuleAction::AutoApprove)
        .build();
    harness.rules.create_rule(&rule).await.unwrap();

    let claim = TestClaimBuilder::new().with_amount(dec!(120)).build();
    let outcome = harness.submit(&claim).await;

    assert!(matches!(
        outcome,
        DecisionOutcome::AutoApproved { ref rule_name } if rule_name == "small claims fast path"
    ));
    let stored = harness.stored(&claim).await;
    assert_eq!(stored.status, ClaimStatus::Approved);
    assert!(stored.approved_at.is_some());
}

#[tokio::test]
async fn test_auto_reject_rule_stores_reason() {
    let harness = Harness::new();
    let rule = TestRuleBuilder::new("block zero-amount claims")
        .when(
            ConditionField::Amount,
            ConditionOperator::Equals,
            ConditionValue::Number(dec!(0)),
        )
        .with_action(RuleAction::AutoReject {
            reason: "Zero-amount claims are not payable".to_string(),
        })
        .build();
    harness.rules.create_rule(&rule).await.unwrap();

    let claim = TestClaimBuilder::new().with_amount(dec!(0)).build();
    let outcome = harness.submit(&claim).await;

    assert!(matches!(outcome, DecisionOutcome::AutoRejected { .. }));
    let stored = harness.stored(&claim).await;
    assert_eq!(stored.status, ClaimStatus::Rejected);
    assert_eq!(
        stored.rejection_reason.as_deref(),
        Some("Zero-amount claims are not payable")
    );
}

#[tokio::test]
async fn test_assign_rule_moves_claim_under_review() {
    let harness = Harness::new();
    let reviewer = ApproverId::new();
    let rule = TestRuleBuilder::new("exchange desk")
        .when(
            ConditionField::ClaimType,
            ConditionOperator::Equals,
            ConditionValue::Text("exchange".to_string()),
        )
        .with_action(RuleAction::AssignTo {
            approver_id: reviewer,
        })
        .build();
    harness.rules.create_rule(&rule).await.unwrap();

    let claim = TestClaimBuilder::new()
        .with_claim_type(domain_claims::ClaimType::Exchange)
        .build();
    let outcome = harness.submit(&claim).await;

    assert!(matches!(
        outcome,
        DecisionOutcome::Assigned { approver_id, .. } if approver_id == reviewer
    ));
    let stored = harness.stored(&claim).await;
    assert_eq!(stored.status, ClaimStatus::UnderReview);
    assert_eq!(stored.assigned_to, Some(reviewer));
}

#[tokio::test]
async fn test_lower_priority_rule_wins() {
    let harness = Harness::new();
    let first = TestRuleBuilder::new("approve everything")
        .with_priority(1)
        .with_action(RuleAction::AutoApprove)
        .build();
    let second = TestRuleBuilder::new("reject everything")
        .with_priority(2)
        .with_action(RuleAction::AutoReject {
            reason: "should never fire".to_string(),
        })
        .build();
    harness.rules.create_rule(&second).await.unwrap();
    harness.rules.create_rule(&first).await.unwrap();

    let claim = TestClaimBuilder::new().build();
    let outcome = harness.submit(&claim).await;

    assert!(matches!(outcome, DecisionOutcome::AutoApproved { .. }));
}

#[tokio::test]
async fn test_require_approval_routes_through_chain_to_approval() {
    let harness = Harness::new();
    let supervisor = ApproverId::new();
    let finance = ApproverId::new();
    let workflow = high_value_workflow(&[supervisor, finance]);
    harness.workflows.create_workflow(&workflow).await.unwrap();

    let rule = TestRuleBuilder::new("high value claims")
        .when(
            ConditionField::Amount,
            ConditionOperator::GreaterThan,
            ConditionValue::Number(dec!(10000)),
        )
        .with_action(RuleAction::RequireApproval {
            workflow_id: workflow.id,
        })
        .build();
    harness.rules.create_rule(&rule).await.unwrap();

    let claim = TestClaimBuilder::new().with_amount(dec!(14500)).build();
    let outcome = harness.submit(&claim).await;

    let chain_id = match outcome {
        DecisionOutcome::ApprovalStarted { chain_id, .. } => chain_id,
        other => panic!("expected ApprovalStarted, got {other:?}"),
    };
    assert_eq!(
        harness.stored(&claim).await.status,
        ClaimStatus::PendingApproval
    );
    let chain = harness.workflows.get_chain(chain_id).await.unwrap().unwrap();
    assert_eq!(chain.steps[0].status, StepStatus::InProgress);

    // First approval advances the chain, claim stays pending
    let (_, progress) = harness
        .service
        .record_approval(chain_id, supervisor, "Supervisor", Decision::Approve, None)
        .await
        .unwrap();
    assert_eq!(progress, ChainProgress::StepAdvanced { next_step: 1 });
    assert_eq!(
        harness.stored(&claim).await.status,
        ClaimStatus::PendingApproval
    );

    // Final approval completes the chain and approves the claim
    let (chain, progress) = harness
        .service
        .record_approval(chain_id, finance, "Finance", Decision::Approve, None)
        .await
        .unwrap();
    assert_eq!(progress, ChainProgress::Completed(ChainStatus::Approved));
    assert_eq!(chain.status, ChainStatus::Approved);
    assert_eq!(harness.stored(&claim).await.status, ClaimStatus::Approved);
}

#[tokio::test]
async fn test_chain_rejection_rejects_claim_with_comment() {
    let harness = Harness::new();
    let supervisor = ApproverId::new();
    let workflow = high_value_workflow(&[supervisor]);
    harness.workflows.create_workflow(&workflow).await.unwrap();

    let rule = TestRuleBuilder::new("everything needs sign-off")
        .with_action(RuleAction::RequireApproval {
            workflow_id: workflow.id,
        })
        .build();
    harness.rules.create_rule(&rule).await.unwrap();

    let claim = TestClaimBuilder::new().build();
    let outcome = harness.submit(&claim).await;
    let chain_id = match outcome {
        DecisionOutcome::ApprovalStarted { chain_id, .. } => chain_id,
        other => panic!("expected ApprovalStarted, got {other:?}"),
    };

    let (_, progress) = harness
        .service
        .record_approval(
            chain_id,
            supervisor,
            "Supervisor",
            Decision::Reject,
            Some("Unit is out of warranty".to_string()),
        )
        .await
        .unwrap();

    assert_eq!(progress, ChainProgress::Completed(ChainStatus::Rejected));
    let stored = harness.stored(&claim).await;
    assert_eq!(stored.status, ClaimStatus::Rejected);
    assert_eq!(
        stored.rejection_reason.as_deref(),
        Some("Unit is out of warranty")
    );
}

#[tokio::test]
async fn test_unmatched_suspicious_claim_raises_alert() {
    let harness = Harness::new();
    let customer = CustomerFixtures::residential();

    // Three recent claims in the trailing window plus a near-duplicate
    // push the score past the alert threshold.
    for days in 1..=3 {
        let prior = TestClaimBuilder::new()
            .with_customer(customer.clone())
            .with_amount(dec!(850))
            .with_description("Compressor failure after power surge")
            .created_at(TemporalFixtures::days_before(days))
            .build();
        harness.claims.create_claim(&prior).await.unwrap();
    }

    let claim = TestClaimBuilder::new()
        .with_customer(customer)
        .with_amount(dec!(850))
        .with_description("Compressor failure after power surge")
        .created_at(TemporalFixtures::business_hours())
        .build();
    let outcome = harness.submit(&claim).await;

    let score = match outcome {
        DecisionOutcome::Flagged { score } => score,
        other => panic!("expected Flagged, got {other:?}"),
    };
    assert!(score.overall_score >= 40.0);

    let alerts = harness
        .alerts
        .list_alerts(AlertFilter {
            claim_id: Some(claim.id),
            ..AlertFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].alert_type, AlertType::DuplicateClaim);
    assert!(!alerts[0].reasons.is_empty());
    // Claim is flagged, not blocked
    assert_eq!(harness.stored(&claim).await.status, ClaimStatus::Submitted);
}

#[tokio::test]
async fn test_unmatched_clean_claim_is_cleared_without_alert() {
    let harness = Harness::new();
    let claim = TestClaimBuilder::new()
        .with_customer(random_customer())
        .created_at(TemporalFixtures::business_hours())
        .build();
    let outcome = harness.submit(&claim).await;

    let score = match outcome {
        DecisionOutcome::Cleared { score } => score,
        other => panic!("expected Cleared, got {other:?}"),
    };
    assert_eq!(score.overall_score, 0.0);
    assert!(harness
        .alerts
        .list_alerts(AlertFilter::default())
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_inactive_rules_fall_through_to_screening() {
    let harness = Harness::new();
    let rule = TestRuleBuilder::new("disabled approve-all")
        .inactive()
        .with_action(RuleAction::AutoApprove)
        .build();
    harness.rules.create_rule(&rule).await.unwrap();

    let claim = TestClaimBuilder::new()
        .created_at(TemporalFixtures::business_hours())
        .build();
    let outcome = harness.submit(&claim).await;

    assert!(matches!(outcome, DecisionOutcome::Cleared { .. }));
    assert_eq!(harness.stored(&claim).await.status, ClaimStatus::Submitted);
}

#[tokio::test]
async fn test_non_submitted_claim_is_not_decidable() {
    let harness = Harness::new();
    let claim = TestClaimBuilder::new()
        .with_status(ClaimStatus::Draft)
        .build();
    harness.claims.create_claim(&claim).await.unwrap();

    let result = harness
        .service
        .process_submission(claim.id, harness.actor)
        .await;
    assert!(matches!(result, Err(DecisioningError::NotDecidable(_))));
}

#[tokio::test]
async fn test_missing_claim_is_reported() {
    let harness = Harness::new();
    let result = harness
        .service
        .process_submission(core_kernel::ClaimId::new(), harness.actor)
        .await;
    assert!(matches!(result, Err(DecisioningError::ClaimNotFound(_))));
}
