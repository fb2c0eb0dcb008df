//! Test Data Builders
//!
//! Builder patterns for constructing test data with sensible defaults.
//! Tests specify only the relevant fields and take defaults for the rest.

use chrono::{DateTime, Utc};
use core_kernel::{ApproverId, Currency, Money};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;
use rust_decimal::Decimal;

use domain_claims::{Claim, ClaimStatus, ClaimType, Customer};
use domain_rules::{
    ClaimRule, ConditionField, ConditionOperator, ConditionValue, LogicOperator, RuleAction,
    RuleCondition,
};
use domain_workflow::{ApprovalPolicy, StepType, Workflow, WorkflowStep};

use crate::fixtures::{CustomerFixtures, MoneyFixtures};

/// A customer with randomized but well-formed details
pub fn random_customer() -> Customer {
    Customer {
        id: core_kernel::CustomerId::new(),
        name: Name().fake(),
        email: SafeEmail().fake(),
    }
}

/// Builder for test claims
pub struct TestClaimBuilder {
    customer: Customer,
    amount: Money,
    claim_type: ClaimType,
    category: String,
    description: String,
    status: ClaimStatus,
    submitted_at: Option<DateTime<Utc>>,
    created_at: Option<DateTime<Utc>>,
}

impl Default for TestClaimBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestClaimBuilder {
    pub fn new() -> Self {
        Self {
            customer: CustomerFixtures::residential(),
            amount: MoneyFixtures::usd_repair(),
            claim_type: ClaimType::Repair,
            category: "compressor".to_string(),
            description: "Compressor failure after power surge".to_string(),
            status: ClaimStatus::Submitted,
            submitted_at: None,
            created_at: None,
        }
    }

    pub fn with_customer(mut self, customer: Customer) -> Self {
        self.customer = customer;
        self
    }

    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.amount = Money::new(amount, Currency::USD);
        self
    }

    pub fn with_money(mut self, amount: Money) -> Self {
        self.amount = amount;
        self
    }

    pub fn with_claim_type(mut self, claim_type: ClaimType) -> Self {
        self.claim_type = claim_type;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_status(mut self, status: ClaimStatus) -> Self {
        self.status = status;
        self
    }

    /// Pins the submission timestamp, for time-of-day and frequency tests
    pub fn submitted_at(mut self, at: DateTime<Utc>) -> Self {
        self.submitted_at = Some(at);
        self
    }

    /// Pins the creation timestamp, for trailing-window tests
    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self
    }

    /// Builds the claim
    ///
    /// # Panics
    ///
    /// Panics if the configured amount is negative; builders are test-only.
    pub fn build(self) -> Claim {
        let mut claim = Claim::submitted(
            self.customer,
            self.amount,
            self.claim_type,
            self.category,
            self.description,
        )
        .expect("test claim amount must be non-negative");
        claim.status = self.status;
        if self.status == ClaimStatus::Draft {
            claim.submitted_at = None;
        }
        if let Some(at) = self.created_at {
            claim.created_at = at;
            claim.updated_at = at;
        }
        if let Some(at) = self.submitted_at.or(self.created_at) {
            claim.submitted_at = Some(at);
        }
        claim
    }
}

/// Builder for test rules
///
/// Conditions chain left to right: `when` starts the chain, `and`/`or`
/// stamp the connective onto the previous condition before appending.
pub struct TestRuleBuilder {
    name: String,
    priority: i32,
    conditions: Vec<RuleCondition>,
    actions: Vec<RuleAction>,
    active: bool,
}

impl TestRuleBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            priority: 100,
            conditions: Vec::new(),
            actions: vec![RuleAction::AutoApprove],
            active: true,
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn when(
        mut self,
        field: ConditionField,
        operator: ConditionOperator,
        value: ConditionValue,
    ) -> Self {
        self.conditions.push(RuleCondition {
            field,
            operator,
            value,
            logic_operator: None,
        });
        self
    }

    pub fn and(
        mut self,
        field: ConditionField,
        operator: ConditionOperator,
        value: ConditionValue,
    ) -> Self {
        if let Some(last) = self.conditions.last_mut() {
            last.logic_operator = Some(LogicOperator::And);
        }
        self.when(field, operator, value)
    }

    pub fn or(
        mut self,
        field: ConditionField,
        operator: ConditionOperator,
        value: ConditionValue,
    ) -> Self {
        if let Some(last) = self.conditions.last_mut() {
            last.logic_operator = Some(LogicOperator::Or);
        }
        self.when(field, operator, value)
    }

    pub fn with_action(mut self, action: RuleAction) -> Self {
        self.actions = vec![action];
        self
    }

    pub fn with_actions(mut self, actions: Vec<RuleAction>) -> Self {
        self.actions = actions;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    pub fn build(self) -> ClaimRule {
        let mut rule = ClaimRule::new(self.name, "", self.priority, self.conditions, self.actions);
        if !self.active {
            rule.deactivate();
        }
        rule
    }
}

/// Builder for test workflows
pub struct TestWorkflowBuilder {
    name: String,
    steps: Vec<WorkflowStep>,
}

impl TestWorkflowBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    pub fn approval_step(
        mut self,
        name: impl Into<String>,
        approvers: Vec<ApproverId>,
        policy: ApprovalPolicy,
    ) -> Self {
        self.steps.push(WorkflowStep {
            name: name.into(),
            step_type: StepType::Approval,
            approver_ids: approvers,
            policy,
            timeout_hours: Some(48),
        });
        self
    }

    pub fn notification_step(mut self, name: impl Into<String>) -> Self {
        self.steps.push(WorkflowStep {
            name: name.into(),
            step_type: StepType::Notification,
            approver_ids: Vec::new(),
            policy: ApprovalPolicy::Any,
            timeout_hours: None,
        });
        self
    }

    pub fn build(self) -> Workflow {
        Workflow::new(self.name, "", self.steps)
    }
}
