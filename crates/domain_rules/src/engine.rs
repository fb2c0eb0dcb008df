//! Rule engine
//!
//! Orders active rules by priority and returns the first match. A store
//! failure while fetching rules is logged and degraded to "no rules": rule
//! evaluation must never error into the claim-submission flow.

use std::sync::Arc;
use tracing::{debug, warn};

use core_kernel::Timezone;
use domain_claims::Claim;

use crate::condition::evaluate_conditions;
use crate::ports::RulesPort;
use crate::rule::{ClaimRule, RuleAction};

/// Result of evaluating a claim against the rule set
#[derive(Debug, Clone)]
pub struct RuleOutcome {
    pub matched: bool,
    pub rule: Option<ClaimRule>,
    pub action: Option<RuleAction>,
    pub explanation: String,
}

impl RuleOutcome {
    fn unmatched(explanation: impl Into<String>) -> Self {
        Self {
            matched: false,
            rule: None,
            action: None,
            explanation: explanation.into(),
        }
    }

    fn matched(rule: ClaimRule) -> Self {
        let explanation = format!("Matched rule '{}' (priority {})", rule.name, rule.priority);
        let action = rule.first_action().cloned();
        Self {
            matched: true,
            rule: Some(rule),
            action,
            explanation,
        }
    }
}

/// Priority-ordered first-match rule engine
pub struct RuleEngine {
    rules: Arc<dyn RulesPort>,
    timezone: Timezone,
}

impl RuleEngine {
    pub fn new(rules: Arc<dyn RulesPort>) -> Self {
        Self {
            rules,
            timezone: Timezone::default(),
        }
    }

    /// Sets the local timezone used by time-of-day condition fields
    pub fn with_timezone(mut self, timezone: Timezone) -> Self {
        self.timezone = timezone;
        self
    }

    /// Evaluates a claim against all active rules
    ///
    /// Rules are evaluated ascending by priority; iteration stops at the
    /// first rule whose conditions fold true. Only that rule's first action
    /// is exposed.
    pub async fn evaluate(&self, claim: &Claim) -> RuleOutcome {
        let mut rules = match self.rules.list_rules().await {
            Ok(rules) => rules,
            Err(error) => {
                warn!(
                    claim_id = %claim.id,
                    %error,
                    "rule fetch failed; evaluating against empty rule set"
                );
                Vec::new()
            }
        };

        rules.retain(|rule| rule.is_active());
        rules.sort_by_key(|rule| rule.priority);

        for rule in rules {
            if evaluate_conditions(claim, &rule.conditions, self.timezone) {
                debug!(claim_id = %claim.id, rule = %rule.name, "rule matched");
                return RuleOutcome::matched(rule);
            }
        }

        RuleOutcome::unmatched("No active rule matched")
    }
}
