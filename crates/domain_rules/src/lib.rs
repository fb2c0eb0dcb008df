//! Rule Engine Domain
//!
//! Prioritized condition/action rules for auto-decisioning submitted claims.
//! Conditions are evaluated against typed claim fields with a strictly
//! left-to-right AND/OR fold; the first active rule whose conditions hold
//! supplies the decision.

pub mod condition;
pub mod rule;
pub mod engine;
pub mod ports;

pub use condition::{
    ConditionField, ConditionOperator, ConditionValue, LogicOperator, RuleCondition,
    evaluate_condition, evaluate_conditions,
};
pub use rule::{ClaimRule, RuleAction, RuleStatus};
pub use engine::{RuleEngine, RuleOutcome};
pub use ports::RulesPort;
