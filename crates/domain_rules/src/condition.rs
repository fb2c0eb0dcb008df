//! Condition evaluation
//!
//! A condition compares one typed claim field against a configured value.
//! Malformed combinations (non-numeric operands under a numeric operator,
//! a scalar value under `in_range`, an operator the store handed us that we
//! do not know) always evaluate to false; condition evaluation never errors.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use core_kernel::{Timezone, BUSINESS_HOURS};
use domain_claims::Claim;

/// Default tier until a customer-profile source is wired in
const DEFAULT_CUSTOMER_TIER: &str = "standard";
/// Default prior-claim count until a customer-profile source is wired in
const DEFAULT_CLAIM_COUNT: Decimal = Decimal::ZERO;

/// Claim fields addressable by rule conditions
///
/// `CustomerTier` and `ClaimCount` resolve to fixed defaults for now; the
/// closed enum keeps that gap visible instead of hiding it behind a string
/// lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConditionField {
    Amount,
    #[serde(rename = "type")]
    ClaimType,
    Category,
    CustomerTier,
    ClaimCount,
    SubmissionTime,
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionOperator {
    Equals,
    NotEquals,
    GreaterThan,
    LessThan,
    GreaterOrEqual,
    LessOrEqual,
    Contains,
    InRange,
    /// Operators from newer rule documents we do not recognize; never match
    #[serde(other)]
    Unknown,
}

/// How a condition joins with the NEXT condition in the list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogicOperator {
    And,
    Or,
}

/// The configured comparison value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionValue {
    Number(Decimal),
    Flag(bool),
    Text(String),
    /// Inclusive [min, max] bounds for `in_range`
    Range(Decimal, Decimal),
}

/// One predicate of a rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleCondition {
    pub field: ConditionField,
    pub operator: ConditionOperator,
    pub value: ConditionValue,
    /// Joins this condition's running result to the next condition;
    /// defaults to AND when absent
    #[serde(default)]
    pub logic_operator: Option<LogicOperator>,
}

/// A claim field value after resolution
#[derive(Debug, Clone, PartialEq)]
enum FieldValue {
    Number(Decimal),
    Text(String),
    Flag(bool),
}

fn resolve_field(claim: &Claim, field: ConditionField, tz: Timezone) -> FieldValue {
    match field {
        ConditionField::Amount => FieldValue::Number(claim.amount.amount()),
        ConditionField::ClaimType => FieldValue::Text(claim.claim_type.as_str().to_string()),
        ConditionField::Category => FieldValue::Text(claim.category.clone()),
        ConditionField::CustomerTier => FieldValue::Text(DEFAULT_CUSTOMER_TIER.to_string()),
        ConditionField::ClaimCount => FieldValue::Number(DEFAULT_CLAIM_COUNT),
        ConditionField::SubmissionTime => FieldValue::Flag(
            claim
                .submitted_at
                .map_or(false, |ts| BUSINESS_HOURS.contains(tz, ts)),
        ),
    }
}

/// Evaluates a single condition against a claim
pub fn evaluate_condition(claim: &Claim, condition: &RuleCondition, tz: Timezone) -> bool {
    let field = resolve_field(claim, condition.field, tz);

    match condition.operator {
        ConditionOperator::Equals => exact_match(&field, &condition.value),
        ConditionOperator::NotEquals => !exact_match(&field, &condition.value),
        ConditionOperator::GreaterThan => compare_numeric(&field, &condition.value, |a, b| a > b),
        ConditionOperator::LessThan => compare_numeric(&field, &condition.value, |a, b| a < b),
        ConditionOperator::GreaterOrEqual => {
            compare_numeric(&field, &condition.value, |a, b| a >= b)
        }
        ConditionOperator::LessOrEqual => compare_numeric(&field, &condition.value, |a, b| a <= b),
        ConditionOperator::Contains => contains_match(&field, &condition.value),
        ConditionOperator::InRange => range_match(&field, &condition.value),
        ConditionOperator::Unknown => false,
    }
}

/// Left-to-right AND/OR fold over a rule's condition list
///
/// The accumulator starts true under AND, so an empty list matches
/// vacuously; that is how catch-all rules are written. The logic operator
/// declared on condition `i` governs how condition `i+1` combines with the
/// running result. There is no grouping or precedence.
pub fn evaluate_conditions(claim: &Claim, conditions: &[RuleCondition], tz: Timezone) -> bool {
    let mut result = true;
    let mut active = LogicOperator::And;

    for condition in conditions {
        let matched = evaluate_condition(claim, condition, tz);
        result = match active {
            LogicOperator::And => result && matched,
            LogicOperator::Or => result || matched,
        };
        active = condition.logic_operator.unwrap_or(LogicOperator::And);
    }

    result
}

fn field_as_number(field: &FieldValue) -> Option<Decimal> {
    match field {
        FieldValue::Number(n) => Some(*n),
        FieldValue::Text(s) => Decimal::from_str(s.trim()).ok(),
        FieldValue::Flag(_) => None,
    }
}

fn value_as_number(value: &ConditionValue) -> Option<Decimal> {
    match value {
        ConditionValue::Number(n) => Some(*n),
        ConditionValue::Text(s) => Decimal::from_str(s.trim()).ok(),
        ConditionValue::Flag(_) | ConditionValue::Range(_, _) => None,
    }
}

fn exact_match(field: &FieldValue, value: &ConditionValue) -> bool {
    match (field, value) {
        (FieldValue::Number(a), _) => value_as_number(value) == Some(*a),
        (FieldValue::Text(a), ConditionValue::Text(b)) => a == b,
        (FieldValue::Text(a), ConditionValue::Number(_)) => {
            field_as_number(&FieldValue::Text(a.clone())) == value_as_number(value)
        }
        (FieldValue::Flag(a), ConditionValue::Flag(b)) => a == b,
        (FieldValue::Flag(a), ConditionValue::Text(b)) => {
            b.trim().parse::<bool>().map_or(false, |parsed| *a == parsed)
        }
        _ => false,
    }
}

fn compare_numeric(
    field: &FieldValue,
    value: &ConditionValue,
    cmp: impl Fn(Decimal, Decimal) -> bool,
) -> bool {
    match (field_as_number(field), value_as_number(value)) {
        (Some(a), Some(b)) => cmp(a, b),
        _ => false,
    }
}

fn contains_match(field: &FieldValue, value: &ConditionValue) -> bool {
    let haystack = match field {
        FieldValue::Number(n) => n.to_string(),
        FieldValue::Text(s) => s.clone(),
        FieldValue::Flag(b) => b.to_string(),
    };
    let needle = match value {
        ConditionValue::Number(n) => n.to_string(),
        ConditionValue::Text(s) => s.clone(),
        ConditionValue::Flag(b) => b.to_string(),
        ConditionValue::Range(_, _) => return false,
    };
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn range_match(field: &FieldValue, value: &ConditionValue) -> bool {
    let (min, max) = match value {
        ConditionValue::Range(min, max) => (*min, *max),
        _ => return false,
    };
    match field_as_number(field) {
        // Inclusive on both bounds
        Some(n) => n >= min && n <= max,
        None => false,
    }
}
