//! Claim similarity metrics
//!
//! Duplicate detection combines four equally weighted comparisons: claim
//! type, category, amount proximity, and description text similarity.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashSet;

use domain_claims::Claim;

/// Relative amount difference treated as "the same amount"
const AMOUNT_PROXIMITY: Decimal = dec!(0.1);
/// Jaccard score above which two descriptions count as matching text
const TEXT_MATCH_THRESHOLD: f64 = 0.7;
/// Each of the four components contributes up to this many points
const COMPONENT_WEIGHT: f64 = 25.0;

/// Jaccard index over lowercase whitespace-tokenized word sets, 0.0-1.0
///
/// Two empty texts share no tokens and score 0, not NaN.
pub fn text_similarity(a: &str, b: &str) -> f64 {
    let tokens_a: HashSet<String> = tokenize(a);
    let tokens_b: HashSet<String> = tokenize(b);

    let union = tokens_a.union(&tokens_b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = tokens_a.intersection(&tokens_b).count();

    intersection as f64 / union as f64
}

/// Similarity between two claims, 0-100
///
/// Four binary components at 25 points each: exact type match, exact
/// category match, amounts within 10% relative difference, and description
/// Jaccard above 70%.
pub fn claim_similarity(a: &Claim, b: &Claim) -> f64 {
    let mut score = 0.0;

    if a.claim_type == b.claim_type {
        score += COMPONENT_WEIGHT;
    }
    if a.category == b.category {
        score += COMPONENT_WEIGHT;
    }
    if amounts_close(a.amount.amount(), b.amount.amount()) {
        score += COMPONENT_WEIGHT;
    }
    if text_similarity(&a.description, &b.description) > TEXT_MATCH_THRESHOLD {
        score += COMPONENT_WEIGHT;
    }

    score
}

fn tokenize(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

fn amounts_close(a: Decimal, b: Decimal) -> bool {
    let larger = a.max(b);
    if larger.is_zero() {
        // Both zero: identical
        return true;
    }
    let diff = (a - b).abs();
    (diff / larger)
        .to_f64()
        .map_or(false, |rel| rel <= AMOUNT_PROXIMITY.to_f64().unwrap_or(0.1))
}
