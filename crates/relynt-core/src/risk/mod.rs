//! Deterministic risk classification
//!
//! Maps the text of an AI interaction (input + output) to a [`RiskLevel`]
//! using an ordered table of pattern rules:
//!
//! 1. the two payloads are joined with a space and lowercased,
//! 2. high-tier rules are scanned in order, first match returns `High`,
//! 3. medium-tier rules are scanned in order, first match returns `Medium`,
//! 4. otherwise the interaction is `Low`.
//!
//! Keyword rules match as substrings ("MyPasswordIsX" is high risk). The
//! classifier is total over all strings and never fails.

mod rules;

use std::sync::LazyLock;

pub use rules::{
    RiskAssessment, RiskRule, RiskRuleSet, CANONICAL_HIGH_RULES, CANONICAL_MEDIUM_RULES,
};

use crate::value_objects::RiskLevel;

static CANONICAL_RULES: LazyLock<RiskRuleSet> =
    LazyLock::new(|| RiskRuleSet::canonical().expect("Invalid canonical risk pattern"));

/// The canonical rule set, compiled once per process
pub fn canonical_rules() -> &'static RiskRuleSet {
    &CANONICAL_RULES
}

/// Classify an interaction with the canonical rule set
pub fn classify(input: &str, output: &str) -> RiskLevel {
    CANONICAL_RULES.classify(input, output)
}
