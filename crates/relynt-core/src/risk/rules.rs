//! Risk rule table
//!
//! A rule is a `{name, pattern, tier}` entry. Rules are data: the canonical
//! table below can be extended with configured patterns without touching the
//! evaluation loop in [`RiskRuleSet::assess`].

use regex::{Regex, RegexBuilder};

use crate::error::DomainError;
use crate::value_objects::RiskLevel;

/// Canonical high-risk rules, in evaluation order
pub const CANONICAL_HIGH_RULES: &[(&str, &str)] = &[
    // ASCII word boundaries: digits packed against non-ASCII letters still match
    ("ssn", r"(?-u:\b)[0-9]{3}-[0-9]{2}-[0-9]{4}(?-u:\b)"),
    ("card_number", r"(?-u:\b)[0-9]{16}(?-u:\b)"),
    ("password", "password"),
    ("api_key", "api[ _-]?key"),
    ("secret", "secret"),
    ("private_key", "private[ _-]?key"),
];

/// Canonical medium-risk rules, in evaluation order
pub const CANONICAL_MEDIUM_RULES: &[(&str, &str)] = &[
    ("currency_amount", r"\$[0-9]+"),
    ("payment", "payment"),
    ("transaction", "transaction"),
    ("invoice", "invoice"),
    ("billing", "billing"),
];

/// A single pattern rule mapping a match to a risk tier
#[derive(Debug, Clone)]
pub struct RiskRule {
    name: String,
    tier: RiskLevel,
    pattern: Regex,
}

impl RiskRule {
    /// Compile a rule. Patterns are always matched case-insensitively.
    ///
    /// # Errors
    /// Returns `DomainError::InvalidRiskRule` if the pattern does not compile
    /// or the tier is `Low` (the absence of a match already means low).
    pub fn new(name: impl Into<String>, pattern: &str, tier: RiskLevel) -> Result<Self, DomainError> {
        let name = name.into();

        if tier == RiskLevel::Low {
            return Err(DomainError::InvalidRiskRule {
                name,
                reason: "rules must map to the medium or high tier".to_string(),
            });
        }

        let pattern = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| DomainError::InvalidRiskRule {
                name: name.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self { name, tier, pattern })
    }

    /// Rule name (used in logs)
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tier assigned when this rule matches
    #[inline]
    pub fn tier(&self) -> RiskLevel {
        self.tier
    }

    /// Source pattern
    #[inline]
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Check the rule against a normalized corpus
    #[inline]
    pub fn matches(&self, corpus: &str) -> bool {
        self.pattern.is_match(corpus)
    }
}

/// Result of classifying one interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskAssessment<'a> {
    /// Assigned tier
    pub level: RiskLevel,
    /// Name of the rule that fired, `None` for low risk
    pub rule: Option<&'a str>,
}

/// Ordered rule table, partitioned by tier
///
/// Every high rule is evaluated before any medium rule, whatever order the
/// rules were supplied in. Within a tier, supply order is kept.
#[derive(Debug, Clone)]
pub struct RiskRuleSet {
    high: Vec<RiskRule>,
    medium: Vec<RiskRule>,
}

impl RiskRuleSet {
    /// Build a rule set from compiled rules
    pub fn from_rules(rules: impl IntoIterator<Item = RiskRule>) -> Self {
        let mut set = Self {
            high: Vec::new(),
            medium: Vec::new(),
        };
        set.push_all(rules);
        set
    }

    /// Build the canonical rule set
    ///
    /// # Errors
    /// Only fails if a canonical pattern is malformed.
    pub fn canonical() -> Result<Self, DomainError> {
        let high = CANONICAL_HIGH_RULES
            .iter()
            .map(|(name, pattern)| RiskRule::new(*name, pattern, RiskLevel::High));
        let medium = CANONICAL_MEDIUM_RULES
            .iter()
            .map(|(name, pattern)| RiskRule::new(*name, pattern, RiskLevel::Medium));

        let rules = high.chain(medium).collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_rules(rules))
    }

    /// Append configured patterns after the existing rules of each tier
    ///
    /// # Errors
    /// Returns `DomainError::InvalidRiskRule` for the first pattern that fails to compile.
    pub fn with_patterns(
        mut self,
        high_patterns: &[String],
        medium_patterns: &[String],
    ) -> Result<Self, DomainError> {
        let mut rules = Vec::with_capacity(high_patterns.len() + medium_patterns.len());

        for (i, pattern) in high_patterns.iter().enumerate() {
            rules.push(RiskRule::new(format!("custom_high_{}", i + 1), pattern, RiskLevel::High)?);
        }
        for (i, pattern) in medium_patterns.iter().enumerate() {
            rules.push(RiskRule::new(
                format!("custom_medium_{}", i + 1),
                pattern,
                RiskLevel::Medium,
            )?);
        }

        self.push_all(rules);
        Ok(self)
    }

    fn push_all(&mut self, rules: impl IntoIterator<Item = RiskRule>) {
        for rule in rules {
            match rule.tier {
                RiskLevel::High => self.high.push(rule),
                RiskLevel::Medium => self.medium.push(rule),
                // Rejected by RiskRule::new
                RiskLevel::Low => {}
            }
        }
    }

    /// Classify an interaction and report the rule that fired
    pub fn assess(&self, input: &str, output: &str) -> RiskAssessment<'_> {
        let corpus = normalize(input, output);

        let fired = self
            .high
            .iter()
            .find(|rule| rule.matches(&corpus))
            .or_else(|| self.medium.iter().find(|rule| rule.matches(&corpus)));

        match fired {
            Some(rule) => RiskAssessment {
                level: rule.tier,
                rule: Some(rule.name()),
            },
            None => RiskAssessment {
                level: RiskLevel::Low,
                rule: None,
            },
        }
    }

    /// Classify an interaction
    #[inline]
    pub fn classify(&self, input: &str, output: &str) -> RiskLevel {
        self.assess(input, output).level
    }

    /// Rules in evaluation order
    pub fn iter(&self) -> impl Iterator<Item = &RiskRule> {
        self.high.iter().chain(self.medium.iter())
    }

    /// Number of rules
    pub fn len(&self) -> usize {
        self.high.len() + self.medium.len()
    }

    /// Whether the table is empty (everything classifies as low)
    pub fn is_empty(&self) -> bool {
        self.high.is_empty() && self.medium.is_empty()
    }
}

/// Join both payloads with a space and case-fold them
fn normalize(input: &str, output: &str) -> String {
    let mut corpus = String::with_capacity(input.len() + output.len() + 1);
    corpus.push_str(input);
    corpus.push(' ');
    corpus.push_str(output);
    corpus.to_lowercase()
}
