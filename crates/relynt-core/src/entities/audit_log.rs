//! Audit log entities - the append-only record of AI actions

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{Map, Value};

use crate::risk::RiskRuleSet;
use crate::value_objects::{AuditLogId, OrganizationId, RiskLevel, UserId};

/// Open key/value metadata attached to an entry (model, latency, tokens...)
pub type Metadata = Map<String, Value>;

/// Action label used when the caller does not supply one
pub const DEFAULT_ACTION: &str = "AI Completion";

/// A persisted audit log entry
///
/// Entries are immutable once written; `id` and `created_at` are assigned by
/// the store.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditLogEntry {
    pub id: AuditLogId,
    pub organization_id: OrganizationId,
    pub actor_id: UserId,
    pub action: String,
    pub input_summary: String,
    pub output_summary: String,
    pub risk_level: RiskLevel,
    pub metadata: Metadata,
    pub created_at: DateTime<Utc>,
}

impl AuditLogEntry {
    /// Check whether the entry was classified as high risk
    #[inline]
    pub fn is_high_risk(&self) -> bool {
        self.risk_level == RiskLevel::High
    }

    /// Case-insensitive search over the action label and input summary
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.action.to_lowercase().contains(&term)
            || self.input_summary.to_lowercase().contains(&term)
    }
}

/// An entry ready to be inserted into the store
///
/// The risk level can only be produced by classification, so a caller has no
/// way to hand the store a level of its own choosing.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAuditLogEntry {
    pub organization_id: OrganizationId,
    pub actor_id: UserId,
    pub action: String,
    pub input_summary: String,
    pub output_summary: String,
    pub metadata: Metadata,
    risk_level: RiskLevel,
    matched_rule: Option<String>,
}

impl NewAuditLogEntry {
    /// Build an entry, deriving its risk level from the summaries
    pub fn classified(
        organization_id: OrganizationId,
        actor_id: UserId,
        action: String,
        input_summary: String,
        output_summary: String,
        metadata: Metadata,
        rules: &RiskRuleSet,
    ) -> Self {
        let assessment = rules.assess(&input_summary, &output_summary);
        let risk_level = assessment.level;
        let matched_rule = assessment.rule.map(str::to_owned);
        Self {
            organization_id,
            actor_id,
            action,
            input_summary,
            output_summary,
            metadata,
            risk_level,
            matched_rule,
        }
    }

    /// Risk level computed at construction
    #[inline]
    pub fn risk_level(&self) -> RiskLevel {
        self.risk_level
    }

    /// Name of the rule that set the risk level, `None` when low
    #[inline]
    pub fn matched_rule(&self) -> Option<&str> {
        self.matched_rule.as_deref()
    }

    /// Materialize the persisted entry once the store has assigned id and timestamp
    pub fn into_entry(self, id: AuditLogId, created_at: DateTime<Utc>) -> AuditLogEntry {
        AuditLogEntry {
            id,
            organization_id: self.organization_id,
            actor_id: self.actor_id,
            action: self.action,
            input_summary: self.input_summary,
            output_summary: self.output_summary,
            risk_level: self.risk_level,
            metadata: self.metadata,
            created_at,
        }
    }
}

/// Listing options for an organization's audit log
///
/// Results are always ordered by `created_at` descending (newest first).
#[derive(Debug, Clone)]
pub struct AuditLogQuery {
    /// Only entries of this tier
    pub risk_level: Option<RiskLevel>,
    /// Case-insensitive substring over `action` and `input_summary`
    pub search: Option<String>,
    /// Only entries created at or after this instant
    pub since: Option<DateTime<Utc>>,
    /// Keyset cursor: only entries older than this entry
    pub before: Option<AuditLogId>,
    /// Maximum number of entries
    pub limit: i64,
}

impl AuditLogQuery {
    pub const DEFAULT_LIMIT: i64 = 100;
    pub const MAX_LIMIT: i64 = 100;

    /// Query with a clamped limit and no filters
    pub fn with_limit(limit: i64) -> Self {
        Self {
            limit: limit.clamp(1, Self::MAX_LIMIT),
            ..Self::default()
        }
    }
}

impl Default for AuditLogQuery {
    fn default() -> Self {
        Self {
            risk_level: None,
            search: None,
            since: None,
            before: None,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

/// Entry counts per risk tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RiskCounts {
    pub low: i64,
    pub medium: i64,
    pub high: i64,
}

impl RiskCounts {
    /// Add `count` entries of the given tier
    pub fn add(&mut self, level: RiskLevel, count: i64) {
        match level {
            RiskLevel::Low => self.low += count,
            RiskLevel::Medium => self.medium += count,
            RiskLevel::High => self.high += count,
        }
    }

    /// Count for one tier
    pub fn get(&self, level: RiskLevel) -> i64 {
        match level {
            RiskLevel::Low => self.low,
            RiskLevel::Medium => self.medium,
            RiskLevel::High => self.high,
        }
    }

    /// Total across all tiers
    #[inline]
    pub fn total(&self) -> i64 {
        self.low + self.medium + self.high
    }
}

/// Risk counts for a single UTC day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyRiskCount {
    pub day: NaiveDate,
    pub counts: RiskCounts,
}
