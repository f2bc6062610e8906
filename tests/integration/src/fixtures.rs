//! Test fixtures and data generators
//!
//! Request and response bodies used by the integration tests.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Record request
#[derive(Debug, Clone, Default, Serialize)]
pub struct RecordRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    pub input_summary: String,
    pub output_summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl RecordRequest {
    pub fn new(input: &str, output: &str) -> Self {
        Self {
            input_summary: input.to_string(),
            output_summary: output.to_string(),
            ..Default::default()
        }
    }

    /// A low-risk request with a distinct prompt
    pub fn unique() -> Self {
        let suffix = unique_suffix();
        Self::new(&format!("Summarize meeting notes #{suffix}"), "Done")
    }

    pub fn with_action(mut self, action: &str) -> Self {
        self.action = Some(action.to_string());
        self
    }
}

/// Audit log entry
#[derive(Debug, Deserialize)]
pub struct AuditLogResponse {
    pub id: String,
    pub organization_id: String,
    pub actor_id: String,
    pub action: String,
    pub input_summary: String,
    pub output_summary: String,
    pub risk_level: String,
    pub metadata: BTreeMap<String, Value>,
    pub created_at: String,
}

/// Keyset page of entries
#[derive(Debug, Deserialize)]
pub struct AuditLogPage {
    pub data: Vec<AuditLogResponse>,
    pub pagination: Pagination,
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    pub next_before: Option<String>,
    pub has_more: bool,
    pub limit: i64,
}

/// Per-tier counts
#[derive(Debug, Deserialize)]
pub struct RiskCounts {
    pub low: i64,
    pub medium: i64,
    pub high: i64,
    pub total: i64,
}

#[derive(Debug, Deserialize)]
pub struct DailyRisk {
    pub date: String,
    pub low: i64,
    pub medium: i64,
    pub high: i64,
}

/// Risk overview
#[derive(Debug, Deserialize)]
pub struct RiskSummary {
    pub organization_id: String,
    pub totals: RiskCounts,
    pub days: u32,
    pub daily: Vec<DailyRisk>,
}

/// Organization the caller belongs to
#[derive(Debug, Deserialize)]
pub struct OrganizationResponse {
    pub id: String,
    pub name: String,
    pub subscription_tier: String,
    pub role: String,
}
