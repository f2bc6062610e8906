//! Audit log database models

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value as JsonValue;
use sqlx::FromRow;

/// Database model for ai_audit_logs table
#[derive(Debug, Clone, FromRow)]
pub struct AuditLogModel {
    pub id: String,
    pub organization_id: String,
    pub actor_id: String,
    pub action: String,
    pub input_summary: String,
    pub output_summary: String,
    /// 'low' | 'medium' | 'high', enforced by a CHECK constraint
    pub risk_level: String,
    /// JSONB object
    pub metadata: JsonValue,
    pub created_at: DateTime<Utc>,
}

/// Row of a `GROUP BY risk_level` count
#[derive(Debug, Clone, FromRow)]
pub struct RiskCountRow {
    pub risk_level: String,
    pub count: i64,
}

/// Row of a `GROUP BY day, risk_level` count
#[derive(Debug, Clone, FromRow)]
pub struct DailyRiskCountRow {
    pub day: NaiveDate,
    pub risk_level: String,
    pub count: i64,
}
