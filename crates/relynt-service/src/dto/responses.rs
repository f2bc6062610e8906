//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.

use chrono::{DateTime, NaiveDate, Utc};
use relynt_core::{MemberRole, RiskLevel, SubscriptionTier};
use serde::Serialize;
use serde_json::Value as JsonValue;

// ============================================================================
// Common Response Types
// ============================================================================

/// Paginated response with keyset pagination
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, next_before: Option<String>, limit: i64) -> Self {
        Self {
            data,
            pagination: PaginationMeta {
                has_more: next_before.is_some(),
                next_before,
                limit,
            },
        }
    }
}

/// Pagination metadata
#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    /// Pass as `before` to fetch the next (older) page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_before: Option<String>,
    /// Whether the page was full, so older entries may exist
    pub has_more: bool,
    /// Page size limit used
    pub limit: i64,
}

// ============================================================================
// Audit Log Responses
// ============================================================================

/// A persisted audit log entry
#[derive(Debug, Clone, Serialize)]
pub struct AuditLogResponse {
    pub id: String,
    pub organization_id: String,
    pub actor_id: String,
    pub action: String,
    pub input_summary: String,
    pub output_summary: String,
    pub risk_level: RiskLevel,
    pub metadata: JsonValue,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Risk Responses
// ============================================================================

/// Entry counts per tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RiskCountsResponse {
    pub low: i64,
    pub medium: i64,
    pub high: i64,
    pub total: i64,
}

/// Tier counts for one UTC day
#[derive(Debug, Clone, Serialize)]
pub struct DailyRiskResponse {
    pub date: NaiveDate,
    pub low: i64,
    pub medium: i64,
    pub high: i64,
}

/// Risk overview of an organization
#[derive(Debug, Clone, Serialize)]
pub struct RiskSummaryResponse {
    pub organization_id: String,
    /// All-time counts
    pub totals: RiskCountsResponse,
    /// Window length in days
    pub days: u32,
    /// One element per day of the window, oldest first, zero-filled
    pub daily: Vec<DailyRiskResponse>,
}

// ============================================================================
// Organization Responses
// ============================================================================

/// An organization the caller belongs to
#[derive(Debug, Clone, Serialize)]
pub struct OrganizationResponse {
    pub id: String,
    pub name: String,
    pub subscription_tier: SubscriptionTier,
    pub role: MemberRole,
    pub joined_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Health Check Responses
// ============================================================================

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status for each dependency
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub store: String,
}

impl ReadinessResponse {
    pub fn ready(store_healthy: bool) -> Self {
        Self {
            status: if store_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                store: if store_healthy { "healthy" } else { "unhealthy" }.to_string(),
            },
        }
    }
}
