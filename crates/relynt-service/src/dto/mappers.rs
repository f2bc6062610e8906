//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use relynt_core::{AuditLogEntry, DailyRiskCount, Membership, RiskCounts};
use serde_json::Value as JsonValue;

use super::responses::{
    AuditLogResponse, DailyRiskResponse, OrganizationResponse, RiskCountsResponse,
};

// ============================================================================
// Audit Log Mappers
// ============================================================================

impl From<&AuditLogEntry> for AuditLogResponse {
    fn from(entry: &AuditLogEntry) -> Self {
        Self {
            id: entry.id.to_string(),
            organization_id: entry.organization_id.to_string(),
            actor_id: entry.actor_id.to_string(),
            action: entry.action.clone(),
            input_summary: entry.input_summary.clone(),
            output_summary: entry.output_summary.clone(),
            risk_level: entry.risk_level,
            metadata: JsonValue::Object(entry.metadata.clone()),
            created_at: entry.created_at,
        }
    }
}

impl From<AuditLogEntry> for AuditLogResponse {
    fn from(entry: AuditLogEntry) -> Self {
        Self {
            id: entry.id.into_inner(),
            organization_id: entry.organization_id.into_inner(),
            actor_id: entry.actor_id.into_inner(),
            action: entry.action,
            input_summary: entry.input_summary,
            output_summary: entry.output_summary,
            risk_level: entry.risk_level,
            metadata: JsonValue::Object(entry.metadata),
            created_at: entry.created_at,
        }
    }
}

// ============================================================================
// Risk Mappers
// ============================================================================

impl From<RiskCounts> for RiskCountsResponse {
    fn from(counts: RiskCounts) -> Self {
        Self {
            low: counts.low,
            medium: counts.medium,
            high: counts.high,
            total: counts.total(),
        }
    }
}

impl From<DailyRiskCount> for DailyRiskResponse {
    fn from(day: DailyRiskCount) -> Self {
        Self {
            date: day.day,
            low: day.counts.low,
            medium: day.counts.medium,
            high: day.counts.high,
        }
    }
}

// ============================================================================
// Organization Mappers
// ============================================================================

impl From<&Membership> for OrganizationResponse {
    fn from(membership: &Membership) -> Self {
        Self {
            id: membership.organization.id.to_string(),
            name: membership.organization.name.clone(),
            subscription_tier: membership.organization.subscription_tier,
            role: membership.role,
            joined_at: membership.joined_at,
            created_at: membership.organization.created_at,
        }
    }
}
