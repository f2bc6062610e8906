//! Audit log entity <-> model mapper

use std::collections::BTreeMap;

use relynt_core::{
    AuditLogEntry, AuditLogId, DailyRiskCount, DomainError, NewAuditLogEntry, OrganizationId,
    RiskCounts, RiskLevel, UserId,
};
use serde_json::Value as JsonValue;

use crate::models::{AuditLogModel, DailyRiskCountRow, RiskCountRow};

fn corrupt(field: &str, err: impl std::fmt::Display) -> DomainError {
    DomainError::CorruptRecord(format!("{field}: {err}"))
}

fn parse_risk_level(s: &str) -> Result<RiskLevel, DomainError> {
    RiskLevel::parse(s).map_err(|e| corrupt("risk_level", e))
}

/// Convert AuditLogModel to AuditLogEntry entity
impl TryFrom<AuditLogModel> for AuditLogEntry {
    type Error = DomainError;

    fn try_from(model: AuditLogModel) -> Result<Self, Self::Error> {
        let metadata = match model.metadata {
            JsonValue::Object(map) => map,
            JsonValue::Null => serde_json::Map::new(),
            other => return Err(corrupt("metadata", format!("expected object, got {other}"))),
        };

        Ok(AuditLogEntry {
            id: AuditLogId::parse(&model.id).map_err(|e| corrupt("id", e))?,
            organization_id: OrganizationId::parse(&model.organization_id)
                .map_err(|e| corrupt("organization_id", e))?,
            actor_id: UserId::parse(&model.actor_id).map_err(|e| corrupt("actor_id", e))?,
            action: model.action,
            input_summary: model.input_summary,
            output_summary: model.output_summary,
            risk_level: parse_risk_level(&model.risk_level)?,
            metadata,
            created_at: model.created_at,
        })
    }
}

/// Values bound to the audit log INSERT
pub struct AuditLogInsert<'a> {
    pub organization_id: &'a str,
    pub actor_id: &'a str,
    pub action: &'a str,
    pub input_summary: &'a str,
    pub output_summary: &'a str,
    pub risk_level: &'static str,
    pub metadata: JsonValue,
}

impl<'a> AuditLogInsert<'a> {
    pub fn new(entry: &'a NewAuditLogEntry) -> Self {
        Self {
            organization_id: entry.organization_id.as_str(),
            actor_id: entry.actor_id.as_str(),
            action: &entry.action,
            input_summary: &entry.input_summary,
            output_summary: &entry.output_summary,
            risk_level: entry.risk_level().as_str(),
            metadata: JsonValue::Object(entry.metadata.clone()),
        }
    }
}

/// Fold `GROUP BY risk_level` rows into per-tier counts
pub fn risk_counts_from_rows(rows: Vec<RiskCountRow>) -> Result<RiskCounts, DomainError> {
    let mut counts = RiskCounts::default();
    for row in rows {
        counts.add(parse_risk_level(&row.risk_level)?, row.count);
    }
    Ok(counts)
}

/// Fold `GROUP BY day, risk_level` rows into per-day counts, oldest day first
pub fn daily_counts_from_rows(
    rows: Vec<DailyRiskCountRow>,
) -> Result<Vec<DailyRiskCount>, DomainError> {
    let mut days: BTreeMap<_, RiskCounts> = BTreeMap::new();
    for row in rows {
        let level = parse_risk_level(&row.risk_level)?;
        days.entry(row.day).or_default().add(level, row.count);
    }
    Ok(days
        .into_iter()
        .map(|(day, counts)| DailyRiskCount { day, counts })
        .collect())
}
