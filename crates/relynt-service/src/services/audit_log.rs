//! Audit log service
//!
//! The writer records one AI action per call: identity first, then input
//! validation, then classification, then a single insert. The risk level is
//! always computed here and never taken from the caller.

use relynt_core::{
    AuditLogEntry, AuditLogId, AuditLogQuery, DomainError, Identity, IdentityProvider, Metadata,
    NewAuditLogEntry, OrganizationId, RiskLevel,
};
use serde_json::Value as JsonValue;
use tracing::{error, info, instrument, warn};
use validator::Validate;

use crate::dto::{AuditLogResponse, ListAuditLogsQuery, PaginatedResponse, RecordAuditLogRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::organization::{authenticate, parse_organization_id, OrganizationService};

/// A request that passed validation, ready to be classified
struct ValidatedRecord {
    action: String,
    input_summary: String,
    output_summary: String,
    metadata: Metadata,
}

/// Audit log service
pub struct AuditLogService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuditLogService<'a> {
    /// Create a new AuditLogService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Record an AI action in `organization_id` on behalf of the caller
    ///
    /// # Errors
    /// - `Unauthorized` if the caller has no identity (nothing else runs)
    /// - `Validation` for an empty organization id, blank or oversized
    ///   summaries, or non-object metadata (no store call happens)
    /// - `Persistence` if the store fails or rejects the insert
    #[instrument(skip(self, caller, request))]
    pub async fn record(
        &self,
        caller: &dyn IdentityProvider,
        organization_id: &str,
        request: RecordAuditLogRequest,
    ) -> ServiceResult<AuditLogEntry> {
        let identity = authenticate(caller)?;
        let organization_id = parse_organization_id(organization_id)?;
        let record = self.validate_record(request)?;

        self.persist(organization_id, identity, record).await
    }

    /// Record an AI action in the caller's first organization
    ///
    /// # Errors
    /// As [`Self::record`], plus `NoOrganization` if the caller belongs to none
    #[instrument(skip(self, caller, request))]
    pub async fn record_for_caller(
        &self,
        caller: &dyn IdentityProvider,
        request: RecordAuditLogRequest,
    ) -> ServiceResult<AuditLogEntry> {
        let identity = authenticate(caller)?;
        let record = self.validate_record(request)?;
        let organization_id = OrganizationService::new(self.ctx)
            .default_organization(&identity)
            .await?;

        self.persist(organization_id, identity, record).await
    }

    /// List an organization's entries, newest first
    #[instrument(skip(self, caller, query))]
    pub async fn list(
        &self,
        caller: &dyn IdentityProvider,
        organization_id: &str,
        query: ListAuditLogsQuery,
    ) -> ServiceResult<PaginatedResponse<AuditLogResponse>> {
        authenticate(caller)?;
        query.validate()?;
        let query = to_domain_query(query)?;

        let (_, organization_id) = OrganizationService::new(self.ctx)
            .require_member(caller, organization_id)
            .await?;

        let entries = self
            .ctx
            .audit_log_repo()
            .list(&organization_id, &query)
            .await?;

        let full_page = i64::try_from(entries.len()).is_ok_and(|n| n == query.limit);
        let next_before = entries
            .last()
            .filter(|_| full_page)
            .map(|e| e.id.to_string());
        let data = entries.into_iter().map(AuditLogResponse::from).collect();

        Ok(PaginatedResponse::new(data, next_before, query.limit))
    }

    /// Get one entry of an organization
    #[instrument(skip(self, caller))]
    pub async fn get(
        &self,
        caller: &dyn IdentityProvider,
        organization_id: &str,
        log_id: &str,
    ) -> ServiceResult<AuditLogResponse> {
        let (_, organization_id) = OrganizationService::new(self.ctx)
            .require_member(caller, organization_id)
            .await?;
        let not_found = || ServiceError::not_found("Audit log", log_id);
        let log_id = AuditLogId::parse(log_id).map_err(|_| not_found())?;

        self.ctx
            .audit_log_repo()
            .find_by_id(&organization_id, &log_id)
            .await?
            .map(AuditLogResponse::from)
            .ok_or_else(not_found)
    }

    fn validate_record(&self, request: RecordAuditLogRequest) -> ServiceResult<ValidatedRecord> {
        request.validate()?;

        let max = self.ctx.audit().max_summary_length;
        for (field, value) in [
            ("input_summary", &request.input_summary),
            ("output_summary", &request.output_summary),
        ] {
            if value.chars().count() > max {
                return Err(ServiceError::validation(format!(
                    "{field} must be at most {max} characters"
                )));
            }
        }

        let metadata = match request.metadata {
            None => Metadata::new(),
            Some(JsonValue::Object(map)) => map,
            Some(_) => return Err(ServiceError::validation("metadata must be a JSON object")),
        };

        let action = request
            .action
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| self.ctx.audit().default_action.clone());

        Ok(ValidatedRecord {
            action,
            input_summary: request.input_summary,
            output_summary: request.output_summary,
            metadata,
        })
    }

    async fn persist(
        &self,
        organization_id: OrganizationId,
        identity: Identity,
        record: ValidatedRecord,
    ) -> ServiceResult<AuditLogEntry> {
        let rules = self.ctx.risk_rules();
        let entry = NewAuditLogEntry::classified(
            organization_id,
            identity.user_id,
            record.action,
            record.input_summary,
            record.output_summary,
            record.metadata,
            rules,
        );

        let stored = self
            .ctx
            .audit_log_repo()
            .insert(&entry)
            .await
            .map_err(|e| {
                if matches!(e, DomainError::TenantIsolation { .. }) {
                    warn!(error = %e, organization_id = %entry.organization_id, "Audit log insert rejected");
                } else {
                    error!(error = %e, organization_id = %entry.organization_id, "Audit log insert failed");
                }
                ServiceError::Persistence(e)
            })?;

        info!(
            audit_log_id = %stored.id,
            organization_id = %stored.organization_id,
            actor_id = %stored.actor_id,
            risk_level = %stored.risk_level,
            rule = entry.matched_rule().unwrap_or("none"),
            "AI action recorded"
        );

        Ok(stored)
    }
}

fn to_domain_query(query: ListAuditLogsQuery) -> ServiceResult<AuditLogQuery> {
    let risk_level = match query.risk_level.as_deref().map(str::trim) {
        None | Some("" | "all") => None,
        Some(raw) => Some(
            RiskLevel::parse(raw).map_err(|e| ServiceError::validation(e.to_string()))?,
        ),
    };

    Ok(AuditLogQuery {
        risk_level,
        search: query.search.filter(|s| !s.trim().is_empty()),
        since: query.since,
        before: query.before.and_then(|b| AuditLogId::parse(&b).ok()),
        limit: query
            .limit
            .unwrap_or(AuditLogQuery::DEFAULT_LIMIT)
            .clamp(1, AuditLogQuery::MAX_LIMIT),
    })
}
