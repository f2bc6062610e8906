//! Audit log handlers
//!
//! Endpoints for recording AI actions and reading an organization's log.

use axum::{
    extract::{Path, State},
    Json,
};
use relynt_service::dto::{
    AuditLogResponse, ListAuditLogsQuery, PaginatedResponse, RecordAuditLogRequest,
};
use relynt_service::services::authenticate;
use relynt_service::AuditLogService;

use crate::extractors::{DeferredJson, QueryParams, Session};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// Record an AI action
///
/// POST /organizations/{org_id}/audit-logs
pub async fn record_audit_log(
    State(state): State<AppState>,
    Session(session): Session,
    Path(org_id): Path<String>,
    body: DeferredJson<RecordAuditLogRequest>,
) -> ApiResult<Created<Json<AuditLogResponse>>> {
    authenticate(&session)?;
    let request = body.into_inner()?;

    let service = AuditLogService::new(state.service_context());
    let entry = service.record(&session, &org_id, request).await?;
    Ok(Created(Json(AuditLogResponse::from(entry))))
}

/// Record an AI action in the caller's first organization
///
/// POST /audit-logs
pub async fn record_audit_log_for_caller(
    State(state): State<AppState>,
    Session(session): Session,
    body: DeferredJson<RecordAuditLogRequest>,
) -> ApiResult<Created<Json<AuditLogResponse>>> {
    authenticate(&session)?;
    let request = body.into_inner()?;

    let service = AuditLogService::new(state.service_context());
    let entry = service.record_for_caller(&session, request).await?;
    Ok(Created(Json(AuditLogResponse::from(entry))))
}

/// List an organization's audit log, newest first
///
/// GET /organizations/{org_id}/audit-logs
pub async fn list_audit_logs(
    State(state): State<AppState>,
    Session(session): Session,
    Path(org_id): Path<String>,
    QueryParams(query): QueryParams<ListAuditLogsQuery>,
) -> ApiResult<Json<PaginatedResponse<AuditLogResponse>>> {
    let service = AuditLogService::new(state.service_context());
    let page = service.list(&session, &org_id, query).await?;
    Ok(Json(page))
}

/// Get one audit log entry
///
/// GET /organizations/{org_id}/audit-logs/{log_id}
pub async fn get_audit_log(
    State(state): State<AppState>,
    Session(session): Session,
    Path((org_id, log_id)): Path<(String, String)>,
) -> ApiResult<Json<AuditLogResponse>> {
    let service = AuditLogService::new(state.service_context());
    let entry = service.get(&session, &org_id, &log_id).await?;
    Ok(Json(entry))
}
