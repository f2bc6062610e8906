//! Risk overview handler

use axum::{
    extract::{Path, State},
    Json,
};
use relynt_service::dto::{RiskSummaryQuery, RiskSummaryResponse};
use relynt_service::RiskService;

use crate::extractors::{QueryParams, Session};
use crate::response::ApiResult;
use crate::state::AppState;

/// Tier totals and a daily breakdown for an organization
///
/// GET /organizations/{org_id}/risk-summary?days=N
pub async fn get_risk_summary(
    State(state): State<AppState>,
    Session(session): Session,
    Path(org_id): Path<String>,
    QueryParams(query): QueryParams<RiskSummaryQuery>,
) -> ApiResult<Json<RiskSummaryResponse>> {
    let service = RiskService::new(state.service_context());
    let summary = service.summary(&session, &org_id, query).await?;
    Ok(Json(summary))
}
