//! Organization handlers

use axum::{extract::State, Json};
use relynt_service::dto::OrganizationResponse;
use relynt_service::OrganizationService;

use crate::extractors::Session;
use crate::response::ApiResult;
use crate::state::AppState;

/// Organizations the caller belongs to
///
/// GET /users/@me/organizations
pub async fn get_current_user_organizations(
    State(state): State<AppState>,
    Session(session): Session,
) -> ApiResult<Json<Vec<OrganizationResponse>>> {
    let service = OrganizationService::new(state.service_context());
    let organizations = service.list_for_caller(&session).await?;
    Ok(Json(organizations))
}
