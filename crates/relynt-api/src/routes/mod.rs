//! Route definitions
//!
//! All API routes organized by domain and mounted under /api/v1.

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{audit_logs, health, organizations, risk};
use crate::state::AppState;

/// Create the main API router (health routes are mounted separately)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes())
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// API v1 routes
fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(audit_log_routes())
        .merge(organization_routes())
        .merge(user_routes())
}

/// Audit log writer with the organization taken from the caller
fn audit_log_routes() -> Router<AppState> {
    Router::new().route(
        "/audit-logs",
        post(audit_logs::record_audit_log_for_caller),
    )
}

/// Organization-scoped routes
fn organization_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/organizations/:org_id/audit-logs",
            post(audit_logs::record_audit_log).get(audit_logs::list_audit_logs),
        )
        .route(
            "/organizations/:org_id/audit-logs/:log_id",
            get(audit_logs::get_audit_log),
        )
        .route(
            "/organizations/:org_id/risk-summary",
            get(risk::get_risk_summary),
        )
}

/// Current user routes
fn user_routes() -> Router<AppState> {
    Router::new().route(
        "/users/@me/organizations",
        get(organizations::get_current_user_organizations),
    )
}
