//! Server setup and initialization
//!
//! Builds the store, the risk rule table and the router from `AppConfig`.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use relynt_common::{AppConfig, AppError, JwtService, StoreBackend};
use relynt_core::{AuditLogRepository, OrganizationRepository, RiskRuleSet};
use relynt_db::{
    create_pool, run_migrations, MemoryStore, PgAuditLogRepository, PgOrganizationRepository,
    PoolConfig,
};
use relynt_service::ServiceContextBuilder;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::middleware::apply_middleware;
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
///
/// Health routes are merged after the middleware so probes bypass rate limiting.
pub fn create_app(state: AppState) -> Result<Router, AppError> {
    let config = state.config();
    let router = apply_middleware(
        create_router(),
        &config.rate_limit,
        &config.cors,
        config.app.env.is_production(),
    )?;

    Ok(router.merge(health_routes()).with_state(state))
}

/// Compile the canonical rules plus configured extra patterns
pub fn build_risk_rules(config: &AppConfig) -> Result<RiskRuleSet, AppError> {
    let rules = RiskRuleSet::canonical()?.with_patterns(
        &config.risk.extra_high_patterns,
        &config.risk.extra_medium_patterns,
    )?;
    info!(rules = rules.len(), "Risk rules compiled");
    Ok(rules)
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    let jwt_service = Arc::new(JwtService::from_config(&config.jwt));
    let risk_rules = Arc::new(build_risk_rules(&config)?);

    let builder = ServiceContextBuilder::new()
        .risk_rules(risk_rules)
        .audit(config.audit.clone())
        .jwt_service(jwt_service);

    let builder = match config.store.backend {
        StoreBackend::Memory => {
            warn!("Using the in-memory store; audit logs are lost on restart");
            let store = memory_store(&config)?;
            let audit_logs: Arc<dyn AuditLogRepository> = Arc::new(store.clone());
            let organizations: Arc<dyn OrganizationRepository> = Arc::new(store);
            builder
                .audit_log_repo(audit_logs)
                .organization_repo(organizations)
        }
        StoreBackend::Postgres => {
            let db = config.database.as_ref().ok_or_else(|| {
                AppError::Config("DATABASE_URL is required for the postgres store".to_string())
            })?;

            info!("Connecting to PostgreSQL...");
            let pool = create_pool(&PoolConfig::from(db))
                .await
                .map_err(|e| AppError::Persistence(e.to_string()))?;
            info!("PostgreSQL connection established");

            if db.run_migrations {
                info!(dir = %db.migrations_dir, "Running migrations");
                run_migrations(&pool, &db.migrations_dir)
                    .await
                    .map_err(|e| AppError::Persistence(e.to_string()))?;
            }

            builder
                .audit_log_repo(Arc::new(PgAuditLogRepository::new(pool.clone())))
                .organization_repo(Arc::new(PgOrganizationRepository::new(pool.clone())))
                .pool(pool)
        }
    };

    let service_context = builder
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, config))
}

fn memory_store(config: &AppConfig) -> Result<MemoryStore, AppError> {
    let store = MemoryStore::new();
    for entry in &config.store.seed_memberships {
        store.seed_membership(entry)?;
    }
    info!(
        memberships = config.store.seed_memberships.len(),
        "In-memory store seeded"
    );
    Ok(store)
}

/// Bind the configured address
pub async fn bind(config: &AppConfig) -> Result<TcpListener, AppError> {
    let addr = config.api.address();
    TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))
}

/// Serve the application on a bound listener
pub async fn run_server(app: Router, listener: TcpListener) -> Result<(), AppError> {
    let addr: SocketAddr = listener
        .local_addr()
        .map_err(|e| AppError::Config(format!("Failed to read local address: {e}")))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    info!("Server stopped");
    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let listener = bind(&config).await?;
    let state = create_app_state(config).await?;
    let app = create_app(state)?;
    run_server(app, listener).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use relynt_core::UserId;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    const SECRET: &str = "router-test-secret";

    async fn app() -> Router {
        let mut config = AppConfig::in_memory(SECRET);
        config.store.seed_memberships = vec![
            "org-1:user-1:admin".to_string(),
            "org-2:user-2".to_string(),
        ];
        let state = create_app_state(config).await.unwrap();
        create_app(state).unwrap()
    }

    fn token(user: &str) -> String {
        JwtService::new(SECRET, None, 0)
            .issue_access_token(&UserId::parse(user).unwrap(), 3600)
            .unwrap()
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn post(uri: &str, user: Option<&str>, body: &str) -> Request<Body> {
        let mut builder = Request::post(uri).header(header::CONTENT_TYPE, "application/json");
        if let Some(user) = user {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token(user)));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn get(uri: &str, user: &str) -> Request<Body> {
        Request::get(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", token(user)))
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = app().await;
        let (status, body) = send(&app, Request::get("/health").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");

        let (status, body) =
            send(&app, Request::get("/health/ready").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["checks"]["store"], "healthy");
    }

    #[tokio::test]
    async fn test_record_requires_identity_before_body() {
        let app = app().await;

        let (status, body) = send(&app, post("/api/v1/organizations/org-1/audit-logs", None, "{")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");

        let (status, body) =
            send(&app, post("/api/v1/organizations/org-1/audit-logs", Some("user-1"), "{")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_record_and_read_back() {
        let app = app().await;
        let payload = json!({
            "input_summary": "here is my api_key: xyz",
            "output_summary": "ok",
            "risk_level": "low",
            "metadata": {"model": "gpt-4o"}
        })
        .to_string();

        let (status, created) = send(
            &app,
            post("/api/v1/organizations/org-1/audit-logs", Some("user-1"), &payload),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["risk_level"], "high");
        assert_eq!(created["actor_id"], "user-1");
        assert_eq!(created["action"], "AI Completion");

        let id = created["id"].as_str().unwrap();
        let (status, fetched) = send(
            &app,
            get(&format!("/api/v1/organizations/org-1/audit-logs/{id}"), "user-1"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["metadata"]["model"], "gpt-4o");

        let (status, page) = send(
            &app,
            get("/api/v1/organizations/org-1/audit-logs?risk_level=high", "user-1"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["data"].as_array().unwrap().len(), 1);

        let (status, body) = send(
            &app,
            get("/api/v1/organizations/org-1/audit-logs", "user-2"),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"]["code"], "FORBIDDEN");
    }

    #[tokio::test]
    async fn test_empty_input_is_validation_error() {
        let app = app().await;
        let payload = json!({"input_summary": "", "output_summary": "hi"}).to_string();

        let (status, body) = send(
            &app,
            post("/api/v1/organizations/org-1/audit-logs", Some("user-1"), &payload),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_non_member_write_is_persistence_error() {
        let app = app().await;
        let payload = json!({"input_summary": "hello", "output_summary": "hi"}).to_string();

        let (status, body) = send(
            &app,
            post("/api/v1/organizations/org-2/audit-logs", Some("user-1"), &payload),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "PERSISTENCE_ERROR");
    }

    #[tokio::test]
    async fn test_implicit_organization() {
        let app = app().await;
        let payload = json!({"input_summary": "invoice #12", "output_summary": "sent"}).to_string();

        let (status, created) = send(&app, post("/api/v1/audit-logs", Some("user-1"), &payload)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["organization_id"], "org-1");
        assert_eq!(created["risk_level"], "medium");

        let (status, body) = send(&app, post("/api/v1/audit-logs", Some("user-9"), &payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "NO_ORGANIZATION");
    }

    #[tokio::test]
    async fn test_organizations_and_risk_summary() {
        let app = app().await;

        let (status, orgs) = send(&app, get("/api/v1/users/@me/organizations", "user-1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(orgs[0]["id"], "org-1");
        assert_eq!(orgs[0]["role"], "admin");

        let (status, summary) = send(
            &app,
            get("/api/v1/organizations/org-1/risk-summary?days=3", "user-1"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(summary["days"], 3);
        assert_eq!(summary["daily"].as_array().unwrap().len(), 3);
        assert_eq!(summary["totals"]["total"], 0);

        let (status, body) = send(
            &app,
            get("/api/v1/organizations/org-1/risk-summary?days=abc", "user-1"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[test]
    fn test_invalid_extra_pattern_fails_startup() {
        let mut config = AppConfig::in_memory(SECRET);
        config.risk.extra_high_patterns = vec!["(unclosed".to_string()];
        assert!(build_risk_rules(&config).is_err());
    }
}
