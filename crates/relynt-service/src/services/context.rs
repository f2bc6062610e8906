//! Service context - dependency container for services
//!
//! Holds the repositories, the risk rule table and writer settings.

use std::sync::Arc;

use relynt_common::auth::JwtService;
use relynt_common::AuditConfig;
use relynt_core::{AuditLogRepository, OrganizationRepository, RiskRuleSet};
use relynt_db::PgPool;

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
///
/// The database pool is optional: the in-memory backend runs without one.
#[derive(Clone)]
pub struct ServiceContext {
    pool: Option<PgPool>,

    // Repositories
    audit_log_repo: Arc<dyn AuditLogRepository>,
    organization_repo: Arc<dyn OrganizationRepository>,

    // Classification and writer settings
    risk_rules: Arc<RiskRuleSet>,
    audit: AuditConfig,

    jwt_service: Arc<JwtService>,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        pool: Option<PgPool>,
        audit_log_repo: Arc<dyn AuditLogRepository>,
        organization_repo: Arc<dyn OrganizationRepository>,
        risk_rules: Arc<RiskRuleSet>,
        audit: AuditConfig,
        jwt_service: Arc<JwtService>,
    ) -> Self {
        Self {
            pool,
            audit_log_repo,
            organization_repo,
            risk_rules,
            audit,
            jwt_service,
        }
    }

    /// Get the PostgreSQL connection pool, if the Postgres backend is in use
    pub fn pool(&self) -> Option<&PgPool> {
        self.pool.as_ref()
    }

    /// Get the audit log repository
    pub fn audit_log_repo(&self) -> &dyn AuditLogRepository {
        self.audit_log_repo.as_ref()
    }

    /// Get the organization repository
    pub fn organization_repo(&self) -> &dyn OrganizationRepository {
        self.organization_repo.as_ref()
    }

    /// Get the risk rule table used by the writer
    pub fn risk_rules(&self) -> &RiskRuleSet {
        self.risk_rules.as_ref()
    }

    /// Get the audit writer settings
    pub fn audit(&self) -> &AuditConfig {
        &self.audit
    }

    /// Get the JWT service
    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("pool", &self.pool.as_ref().map(|_| "PgPool"))
            .field("repositories", &"...")
            .field("risk_rules", &self.risk_rules.len())
            .field("audit", &self.audit)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    pool: Option<PgPool>,
    audit_log_repo: Option<Arc<dyn AuditLogRepository>>,
    organization_repo: Option<Arc<dyn OrganizationRepository>>,
    risk_rules: Option<Arc<RiskRuleSet>>,
    audit: Option<AuditConfig>,
    jwt_service: Option<Arc<JwtService>>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pool(mut self, pool: PgPool) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn audit_log_repo(mut self, repo: Arc<dyn AuditLogRepository>) -> Self {
        self.audit_log_repo = Some(repo);
        self
    }

    pub fn organization_repo(mut self, repo: Arc<dyn OrganizationRepository>) -> Self {
        self.organization_repo = Some(repo);
        self
    }

    pub fn risk_rules(mut self, rules: Arc<RiskRuleSet>) -> Self {
        self.risk_rules = Some(rules);
        self
    }

    pub fn audit(mut self, audit: AuditConfig) -> Self {
        self.audit = Some(audit);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    /// Build the ServiceContext
    ///
    /// Risk rules default to the canonical table and audit settings to their defaults.
    ///
    /// # Errors
    /// Returns `ServiceError::Internal` if a required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        let risk_rules = match self.risk_rules {
            Some(rules) => rules,
            None => Arc::new(RiskRuleSet::canonical().map_err(ServiceError::from)?),
        };

        Ok(ServiceContext::new(
            self.pool,
            self.audit_log_repo
                .ok_or_else(|| ServiceError::internal("audit_log_repo is required"))?,
            self.organization_repo
                .ok_or_else(|| ServiceError::internal("organization_repo is required"))?,
            risk_rules,
            self.audit.unwrap_or_default(),
            self.jwt_service
                .ok_or_else(|| ServiceError::internal("jwt_service is required"))?,
        ))
    }
}
