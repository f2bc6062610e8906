//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation. Tenant isolation is the store's job: an
//! implementation must refuse writes by actors who are not members of the
//! target organization.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{
    AuditLogEntry, AuditLogQuery, DailyRiskCount, Membership, NewAuditLogEntry, RiskCounts,
};
use crate::error::DomainError;
use crate::value_objects::{AuditLogId, OrganizationId, UserId};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Audit Log Repository
// ============================================================================

#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    /// Insert one entry and return it with store-assigned `id` and `created_at`
    ///
    /// Fails with `DomainError::TenantIsolation` when the actor is not a
    /// member of the entry's organization. A failed insert writes nothing.
    async fn insert(&self, entry: &NewAuditLogEntry) -> RepoResult<AuditLogEntry>;

    /// Find an entry by ID within an organization
    async fn find_by_id(
        &self,
        organization_id: &OrganizationId,
        id: &AuditLogId,
    ) -> RepoResult<Option<AuditLogEntry>>;

    /// List entries of an organization, newest first
    async fn list(
        &self,
        organization_id: &OrganizationId,
        query: &AuditLogQuery,
    ) -> RepoResult<Vec<AuditLogEntry>>;

    /// Count entries per tier, optionally only those created since an instant
    async fn risk_counts(
        &self,
        organization_id: &OrganizationId,
        since: Option<DateTime<Utc>>,
    ) -> RepoResult<RiskCounts>;

    /// Count entries per tier and UTC day since an instant (days without entries are omitted)
    async fn daily_risk_counts(
        &self,
        organization_id: &OrganizationId,
        since: DateTime<Utc>,
    ) -> RepoResult<Vec<DailyRiskCount>>;
}

// ============================================================================
// Organization Repository
// ============================================================================

#[async_trait]
pub trait OrganizationRepository: Send + Sync {
    /// List organizations a user belongs to, oldest membership first
    async fn find_by_user(&self, user_id: &UserId) -> RepoResult<Vec<Membership>>;

    /// Check if a user is a member of an organization
    async fn is_member(&self, organization_id: &OrganizationId, user_id: &UserId)
        -> RepoResult<bool>;
}
