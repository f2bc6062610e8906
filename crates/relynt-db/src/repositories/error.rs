//! Error handling utilities for repositories

use relynt_core::{DomainError, OrganizationId};
use sqlx::Error as SqlxError;

/// SQLSTATE raised by row-level security violations
const INSUFFICIENT_PRIVILEGE: &str = "42501";
/// SQLSTATE raised by the append-only trigger on ai_audit_logs
const APPEND_ONLY_VIOLATION: &str = "55000";

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.code().as_deref() == Some(APPEND_ONLY_VIOLATION) {
            return DomainError::AppendOnly;
        }
    }
    DomainError::DatabaseError(e.to_string())
}

/// Map an INSERT failure, turning policy rejections into tenant isolation errors
pub fn map_insert_error(e: SqlxError, organization_id: &OrganizationId) -> DomainError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.code().as_deref() == Some(INSUFFICIENT_PRIVILEGE) {
            return tenant_isolation(organization_id);
        }
        if db_err.is_foreign_key_violation() {
            return DomainError::OrganizationNotFound(organization_id.clone());
        }
    }
    map_db_error(e)
}

/// Create a "tenant isolation" error
pub fn tenant_isolation(organization_id: &OrganizationId) -> DomainError {
    DomainError::TenantIsolation {
        organization_id: organization_id.clone(),
    }
}
