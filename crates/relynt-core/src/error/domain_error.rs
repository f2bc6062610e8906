//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::{AuditLogId, OrganizationId, UserId};

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Audit log entry not found: {0}")]
    AuditLogNotFound(AuditLogId),

    #[error("Organization not found: {0}")]
    OrganizationNotFound(OrganizationId),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid risk rule '{name}': {reason}")]
    InvalidRiskRule { name: String, reason: String },

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("User {user_id} is not a member of organization {organization_id}")]
    NotMember {
        organization_id: OrganizationId,
        user_id: UserId,
    },

    // =========================================================================
    // Store Errors
    // =========================================================================
    /// The store's tenant isolation policy refused the write
    #[error("Tenant isolation policy rejected write to organization {organization_id}")]
    TenantIsolation { organization_id: OrganizationId },

    /// Append-only records cannot be changed once written
    #[error("Audit log entries are append-only")]
    AppendOnly,

    #[error("Corrupt stored value: {0}")]
    CorruptRecord(String),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::AuditLogNotFound(_) => "UNKNOWN_AUDIT_LOG",
            Self::OrganizationNotFound(_) => "UNKNOWN_ORGANIZATION",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidRiskRule { .. } => "INVALID_RISK_RULE",

            // Authorization
            Self::NotMember { .. } => "NOT_MEMBER",

            // Store
            Self::TenantIsolation { .. } => "TENANT_ISOLATION",
            Self::AppendOnly => "APPEND_ONLY",
            Self::CorruptRecord(_) => "CORRUPT_RECORD",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::AuditLogNotFound(_) | Self::OrganizationNotFound(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationError(_) | Self::InvalidRiskRule { .. })
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::NotMember { .. })
    }

    /// Check if this error was raised by the store layer
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            Self::TenantIsolation { .. }
                | Self::AppendOnly
                | Self::CorruptRecord(_)
                | Self::DatabaseError(_)
        )
    }
}
