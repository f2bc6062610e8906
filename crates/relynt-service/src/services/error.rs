//! Service layer error types
//!
//! The audit log writer fails in exactly three ways: no identity, invalid
//! input, or a store failure. Read operations add not-found, forbidden and
//! no-organization.

use relynt_common::AppError;
use relynt_core::DomainError;
use std::fmt;
use validator::ValidationErrors;

/// Service layer error type
#[derive(Debug)]
pub enum ServiceError {
    /// No authenticated identity for the request
    Unauthorized,

    /// Input rejected before any store call
    Validation(String),

    /// The store failed or refused the operation; carries the cause
    Persistence(DomainError),

    /// Resource not found
    NotFound { resource: &'static str, id: String },

    /// Caller is not a member of the organization
    Forbidden { organization_id: String },

    /// Caller has no organization to write into
    NoOrganization,

    /// Internal error
    Internal(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthorized => write!(f, "Authentication required"),
            Self::Validation(msg) => write!(f, "Validation error: {msg}"),
            Self::Persistence(e) => write!(f, "Persistence error: {e}"),
            Self::NotFound { resource, id } => write!(f, "{resource} not found: {id}"),
            Self::Forbidden { organization_id } => {
                write!(f, "Not a member of organization {organization_id}")
            }
            Self::NoOrganization => write!(f, "Caller does not belong to any organization"),
            Self::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Persistence(e) => Some(e),
            _ => None,
        }
    }
}

impl ServiceError {
    /// Create a not found error
    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            id: id.into(),
        }
    }

    /// Create a forbidden error
    pub fn forbidden(organization_id: impl fmt::Display) -> Self {
        Self::Forbidden {
            organization_id: organization_id.to_string(),
        }
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Unauthorized => 401,
            Self::Validation(_) | Self::NoOrganization => 400,
            Self::Forbidden { .. } => 403,
            Self::NotFound { .. } => 404,
            Self::Persistence(_) | Self::Internal(_) => 500,
        }
    }

    /// Get the error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Persistence(_) => "PERSISTENCE_ERROR",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Forbidden { .. } => "FORBIDDEN",
            Self::NoOrganization => "NO_ORGANIZATION",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

/// Store errors on read paths; write paths wrap everything as `Persistence`
impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::ValidationError(msg) => Self::Validation(msg),
            DomainError::NotMember {
                organization_id, ..
            } => Self::forbidden(organization_id),
            DomainError::AuditLogNotFound(id) => Self::not_found("Audit log", id.to_string()),
            DomainError::OrganizationNotFound(id) => {
                Self::not_found("Organization", id.to_string())
            }
            DomainError::InvalidRiskRule { name, reason } => {
                Self::Internal(format!("risk rule '{name}': {reason}"))
            }
            other => Self::Persistence(other),
        }
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let reason = errs
                    .iter()
                    .find_map(|e| e.message.as_ref().map(ToString::to_string))
                    .unwrap_or_else(|| "is invalid".to_string());
                format!("{field} {reason}")
            })
            .collect();
        fields.sort();
        Self::Validation(fields.join("; "))
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Unauthorized => AppError::MissingAuth,
            ServiceError::Validation(msg) => AppError::Validation(msg),
            ServiceError::Persistence(e) => AppError::Persistence(e.to_string()),
            ServiceError::NotFound { resource, id } => {
                AppError::NotFound(format!("{resource} {id}"))
            }
            ServiceError::Forbidden { .. } => AppError::Forbidden,
            ServiceError::NoOrganization => AppError::NoOrganization,
            ServiceError::Internal(msg) => AppError::Internal(anyhow::anyhow!(msg)),
        }
    }
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;
