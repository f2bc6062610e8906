//! Business logic services
//!
//! The audit log writer, read operations over an organization's entries,
//! and the membership checks they share.

pub mod audit_log;
pub mod context;
pub mod error;
pub mod organization;
pub mod risk;

// Re-export all services for convenience
pub use audit_log::AuditLogService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use organization::{authenticate, OrganizationService};
pub use risk::RiskService;
