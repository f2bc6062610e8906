//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in relynt-core.

mod audit_log;
mod error;
mod organization;

pub use audit_log::PgAuditLogRepository;
pub use organization::PgOrganizationRepository;
