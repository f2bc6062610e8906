//! Ports implemented by the infrastructure layer

mod identity;
mod repositories;

pub use identity::{Identity, IdentityProvider};
pub use repositories::{AuditLogRepository, OrganizationRepository, RepoResult};
