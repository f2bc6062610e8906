//! Value objects - immutable types that represent domain concepts

mod ids;
mod risk_level;

pub use ids::{AuditLogId, IdParseError, OrganizationId, UserId};
pub use risk_level::{RiskLevel, RiskLevelParseError};
