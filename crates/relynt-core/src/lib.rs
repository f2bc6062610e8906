//! # relynt-core
//!
//! Domain layer containing the audit log entities, the risk classifier,
//! value objects, and the store/identity traits.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod risk;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    AuditLogEntry, AuditLogQuery, DailyRiskCount, MemberRole, Membership, Metadata,
    NewAuditLogEntry, Organization, OrganizationMember, RiskCounts, SubscriptionTier,
    DEFAULT_ACTION,
};
pub use error::DomainError;
pub use risk::{classify, RiskAssessment, RiskRule, RiskRuleSet};
pub use traits::{
    AuditLogRepository, Identity, IdentityProvider, OrganizationRepository, RepoResult,
};
pub use value_objects::{AuditLogId, IdParseError, OrganizationId, RiskLevel, UserId};
