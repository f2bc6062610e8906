//! Domain entities - core business objects

mod audit_log;
mod organization;

pub use audit_log::{
    AuditLogEntry, AuditLogQuery, DailyRiskCount, Metadata, NewAuditLogEntry, RiskCounts,
    DEFAULT_ACTION,
};
pub use organization::{
    MemberRole, Membership, Organization, OrganizationMember, SubscriptionTier,
};
