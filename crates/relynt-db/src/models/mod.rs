//! Database models - SQLx-compatible structs for PostgreSQL tables

mod audit_log;
mod organization;

pub use audit_log::{AuditLogModel, DailyRiskCountRow, RiskCountRow};
pub use organization::MembershipModel;
