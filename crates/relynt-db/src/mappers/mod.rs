//! Entity to model mappers
//!
//! This module provides conversions between domain entities (relynt-core) and database models.
//! - `TryFrom<Model> for Entity`: Convert database rows to domain objects
//! - `*Insert` structs: Prepare entity data for database operations

mod audit_log;
mod organization;

pub use audit_log::{daily_counts_from_rows, risk_counts_from_rows, AuditLogInsert};
