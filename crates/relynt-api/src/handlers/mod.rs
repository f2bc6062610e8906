//! Route handlers
//!
//! All HTTP request handlers organized by domain.

pub mod audit_logs;
pub mod health;
pub mod organizations;
pub mod risk;
