//! # relynt-service
//!
//! Application layer: the audit log writer, read services, and DTOs.

pub mod dto;
pub mod services;

pub use services::{
    AuditLogService, OrganizationService, RiskService, ServiceContext, ServiceContextBuilder,
    ServiceError, ServiceResult,
};
