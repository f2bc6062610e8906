//! # relynt-db
//!
//! Storage layer implementing the repository traits of `relynt-core`.
//!
//! ## Overview
//!
//! - Connection pool management and SQL migrations (PostgreSQL via SQLx)
//! - Database models with SQLx `FromRow` derives
//! - Entity ↔ Model mappers
//! - PostgreSQL repositories with membership-checked inserts
//! - An in-memory store with the same tenant isolation rule
//!
//! ## Usage
//!
//! ```rust,ignore
//! use relynt_db::{create_pool, PgAuditLogRepository, PoolConfig};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&PoolConfig::default()).await?;
//!     let audit_logs = PgAuditLogRepository::new(pool);
//!
//!     // Use the repository...
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use memory::MemoryStore;
pub use pool::{create_pool, run_migrations, PgPool, PoolConfig};
pub use repositories::{PgAuditLogRepository, PgOrganizationRepository};
