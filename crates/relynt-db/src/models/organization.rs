//! Organization database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// An organizations row joined with the caller's organization_members row
#[derive(Debug, Clone, FromRow)]
pub struct MembershipModel {
    pub id: String,
    pub name: String,
    pub subscription_tier: String,
    pub created_at: DateTime<Utc>,
    pub role: String,
    pub joined_at: DateTime<Utc>,
}
