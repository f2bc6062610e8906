//! Organization (tenant) and membership entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value_objects::{OrganizationId, UserId};

/// Subscription tier of an organization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionTier {
    #[default]
    Starter,
    Professional,
    Enterprise,
}

impl SubscriptionTier {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Starter => "starter",
            Self::Professional => "professional",
            Self::Enterprise => "enterprise",
        }
    }

    /// Parse the stored value, falling back to `Starter` for unknown tiers
    pub fn from_db(s: &str) -> Self {
        match s {
            "professional" => Self::Professional,
            "enterprise" => Self::Enterprise,
            _ => Self::Starter,
        }
    }
}

impl fmt::Display for SubscriptionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role of a user inside an organization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Admin,
    #[default]
    Member,
}

impl MemberRole {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Member => "member",
        }
    }

    /// Parse the stored value, falling back to `Member` for unknown roles
    pub fn from_db(s: &str) -> Self {
        match s {
            "admin" => Self::Admin,
            _ => Self::Member,
        }
    }
}

impl fmt::Display for MemberRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Organization entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Organization {
    pub id: OrganizationId,
    pub name: String,
    pub subscription_tier: SubscriptionTier,
    pub created_at: DateTime<Utc>,
}

impl Organization {
    /// Create a new Organization on the starter tier
    pub fn new(id: OrganizationId, name: String) -> Self {
        Self {
            id,
            name,
            subscription_tier: SubscriptionTier::Starter,
            created_at: Utc::now(),
        }
    }
}

/// Membership of a user in an organization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationMember {
    pub organization_id: OrganizationId,
    pub user_id: UserId,
    pub role: MemberRole,
    pub created_at: DateTime<Utc>,
}

impl OrganizationMember {
    /// Create a new membership
    pub fn new(organization_id: OrganizationId, user_id: UserId, role: MemberRole) -> Self {
        Self {
            organization_id,
            user_id,
            role,
            created_at: Utc::now(),
        }
    }

    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role == MemberRole::Admin
    }
}

/// An organization together with the caller's role in it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership {
    pub organization: Organization,
    pub role: MemberRole,
    pub joined_at: DateTime<Utc>,
}
