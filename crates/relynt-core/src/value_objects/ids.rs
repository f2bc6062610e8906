//! Opaque identifiers for tenants, users, and audit log entries
//!
//! The identity provider and the store own the format of these ids (UUIDs in
//! the hosted backend), so the domain layer only guarantees they are non-empty
//! and free of surrounding whitespace.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Error when parsing an identifier from a string
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IdParseError {
    #[error("identifier must not be empty")]
    Empty,
}

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Parse an identifier, trimming surrounding whitespace
            pub fn parse(s: &str) -> Result<Self, IdParseError> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err(IdParseError::Empty);
                }
                Ok(Self(trimmed.to_string()))
            }

            /// Borrow the raw identifier
            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Take the raw identifier
            #[inline]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                Self::parse(&raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

opaque_id!(
    /// Identifier of an organization (tenant)
    OrganizationId
);

opaque_id!(
    /// Identifier of an authenticated user (actor)
    UserId
);

opaque_id!(
    /// Store-assigned identifier of an audit log entry
    AuditLogId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_whitespace() {
        let id = OrganizationId::parse("  org-1 ").unwrap();
        assert_eq!(id.as_str(), "org-1");
        assert_eq!(id.to_string(), "org-1");
    }

    #[test]
    fn test_parse_rejects_blank() {
        assert_eq!(UserId::parse(""), Err(IdParseError::Empty));
        assert_eq!(UserId::parse("   "), Err(IdParseError::Empty));
    }

    #[test]
    fn test_serde_is_transparent() {
        let id: AuditLogId = serde_json::from_str("\"log-42\"").unwrap();
        assert_eq!(id.as_str(), "log-42");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"log-42\"");
    }

    #[test]
    fn test_deserialize_rejects_empty() {
        let result: Result<OrganizationId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }
}
