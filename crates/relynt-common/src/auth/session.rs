//! Bearer-token session: the identity of one HTTP request

use relynt_core::{Identity, IdentityProvider};

use super::JwtService;

/// Identity resolved from an optional `Authorization: Bearer` token
///
/// A missing, malformed or expired token yields an anonymous session rather
/// than an error; callers that require identity reject it themselves.
#[derive(Debug, Clone, Default)]
pub struct BearerSession {
    identity: Option<Identity>,
}

impl BearerSession {
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Resolve a session from a raw bearer token
    #[must_use]
    pub fn from_token(jwt: &JwtService, token: Option<&str>) -> Self {
        let Some(token) = token else {
            return Self::anonymous();
        };

        match jwt.identify(token) {
            Ok(identity) => Self {
                identity: Some(identity),
            },
            Err(e) => {
                tracing::warn!(error = %e, "Rejected bearer token");
                Self::anonymous()
            }
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }
}

impl From<Identity> for BearerSession {
    fn from(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
        }
    }
}

impl IdentityProvider for BearerSession {
    fn current_user(&self) -> Option<Identity> {
        self.identity.clone()
    }
}
