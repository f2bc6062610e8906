//! Identity port - who is calling
//!
//! The identity provider owns sign-in and session issuance; the domain only
//! asks "who is the current user of this request?". Identity is always passed
//! explicitly to the operations that need it.

use crate::value_objects::UserId;

/// An authenticated caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: UserId,
}

impl Identity {
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }
}

/// Source of the current request's authenticated identity
pub trait IdentityProvider: Send + Sync {
    /// The authenticated user, or `None` if the request carries no valid session
    fn current_user(&self) -> Option<Identity>;
}

impl IdentityProvider for Option<Identity> {
    fn current_user(&self) -> Option<Identity> {
        self.clone()
    }
}

impl IdentityProvider for Identity {
    fn current_user(&self) -> Option<Identity> {
        Some(self.clone())
    }
}
