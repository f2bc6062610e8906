//! Organization service
//!
//! Caller memberships and the membership gate used by read operations.

use relynt_core::{Identity, IdentityProvider, OrganizationId};
use tracing::{instrument, warn};

use crate::dto::OrganizationResponse;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Resolve the caller's identity or fail with `Unauthorized`
pub fn authenticate(caller: &dyn IdentityProvider) -> ServiceResult<Identity> {
    caller.current_user().ok_or(ServiceError::Unauthorized)
}

/// Parse an organization id supplied by a client
pub fn parse_organization_id(raw: &str) -> ServiceResult<OrganizationId> {
    OrganizationId::parse(raw)
        .map_err(|_| ServiceError::validation("organization_id must not be empty"))
}

/// Organization service
pub struct OrganizationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> OrganizationService<'a> {
    /// Create a new OrganizationService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Organizations the caller belongs to, oldest membership first
    #[instrument(skip(self, caller))]
    pub async fn list_for_caller(
        &self,
        caller: &dyn IdentityProvider,
    ) -> ServiceResult<Vec<OrganizationResponse>> {
        let identity = authenticate(caller)?;
        let memberships = self
            .ctx
            .organization_repo()
            .find_by_user(&identity.user_id)
            .await?;

        Ok(memberships.iter().map(OrganizationResponse::from).collect())
    }

    /// The caller's first organization, used when a write names none
    #[instrument(skip(self, identity), fields(user_id = %identity.user_id))]
    pub async fn default_organization(&self, identity: &Identity) -> ServiceResult<OrganizationId> {
        let memberships = self
            .ctx
            .organization_repo()
            .find_by_user(&identity.user_id)
            .await
            .map_err(ServiceError::Persistence)?;

        memberships
            .into_iter()
            .next()
            .map(|m| m.organization.id)
            .ok_or(ServiceError::NoOrganization)
    }

    /// Authenticate the caller and check membership of `organization_id`
    ///
    /// # Errors
    /// `Unauthorized` without identity, `Forbidden` for non-members
    #[instrument(skip(self, caller))]
    pub async fn require_member(
        &self,
        caller: &dyn IdentityProvider,
        organization_id: &str,
    ) -> ServiceResult<(Identity, OrganizationId)> {
        let identity = authenticate(caller)?;
        let organization_id = parse_organization_id(organization_id)?;

        let is_member = self
            .ctx
            .organization_repo()
            .is_member(&organization_id, &identity.user_id)
            .await?;
        if !is_member {
            warn!(
                %organization_id,
                user_id = %identity.user_id,
                "Read denied: caller is not a member"
            );
            return Err(ServiceError::forbidden(&organization_id));
        }

        Ok((identity, organization_id))
    }
}
