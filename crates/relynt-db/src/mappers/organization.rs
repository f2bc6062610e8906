//! Organization entity <-> model mapper

use relynt_core::{
    DomainError, MemberRole, Membership, Organization, OrganizationId, SubscriptionTier,
};

use crate::models::MembershipModel;

/// Convert MembershipModel to Membership entity
impl TryFrom<MembershipModel> for Membership {
    type Error = DomainError;

    fn try_from(model: MembershipModel) -> Result<Self, Self::Error> {
        let id = OrganizationId::parse(&model.id)
            .map_err(|e| DomainError::CorruptRecord(format!("organization id: {e}")))?;

        Ok(Membership {
            organization: Organization {
                id,
                name: model.name,
                subscription_tier: SubscriptionTier::from_db(&model.subscription_tier),
                created_at: model.created_at,
            },
            role: MemberRole::from_db(&model.role),
            joined_at: model.joined_at,
        })
    }
}
