//! PostgreSQL implementation of OrganizationRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use relynt_core::{Membership, OrganizationId, OrganizationRepository, RepoResult, UserId};

use crate::models::MembershipModel;

use super::error::map_db_error;

/// PostgreSQL implementation of OrganizationRepository
#[derive(Clone)]
pub struct PgOrganizationRepository {
    pool: PgPool,
}

impl PgOrganizationRepository {
    /// Create a new PgOrganizationRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrganizationRepository for PgOrganizationRepository {
    #[instrument(skip(self))]
    async fn find_by_user(&self, user_id: &UserId) -> RepoResult<Vec<Membership>> {
        let results = sqlx::query_as::<_, MembershipModel>(
            r#"
            SELECT o.id, o.name, o.subscription_tier, o.created_at,
                   m.role, m.created_at AS joined_at
            FROM organization_members m
            JOIN organizations o ON o.id = m.organization_id
            WHERE m.user_id = $1
            ORDER BY m.created_at ASC, o.id ASC
            "#,
        )
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(Membership::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn is_member(
        &self,
        organization_id: &OrganizationId,
        user_id: &UserId,
    ) -> RepoResult<bool> {
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM organization_members WHERE organization_id = $1 AND user_id = $2
            )
            "#,
        )
        .bind(organization_id.as_str())
        .bind(user_id.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result)
    }
}
