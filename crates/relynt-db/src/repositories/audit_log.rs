//! PostgreSQL implementation of AuditLogRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use relynt_core::{
    AuditLogEntry, AuditLogId, AuditLogQuery, AuditLogRepository, DailyRiskCount,
    NewAuditLogEntry, OrganizationId, RepoResult, RiskCounts,
};

use crate::mappers::{daily_counts_from_rows, risk_counts_from_rows, AuditLogInsert};
use crate::models::{AuditLogModel, DailyRiskCountRow, RiskCountRow};

use super::error::{map_db_error, map_insert_error, tenant_isolation};

const COLUMNS: &str = "id, organization_id, actor_id, action, input_summary, output_summary, \
                       risk_level, metadata, created_at";

/// Escape `%`, `_` and `\` so user input matches literally inside ILIKE
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// PostgreSQL implementation of AuditLogRepository
#[derive(Clone)]
pub struct PgAuditLogRepository {
    pool: PgPool,
}

impl PgAuditLogRepository {
    /// Create a new PgAuditLogRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditLogRepository for PgAuditLogRepository {
    #[instrument(skip(self, entry), fields(organization_id = %entry.organization_id, actor_id = %entry.actor_id))]
    async fn insert(&self, entry: &NewAuditLogEntry) -> RepoResult<AuditLogEntry> {
        let values = AuditLogInsert::new(entry);
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // Row-level security policies read the caller from this transaction-local setting
        sqlx::query("SELECT set_config('request.jwt.claim.sub', $1, true)")
            .bind(values.actor_id)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        let inserted = sqlx::query_as::<_, AuditLogModel>(&format!(
            r#"
            INSERT INTO ai_audit_logs
                (organization_id, actor_id, action, input_summary, output_summary, risk_level, metadata)
            SELECT $1, $2, $3, $4, $5, $6, $7
            WHERE EXISTS (
                SELECT 1 FROM organization_members
                WHERE organization_id = $1 AND user_id = $2
            )
            RETURNING {COLUMNS}
            "#
        ))
        .bind(values.organization_id)
        .bind(values.actor_id)
        .bind(values.action)
        .bind(values.input_summary)
        .bind(values.output_summary)
        .bind(values.risk_level)
        .bind(&values.metadata)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| map_insert_error(e, &entry.organization_id))?;

        let Some(model) = inserted else {
            tracing::warn!("Insert rejected: actor is not a member of the organization");
            // Dropping the transaction rolls it back
            return Err(tenant_isolation(&entry.organization_id));
        };

        tx.commit().await.map_err(map_db_error)?;

        AuditLogEntry::try_from(model)
    }

    #[instrument(skip(self))]
    async fn find_by_id(
        &self,
        organization_id: &OrganizationId,
        id: &AuditLogId,
    ) -> RepoResult<Option<AuditLogEntry>> {
        let result = sqlx::query_as::<_, AuditLogModel>(&format!(
            r#"
            SELECT {COLUMNS}
            FROM ai_audit_logs
            WHERE organization_id = $1 AND id = $2
            "#
        ))
        .bind(organization_id.as_str())
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(AuditLogEntry::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn list(
        &self,
        organization_id: &OrganizationId,
        query: &AuditLogQuery,
    ) -> RepoResult<Vec<AuditLogEntry>> {
        let limit = query.limit.clamp(1, AuditLogQuery::MAX_LIMIT);

        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new("SELECT ");
        builder.push(COLUMNS);
        builder.push(" FROM ai_audit_logs WHERE organization_id = ");
        builder.push_bind(organization_id.as_str());

        if let Some(level) = query.risk_level {
            builder.push(" AND risk_level = ");
            builder.push_bind(level.as_str());
        }

        if let Some(term) = query.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            let pattern = like_pattern(term);
            builder.push(" AND (action ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR input_summary ILIKE ");
            builder.push_bind(pattern);
            builder.push(")");
        }

        if let Some(since) = query.since {
            builder.push(" AND created_at >= ");
            builder.push_bind(since);
        }

        // An unknown cursor makes the row comparison NULL, which yields an empty page
        if let Some(before) = &query.before {
            builder.push(
                " AND (created_at, id) < (SELECT created_at, id FROM ai_audit_logs \
                 WHERE organization_id = ",
            );
            builder.push_bind(organization_id.as_str());
            builder.push(" AND id = ");
            builder.push_bind(before.as_str());
            builder.push(")");
        }

        builder.push(" ORDER BY created_at DESC, id DESC LIMIT ");
        builder.push_bind(limit);

        let models = builder
            .build_query_as::<AuditLogModel>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        models.into_iter().map(AuditLogEntry::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn risk_counts(
        &self,
        organization_id: &OrganizationId,
        since: Option<DateTime<Utc>>,
    ) -> RepoResult<RiskCounts> {
        let rows = sqlx::query_as::<_, RiskCountRow>(
            r#"
            SELECT risk_level, COUNT(*) AS count
            FROM ai_audit_logs
            WHERE organization_id = $1
              AND ($2::timestamptz IS NULL OR created_at >= $2)
            GROUP BY risk_level
            "#,
        )
        .bind(organization_id.as_str())
        .bind(since)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        risk_counts_from_rows(rows)
    }

    #[instrument(skip(self))]
    async fn daily_risk_counts(
        &self,
        organization_id: &OrganizationId,
        since: DateTime<Utc>,
    ) -> RepoResult<Vec<DailyRiskCount>> {
        let rows = sqlx::query_as::<_, DailyRiskCountRow>(
            r#"
            SELECT (created_at AT TIME ZONE 'UTC')::date AS day, risk_level, COUNT(*) AS count
            FROM ai_audit_logs
            WHERE organization_id = $1 AND created_at >= $2
            GROUP BY 1, 2
            ORDER BY 1
            "#,
        )
        .bind(organization_id.as_str())
        .bind(since)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        daily_counts_from_rows(rows)
    }
}
