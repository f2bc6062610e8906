//! Risk overview service

use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use relynt_core::{DailyRiskCount, IdentityProvider, RiskCounts};
use tracing::instrument;
use validator::Validate;

use crate::dto::{DailyRiskResponse, RiskCountsResponse, RiskSummaryQuery, RiskSummaryResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::organization::{authenticate, OrganizationService};

/// Risk service
pub struct RiskService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> RiskService<'a> {
    /// Create a new RiskService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// All-time tier counts plus a zero-filled daily breakdown ending today (UTC)
    #[instrument(skip(self, caller, query))]
    pub async fn summary(
        &self,
        caller: &dyn IdentityProvider,
        organization_id: &str,
        query: RiskSummaryQuery,
    ) -> ServiceResult<RiskSummaryResponse> {
        authenticate(caller)?;
        query.validate()?;
        let days = query.days();

        let (_, organization_id) = OrganizationService::new(self.ctx)
            .require_member(caller, organization_id)
            .await?;

        let repo = self.ctx.audit_log_repo();
        let totals = repo.risk_counts(&organization_id, None).await?;

        let (start, since) = window(Utc::now(), days)?;
        let counted = repo.daily_risk_counts(&organization_id, since).await?;

        Ok(RiskSummaryResponse {
            organization_id: organization_id.into_inner(),
            totals: RiskCountsResponse::from(totals),
            days,
            daily: zero_fill(start, days, counted),
        })
    }
}

/// First day of a `days`-long window ending on `now`'s day, and its midnight
fn window(now: DateTime<Utc>, days: u32) -> ServiceResult<(NaiveDate, DateTime<Utc>)> {
    let start = now.date_naive() - Duration::days(i64::from(days.saturating_sub(1)));
    let midnight = start
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| ServiceError::internal("invalid window start"))?
        .and_utc();
    Ok((start, midnight))
}

fn zero_fill(start: NaiveDate, days: u32, counted: Vec<DailyRiskCount>) -> Vec<DailyRiskResponse> {
    let by_day: HashMap<NaiveDate, RiskCounts> =
        counted.into_iter().map(|d| (d.day, d.counts)).collect();

    start
        .iter_days()
        .take(days as usize)
        .map(|day| {
            DailyRiskResponse::from(DailyRiskCount {
                day,
                counts: by_day.get(&day).copied().unwrap_or_default(),
            })
        })
        .collect()
}
