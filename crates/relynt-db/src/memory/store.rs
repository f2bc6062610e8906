//! In-memory store for local runs and tests
//!
//! Implements both repository traits over a single `RwLock`-guarded state and
//! enforces the same membership rule as the Postgres insert.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::{debug, instrument};

use relynt_core::{
    AuditLogEntry, AuditLogId, AuditLogQuery, AuditLogRepository, DailyRiskCount, DomainError,
    MemberRole, Membership, NewAuditLogEntry, Organization, OrganizationId, OrganizationMember,
    OrganizationRepository, RepoResult, RiskCounts, UserId,
};

#[derive(Debug, Default)]
struct State {
    organizations: HashMap<OrganizationId, Organization>,
    /// Insertion order doubles as join order
    members: Vec<OrganizationMember>,
    /// Append-only, oldest first
    logs: Vec<AuditLogEntry>,
}

impl State {
    fn is_member(&self, organization_id: &OrganizationId, user_id: &UserId) -> bool {
        self.members
            .iter()
            .any(|m| &m.organization_id == organization_id && &m.user_id == user_id)
    }

    fn org_logs<'a>(
        &'a self,
        organization_id: &'a OrganizationId,
    ) -> impl DoubleEndedIterator<Item = &'a AuditLogEntry> + 'a {
        self.logs
            .iter()
            .filter(move |e| &e.organization_id == organization_id)
    }
}

/// Thread-safe in-memory implementation of the repository traits
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<State>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an organization, replacing any existing one with the same id
    pub fn add_organization(&self, organization: Organization) {
        self.state
            .write()
            .organizations
            .insert(organization.id.clone(), organization);
    }

    /// Add a user to an existing organization
    ///
    /// # Errors
    /// Returns `OrganizationNotFound` if the organization is unknown
    pub fn add_member(
        &self,
        organization_id: &OrganizationId,
        user_id: &UserId,
        role: MemberRole,
    ) -> RepoResult<()> {
        let mut state = self.state.write();
        if !state.organizations.contains_key(organization_id) {
            return Err(DomainError::OrganizationNotFound(organization_id.clone()));
        }
        if state.is_member(organization_id, user_id) {
            return Ok(());
        }
        state.members.push(OrganizationMember::new(
            organization_id.clone(),
            user_id.clone(),
            role,
        ));
        Ok(())
    }

    /// Seed a membership from `organization_id:user_id[:role]`, creating the organization if needed
    ///
    /// # Errors
    /// Returns `ValidationError` if the entry is malformed
    pub fn seed_membership(&self, entry: &str) -> RepoResult<()> {
        let invalid = || DomainError::ValidationError(format!("invalid membership seed '{entry}'"));

        let mut parts = entry.split(':');
        let organization_id = parts
            .next()
            .and_then(|s| OrganizationId::parse(s).ok())
            .ok_or_else(invalid)?;
        let user_id = parts
            .next()
            .and_then(|s| UserId::parse(s).ok())
            .ok_or_else(invalid)?;
        let role = match parts.next().map(str::trim) {
            None | Some("") => MemberRole::Member,
            Some("admin") => MemberRole::Admin,
            Some("member") => MemberRole::Member,
            Some(_) => return Err(invalid()),
        };
        if parts.next().is_some() {
            return Err(invalid());
        }

        {
            let mut state = self.state.write();
            if !state.organizations.contains_key(&organization_id) {
                let org = Organization::new(organization_id.clone(), organization_id.to_string());
                state.organizations.insert(organization_id.clone(), org);
            }
        }
        debug!(%organization_id, %user_id, %role, "Seeded membership");
        self.add_member(&organization_id, &user_id, role)
    }

    /// Number of stored audit log entries across all organizations
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.read().logs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl AuditLogRepository for MemoryStore {
    #[instrument(skip(self, entry), fields(organization_id = %entry.organization_id))]
    async fn insert(&self, entry: &NewAuditLogEntry) -> RepoResult<AuditLogEntry> {
        let mut state = self.state.write();

        if !state.is_member(&entry.organization_id, &entry.actor_id) {
            return Err(DomainError::TenantIsolation {
                organization_id: entry.organization_id.clone(),
            });
        }

        // Keep created_at monotonic so insertion order matches newest-first ordering
        let now = Utc::now();
        let created_at = state
            .logs
            .last()
            .map_or(now, |last| last.created_at.max(now));
        let id = AuditLogId::parse(&uuid::Uuid::new_v4().to_string())
            .map_err(|e| DomainError::InternalError(e.to_string()))?;

        let stored = entry.clone().into_entry(id, created_at);
        state.logs.push(stored.clone());
        Ok(stored)
    }

    async fn find_by_id(
        &self,
        organization_id: &OrganizationId,
        id: &AuditLogId,
    ) -> RepoResult<Option<AuditLogEntry>> {
        let state = self.state.read();
        let found = state.org_logs(organization_id).find(|e| &e.id == id).cloned();
        Ok(found)
    }

    async fn list(
        &self,
        organization_id: &OrganizationId,
        query: &AuditLogQuery,
    ) -> RepoResult<Vec<AuditLogEntry>> {
        let state = self.state.read();
        let limit = usize::try_from(query.limit.clamp(1, AuditLogQuery::MAX_LIMIT)).unwrap_or(1);
        let search = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty());

        let mut newest_first = state.org_logs(organization_id).rev();
        if let Some(before) = &query.before {
            if !state.org_logs(organization_id).any(|e| &e.id == before) {
                return Ok(Vec::new());
            }
            // Skip up to and including the cursor entry
            for entry in newest_first.by_ref() {
                if &entry.id == before {
                    break;
                }
            }
        }

        let page = newest_first
            .filter(|e| query.risk_level.is_none_or(|level| e.risk_level == level))
            .filter(|e| search.is_none_or(|term| e.matches_search(term)))
            .filter(|e| query.since.is_none_or(|since| e.created_at >= since))
            .take(limit)
            .cloned()
            .collect();
        Ok(page)
    }

    async fn risk_counts(
        &self,
        organization_id: &OrganizationId,
        since: Option<DateTime<Utc>>,
    ) -> RepoResult<RiskCounts> {
        let state = self.state.read();
        let mut counts = RiskCounts::default();
        for entry in state
            .org_logs(organization_id)
            .filter(|e| since.is_none_or(|since| e.created_at >= since))
        {
            counts.add(entry.risk_level, 1);
        }
        Ok(counts)
    }

    async fn daily_risk_counts(
        &self,
        organization_id: &OrganizationId,
        since: DateTime<Utc>,
    ) -> RepoResult<Vec<DailyRiskCount>> {
        let state = self.state.read();
        let mut days: BTreeMap<_, RiskCounts> = BTreeMap::new();
        for entry in state
            .org_logs(organization_id)
            .filter(|e| e.created_at >= since)
        {
            days.entry(entry.created_at.date_naive())
                .or_default()
                .add(entry.risk_level, 1);
        }
        Ok(days
            .into_iter()
            .map(|(day, counts)| DailyRiskCount { day, counts })
            .collect())
    }
}

#[async_trait]
impl OrganizationRepository for MemoryStore {
    async fn find_by_user(&self, user_id: &UserId) -> RepoResult<Vec<Membership>> {
        let state = self.state.read();
        let mut memberships: Vec<Membership> = state
            .members
            .iter()
            .filter(|m| &m.user_id == user_id)
            .filter_map(|m| {
                state.organizations.get(&m.organization_id).map(|org| Membership {
                    organization: org.clone(),
                    role: m.role,
                    joined_at: m.created_at,
                })
            })
            .collect();
        memberships.sort_by_key(|m| m.joined_at);
        Ok(memberships)
    }

    async fn is_member(
        &self,
        organization_id: &OrganizationId,
        user_id: &UserId,
    ) -> RepoResult<bool> {
        Ok(self.state.read().is_member(organization_id, user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relynt_core::{RiskLevel, RiskRuleSet};

    fn org(s: &str) -> OrganizationId {
        OrganizationId::parse(s).unwrap()
    }

    fn user(s: &str) -> UserId {
        UserId::parse(s).unwrap()
    }

    fn new_entry(org_id: &str, actor: &str, input: &str) -> NewAuditLogEntry {
        NewAuditLogEntry::classified(
            org(org_id),
            user(actor),
            "AI Completion".to_string(),
            input.to_string(),
            "ok".to_string(),
            serde_json::Map::new(),
            &RiskRuleSet::canonical().unwrap(),
        )
    }

    fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        store.seed_membership("org-1:user-1").unwrap();
        store.seed_membership("org-2:user-2:admin").unwrap();
        store
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_timestamp() {
        let store = seeded();
        let stored = store.insert(&new_entry("org-1", "user-1", "hello")).await.unwrap();

        assert!(!stored.id.as_str().is_empty());
        assert_eq!(stored.risk_level, RiskLevel::Low);
        assert_eq!(store.len(), 1);

        let found = store.find_by_id(&org("org-1"), &stored.id).await.unwrap();
        assert_eq!(found, Some(stored.clone()));
        // Scoped by organization
        assert!(store.find_by_id(&org("org-2"), &stored.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_by_non_member_is_rejected() {
        let store = seeded();
        let err = store
            .insert(&new_entry("org-2", "user-1", "hello"))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::TenantIsolation { .. }));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_list_newest_first_with_filters() {
        let store = seeded();
        store.insert(&new_entry("org-1", "user-1", "hello")).await.unwrap();
        store.insert(&new_entry("org-1", "user-1", "process payment")).await.unwrap();
        store.insert(&new_entry("org-1", "user-1", "my password")).await.unwrap();
        store.insert(&new_entry("org-2", "user-2", "payment elsewhere")).await.unwrap();

        let all = store.list(&org("org-1"), &AuditLogQuery::default()).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].input_summary, "my password");
        assert_eq!(all[2].input_summary, "hello");

        let query = AuditLogQuery {
            risk_level: Some(RiskLevel::Medium),
            ..AuditLogQuery::default()
        };
        let medium = store.list(&org("org-1"), &query).await.unwrap();
        assert_eq!(medium.len(), 1);
        assert_eq!(medium[0].input_summary, "process payment");

        let query = AuditLogQuery {
            search: Some("PAYMENT".to_string()),
            ..AuditLogQuery::default()
        };
        assert_eq!(store.list(&org("org-1"), &query).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_keyset_cursor() {
        let store = seeded();
        for i in 0..5 {
            store
                .insert(&new_entry("org-1", "user-1", &format!("prompt {i}")))
                .await
                .unwrap();
        }

        let first = store.list(&org("org-1"), &AuditLogQuery::with_limit(2)).await.unwrap();
        assert_eq!(first[0].input_summary, "prompt 4");
        assert_eq!(first[1].input_summary, "prompt 3");

        let query = AuditLogQuery {
            before: Some(first[1].id.clone()),
            ..AuditLogQuery::with_limit(2)
        };
        let second = store.list(&org("org-1"), &query).await.unwrap();
        assert_eq!(second[0].input_summary, "prompt 2");
        assert_eq!(second[1].input_summary, "prompt 1");

        let query = AuditLogQuery {
            before: Some(AuditLogId::parse("missing").unwrap()),
            ..AuditLogQuery::default()
        };
        assert!(store.list(&org("org-1"), &query).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_risk_counts() {
        let store = seeded();
        store.insert(&new_entry("org-1", "user-1", "hello")).await.unwrap();
        store.insert(&new_entry("org-1", "user-1", "invoice")).await.unwrap();
        store.insert(&new_entry("org-1", "user-1", "secret")).await.unwrap();
        store.insert(&new_entry("org-1", "user-1", "api key")).await.unwrap();

        let counts = store.risk_counts(&org("org-1"), None).await.unwrap();
        assert_eq!((counts.low, counts.medium, counts.high), (1, 1, 2));

        let days = store
            .daily_risk_counts(&org("org-1"), Utc::now() - chrono::Duration::days(1))
            .await
            .unwrap();
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].counts.total(), 4);

        let empty = store.risk_counts(&org("org-2"), None).await.unwrap();
        assert_eq!(empty.total(), 0);
    }

    #[tokio::test]
    async fn test_memberships() {
        let store = seeded();
        store.seed_membership("org-2:user-1:member").unwrap();

        let memberships = store.find_by_user(&user("user-1")).await.unwrap();
        assert_eq!(memberships.len(), 2);
        assert_eq!(memberships[0].organization.id, org("org-1"));
        assert_eq!(memberships[1].role, MemberRole::Member);

        assert!(store.is_member(&org("org-2"), &user("user-2")).await.unwrap());
        assert!(!store.is_member(&org("org-1"), &user("user-2")).await.unwrap());
    }

    #[test]
    fn test_seed_membership_rejects_malformed() {
        let store = MemoryStore::new();
        assert!(store.seed_membership("org-1").is_err());
        assert!(store.seed_membership("org-1:user-1:owner").is_err());
        assert!(store.seed_membership(":user-1").is_err());
        assert!(store.seed_membership("a:b:admin:extra").is_err());
    }

    #[test]
    fn test_add_member_requires_organization() {
        let store = MemoryStore::new();
        let err = store
            .add_member(&org("org-9"), &user("user-1"), MemberRole::Admin)
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
