//! Organization Directory and Onboarding
//!
//! List/search/toggle for the tenant table, plus the onboarding saga:
//! create the org row, then provision its first admin through the
//! privileged endpoint, rolling the row back if provisioning fails so a
//! half-created tenant never lingers.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::backend::{
    decode_row, decode_rows, to_row, Filter, Order, OrgProvisioner, ProvisionedCredentials, Row,
    SelectQuery, Tables,
};
use crate::model::{slugify, OrgDraft, OrgSettingsPatch, OrgStatus, Organization, PlanType};

use super::{fetch_soft, ServiceError, ServiceResult};

const TABLE: &str = "organizations";

/// Filters for the organizations list screen
#[derive(Debug, Clone, Default)]
pub struct OrgQuery {
    /// Matches name or slug, case-insensitive
    pub search: Option<String>,
    pub status: Option<OrgStatus>,
    pub limit: Option<usize>,
}

impl OrgQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    pub fn status(mut self, status: OrgStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }
}

/// The tenant directory
pub struct OrgDirectory {
    tables: Arc<dyn Tables>,
}

impl OrgDirectory {
    pub fn new(tables: Arc<dyn Tables>) -> Self {
        Self { tables }
    }

    /// Build the list query: newest first, search across name and slug
    pub fn select_for(query: &OrgQuery) -> SelectQuery {
        let mut select = SelectQuery::from(TABLE).order(Order::desc("created_at"));
        if let Some(text) = query.search.as_deref().filter(|t| !t.trim().is_empty()) {
            let text = text.trim();
            select = select.filter(Filter::any(vec![
                Filter::ilike("name", text),
                Filter::ilike("slug", text),
            ]));
        }
        if let Some(status) = query.status {
            select = select.filter(Filter::eq("status", status));
        }
        if let Some(limit) = query.limit {
            select = select.limit(limit);
        }
        select
    }

    pub async fn list(&self, query: &OrgQuery) -> ServiceResult<Vec<Organization>> {
        fetch_soft(self.tables.as_ref(), &Self::select_for(query)).await
    }

    pub async fn get(&self, id: Uuid) -> ServiceResult<Option<Organization>> {
        let query = SelectQuery::from(TABLE).filter(Filter::eq("id", id)).limit(1);
        let mut orgs: Vec<Organization> = fetch_soft(self.tables.as_ref(), &query).await?;
        Ok(if orgs.is_empty() {
            None
        } else {
            Some(orgs.remove(0))
        })
    }

    /// Create a tenant. A missing slug is derived from the name.
    pub async fn create(
        &self,
        name: &str,
        slug: Option<&str>,
        plan: PlanType,
    ) -> ServiceResult<Organization> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ServiceError::Invalid("organization name is required".into()));
        }
        let slug = match slug.map(str::trim).filter(|s| !s.is_empty()) {
            Some(explicit) => explicit.to_string(),
            None => slugify(name),
        };
        if slug.is_empty() {
            return Err(ServiceError::Invalid(
                "organization name yields an empty slug".into(),
            ));
        }

        let draft = OrgDraft::new(name, slug).plan(plan);
        let row = self.tables.insert(TABLE, to_row(&draft)?).await?;
        let org: Organization = decode_row(row)?;
        info!(org_id = %org.id, slug = %org.slug, "organization created");
        Ok(org)
    }

    /// Patch editable settings
    pub async fn update_settings(
        &self,
        id: Uuid,
        patch: OrgSettingsPatch,
    ) -> ServiceResult<Organization> {
        if let Some(name) = patch.name.as_deref() {
            if name.trim().is_empty() {
                return Err(ServiceError::Invalid("organization name is required".into()));
            }
        }
        if let Some(Some(domain)) = patch.custom_domain.as_ref() {
            if domain.trim().is_empty() || domain.contains(char::is_whitespace) {
                return Err(ServiceError::Invalid(format!(
                    "invalid custom domain {domain:?}"
                )));
            }
        }
        let updated = self
            .tables
            .update(TABLE, &[Filter::eq("id", id)], to_row(&patch)?)
            .await?;
        let mut orgs: Vec<Organization> = decode_rows(updated)?;
        if orgs.is_empty() {
            return Err(ServiceError::NotFound(format!("organization {id}")));
        }
        Ok(orgs.remove(0))
    }

    /// Flip the lifecycle status. The target is computed from the status
    /// the caller is looking at, so two admins racing on the same row
    /// converge instead of double-toggling.
    pub async fn toggle_status(&self, org: &Organization) -> ServiceResult<Organization> {
        let target = org.status.toggled();
        let mut patch = Row::new();
        patch.insert("status".to_string(), serde_json::json!(target));
        let updated = self
            .tables
            .update(TABLE, &[Filter::eq("id", org.id)], patch)
            .await?;
        let mut orgs: Vec<Organization> = decode_rows(updated)?;
        if orgs.is_empty() {
            return Err(ServiceError::NotFound(format!("organization {}", org.id)));
        }
        info!(org_id = %org.id, status = %target, "organization status changed");
        Ok(orgs.remove(0))
    }
}

/// A freshly onboarded tenant. The credentials appear here and nowhere
/// else; there is no API to read the password again.
#[derive(Debug)]
pub struct OnboardedOrg {
    pub org: Organization,
    pub credentials: ProvisionedCredentials,
}

/// The onboarding saga
pub struct OrgOnboarding {
    tables: Arc<dyn Tables>,
    provisioner: Arc<dyn OrgProvisioner>,
}

impl OrgOnboarding {
    pub fn new(tables: Arc<dyn Tables>, provisioner: Arc<dyn OrgProvisioner>) -> Self {
        Self {
            tables,
            provisioner,
        }
    }

    /// Create org + first admin as one logical step. If provisioning
    /// fails the org row is deleted again before the error surfaces.
    pub async fn onboard(
        &self,
        name: &str,
        plan: PlanType,
        admin_email: &str,
    ) -> ServiceResult<OnboardedOrg> {
        let admin_email = admin_email.trim();
        if !admin_email.contains('@') {
            return Err(ServiceError::Invalid(format!(
                "invalid admin email {admin_email:?}"
            )));
        }

        let directory = OrgDirectory::new(self.tables.clone());
        let org = directory.create(name, None, plan).await?;

        match self.provisioner.create_org_admin(org.id, admin_email).await {
            Ok(credentials) => {
                info!(org_id = %org.id, admin = %admin_email, "org admin provisioned");
                Ok(OnboardedOrg { org, credentials })
            }
            Err(err) => {
                warn!(org_id = %org.id, error = %err, "provisioning failed, rolling back org");
                if let Err(cleanup) = self
                    .tables
                    .delete(TABLE, &[Filter::eq("id", org.id)])
                    .await
                {
                    warn!(org_id = %org.id, error = %cleanup, "rollback delete failed");
                }
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{MemoryBackend, MemoryProvisioner};
    use serde_json::json;

    fn seeded_backend() -> Arc<MemoryBackend> {
        let backend = Arc::new(MemoryBackend::new());
        backend.seed(
            TABLE,
            vec![
                json!({
                    "id": "11111111-1111-4111-8111-111111111111",
                    "name": "Delhi Public School",
                    "slug": "delhi-public-school",
                    "status": "active",
                    "plan_type": "premium",
                    "created_at": "2026-01-02T00:00:00Z"
                }),
                json!({
                    "id": "22222222-2222-4222-8222-222222222222",
                    "name": "Sunrise Academy",
                    "slug": "sunrise-academy",
                    "status": "suspended",
                    "plan_type": "free",
                    "created_at": "2026-01-05T00:00:00Z"
                }),
            ],
        );
        backend
    }

    #[test]
    fn test_select_includes_search_and_status_clauses() {
        let query = OrgQuery::new().search("delhi").status(OrgStatus::Active);
        let select = OrgDirectory::select_for(&query);

        assert_eq!(select.table, TABLE);
        assert!(select.filters.contains(&Filter::any(vec![
            Filter::ilike("name", "delhi"),
            Filter::ilike("slug", "delhi"),
        ])));
        assert!(select
            .filters
            .contains(&Filter::Eq("status".into(), "active".into())));
    }

    #[test]
    fn test_blank_search_adds_no_clause() {
        let query = OrgQuery::new().search("   ");
        let select = OrgDirectory::select_for(&query);
        assert!(select.filters.is_empty());
    }

    #[tokio::test]
    async fn test_list_applies_filters() {
        let directory = OrgDirectory::new(seeded_backend());
        let active = directory
            .list(&OrgQuery::new().status(OrgStatus::Active))
            .await
            .unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].slug, "delhi-public-school");
    }

    #[tokio::test]
    async fn test_create_derives_slug() {
        let backend = Arc::new(MemoryBackend::new());
        let directory = OrgDirectory::new(backend.clone());
        let org = directory
            .create("St. Mary's High", None, PlanType::Standard)
            .await
            .unwrap();
        assert_eq!(org.slug, "st-mary-s-high");
        assert_eq!(org.status, OrgStatus::Active);

        let err = directory.create("   ", None, PlanType::Free).await;
        assert!(matches!(err, Err(ServiceError::Invalid(_))));
    }

    #[tokio::test]
    async fn test_toggle_sends_opposite_of_current_status() {
        let backend = seeded_backend();
        let directory = OrgDirectory::new(backend.clone());

        let orgs = directory.list(&OrgQuery::new()).await.unwrap();
        let active = orgs.iter().find(|o| o.status == OrgStatus::Active).unwrap();
        let suspended = orgs
            .iter()
            .find(|o| o.status == OrgStatus::Suspended)
            .unwrap();

        let after = directory.toggle_status(active).await.unwrap();
        assert_eq!(after.status, OrgStatus::Suspended);

        let after = directory.toggle_status(suspended).await.unwrap();
        assert_eq!(after.status, OrgStatus::Active);
    }

    #[tokio::test]
    async fn test_toggle_reactivates_inactive() {
        let backend = Arc::new(MemoryBackend::new());
        backend.seed(
            TABLE,
            vec![json!({
                "id": "33333333-3333-4333-8333-333333333333",
                "name": "Dormant School",
                "slug": "dormant-school",
                "status": "inactive",
                "plan_type": "free"
            })],
        );
        let directory = OrgDirectory::new(backend.clone());
        let org = directory.list(&OrgQuery::new()).await.unwrap().remove(0);
        let after = directory.toggle_status(&org).await.unwrap();
        assert_eq!(after.status, OrgStatus::Active);
    }

    #[tokio::test]
    async fn test_update_settings_edits_domain_and_features() {
        let backend = seeded_backend();
        let directory = OrgDirectory::new(backend.clone());
        let id: Uuid = "11111111-1111-4111-8111-111111111111".parse().unwrap();

        let patch = OrgSettingsPatch {
            custom_domain: Some(Some("dps.example.edu".to_string())),
            features: Some(std::collections::BTreeMap::from([
                ("live_streams".to_string(), true),
                ("omr".to_string(), false),
            ])),
            ..Default::default()
        };
        let updated = directory.update_settings(id, patch).await.unwrap();
        assert_eq!(updated.custom_domain.as_deref(), Some("dps.example.edu"));
        assert!(updated.feature_enabled("live_streams"));
        assert!(!updated.feature_enabled("omr"));
        // Untouched columns survive the patch
        assert_eq!(updated.name, "Delhi Public School");

        let bad = OrgSettingsPatch {
            custom_domain: Some(Some("not a domain".to_string())),
            ..Default::default()
        };
        assert!(matches!(
            directory.update_settings(id, bad).await,
            Err(ServiceError::Invalid(_))
        ));
    }

    #[tokio::test]
    async fn test_update_settings_clears_seat_cap_with_explicit_null() {
        let backend = Arc::new(MemoryBackend::new());
        backend.seed(
            TABLE,
            vec![json!({
                "id": "44444444-4444-4444-8444-444444444444",
                "name": "Capped School",
                "slug": "capped-school",
                "status": "active",
                "plan_type": "standard",
                "max_users": 50
            })],
        );
        let directory = OrgDirectory::new(backend.clone());
        let id: Uuid = "44444444-4444-4444-8444-444444444444".parse().unwrap();

        // Leaving the cap out of the patch keeps it
        let kept = directory
            .update_settings(
                id,
                OrgSettingsPatch {
                    name: Some("Capped School".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(kept.max_users, Some(50));

        // An explicit null clears it back to the plan default
        let cleared = directory
            .update_settings(
                id,
                OrgSettingsPatch {
                    max_users: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(cleared.max_users, None);
    }

    #[tokio::test]
    async fn test_onboard_happy_path_returns_credentials_once() {
        let backend = Arc::new(MemoryBackend::new());
        let provisioner = Arc::new(MemoryProvisioner::new());
        let onboarding = OrgOnboarding::new(backend.clone(), provisioner.clone());

        let onboarded = onboarding
            .onboard("Delhi Public School", PlanType::Premium, "principal@dps.test")
            .await
            .unwrap();

        assert_eq!(onboarded.org.slug, "delhi-public-school");
        assert_eq!(onboarded.credentials.email, "principal@dps.test");
        assert!(!onboarded.credentials.one_time_password.is_empty());
        // Exactly one provisioning call; nothing ever re-reads the password
        assert_eq!(provisioner.calls(), 1);
        assert_eq!(backend.table_rows(TABLE).len(), 1);
    }

    #[tokio::test]
    async fn test_onboard_rolls_back_org_when_provisioning_fails() {
        let backend = Arc::new(MemoryBackend::new());
        let provisioner = Arc::new(MemoryProvisioner::new());
        provisioner.set_failing(true);
        let onboarding = OrgOnboarding::new(backend.clone(), provisioner.clone());

        let result = onboarding
            .onboard("Delhi Public School", PlanType::Premium, "principal@dps.test")
            .await;

        assert!(matches!(result, Err(ServiceError::Backend(_))));
        assert_eq!(provisioner.calls(), 1);
        // The half-created tenant is gone
        assert!(backend.table_rows(TABLE).is_empty());
    }

    #[tokio::test]
    async fn test_onboard_rejects_bad_email_before_any_write() {
        let backend = Arc::new(MemoryBackend::new());
        let provisioner = Arc::new(MemoryProvisioner::new());
        let onboarding = OrgOnboarding::new(backend.clone(), provisioner.clone());

        let result = onboarding
            .onboard("Delhi Public School", PlanType::Free, "not-an-email")
            .await;

        assert!(matches!(result, Err(ServiceError::Invalid(_))));
        assert_eq!(provisioner.calls(), 0);
        assert!(backend.table_rows(TABLE).is_empty());
    }
}
