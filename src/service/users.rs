//! User Directory
//!
//! List/search across the user table plus the two mutations the console
//! offers: suspend/reactivate and role changes.

use std::sync::Arc;

use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::backend::{decode_row, decode_rows, to_row, Filter, Order, Row, SelectQuery, Tables};
use crate::model::{AccountStatus, Role, User, UserDraft};

use super::{fetch_soft, ServiceError, ServiceResult};

const TABLE: &str = "users";

/// Filters for the users list screen
#[derive(Debug, Clone, Default)]
pub struct UserQuery {
    /// Matches name or email, case-insensitive
    pub search: Option<String>,
    pub role: Option<Role>,
    pub status: Option<AccountStatus>,
    pub org_id: Option<Uuid>,
    pub limit: Option<usize>,
}

impl UserQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    pub fn role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn status(mut self, status: AccountStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn org(mut self, org_id: Uuid) -> Self {
        self.org_id = Some(org_id);
        self
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }
}

/// The user directory
pub struct UserDirectory {
    tables: Arc<dyn Tables>,
}

impl UserDirectory {
    pub fn new(tables: Arc<dyn Tables>) -> Self {
        Self { tables }
    }

    /// Build the list query: newest first, search across name and email
    pub fn select_for(query: &UserQuery) -> SelectQuery {
        let mut select = SelectQuery::from(TABLE).order(Order::desc("created_at"));
        if let Some(text) = query.search.as_deref().filter(|t| !t.trim().is_empty()) {
            let text = text.trim();
            select = select.filter(Filter::any(vec![
                Filter::ilike("full_name", text),
                Filter::ilike("email", text),
            ]));
        }
        if let Some(role) = query.role {
            select = select.filter(Filter::eq("role", role));
        }
        if let Some(status) = query.status {
            select = select.filter(Filter::eq("status", status));
        }
        if let Some(org_id) = query.org_id {
            select = select.filter(Filter::eq("org_id", org_id));
        }
        if let Some(limit) = query.limit {
            select = select.limit(limit);
        }
        select
    }

    pub async fn list(&self, query: &UserQuery) -> ServiceResult<Vec<User>> {
        fetch_soft(self.tables.as_ref(), &Self::select_for(query)).await
    }

    /// Create a directory row (the auth account is provisioned elsewhere)
    pub async fn create(&self, draft: UserDraft) -> ServiceResult<User> {
        if draft.full_name.trim().is_empty() {
            return Err(ServiceError::Invalid("full name is required".into()));
        }
        if !draft.email.contains('@') {
            return Err(ServiceError::Invalid(format!(
                "invalid email {:?}",
                draft.email
            )));
        }
        let row = self.tables.insert(TABLE, to_row(&draft)?).await?;
        Ok(decode_row(row)?)
    }

    /// Flip between active and suspended, computed from the row the
    /// caller is looking at
    pub async fn toggle_status(&self, user: &User) -> ServiceResult<User> {
        let target = user.status.toggled();
        let mut patch = Row::new();
        patch.insert("status".to_string(), json!(target));
        let updated = self
            .tables
            .update(TABLE, &[Filter::eq("id", user.id)], patch)
            .await?;
        let mut users: Vec<User> = decode_rows(updated)?;
        if users.is_empty() {
            return Err(ServiceError::NotFound(format!("user {}", user.id)));
        }
        info!(user_id = %user.id, status = %target, "user status changed");
        Ok(users.remove(0))
    }

    /// Change a user's role
    pub async fn set_role(&self, id: Uuid, role: Role) -> ServiceResult<User> {
        let mut patch = Row::new();
        patch.insert("role".to_string(), json!(role));
        let updated = self
            .tables
            .update(TABLE, &[Filter::eq("id", id)], patch)
            .await?;
        let mut users: Vec<User> = decode_rows(updated)?;
        if users.is_empty() {
            return Err(ServiceError::NotFound(format!("user {id}")));
        }
        info!(user_id = %id, role = %role, "user role changed");
        Ok(users.remove(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;

    fn seeded_backend() -> Arc<MemoryBackend> {
        let backend = Arc::new(MemoryBackend::new());
        backend.seed(
            TABLE,
            vec![
                json!({
                    "id": "aaaaaaaa-aaaa-4aaa-8aaa-aaaaaaaaaaaa",
                    "full_name": "Meera Raghavan",
                    "email": "meera@dps.test",
                    "role": "teacher",
                    "status": "active",
                    "org_id": "11111111-1111-4111-8111-111111111111"
                }),
                json!({
                    "id": "bbbbbbbb-bbbb-4bbb-8bbb-bbbbbbbbbbbb",
                    "full_name": "Anil Kumar",
                    "email": "anil@dps.test",
                    "role": "student",
                    "status": "suspended",
                    "org_id": "11111111-1111-4111-8111-111111111111"
                }),
            ],
        );
        backend
    }

    #[test]
    fn test_select_search_covers_name_and_email() {
        let select = UserDirectory::select_for(&UserQuery::new().search("meera"));
        assert!(select.filters.contains(&Filter::any(vec![
            Filter::ilike("full_name", "meera"),
            Filter::ilike("email", "meera"),
        ])));
    }

    #[test]
    fn test_select_role_and_org_clauses() {
        let org_id: Uuid = "11111111-1111-4111-8111-111111111111".parse().unwrap();
        let select =
            UserDirectory::select_for(&UserQuery::new().role(Role::Teacher).org(org_id));
        assert!(select
            .filters
            .contains(&Filter::Eq("role".into(), "teacher".into())));
        assert!(select
            .filters
            .contains(&Filter::Eq("org_id".into(), org_id.to_string())));
    }

    #[tokio::test]
    async fn test_toggle_suspends_and_reactivates() {
        let backend = seeded_backend();
        let directory = UserDirectory::new(backend.clone());
        let users = directory.list(&UserQuery::new()).await.unwrap();

        let active = users
            .iter()
            .find(|u| u.status == AccountStatus::Active)
            .unwrap();
        let suspended = users
            .iter()
            .find(|u| u.status == AccountStatus::Suspended)
            .unwrap();

        assert_eq!(
            directory.toggle_status(active).await.unwrap().status,
            AccountStatus::Suspended
        );
        assert_eq!(
            directory.toggle_status(suspended).await.unwrap().status,
            AccountStatus::Active
        );
    }

    #[tokio::test]
    async fn test_set_role_patches_single_row() {
        let backend = seeded_backend();
        let directory = UserDirectory::new(backend.clone());
        let id: Uuid = "aaaaaaaa-aaaa-4aaa-8aaa-aaaaaaaaaaaa".parse().unwrap();

        let user = directory.set_role(id, Role::OrgAdmin).await.unwrap();
        assert_eq!(user.role, Role::OrgAdmin);

        let others = directory
            .list(&UserQuery::new().role(Role::Student))
            .await
            .unwrap();
        assert_eq!(others.len(), 1);
    }

    #[tokio::test]
    async fn test_create_validates_email() {
        let directory = UserDirectory::new(Arc::new(MemoryBackend::new()));
        let result = directory
            .create(UserDraft::new("No Email", "nope", Role::Student))
            .await;
        assert!(matches!(result, Err(ServiceError::Invalid(_))));
    }
}
