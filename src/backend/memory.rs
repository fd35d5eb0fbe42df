//! In-Memory Backend
//!
//! A complete fake of the hosted backend: tables are vectors of rows,
//! realtime is a fan-out over in-process channels, auth is a map of
//! seeded accounts. Services run against it unchanged, which is what
//! makes the screen logic testable without a live environment. The ops
//! CLI also runs on it in offline mode.
//!
//! Provisioning is modeled explicitly: a table only exists after
//! `provision`/`seed`/`insert` touched it, and reads of untouched tables
//! report `NotProvisioned` just like the real environment does.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use futures_channel::mpsc;
use futures_util::StreamExt;
use serde_json::{json, Value};
use uuid::Uuid;

use super::client::{AuthApi, Realtime, RowChange, RowChanges, Session, TableWatch, Tables};
use super::error::{BackendError, BackendResult};
use super::outcome::FetchOutcome;
use super::provision::{OrgProvisioner, ProvisionedCredentials};
use super::query::{Filter, SelectQuery};
use super::row::Row;

/// The fake backend. Interior mutability keeps the call sites identical
/// to the real client: shared reference in, rows out.
#[derive(Default)]
pub struct MemoryBackend {
    state: Mutex<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    tables: HashMap<String, Vec<Row>>,
    broken: HashMap<String, BackendError>,
    watchers: Vec<Watcher>,
    accounts: HashMap<String, SeededAccount>,
    session: Option<Session>,
}

struct Watcher {
    watch: TableWatch,
    tx: mpsc::UnboundedSender<RowChange>,
}

struct SeededAccount {
    password: String,
    user_id: Uuid,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a table as existing without adding rows
    pub fn provision(&self, table: &str) {
        self.state
            .lock()
            .unwrap()
            .tables
            .entry(table.to_string())
            .or_default();
    }

    /// Provision a table and fill it with rows. Values that are not JSON
    /// objects are ignored.
    pub fn seed(&self, table: &str, rows: Vec<Value>) {
        let mut state = self.state.lock().unwrap();
        let stored = state.tables.entry(table.to_string()).or_default();
        for value in rows {
            if let Value::Object(row) = value {
                stored.push(row);
            }
        }
    }

    /// Make every read of a table fail with the given error. Seeds the
    /// table first so the failure is not mistaken for missing provisioning.
    pub fn break_table(&self, table: &str, error: BackendError) {
        let mut state = self.state.lock().unwrap();
        state.tables.entry(table.to_string()).or_default();
        state.broken.insert(table.to_string(), error);
    }

    /// Register an account that `sign_in_with_password` will accept
    pub fn register_account(&self, email: &str, password: &str, user_id: Uuid) {
        self.state.lock().unwrap().accounts.insert(
            email.to_string(),
            SeededAccount {
                password: password.to_string(),
                user_id,
            },
        );
    }

    /// Install a session directly, skipping the sign-in exchange
    pub fn force_session(&self, session: Session) {
        self.state.lock().unwrap().session = Some(session);
    }

    /// Rows currently stored in a table (test inspection)
    pub fn table_rows(&self, table: &str) -> Vec<Row> {
        self.state
            .lock()
            .unwrap()
            .tables
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    fn fan_out(state: &mut MemoryState, table: &str, change: RowChange) {
        state.watchers.retain(|w| !w.tx.is_closed());
        for watcher in &state.watchers {
            if watcher.watch.table == table && watcher.watch.matches(change.row()) {
                let _ = watcher.tx.unbounded_send(change.clone());
            }
        }
    }
}

#[async_trait(?Send)]
impl Tables for MemoryBackend {
    async fn fetch(&self, query: &SelectQuery) -> FetchOutcome {
        let state = self.state.lock().unwrap();
        if let Some(error) = state.broken.get(&query.table) {
            return FetchOutcome::Failed(error.clone());
        }
        match state.tables.get(&query.table) {
            Some(rows) => FetchOutcome::Rows(query.apply_to(rows)),
            None => FetchOutcome::NotProvisioned,
        }
    }

    async fn insert(&self, table: &str, mut row: Row) -> BackendResult<Row> {
        let mut state = self.state.lock().unwrap();
        row.entry("id".to_string())
            .or_insert_with(|| json!(Uuid::new_v4()));
        state
            .tables
            .entry(table.to_string())
            .or_default()
            .push(row.clone());
        Self::fan_out(&mut state, table, RowChange::Insert(row.clone()));
        Ok(row)
    }

    async fn update(&self, table: &str, filters: &[Filter], patch: Row) -> BackendResult<Vec<Row>> {
        let mut state = self.state.lock().unwrap();
        let mut updated = Vec::new();
        if let Some(rows) = state.tables.get_mut(table) {
            for row in rows.iter_mut() {
                if filters.iter().all(|f| f.matches(row)) {
                    for (key, value) in &patch {
                        row.insert(key.clone(), value.clone());
                    }
                    updated.push(row.clone());
                }
            }
        }
        for row in &updated {
            Self::fan_out(&mut state, table, RowChange::Update(row.clone()));
        }
        Ok(updated)
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> BackendResult<u64> {
        let mut state = self.state.lock().unwrap();
        let mut removed = Vec::new();
        if let Some(rows) = state.tables.get_mut(table) {
            rows.retain(|row| {
                if filters.iter().all(|f| f.matches(row)) {
                    removed.push(row.clone());
                    false
                } else {
                    true
                }
            });
        }
        for row in &removed {
            Self::fan_out(&mut state, table, RowChange::Delete(row.clone()));
        }
        Ok(removed.len() as u64)
    }
}

impl Realtime for MemoryBackend {
    fn subscribe(&self, watch: TableWatch) -> RowChanges {
        let (tx, rx) = mpsc::unbounded();
        self.state
            .lock()
            .unwrap()
            .watchers
            .push(Watcher { watch, tx });
        rx.boxed_local()
    }
}

#[async_trait(?Send)]
impl AuthApi for MemoryBackend {
    async fn session(&self) -> BackendResult<Option<Session>> {
        Ok(self.state.lock().unwrap().session.clone())
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> BackendResult<Session> {
        let mut state = self.state.lock().unwrap();
        let account = state
            .accounts
            .get(email)
            .filter(|a| a.password == password)
            .ok_or(BackendError::InvalidCredentials)?;
        let session = Session {
            access_token: format!("memory-{}", Uuid::new_v4().simple()),
            user_id: account.user_id,
            email: email.to_string(),
        };
        state.session = Some(session.clone());
        Ok(session)
    }

    async fn sign_out(&self) -> BackendResult<()> {
        self.state.lock().unwrap().session = None;
        Ok(())
    }
}

/// Fake provisioning endpoint with failure injection and a call counter,
/// so onboarding flows can assert "called exactly once" and exercise the
/// rollback path.
#[derive(Default)]
pub struct MemoryProvisioner {
    state: Mutex<ProvisionerState>,
}

#[derive(Default)]
struct ProvisionerState {
    calls: u32,
    failing: bool,
}

impl MemoryProvisioner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent provisioning calls fail
    pub fn set_failing(&self, failing: bool) {
        self.state.lock().unwrap().failing = failing;
    }

    /// How many times the endpoint was hit
    pub fn calls(&self) -> u32 {
        self.state.lock().unwrap().calls
    }
}

#[async_trait(?Send)]
impl OrgProvisioner for MemoryProvisioner {
    async fn create_org_admin(
        &self,
        _org_id: Uuid,
        email: &str,
    ) -> BackendResult<ProvisionedCredentials> {
        let mut state = self.state.lock().unwrap();
        state.calls += 1;
        if state.failing {
            return Err(BackendError::api(None, "admin provisioning failed"));
        }
        Ok(ProvisionedCredentials {
            email: email.to_string(),
            one_time_password: format!("otp-{}", Uuid::new_v4().simple()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unprovisioned_table_reports_not_provisioned() {
        let backend = MemoryBackend::new();
        let outcome = backend.fetch(&SelectQuery::from("polls")).await;
        assert_eq!(outcome, FetchOutcome::NotProvisioned);

        backend.provision("polls");
        let outcome = backend.fetch(&SelectQuery::from("polls")).await;
        assert_eq!(outcome, FetchOutcome::Rows(Vec::new()));
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_fetch_filters() {
        let backend = MemoryBackend::new();
        let mut row = Row::new();
        row.insert("status".to_string(), json!("active"));
        let stored = backend.insert("organizations", row).await.unwrap();
        assert!(stored.contains_key("id"));

        let fetched = backend
            .fetch(
                &SelectQuery::from("organizations").filter(Filter::eq("status", "active")),
            )
            .await;
        assert_eq!(fetched.rows().map(|r| r.len()), Some(1));
    }

    #[tokio::test]
    async fn test_update_patches_matching_rows() {
        let backend = MemoryBackend::new();
        backend.seed(
            "users",
            vec![
                json!({"id": "u-1", "status": "active"}),
                json!({"id": "u-2", "status": "active"}),
            ],
        );

        let mut patch = Row::new();
        patch.insert("status".to_string(), json!("suspended"));
        let updated = backend
            .update("users", &[Filter::eq("id", "u-1")], patch)
            .await
            .unwrap();

        assert_eq!(updated.len(), 1);
        assert_eq!(updated[0].get("status"), Some(&json!("suspended")));

        let rows = backend.table_rows("users");
        assert_eq!(rows[1].get("status"), Some(&json!("active")));
    }

    #[tokio::test]
    async fn test_delete_returns_count() {
        let backend = MemoryBackend::new();
        backend.seed(
            "stream_messages",
            vec![
                json!({"id": "m-1", "stream_id": "s-1"}),
                json!({"id": "m-2", "stream_id": "s-2"}),
            ],
        );
        let gone = backend
            .delete("stream_messages", &[Filter::eq("stream_id", "s-1")])
            .await
            .unwrap();
        assert_eq!(gone, 1);
        assert_eq!(backend.table_rows("stream_messages").len(), 1);
    }

    #[tokio::test]
    async fn test_subscription_receives_scoped_changes() {
        let backend = MemoryBackend::new();
        backend.provision("poll_votes");

        let mut feed = backend.subscribe(
            TableWatch::new("poll_votes").filtered(Filter::eq("poll_id", "p-1")),
        );

        let mut in_scope = Row::new();
        in_scope.insert("poll_id".to_string(), json!("p-1"));
        let mut out_of_scope = Row::new();
        out_of_scope.insert("poll_id".to_string(), json!("p-2"));

        backend.insert("poll_votes", out_of_scope).await.unwrap();
        backend.insert("poll_votes", in_scope).await.unwrap();

        let change = feed.next().await.unwrap();
        match change {
            RowChange::Insert(row) => assert_eq!(row.get("poll_id"), Some(&json!("p-1"))),
            other => panic!("expected insert, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_sign_in_round_trip() {
        let backend = MemoryBackend::new();
        let user_id = Uuid::new_v4();
        backend.register_account("admin@lectern.test", "hunter2", user_id);

        assert!(backend.session().await.unwrap().is_none());
        assert!(matches!(
            backend
                .sign_in_with_password("admin@lectern.test", "wrong")
                .await,
            Err(BackendError::InvalidCredentials)
        ));

        let session = backend
            .sign_in_with_password("admin@lectern.test", "hunter2")
            .await
            .unwrap();
        assert_eq!(session.user_id, user_id);
        assert_eq!(backend.session().await.unwrap(), Some(session));

        backend.sign_out().await.unwrap();
        assert!(backend.session().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_broken_table_fails_without_hiding_provisioning() {
        let backend = MemoryBackend::new();
        backend.break_table("banners", BackendError::Timeout);
        let outcome = backend.fetch(&SelectQuery::from("banners")).await;
        assert_eq!(outcome, FetchOutcome::Failed(BackendError::Timeout));
    }
}
