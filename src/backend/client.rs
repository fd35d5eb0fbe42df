//! Client Boundary Traits
//!
//! Every screen and service talks to the hosted backend through these
//! traits instead of a concrete transport. Production wires in the REST
//! client (or the browser client in the UI crate); tests wire in the
//! in-memory fake. Nothing above this boundary knows which one it got.

use async_trait::async_trait;
use futures_util::stream::LocalBoxStream;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::BackendResult;
use super::outcome::FetchOutcome;
use super::query::{Filter, SelectQuery};
use super::row::Row;

/// Table reads and writes
#[async_trait(?Send)]
pub trait Tables {
    /// Run a select query. Missing tenant tables surface as
    /// `FetchOutcome::NotProvisioned`, not as errors.
    async fn fetch(&self, query: &SelectQuery) -> FetchOutcome;

    /// Insert one row and return it as stored (with generated columns)
    async fn insert(&self, table: &str, row: Row) -> BackendResult<Row>;

    /// Patch all rows matching the filters; returns the rows as updated
    async fn update(&self, table: &str, filters: &[Filter], patch: Row) -> BackendResult<Vec<Row>>;

    /// Delete all rows matching the filters; returns how many went away
    async fn delete(&self, table: &str, filters: &[Filter]) -> BackendResult<u64>;
}

/// Row-change subscriptions
pub trait Realtime {
    /// Subscribe to changes on a table. The subscription lives as long as
    /// the returned stream; dropping the stream tears it down.
    fn subscribe(&self, watch: TableWatch) -> RowChanges;
}

/// The hosted auth endpoints
#[async_trait(?Send)]
pub trait AuthApi {
    /// The currently held session, if any
    async fn session(&self) -> BackendResult<Option<Session>>;

    /// Exchange credentials for a session
    async fn sign_in_with_password(&self, email: &str, password: &str) -> BackendResult<Session>;

    /// Drop the current session
    async fn sign_out(&self) -> BackendResult<()>;
}

/// What a realtime subscription watches
#[derive(Debug, Clone, PartialEq)]
pub struct TableWatch {
    pub table: String,
    /// Optional server-side narrowing, usually an `Eq` on a foreign key
    pub filter: Option<Filter>,
}

impl TableWatch {
    /// Watch every change on a table
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            filter: None,
        }
    }

    /// Narrow the subscription to rows matching the filter
    pub fn filtered(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Whether a changed row falls inside this subscription
    pub fn matches(&self, row: &Row) -> bool {
        self.filter.as_ref().map(|f| f.matches(row)).unwrap_or(true)
    }
}

/// One change to one row. For deletes the row carries whatever identifying
/// columns the backend includes, at minimum the primary key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "row", rename_all = "snake_case")]
pub enum RowChange {
    Insert(Row),
    Update(Row),
    Delete(Row),
}

impl RowChange {
    /// The affected row
    pub fn row(&self) -> &Row {
        match self {
            Self::Insert(row) | Self::Update(row) | Self::Delete(row) => row,
        }
    }

    /// Take ownership of the affected row
    pub fn into_row(self) -> Row {
        match self {
            Self::Insert(row) | Self::Update(row) | Self::Delete(row) => row,
        }
    }
}

/// Stream of row changes for one subscription. Boxed and non-`Send`
/// because the browser transport is single-threaded.
pub type RowChanges = LocalBoxStream<'static, RowChange>;

/// A signed-in auth session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token for subsequent requests
    pub access_token: String,
    /// Auth-layer user id (not the directory row id)
    pub user_id: Uuid,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_table_watch_filtering() {
        let watch = TableWatch::new("stream_messages").filtered(Filter::eq("stream_id", "s-1"));

        let mut in_scope = Row::new();
        in_scope.insert("stream_id".to_string(), json!("s-1"));
        let mut out_of_scope = Row::new();
        out_of_scope.insert("stream_id".to_string(), json!("s-2"));

        assert!(watch.matches(&in_scope));
        assert!(!watch.matches(&out_of_scope));
        assert!(TableWatch::new("stream_messages").matches(&out_of_scope));
    }

    #[test]
    fn test_row_change_wire_shape() {
        let mut row = Row::new();
        row.insert("id".to_string(), json!("m-1"));
        let change = RowChange::Insert(row);

        let encoded = serde_json::to_value(&change).unwrap();
        assert_eq!(encoded, json!({"type": "insert", "row": {"id": "m-1"}}));

        let decoded: RowChange = serde_json::from_value(encoded).unwrap();
        assert_eq!(decoded, change);
    }
}
