//! Browser Backend Client
//!
//! gloo-net implementation of the core crate's `Tables` and `AuthApi`
//! traits, speaking the same REST dialect as the native client. The
//! session and connection settings persist in localStorage so a reload
//! keeps you signed in and pointed at the same environment.

use async_trait::async_trait;
use gloo_net::http::{Request, RequestBuilder, Response};
use serde_json::json;
use uuid::Uuid;

use lectern::backend::{
    AuthApi, BackendError, BackendResult, CreateOrgAdminRequest, FetchOutcome, Filter,
    OrgProvisioner, ProvisionedCredentials, Row, SelectQuery, Session, Tables,
    CREATE_ORG_ADMIN_PATH,
};

/// Default backend base URL (local development stack)
pub const DEFAULT_API_BASE: &str = "http://localhost:54321";

/// Default admin-server base URL for provisioning calls
pub const DEFAULT_PROVISIONER_BASE: &str = "http://localhost:8787";

const API_URL_KEY: &str = "lectern_api_url";
const ANON_KEY_KEY: &str = "lectern_anon_key";
const PROVISIONER_URL_KEY: &str = "lectern_provisioner_url";
const SESSION_KEY: &str = "lectern_session";

// ============ localStorage settings ============

fn storage_get(key: &str) -> Option<String> {
    let window = web_sys::window()?;
    let storage = window.local_storage().ok()??;
    storage.get_item(key).ok()?
}

fn storage_set(key: &str, value: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(Some(storage)) = window.local_storage() {
            let _ = storage.set_item(key, value);
        }
    }
}

fn storage_remove(key: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(Some(storage)) = window.local_storage() {
            let _ = storage.remove_item(key);
        }
    }
}

/// Get the backend base URL from local storage or use the default
pub fn get_api_base() -> String {
    storage_get(API_URL_KEY)
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
        .trim_end_matches('/')
        .to_string()
}

/// Set the backend base URL in local storage
pub fn set_api_base(url: &str) {
    storage_set(API_URL_KEY, url);
}

/// Get the public anon key from local storage (empty if unset)
pub fn get_anon_key() -> String {
    storage_get(ANON_KEY_KEY).unwrap_or_default()
}

/// Set the public anon key in local storage
pub fn set_anon_key(key: &str) {
    storage_set(ANON_KEY_KEY, key);
}

/// Get the provisioner base URL from local storage or use the default
pub fn get_provisioner_base() -> String {
    storage_get(PROVISIONER_URL_KEY)
        .unwrap_or_else(|| DEFAULT_PROVISIONER_BASE.to_string())
        .trim_end_matches('/')
        .to_string()
}

/// Set the provisioner base URL in local storage
pub fn set_provisioner_base(url: &str) {
    storage_set(PROVISIONER_URL_KEY, url);
}

fn load_session() -> Option<Session> {
    let raw = storage_get(SESSION_KEY)?;
    serde_json::from_str(&raw).ok()
}

fn store_session(session: &Session) {
    if let Ok(raw) = serde_json::to_string(session) {
        storage_set(SESSION_KEY, &raw);
    }
}

fn clear_session() {
    storage_remove(SESSION_KEY);
}

// ============ Query-string rendering ============

/// Render query pairs into a percent-encoded query string. Keys are
/// plain column names and never need encoding; values may carry `*`,
/// parentheses and spaces from search input.
pub fn query_string(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

// ============ The client ============

/// Browser-side client over the hosted backend. Stateless apart from
/// localStorage; cheap to clone behind an `Arc`.
#[derive(Default)]
pub struct BrowserClient;

impl BrowserClient {
    pub fn new() -> Self {
        Self
    }

    fn table_url(&self, table: &str, pairs: &[(String, String)]) -> String {
        let base = format!("{}/rest/v1/{}", get_api_base(), table);
        if pairs.is_empty() {
            base
        } else {
            format!("{}?{}", base, query_string(pairs))
        }
    }

    /// Bearer token: the session token once signed in, the anon key before
    fn bearer(&self) -> String {
        load_session()
            .map(|s| s.access_token)
            .unwrap_or_else(get_anon_key)
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &get_anon_key())
            .header("Authorization", &format!("Bearer {}", self.bearer()))
    }

    async fn read_rows(&self, response: Response) -> BackendResult<Vec<Row>> {
        if response.ok() {
            response
                .json()
                .await
                .map_err(|e| BackendError::Decode(e.to_string()))
        } else {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            Err(parse_error_body(status, &text))
        }
    }
}

#[async_trait(?Send)]
impl Tables for BrowserClient {
    async fn fetch(&self, query: &SelectQuery) -> FetchOutcome {
        let result = async {
            let url = self.table_url(&query.table, &query.to_query_pairs());
            let response = self
                .authed(Request::get(&url))
                .send()
                .await
                .map_err(transport_error)?;
            self.read_rows(response).await
        }
        .await;
        FetchOutcome::from_result(result)
    }

    async fn insert(&self, table: &str, row: Row) -> BackendResult<Row> {
        let url = self.table_url(table, &[]);
        let response = self
            .authed(Request::post(&url))
            .header("Prefer", "return=representation")
            .json(&row)
            .map_err(transport_error)?
            .send()
            .await
            .map_err(transport_error)?;
        let mut rows = self.read_rows(response).await?;
        if rows.is_empty() {
            Err(BackendError::Decode(
                "insert returned no representation".to_string(),
            ))
        } else {
            Ok(rows.remove(0))
        }
    }

    async fn update(&self, table: &str, filters: &[Filter], patch: Row) -> BackendResult<Vec<Row>> {
        let pairs: Vec<(String, String)> = filters.iter().map(Filter::to_query_pair).collect();
        let url = self.table_url(table, &pairs);
        let response = self
            .authed(Request::patch(&url))
            .header("Prefer", "return=representation")
            .json(&patch)
            .map_err(transport_error)?
            .send()
            .await
            .map_err(transport_error)?;
        self.read_rows(response).await
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> BackendResult<u64> {
        let pairs: Vec<(String, String)> = filters.iter().map(Filter::to_query_pair).collect();
        let url = self.table_url(table, &pairs);
        let response = self
            .authed(Request::delete(&url))
            .header("Prefer", "return=representation")
            .send()
            .await
            .map_err(transport_error)?;
        let rows = self.read_rows(response).await?;
        Ok(rows.len() as u64)
    }
}

#[async_trait(?Send)]
impl AuthApi for BrowserClient {
    async fn session(&self) -> BackendResult<Option<Session>> {
        Ok(load_session())
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> BackendResult<Session> {
        let url = format!("{}/auth/v1/token?grant_type=password", get_api_base());
        let response = Request::post(&url)
            .header("apikey", &get_anon_key())
            .json(&json!({"email": email, "password": password}))
            .map_err(transport_error)?
            .send()
            .await
            .map_err(transport_error)?;

        if response.status() == 400 {
            return Err(BackendError::InvalidCredentials);
        }
        if !response.ok() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(parse_error_body(status, &text));
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))?;
        let session = Session {
            access_token: body.access_token,
            user_id: body.user.id,
            email: body.user.email,
        };
        store_session(&session);
        Ok(session)
    }

    async fn sign_out(&self) -> BackendResult<()> {
        let Some(session) = load_session() else {
            return Ok(());
        };
        clear_session();

        let url = format!("{}/auth/v1/logout", get_api_base());
        let response = Request::post(&url)
            .header("apikey", &get_anon_key())
            .header("Authorization", &format!("Bearer {}", session.access_token))
            .send()
            .await
            .map_err(transport_error)?;

        // The local session is gone either way; only report hard failures
        if response.ok() || response.status() == 401 {
            Ok(())
        } else {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            Err(parse_error_body(status, &text))
        }
    }
}

/// Provisioning client against the admin server
#[derive(Default)]
pub struct BrowserProvisioner;

impl BrowserProvisioner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait(?Send)]
impl OrgProvisioner for BrowserProvisioner {
    async fn create_org_admin(
        &self,
        org_id: Uuid,
        email: &str,
    ) -> BackendResult<ProvisionedCredentials> {
        let url = format!("{}{}", get_provisioner_base(), CREATE_ORG_ADMIN_PATH);
        let body = CreateOrgAdminRequest {
            org_id,
            email: email.to_string(),
        };
        let response = Request::post(&url)
            .json(&body)
            .map_err(transport_error)?
            .send()
            .await
            .map_err(transport_error)?;

        if response.ok() {
            response
                .json()
                .await
                .map_err(|e| BackendError::Decode(e.to_string()))
        } else {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            Err(parse_error_body(status, &text))
        }
    }
}

/// Browsers do not expose why a fetch failed, so everything maps to the
/// transport variant with the message preserved
fn transport_error(e: gloo_net::Error) -> BackendError {
    BackendError::Transport(e.to_string())
}

/// Parse the backend's error body, falling back to the raw text
fn parse_error_body(status: u16, text: &str) -> BackendError {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        code: Option<String>,
        message: Option<String>,
    }

    match serde_json::from_str::<ErrorBody>(text) {
        Ok(body) => BackendError::api(
            body.code,
            body.message.unwrap_or_else(|| format!("HTTP {status}")),
        ),
        Err(_) => BackendError::api(None, format!("HTTP {status}: {text}")),
    }
}

/// Token exchange response from the auth endpoint
#[derive(serde::Deserialize)]
struct TokenResponse {
    access_token: String,
    user: TokenUser,
}

#[derive(serde::Deserialize)]
struct TokenUser {
    id: Uuid,
    email: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use lectern::backend::Order;

    #[test]
    fn test_query_string_encodes_values_only() {
        let query = SelectQuery::from("users")
            .filter(Filter::ilike("full_name", "rao & co"))
            .order(Order::asc("full_name"))
            .limit(20);

        let rendered = query_string(&query.to_query_pairs());
        assert_eq!(
            rendered,
            "select=%2A&full_name=ilike.%2Arao%20%26%20co%2A&order=full_name.asc&limit=20"
        );
    }

    #[test]
    fn test_query_string_or_group() {
        let query = SelectQuery::from("users").filter(Filter::any(vec![
            Filter::ilike("full_name", "dev"),
            Filter::ilike("email", "dev"),
        ]));

        let rendered = query_string(&query.to_query_pairs());
        assert!(rendered.starts_with("select=%2A&or=%28full_name.ilike."));
    }

    #[test]
    fn test_parse_error_body_keeps_code() {
        let err = parse_error_body(404, r#"{"code":"42P01","message":"missing"}"#);
        assert!(err.is_missing_relation());

        let fallback = parse_error_body(502, "<html>bad gateway</html>");
        assert_eq!(fallback.code(), None);
    }
}
