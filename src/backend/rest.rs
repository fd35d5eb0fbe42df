//! REST Backend Client
//!
//! Native reqwest client for the hosted backend's REST and auth
//! endpoints, used by the ops CLI and anything else running outside a
//! browser. Speaks the same dialect `SelectQuery` renders to.

use std::sync::Mutex;

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use super::client::{AuthApi, Session, Tables};
use super::error::{BackendError, BackendResult};
use super::outcome::FetchOutcome;
use super::provision::{
    CreateOrgAdminRequest, OrgProvisioner, ProvisionedCredentials, CREATE_ORG_ADMIN_PATH,
};
use super::query::{Filter, SelectQuery};
use super::row::Row;
use async_trait::async_trait;

/// Configuration for the REST client
#[derive(Debug, Clone)]
pub struct RestConfig {
    /// Base URL of the hosted environment (e.g. "http://localhost:54321")
    pub base_url: String,
    /// Public anon key sent as `apikey` on every request
    pub anon_key: String,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:54321".to_string(),
            anon_key: String::new(),
            request_timeout_ms: 10_000,
        }
    }
}

/// REST client over the hosted backend
pub struct RestBackend {
    client: Client,
    config: RestConfig,
    session: Mutex<Option<Session>>,
}

impl RestBackend {
    /// Create a new client with the given configuration
    pub fn new(config: RestConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(config.request_timeout_ms))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            config,
            session: Mutex::new(None),
        }
    }

    /// The current configuration
    pub fn config(&self) -> &RestConfig {
        &self.config
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.config.base_url, table)
    }

    /// Bearer token: the session token once signed in, the anon key before
    fn bearer(&self) -> String {
        self.session
            .lock()
            .unwrap()
            .as_ref()
            .map(|s| s.access_token.clone())
            .unwrap_or_else(|| self.config.anon_key.clone())
    }

    fn authed(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.config.anon_key)
            .header("Authorization", format!("Bearer {}", self.bearer()))
    }

    async fn read_rows(&self, response: reqwest::Response) -> BackendResult<Vec<Row>> {
        if response.status().is_success() {
            response.json().await.map_err(transport_error)
        } else {
            let status = response.status().as_u16();
            let text = response.text().await.unwrap_or_default();
            Err(parse_error_body(status, &text))
        }
    }
}

#[async_trait(?Send)]
impl Tables for RestBackend {
    async fn fetch(&self, query: &SelectQuery) -> FetchOutcome {
        let result = async {
            let response = self
                .authed(self.client.get(self.table_url(&query.table)))
                .query(&query.to_query_pairs())
                .send()
                .await
                .map_err(transport_error)?;
            self.read_rows(response).await
        }
        .await;
        FetchOutcome::from_result(result)
    }

    async fn insert(&self, table: &str, row: Row) -> BackendResult<Row> {
        let response = self
            .authed(self.client.post(self.table_url(table)))
            .header("Prefer", "return=representation")
            .json(&row)
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
        let response = self
            .authed(self.client.patch(self.table_url(table)))
            .header("Prefer", "return=representation")
            .query(&pairs)
            .json(&patch)
            .send()
            .await
            .map_err(transport_error)?;
        self.read_rows(response).await
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> BackendResult<u64> {
        let pairs: Vec<(String, String)> = filters.iter().map(Filter::to_query_pair).collect();
        let response = self
            .authed(self.client.delete(self.table_url(table)))
            .header("Prefer", "return=representation")
            .query(&pairs)
            .send()
            .await
            .map_err(transport_error)?;
        let rows = self.read_rows(response).await?;
        Ok(rows.len() as u64)
    }
}

#[async_trait(?Send)]
impl AuthApi for RestBackend {
    async fn session(&self) -> BackendResult<Option<Session>> {
        Ok(self.session.lock().unwrap().clone())
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> BackendResult<Session> {
        let url = format!(
            "{}/auth/v1/token?grant_type=password",
            self.config.base_url
        );
        let response = self
            .client
            .post(&url)
            .header("apikey", &self.config.anon_key)
            .json(&json!({"email": email, "password": password}))
            .send()
            .await
            .map_err(transport_error)?;

        if response.status() == reqwest::StatusCode::BAD_REQUEST {
            return Err(BackendError::InvalidCredentials);
        }
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let text = response.text().await.unwrap_or_default();
            return Err(parse_error_body(status, &text));
        }

        let body: TokenResponse = response.json().await.map_err(transport_error)?;
        let session = Session {
            access_token: body.access_token,
            user_id: body.user.id,
            email: body.user.email,
        };
        *self.session.lock().unwrap() = Some(session.clone());
        Ok(session)
    }

    async fn sign_out(&self) -> BackendResult<()> {
        let token = {
            let mut held = self.session.lock().unwrap();
            match held.take() {
                Some(session) => session.access_token,
                None => return Ok(()),
            }
        };
        let url = format!("{}/auth/v1/logout", self.config.base_url);
        let response = self
            .client
            .post(&url)
            .header("apikey", &self.config.anon_key)
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .map_err(transport_error)?;

        // The local session is gone either way; only report hard failures
        if response.status().is_success() || response.status().as_u16() == 401 {
            Ok(())
        } else {
            let status = response.status().as_u16();
            let text = response.text().await.unwrap_or_default();
            Err(parse_error_body(status, &text))
        }
    }
}

/// Provisioning client against the admin server that fronts the
/// privileged auth operations
pub struct RestProvisioner {
    client: Client,
    base_url: String,
}

impl RestProvisioner {
    pub fn new(base_url: impl Into<String>, request_timeout_ms: u64) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(request_timeout_ms))
            .build()
            .expect("Failed to create HTTP client");
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait(?Send)]
impl OrgProvisioner for RestProvisioner {
    async fn create_org_admin(
        &self,
        org_id: Uuid,
        email: &str,
    ) -> BackendResult<ProvisionedCredentials> {
        let url = format!("{}{}", self.base_url, CREATE_ORG_ADMIN_PATH);
        let body = CreateOrgAdminRequest {
            org_id,
            email: email.to_string(),
        };
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        if response.status().is_success() {
            response.json().await.map_err(transport_error)
        } else {
            let status = response.status().as_u16();
            let text = response.text().await.unwrap_or_default();
            Err(parse_error_body(status, &text))
        }
    }
}

fn transport_error(e: reqwest::Error) -> BackendError {
    if e.is_timeout() {
        BackendError::Timeout
    } else if e.is_connect() {
        BackendError::Unavailable
    } else {
        BackendError::Transport(e.to_string())
    }
}

/// Parse the backend's error body. Falls back to the raw text so a
/// misbehaving proxy still produces something readable.
fn parse_error_body(status: u16, text: &str) -> BackendError {
    #[derive(Deserialize)]
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
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    user: TokenUser,
}

#[derive(Debug, Deserialize)]
struct TokenUser {
    id: Uuid,
    email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RestConfig::default();
        assert_eq!(config.base_url, "http://localhost:54321");
        assert_eq!(config.request_timeout_ms, 10_000);
    }

    #[test]
    fn test_table_url() {
        let backend = RestBackend::new(RestConfig::default());
        assert_eq!(
            backend.table_url("organizations"),
            "http://localhost:54321/rest/v1/organizations"
        );
    }

    #[test]
    fn test_bearer_prefers_session_token() {
        let config = RestConfig {
            anon_key: "anon".to_string(),
            ..RestConfig::default()
        };
        let backend = RestBackend::new(config);
        assert_eq!(backend.bearer(), "anon");

        *backend.session.lock().unwrap() = Some(Session {
            access_token: "jwt".to_string(),
            user_id: Uuid::new_v4(),
            email: "a@b.test".to_string(),
        });
        assert_eq!(backend.bearer(), "jwt");
    }

    #[test]
    fn test_parse_error_body_extracts_code() {
        let err = parse_error_body(
            404,
            r#"{"code":"42P01","message":"relation \"public.polls\" does not exist"}"#,
        );
        assert!(err.is_missing_relation());

        let fallback = parse_error_body(502, "<html>bad gateway</html>");
        assert_eq!(fallback.code(), None);
        assert!(fallback.to_string().contains("502"));
    }
}
