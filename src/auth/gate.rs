//! Access Gate
//!
//! Runs before any gated surface renders: resolve the auth session, load
//! the matching directory row, check the role against the surface. A
//! signed-in account with no usable directory row (or the wrong role) is
//! signed out on the spot so a stale session cannot keep bouncing around
//! the console.

use std::sync::Arc;

use tracing::warn;

use crate::backend::{AuthApi, BackendResult, Filter, FetchOutcome, SelectQuery, Tables};
use crate::backend::decode_row;
use crate::model::{AccountStatus, User};

use super::policy::{can_access, Surface};

/// Outcome of gating one navigation
#[derive(Debug, Clone, PartialEq)]
pub enum GateDecision {
    /// Render the surface for this user
    Allow(User),
    /// No session; go sign in
    Login,
    /// Session existed but may not be here; it has been revoked
    Unauthorized,
}

/// The gate itself, one per console instance
pub struct AccessGate {
    auth: Arc<dyn AuthApi>,
    tables: Arc<dyn Tables>,
}

impl AccessGate {
    pub fn new(auth: Arc<dyn AuthApi>, tables: Arc<dyn Tables>) -> Self {
        Self { auth, tables }
    }

    /// Decide whether the current session may open `surface`.
    ///
    /// Backend failures bubble up as errors; callers treat them as "try
    /// again", not as a verdict about the account.
    pub async fn resolve(&self, surface: Surface) -> BackendResult<GateDecision> {
        let Some(session) = self.auth.session().await? else {
            return Ok(GateDecision::Login);
        };

        let query = SelectQuery::from("users")
            .filter(Filter::eq("auth_user_id", session.user_id))
            .limit(1);

        let rows = match self.tables.fetch(&query).await {
            FetchOutcome::Rows(rows) => rows,
            FetchOutcome::NotProvisioned => {
                warn!("users table not provisioned; revoking session");
                return self.revoke().await;
            }
            FetchOutcome::Failed(err) => return Err(err),
        };

        let Some(row) = rows.into_iter().next() else {
            warn!(user_id = %session.user_id, "session has no directory row");
            return self.revoke().await;
        };
        let user: User = decode_row(row)?;

        if user.status == AccountStatus::Suspended {
            warn!(user_id = %user.id, "suspended account attempted console access");
            return self.revoke().await;
        }

        if can_access(user.role, surface) {
            Ok(GateDecision::Allow(user))
        } else {
            warn!(user_id = %user.id, role = %user.role, "role may not open surface");
            self.revoke().await
        }
    }

    async fn revoke(&self) -> BackendResult<GateDecision> {
        if let Err(err) = self.auth.sign_out().await {
            warn!(error = %err, "sign-out during gate revocation failed");
        }
        Ok(GateDecision::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{MemoryBackend, Session};
    use crate::model::Role;
    use serde_json::json;
    use uuid::Uuid;

    fn gate_over(backend: &Arc<MemoryBackend>) -> AccessGate {
        AccessGate::new(backend.clone(), backend.clone())
    }

    fn signed_in(backend: &MemoryBackend, auth_user_id: Uuid) {
        backend.force_session(Session {
            access_token: "t".to_string(),
            user_id: auth_user_id,
            email: "staff@lectern.test".to_string(),
        });
    }

    fn directory_row(auth_user_id: Uuid, role: &str, status: &str) -> serde_json::Value {
        json!({
            "id": Uuid::new_v4(),
            "auth_user_id": auth_user_id,
            "full_name": "Gate Test",
            "email": "staff@lectern.test",
            "role": role,
            "status": status
        })
    }

    #[tokio::test]
    async fn test_no_session_redirects_to_login() {
        let backend = Arc::new(MemoryBackend::new());
        let decision = gate_over(&backend).resolve(Surface::Dashboard).await.unwrap();
        assert_eq!(decision, GateDecision::Login);
    }

    #[tokio::test]
    async fn test_matching_role_is_allowed() {
        let backend = Arc::new(MemoryBackend::new());
        let auth_id = Uuid::new_v4();
        backend.seed("users", vec![directory_row(auth_id, "super_admin", "active")]);
        signed_in(&backend, auth_id);

        let decision = gate_over(&backend)
            .resolve(Surface::Organizations)
            .await
            .unwrap();
        match decision {
            GateDecision::Allow(user) => assert_eq!(user.role, Role::SuperAdmin),
            other => panic!("expected allow, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_wrong_role_is_signed_out() {
        let backend = Arc::new(MemoryBackend::new());
        let auth_id = Uuid::new_v4();
        backend.seed("users", vec![directory_row(auth_id, "teacher", "active")]);
        signed_in(&backend, auth_id);

        let decision = gate_over(&backend)
            .resolve(Surface::Organizations)
            .await
            .unwrap();
        assert_eq!(decision, GateDecision::Unauthorized);
        // The stale session must actually be gone
        assert!(backend.session().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_directory_row_is_signed_out() {
        let backend = Arc::new(MemoryBackend::new());
        backend.provision("users");
        signed_in(&backend, Uuid::new_v4());

        let decision = gate_over(&backend).resolve(Surface::Dashboard).await.unwrap();
        assert_eq!(decision, GateDecision::Unauthorized);
        assert!(backend.session().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_suspended_account_is_signed_out() {
        let backend = Arc::new(MemoryBackend::new());
        let auth_id = Uuid::new_v4();
        backend.seed(
            "users",
            vec![directory_row(auth_id, "super_admin", "suspended")],
        );
        signed_in(&backend, auth_id);

        let decision = gate_over(&backend).resolve(Surface::Dashboard).await.unwrap();
        assert_eq!(decision, GateDecision::Unauthorized);
    }

    #[tokio::test]
    async fn test_backend_failure_is_not_a_verdict() {
        let backend = Arc::new(MemoryBackend::new());
        let auth_id = Uuid::new_v4();
        backend.break_table("users", crate::backend::BackendError::Timeout);
        signed_in(&backend, auth_id);

        let result = gate_over(&backend).resolve(Surface::Dashboard).await;
        assert!(result.is_err());
        // Session survives a transient failure
        assert!(backend.session().await.unwrap().is_some());
    }
}
