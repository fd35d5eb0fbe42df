//! Organization Admin Provisioning
//!
//! Creating an organization's first admin account is privileged work
//! (service-role key, auth admin API), so it runs behind a server
//! endpoint rather than in the client. The client boundary only knows
//! the endpoint's contract: org id and email in, one-time credentials
//! out.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::BackendResult;

/// Endpoint path on the provisioning server
pub const CREATE_ORG_ADMIN_PATH: &str = "/api/create-org-admin";

/// Credentials for a freshly provisioned org admin. The password is
/// generated server-side and never stored client-side; whoever calls the
/// provisioner gets exactly one look at it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvisionedCredentials {
    pub email: String,
    pub one_time_password: String,
}

/// The provisioning endpoint
#[async_trait(?Send)]
pub trait OrgProvisioner {
    /// Create the initial admin account for an organization
    async fn create_org_admin(
        &self,
        org_id: Uuid,
        email: &str,
    ) -> BackendResult<ProvisionedCredentials>;
}

/// Request body for the provisioning endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateOrgAdminRequest {
    pub org_id: Uuid,
    pub email: String,
}
