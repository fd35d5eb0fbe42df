//! User Entities
//!
//! Directory rows for everyone who can sign in: platform staff, org
//! admins, teachers and students. The directory row is distinct from the
//! auth-layer account; `auth_user_id` links the two.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A platform user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    /// Auth-layer account id, absent until first sign-in completes
    pub auth_user_id: Option<Uuid>,
    pub full_name: String,
    pub email: String,
    pub role: Role,
    pub status: AccountStatus,
    /// Tenant scope; platform staff have none
    pub org_id: Option<Uuid>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
}

/// What a user is allowed to be
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Platform staff with the full console
    SuperAdmin,
    /// Administers a single organization
    OrgAdmin,
    Teacher,
    Student,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SuperAdmin => "super_admin",
            Self::OrgAdmin => "org_admin",
            Self::Teacher => "teacher",
            Self::Student => "student",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::SuperAdmin => "Super Admin",
            Self::OrgAdmin => "Org Admin",
            Self::Teacher => "Teacher",
            Self::Student => "Student",
        }
    }

    /// Parse a role name as typed on the CLI or a filter dropdown
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "super_admin" | "super-admin" => Some(Self::SuperAdmin),
            "org_admin" | "org-admin" => Some(Self::OrgAdmin),
            "teacher" => Some(Self::Teacher),
            "student" => Some(Self::Student),
            _ => None,
        }
    }

    /// All roles, for filter dropdowns
    pub fn all() -> [Role; 4] {
        [Self::SuperAdmin, Self::OrgAdmin, Self::Teacher, Self::Student]
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sign-in eligibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    Active,
    Suspended,
}

impl AccountStatus {
    pub fn toggled(self) -> Self {
        match self {
            Self::Active => Self::Suspended,
            Self::Suspended => Self::Active,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Suspended => "suspended",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Suspended => "Suspended",
        }
    }
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload for creating a directory row
#[derive(Debug, Clone, Serialize)]
pub struct UserDraft {
    pub full_name: String,
    pub email: String,
    pub role: Role,
    pub status: AccountStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_user_id: Option<Uuid>,
}

impl UserDraft {
    pub fn new(full_name: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            full_name: full_name.into(),
            email: email.into(),
            role,
            status: AccountStatus::Active,
            org_id: None,
            auth_user_id: None,
        }
    }

    pub fn org(mut self, org_id: Uuid) -> Self {
        self.org_id = Some(org_id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_status_toggle() {
        assert_eq!(AccountStatus::Active.toggled(), AccountStatus::Suspended);
        assert_eq!(AccountStatus::Suspended.toggled(), AccountStatus::Active);
    }

    #[test]
    fn test_role_wire_format() {
        assert_eq!(
            serde_json::to_value(Role::SuperAdmin).unwrap(),
            serde_json::json!("super_admin")
        );
        assert_eq!(Role::parse("org-admin"), Some(Role::OrgAdmin));
        assert_eq!(Role::parse("principal"), None);
    }

    #[test]
    fn test_user_decodes_without_optional_fields() {
        let user: User = serde_json::from_value(serde_json::json!({
            "id": "7d3f2b52-9c6f-4a1e-8f5a-1c2d3e4f5a6b",
            "full_name": "Meera Raghavan",
            "email": "meera@school.test",
            "role": "teacher",
            "status": "active"
        }))
        .unwrap();
        assert_eq!(user.role, Role::Teacher);
        assert!(user.org_id.is_none());
        assert!(user.last_login_at.is_none());
    }
}
