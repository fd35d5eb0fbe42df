//! Feature Flags and Notifications
//!
//! Flags gate platform features per environment; notifications are
//! console-sent announcements targeted at an audience.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::Role;

/// A feature flag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureFlag {
    pub id: Uuid,
    /// Stable lookup key, e.g. "omr_scanning"
    pub key: String,
    pub description: Option<String>,
    pub enabled: bool,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Payload for creating a flag
#[derive(Debug, Clone, Serialize)]
pub struct FlagDraft {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub enabled: bool,
}

/// A sent announcement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub audience: Audience,
    pub sent_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Payload for sending an announcement
#[derive(Debug, Clone, Serialize)]
pub struct NotificationDraft {
    pub title: String,
    pub body: String,
    pub audience: Audience,
}

/// Who an announcement targets. Stored as a single text column:
/// `all`, `org:<uuid>` or `role:<role>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Audience {
    All,
    Org(Uuid),
    RoleIs(Role),
}

impl Audience {
    /// Human-readable description for list views
    pub fn describe(&self) -> String {
        match self {
            Self::All => "Everyone".to_string(),
            Self::Org(id) => format!("Organization {id}"),
            Self::RoleIs(role) => format!("All {}s", role.label().to_lowercase()),
        }
    }
}

impl std::fmt::Display for Audience {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Org(id) => write!(f, "org:{id}"),
            Self::RoleIs(role) => write!(f, "role:{role}"),
        }
    }
}

impl From<Audience> for String {
    fn from(audience: Audience) -> Self {
        audience.to_string()
    }
}

impl TryFrom<String> for Audience {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value == "all" {
            return Ok(Self::All);
        }
        if let Some(id) = value.strip_prefix("org:") {
            return id
                .parse()
                .map(Self::Org)
                .map_err(|e| format!("bad org audience {value:?}: {e}"));
        }
        if let Some(role) = value.strip_prefix("role:") {
            return Role::parse(role)
                .map(Self::RoleIs)
                .ok_or_else(|| format!("unknown role audience {value:?}"));
        }
        Err(format!("unknown audience {value:?}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audience_round_trip() {
        let org_id: Uuid = "4f2c8b3a-1d5e-4a6b-9c7d-8e9f0a1b2c3d".parse().unwrap();
        for audience in [
            Audience::All,
            Audience::Org(org_id),
            Audience::RoleIs(Role::Teacher),
        ] {
            let text = audience.to_string();
            let back = Audience::try_from(text).unwrap();
            assert_eq!(back, audience);
        }
    }

    #[test]
    fn test_audience_wire_strings() {
        assert_eq!(Audience::All.to_string(), "all");
        assert_eq!(
            Audience::RoleIs(Role::OrgAdmin).to_string(),
            "role:org_admin"
        );
        assert!(Audience::try_from("everyone".to_string()).is_err());
        assert!(Audience::try_from("org:not-a-uuid".to_string()).is_err());
    }

    #[test]
    fn test_notification_decodes_audience_column() {
        let notification: Notification = serde_json::from_value(serde_json::json!({
            "id": "5a6b7c8d-9e0f-4a1b-8c2d-3e4f5a6b7c8d",
            "title": "Exam week",
            "body": "Good luck!",
            "audience": "role:student"
        }))
        .unwrap();
        assert_eq!(notification.audience, Audience::RoleIs(Role::Student));
    }
}
