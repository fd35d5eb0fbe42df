//! Organization Entities
//!
//! Tenants of the platform. Every org-scoped row elsewhere carries an
//! `org_id` pointing here.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-org switches the settings screen exposes. Keys missing from an
/// org's map count as off.
pub const ORG_FEATURE_KEYS: [&str; 4] = ["live_streams", "quizzes", "omr", "chat"];

/// A tenant organization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub id: Uuid,
    pub name: String,
    /// URL-safe identifier, unique per platform
    pub slug: String,
    pub status: OrgStatus,
    pub plan_type: PlanType,
    /// Seat cap; `None` means the plan default applies
    pub max_users: Option<u32>,
    /// Domain the tenant serves its pages from, if it brought one
    pub custom_domain: Option<String>,
    /// Per-org feature switches
    #[serde(default)]
    pub features: BTreeMap<String, bool>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Organization {
    pub fn feature_enabled(&self, key: &str) -> bool {
        self.features.get(key).copied().unwrap_or(false)
    }
}

/// Organization lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrgStatus {
    Active,
    Suspended,
    /// Provisioned but never activated
    Inactive,
}

impl OrgStatus {
    /// The status a toggle action moves to. Suspending is only offered
    /// from `Active`; both dormant states reactivate.
    pub fn toggled(self) -> Self {
        match self {
            Self::Active => Self::Suspended,
            Self::Suspended | Self::Inactive => Self::Active,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Suspended => "suspended",
            Self::Inactive => "inactive",
        }
    }

    /// Human-readable badge text
    pub fn label(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Suspended => "Suspended",
            Self::Inactive => "Inactive",
        }
    }
}

impl std::fmt::Display for OrgStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Subscription plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanType {
    Free,
    Standard,
    Premium,
}

impl PlanType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Standard => "standard",
            Self::Premium => "premium",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Free => "Free",
            Self::Standard => "Standard",
            Self::Premium => "Premium",
        }
    }

    /// Parse a plan name as typed on the CLI
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "free" => Some(Self::Free),
            "standard" => Some(Self::Standard),
            "premium" => Some(Self::Premium),
            _ => None,
        }
    }
}

impl std::fmt::Display for PlanType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload for creating an organization. The backend fills id, status
/// and timestamps.
#[derive(Debug, Clone, Serialize)]
pub struct OrgDraft {
    pub name: String,
    pub slug: String,
    pub plan_type: PlanType,
    pub status: OrgStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_users: Option<u32>,
}

impl OrgDraft {
    /// New draft in the default state (active, free plan)
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slug: slug.into(),
            plan_type: PlanType::Free,
            status: OrgStatus::Active,
            max_users: None,
        }
    }

    pub fn plan(mut self, plan: PlanType) -> Self {
        self.plan_type = plan;
        self
    }

    pub fn max_users(mut self, cap: u32) -> Self {
        self.max_users = Some(cap);
        self
    }
}

/// Editable subset of org settings. The clearable fields use two
/// `Option` layers: the outer `None` leaves the column alone, while
/// `Some(None)` writes an explicit null so the stored value goes away.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OrgSettingsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_type: Option<PlanType>,
    /// `Some(None)` clears the cap back to the plan default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_users: Option<Option<u32>>,
    /// `Some(None)` detaches the domain
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_domain: Option<Option<String>>,
    /// Replaces the whole feature map when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<BTreeMap<String, bool>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_toggle_targets() {
        assert_eq!(OrgStatus::Active.toggled(), OrgStatus::Suspended);
        assert_eq!(OrgStatus::Suspended.toggled(), OrgStatus::Active);
        assert_eq!(OrgStatus::Inactive.toggled(), OrgStatus::Active);
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_value(OrgStatus::Suspended).unwrap(),
            serde_json::json!("suspended")
        );
        let parsed: OrgStatus = serde_json::from_str("\"inactive\"").unwrap();
        assert_eq!(parsed, OrgStatus::Inactive);
    }

    #[test]
    fn test_plan_parse() {
        assert_eq!(PlanType::parse("Premium"), Some(PlanType::Premium));
        assert_eq!(PlanType::parse("gold"), None);
    }

    #[test]
    fn test_patch_distinguishes_clear_from_untouched() {
        let patch = OrgSettingsPatch {
            max_users: Some(None),
            ..Default::default()
        };
        let value = serde_json::to_value(&patch).unwrap();
        // Explicit null clears the column; everything untouched is absent
        assert_eq!(value["max_users"], serde_json::Value::Null);
        assert!(value.get("name").is_none());
        assert!(value.get("custom_domain").is_none());
        assert!(value.get("features").is_none());

        let patch = OrgSettingsPatch {
            max_users: Some(Some(80)),
            custom_domain: Some(Some("dps.example.edu".to_string())),
            features: Some(BTreeMap::from([("omr".to_string(), true)])),
            ..Default::default()
        };
        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(value["max_users"], serde_json::json!(80));
        assert_eq!(value["custom_domain"], serde_json::json!("dps.example.edu"));
        assert_eq!(value["features"]["omr"], serde_json::json!(true));
    }

    #[test]
    fn test_feature_lookup_defaults_off() {
        let org: Organization = serde_json::from_value(serde_json::json!({
            "id": "11111111-1111-4111-8111-111111111111",
            "name": "Delhi Public School",
            "slug": "delhi-public-school",
            "status": "active",
            "plan_type": "premium",
            "features": {"omr": true}
        }))
        .unwrap();
        assert!(org.feature_enabled("omr"));
        assert!(!org.feature_enabled("live_streams"));
        assert_eq!(org.custom_domain, None);
    }

    #[test]
    fn test_draft_skips_absent_cap() {
        let draft = OrgDraft::new("Delhi Public School", "delhi-public-school");
        let value = serde_json::to_value(&draft).unwrap();
        assert!(value.get("max_users").is_none());
        assert_eq!(value["status"], serde_json::json!("active"));
    }
}
