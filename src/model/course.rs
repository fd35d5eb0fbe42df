//! Course Entities
//!
//! Courses belong to one organization; assignments link users to the
//! courses they can see.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A course within an organization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: Uuid,
    pub org_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: CourseStatus,
    pub created_at: Option<DateTime<Utc>>,
}

/// Course publication state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseStatus {
    Draft,
    Published,
    Archived,
}

impl CourseStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Archived => "archived",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Published => "Published",
            Self::Archived => "Archived",
        }
    }
}

impl std::fmt::Display for CourseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload for creating a course
#[derive(Debug, Clone, Serialize)]
pub struct CourseDraft {
    pub org_id: Uuid,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: CourseStatus,
}

impl CourseDraft {
    pub fn new(org_id: Uuid, title: impl Into<String>) -> Self {
        Self {
            org_id,
            title: title.into(),
            description: None,
            status: CourseStatus::Draft,
        }
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    pub fn published(mut self) -> Self {
        self.status = CourseStatus::Published;
        self
    }
}

/// A user-to-course assignment row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseAssignment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub assigned_at: Option<DateTime<Utc>>,
}

/// Payload for creating an assignment. Compared by value when a bulk
/// plan is checked against an expected one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignmentDraft {
    pub user_id: Uuid,
    pub course_id: Uuid,
}
