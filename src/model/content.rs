//! Content and Quiz Entities
//!
//! Library items (videos, documents, links) plus quizzes and their
//! questions. Question options live in a JSON column, so they arrive as
//! a real vector rather than a join.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================
// Content library
// ============================================

/// A library item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: Uuid,
    pub org_id: Uuid,
    /// Course the item is attached to, if any
    pub course_id: Option<Uuid>,
    pub title: String,
    pub kind: ContentKind,
    pub url: String,
    pub created_at: Option<DateTime<Utc>>,
}

/// What kind of material an item is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Video,
    Document,
    Presentation,
    Link,
}

impl ContentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Document => "document",
            Self::Presentation => "presentation",
            Self::Link => "link",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Video => "Video",
            Self::Document => "Document",
            Self::Presentation => "Presentation",
            Self::Link => "Link",
        }
    }

    pub fn all() -> [ContentKind; 4] {
        [Self::Video, Self::Document, Self::Presentation, Self::Link]
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload for adding a library item
#[derive(Debug, Clone, Serialize)]
pub struct ContentDraft {
    pub org_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_id: Option<Uuid>,
    pub title: String,
    pub kind: ContentKind,
    pub url: String,
}

// ============================================
// Quizzes
// ============================================

/// A quiz shell; questions are separate rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    pub id: Uuid,
    pub org_id: Uuid,
    pub course_id: Option<Uuid>,
    pub title: String,
    /// Minutes allowed; `None` means untimed
    pub time_limit_minutes: Option<u32>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Payload for creating a quiz
#[derive(Debug, Clone, Serialize)]
pub struct QuizDraft {
    pub org_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_id: Option<Uuid>,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_limit_minutes: Option<u32>,
}

/// A multiple-choice question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: Uuid,
    pub quiz_id: Uuid,
    pub prompt: String,
    pub options: Vec<String>,
    /// Index into `options`
    pub correct_index: u32,
    pub created_at: Option<DateTime<Utc>>,
}

/// Payload for adding a question
#[derive(Debug, Clone, Serialize)]
pub struct QuestionDraft {
    pub quiz_id: Uuid,
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_index: u32,
}
