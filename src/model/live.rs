//! Live Session Entities
//!
//! Streams, scheduled live events, in-stream polls with their votes, and
//! the stream chat. Votes and messages are the two tables the console
//! watches over realtime subscriptions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================
// Streams and events
// ============================================

/// A live stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stream {
    pub id: Uuid,
    pub org_id: Uuid,
    pub title: String,
    pub status: StreamStatus,
    pub scheduled_for: Option<DateTime<Utc>>,
    pub playback_url: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Stream lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamStatus {
    Scheduled,
    Live,
    Ended,
}

impl StreamStatus {
    /// The next lifecycle step, if the stream has one
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Scheduled => Some(Self::Live),
            Self::Live => Some(Self::Ended),
            Self::Ended => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Live => "live",
            Self::Ended => "ended",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Scheduled => "Scheduled",
            Self::Live => "Live",
            Self::Ended => "Ended",
        }
    }
}

impl std::fmt::Display for StreamStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload for scheduling a stream
#[derive(Debug, Clone, Serialize)]
pub struct StreamDraft {
    pub org_id: Uuid,
    pub title: String,
    pub status: StreamStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_for: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub playback_url: Option<String>,
}

impl StreamDraft {
    pub fn new(org_id: Uuid, title: impl Into<String>) -> Self {
        Self {
            org_id,
            title: title.into(),
            status: StreamStatus::Scheduled,
            scheduled_for: None,
            playback_url: None,
        }
    }
}

/// A scheduled live event (webinar, PTM, orientation)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveEvent {
    pub id: Uuid,
    pub org_id: Uuid,
    pub title: String,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Payload for creating a live event
#[derive(Debug, Clone, Serialize)]
pub struct LiveEventDraft {
    pub org_id: Uuid,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

// ============================================
// Polls
// ============================================

/// An in-stream poll
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poll {
    pub id: Uuid,
    pub stream_id: Uuid,
    pub question: String,
    pub options: Vec<String>,
    pub is_open: bool,
    pub created_at: Option<DateTime<Utc>>,
}

/// Payload for opening a poll
#[derive(Debug, Clone, Serialize)]
pub struct PollDraft {
    pub stream_id: Uuid,
    pub question: String,
    pub options: Vec<String>,
    pub is_open: bool,
}

/// One vote on a poll. `option_index` is kept wide and validated at
/// tally time; stray client writes must not poison the whole read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollVote {
    pub id: Uuid,
    pub poll_id: Uuid,
    pub voter_id: Option<Uuid>,
    pub option_index: i64,
    pub created_at: Option<DateTime<Utc>>,
}

// ============================================
// Stream chat
// ============================================

/// A chat message in a stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamMessage {
    pub id: Uuid,
    pub stream_id: Uuid,
    pub sender_id: Option<Uuid>,
    pub sender_name: Option<String>,
    pub body: String,
    pub created_at: Option<DateTime<Utc>>,
}

/// Payload for posting a message
#[derive(Debug, Clone, Serialize)]
pub struct MessageDraft {
    pub stream_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_name: Option<String>,
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_lifecycle_steps() {
        assert_eq!(StreamStatus::Scheduled.next(), Some(StreamStatus::Live));
        assert_eq!(StreamStatus::Live.next(), Some(StreamStatus::Ended));
        assert_eq!(StreamStatus::Ended.next(), None);
    }

    #[test]
    fn test_vote_decodes_negative_index() {
        let vote: PollVote = serde_json::from_value(serde_json::json!({
            "id": "2f1e9d4c-5b6a-4c3d-9e8f-7a6b5c4d3e2f",
            "poll_id": "3a2b1c0d-9e8f-4a5b-8c7d-6e5f4a3b2c1d",
            "option_index": -1
        }))
        .unwrap();
        assert_eq!(vote.option_index, -1);
    }
}
