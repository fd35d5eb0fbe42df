//! Live Session Operations
//!
//! Streams and events, plus the two realtime widgets of the session
//! screen:
//!
//! - **polls**: votes are never trusted incrementally; every change
//!   notification triggers a full re-read and the tally is recomputed
//!   from scratch (`PollTally`)
//! - **chat**: messages merge locally by id (`ChatFeed`), so a change
//!   event racing a refetch can never duplicate a message

use std::sync::Arc;

use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::backend::{
    decode_row, decode_rows, field_str, to_row, Filter, Order, Realtime, Row, RowChange,
    RowChanges, SelectQuery, TableWatch, Tables,
};
use crate::model::{
    LiveEvent, LiveEventDraft, MessageDraft, Poll, PollDraft, PollVote, Stream, StreamDraft,
    StreamMessage,
};

use super::{fetch_soft, ServiceError, ServiceResult};

const STREAMS: &str = "streams";
const EVENTS: &str = "live_events";
const POLLS: &str = "polls";
const VOTES: &str = "poll_votes";
const MESSAGES: &str = "stream_messages";

// ============================================
// Streams and events
// ============================================

/// Stream and event management
pub struct LiveOps {
    tables: Arc<dyn Tables>,
}

impl LiveOps {
    pub fn new(tables: Arc<dyn Tables>) -> Self {
        Self { tables }
    }

    pub async fn streams(&self, org_id: Option<Uuid>) -> ServiceResult<Vec<Stream>> {
        let mut query = SelectQuery::from(STREAMS).order(Order::desc("created_at"));
        if let Some(org_id) = org_id {
            query = query.filter(Filter::eq("org_id", org_id));
        }
        fetch_soft(self.tables.as_ref(), &query).await
    }

    pub async fn stream(&self, id: Uuid) -> ServiceResult<Option<Stream>> {
        let query = SelectQuery::from(STREAMS)
            .filter(Filter::eq("id", id))
            .limit(1);
        let mut streams: Vec<Stream> = fetch_soft(self.tables.as_ref(), &query).await?;
        Ok(if streams.is_empty() {
            None
        } else {
            Some(streams.remove(0))
        })
    }

    pub async fn schedule(&self, draft: StreamDraft) -> ServiceResult<Stream> {
        if draft.title.trim().is_empty() {
            return Err(ServiceError::Invalid("stream title is required".into()));
        }
        let row = self.tables.insert(STREAMS, to_row(&draft)?).await?;
        Ok(decode_row(row)?)
    }

    /// Move a stream one lifecycle step forward
    pub async fn advance(&self, stream: &Stream) -> ServiceResult<Stream> {
        let Some(next) = stream.status.next() else {
            return Err(ServiceError::Invalid(format!(
                "stream {} has already ended",
                stream.id
            )));
        };
        let mut patch = Row::new();
        patch.insert("status".to_string(), json!(next));
        let updated = self
            .tables
            .update(STREAMS, &[Filter::eq("id", stream.id)], patch)
            .await?;
        let mut streams: Vec<Stream> = decode_rows(updated)?;
        if streams.is_empty() {
            return Err(ServiceError::NotFound(format!("stream {}", stream.id)));
        }
        info!(stream_id = %stream.id, status = %next, "stream advanced");
        Ok(streams.remove(0))
    }

    pub async fn events(&self, org_id: Option<Uuid>) -> ServiceResult<Vec<LiveEvent>> {
        let mut query = SelectQuery::from(EVENTS).order(Order::asc("starts_at"));
        if let Some(org_id) = org_id {
            query = query.filter(Filter::eq("org_id", org_id));
        }
        fetch_soft(self.tables.as_ref(), &query).await
    }

    pub async fn create_event(&self, draft: LiveEventDraft) -> ServiceResult<LiveEvent> {
        if draft.title.trim().is_empty() {
            return Err(ServiceError::Invalid("event title is required".into()));
        }
        let row = self.tables.insert(EVENTS, to_row(&draft)?).await?;
        Ok(decode_row(row)?)
    }
}

// ============================================
// Polls
// ============================================

/// Poll reads, writes and the vote subscription
pub struct PollBoard {
    tables: Arc<dyn Tables>,
    realtime: Arc<dyn Realtime>,
}

impl PollBoard {
    pub fn new(tables: Arc<dyn Tables>, realtime: Arc<dyn Realtime>) -> Self {
        Self { tables, realtime }
    }

    pub async fn polls(&self, stream_id: Uuid) -> ServiceResult<Vec<Poll>> {
        let query = SelectQuery::from(POLLS)
            .filter(Filter::eq("stream_id", stream_id))
            .order(Order::desc("created_at"));
        fetch_soft(self.tables.as_ref(), &query).await
    }

    pub async fn open_poll(&self, draft: PollDraft) -> ServiceResult<Poll> {
        if draft.question.trim().is_empty() {
            return Err(ServiceError::Invalid("poll question is required".into()));
        }
        if draft.options.len() < 2 {
            return Err(ServiceError::Invalid(
                "a poll needs at least two options".into(),
            ));
        }
        let row = self.tables.insert(POLLS, to_row(&draft)?).await?;
        Ok(decode_row(row)?)
    }

    pub async fn close_poll(&self, id: Uuid) -> ServiceResult<Poll> {
        let mut patch = Row::new();
        patch.insert("is_open".to_string(), json!(false));
        let updated = self
            .tables
            .update(POLLS, &[Filter::eq("id", id)], patch)
            .await?;
        let mut polls: Vec<Poll> = decode_rows(updated)?;
        if polls.is_empty() {
            return Err(ServiceError::NotFound(format!("poll {id}")));
        }
        Ok(polls.remove(0))
    }

    /// Current votes for a poll. Callers re-run this on every change
    /// notification; the notification itself is only a doorbell.
    pub async fn votes(&self, poll_id: Uuid) -> ServiceResult<Vec<PollVote>> {
        let query = SelectQuery::from(VOTES).filter(Filter::eq("poll_id", poll_id));
        fetch_soft(self.tables.as_ref(), &query).await
    }

    /// Change feed for one poll's votes
    pub fn watch_votes(&self, poll_id: Uuid) -> RowChanges {
        self.realtime
            .subscribe(TableWatch::new(VOTES).filtered(Filter::eq("poll_id", poll_id)))
    }

    /// Convenience: read votes and tally them against a poll
    pub async fn tally(&self, poll: &Poll) -> ServiceResult<PollTally> {
        let votes = self.votes(poll.id).await?;
        Ok(PollTally::count(poll.options.len(), &votes))
    }
}

/// A recomputed poll result. Built fresh from the full vote list each
/// time; there is no incremental mutation, which is what keeps the
/// "counts sum to total" invariant structural.
#[derive(Debug, Clone, PartialEq)]
pub struct PollTally {
    counts: Vec<usize>,
    total: usize,
}

impl PollTally {
    /// Count votes into `option_count` buckets. Votes pointing outside
    /// the option list are dropped and do not count toward the total.
    pub fn count(option_count: usize, votes: &[PollVote]) -> Self {
        let mut counts = vec![0usize; option_count];
        let mut total = 0usize;
        for vote in votes {
            let Ok(index) = usize::try_from(vote.option_index) else {
                continue;
            };
            if index < option_count {
                counts[index] += 1;
                total += 1;
            }
        }
        Self { counts, total }
    }

    /// Votes per option, aligned with the poll's option list
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Counted votes (invalid votes excluded)
    pub fn total(&self) -> usize {
        self.total
    }

    /// Whole-number percentage for one option; zero when nobody voted
    pub fn percent(&self, option: usize) -> u8 {
        if self.total == 0 {
            return 0;
        }
        let count = self.counts.get(option).copied().unwrap_or(0);
        ((count as f64 / self.total as f64) * 100.0).round() as u8
    }

    /// Option index currently in front, if any votes were counted
    pub fn leader(&self) -> Option<usize> {
        if self.total == 0 {
            return None;
        }
        self.counts
            .iter()
            .enumerate()
            .max_by_key(|(_, count)| **count)
            .map(|(index, _)| index)
    }
}

// ============================================
// Stream chat
// ============================================

/// Chat reads, posting, moderation and the message subscription
pub struct ChatOps {
    tables: Arc<dyn Tables>,
    realtime: Arc<dyn Realtime>,
}

impl ChatOps {
    pub fn new(tables: Arc<dyn Tables>, realtime: Arc<dyn Realtime>) -> Self {
        Self { tables, realtime }
    }

    /// Messages oldest-first, the order the feed renders in
    pub async fn messages(&self, stream_id: Uuid) -> ServiceResult<Vec<StreamMessage>> {
        let query = SelectQuery::from(MESSAGES)
            .filter(Filter::eq("stream_id", stream_id))
            .order(Order::asc("created_at"));
        fetch_soft(self.tables.as_ref(), &query).await
    }

    pub async fn post(&self, draft: MessageDraft) -> ServiceResult<StreamMessage> {
        if draft.body.trim().is_empty() {
            return Err(ServiceError::Invalid("message body is required".into()));
        }
        let row = self.tables.insert(MESSAGES, to_row(&draft)?).await?;
        Ok(decode_row(row)?)
    }

    /// Moderation delete
    pub async fn remove(&self, id: Uuid) -> ServiceResult<()> {
        let gone = self
            .tables
            .delete(MESSAGES, &[Filter::eq("id", id)])
            .await?;
        if gone == 0 {
            return Err(ServiceError::NotFound(format!("message {id}")));
        }
        info!(message_id = %id, "chat message removed");
        Ok(())
    }

    /// Change feed for one stream's messages
    pub fn watch(&self, stream_id: Uuid) -> RowChanges {
        self.realtime
            .subscribe(TableWatch::new(MESSAGES).filtered(Filter::eq("stream_id", stream_id)))
    }
}

/// Local message list with id-based merging. Inserts append, refetches
/// replace wholesale (last read wins), and both paths are idempotent, so
/// a message seen over the socket and again in a refetch renders once.
#[derive(Debug, Default)]
pub struct ChatFeed {
    messages: Vec<StreamMessage>,
}

impl ChatFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[StreamMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Replace the feed with a fresh full read
    pub fn reconcile(&mut self, fetched: Vec<StreamMessage>) {
        self.messages = fetched;
    }

    /// Apply one change notification. Unknown shapes are dropped with a
    /// warning rather than poisoning the feed.
    pub fn apply(&mut self, change: RowChange) {
        match change {
            RowChange::Insert(row) => match decode_row::<StreamMessage>(row) {
                Ok(message) => {
                    if !self.messages.iter().any(|m| m.id == message.id) {
                        self.messages.push(message);
                    }
                }
                Err(err) => warn!(error = %err, "undecodable chat insert dropped"),
            },
            RowChange::Update(row) => match decode_row::<StreamMessage>(row) {
                Ok(message) => {
                    if let Some(slot) = self.messages.iter_mut().find(|m| m.id == message.id) {
                        *slot = message;
                    }
                }
                Err(err) => warn!(error = %err, "undecodable chat update dropped"),
            },
            RowChange::Delete(row) => {
                if let Some(id) = field_str(&row, "id").and_then(|s| s.parse::<Uuid>().ok()) {
                    self.messages.retain(|m| m.id != id);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use futures_util::StreamExt;

    const ORG: &str = "11111111-1111-4111-8111-111111111111";
    const STREAM: &str = "55555555-5555-4555-8555-555555555555";
    const POLL: &str = "66666666-6666-4666-8666-666666666666";

    fn vote(index: i64) -> PollVote {
        PollVote {
            id: Uuid::new_v4(),
            poll_id: POLL.parse().unwrap(),
            voter_id: None,
            option_index: index,
            created_at: None,
        }
    }

    fn message_row(id: &str, body: &str, at: &str) -> serde_json::Value {
        json!({
            "id": id,
            "stream_id": STREAM,
            "sender_name": "Meera",
            "body": body,
            "created_at": at
        })
    }

    #[test]
    fn test_tally_counts_and_percentages() {
        let votes = vec![vote(0), vote(0), vote(1), vote(2)];
        let tally = PollTally::count(3, &votes);
        assert_eq!(tally.counts(), &[2, 1, 1]);
        assert_eq!(tally.total(), 4);
        assert_eq!(tally.percent(0), 50);
        assert_eq!(tally.leader(), Some(0));
    }

    #[test]
    fn test_tally_ignores_out_of_range_votes() {
        let votes = vec![vote(0), vote(-1), vote(3), vote(99), vote(1)];
        let tally = PollTally::count(2, &votes);
        assert_eq!(tally.counts(), &[1, 1]);
        // Dropped votes do not inflate the denominator
        assert_eq!(tally.total(), 2);
        let summed: usize = tally.counts().iter().sum();
        assert_eq!(summed, tally.total());
    }

    #[test]
    fn test_tally_of_nobody() {
        let tally = PollTally::count(4, &[]);
        assert_eq!(tally.total(), 0);
        assert_eq!(tally.percent(0), 0);
        assert_eq!(tally.leader(), None);
    }

    #[tokio::test]
    async fn test_advance_refuses_after_ended() {
        let backend = Arc::new(MemoryBackend::new());
        backend.seed(
            STREAMS,
            vec![json!({"id": STREAM, "org_id": ORG, "title": "Physics doubt session", "status": "ended"})],
        );
        let ops = LiveOps::new(backend.clone());
        let stream = ops.stream(STREAM.parse().unwrap()).await.unwrap().unwrap();
        assert!(matches!(
            ops.advance(&stream).await,
            Err(ServiceError::Invalid(_))
        ));
    }

    #[tokio::test]
    async fn test_vote_notification_then_recount() {
        let backend = Arc::new(MemoryBackend::new());
        backend.seed(
            POLLS,
            vec![json!({
                "id": POLL,
                "stream_id": STREAM,
                "question": "Ready for the mock test?",
                "options": ["Yes", "No"],
                "is_open": true
            })],
        );
        backend.provision(VOTES);

        let board = PollBoard::new(backend.clone(), backend.clone());
        let poll = board
            .polls(STREAM.parse().unwrap())
            .await
            .unwrap()
            .remove(0);
        let mut feed = board.watch_votes(poll.id);

        assert_eq!(board.tally(&poll).await.unwrap().total(), 0);

        backend
            .insert(
                VOTES,
                crate::backend::to_row(&json!({"poll_id": POLL, "option_index": 1})).unwrap(),
            )
            .await
            .unwrap();

        // Doorbell rings, then the full re-read recounts
        let change = feed.next().await.unwrap();
        assert!(matches!(change, RowChange::Insert(_)));
        let tally = board.tally(&poll).await.unwrap();
        assert_eq!(tally.counts(), &[0, 1]);
    }

    #[tokio::test]
    async fn test_chat_feed_merge_never_duplicates() {
        let backend = Arc::new(MemoryBackend::new());
        backend.seed(
            MESSAGES,
            vec![message_row(
                "11111111-0000-4000-8000-000000000001",
                "hello",
                "2026-02-01T10:00:00Z",
            )],
        );
        let ops = ChatOps::new(backend.clone(), backend.clone());
        let stream_id: Uuid = STREAM.parse().unwrap();

        let mut feed = ChatFeed::new();
        feed.reconcile(ops.messages(stream_id).await.unwrap());
        assert_eq!(feed.len(), 1);

        // A socket insert lands
        let row = match serde_json::to_value(message_row(
            "11111111-0000-4000-8000-000000000002",
            "anyone there?",
            "2026-02-01T10:00:05Z",
        ))
        .unwrap()
        {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        };
        feed.apply(RowChange::Insert(row.clone()));
        assert_eq!(feed.len(), 2);

        // The same insert replayed is a no-op
        feed.apply(RowChange::Insert(row));
        assert_eq!(feed.len(), 2);

        // A refetch containing both messages does not duplicate either
        backend
            .insert(
                MESSAGES,
                match message_row(
                    "11111111-0000-4000-8000-000000000002",
                    "anyone there?",
                    "2026-02-01T10:00:05Z",
                ) {
                    serde_json::Value::Object(map) => map,
                    _ => unreachable!(),
                },
            )
            .await
            .unwrap();
        feed.reconcile(ops.messages(stream_id).await.unwrap());
        assert_eq!(feed.len(), 2);
    }

    #[tokio::test]
    async fn test_chat_delete_removes_from_feed() {
        let mut feed = ChatFeed::new();
        let row = match message_row(
            "11111111-0000-4000-8000-000000000001",
            "to be removed",
            "2026-02-01T10:00:00Z",
        ) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        };
        feed.apply(RowChange::Insert(row.clone()));
        assert_eq!(feed.len(), 1);
        feed.apply(RowChange::Delete(row));
        assert!(feed.is_empty());
    }

    #[tokio::test]
    async fn test_poll_validation() {
        let backend = Arc::new(MemoryBackend::new());
        let board = PollBoard::new(backend.clone(), backend.clone());
        let draft = PollDraft {
            stream_id: STREAM.parse().unwrap(),
            question: "Only one choice?".to_string(),
            options: vec!["yes".to_string()],
            is_open: true,
        };
        assert!(matches!(
            board.open_poll(draft).await,
            Err(ServiceError::Invalid(_))
        ));
    }
}
