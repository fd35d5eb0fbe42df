//! Feature Flag Board
//!
//! Flags gate optional surfaces (OMR scanning, live streaming, blog).
//! Reads are soft so a fresh environment without the table behaves as
//! all-off instead of erroring.

use std::sync::Arc;

use serde_json::json;
use tracing::info;

use crate::backend::{decode_row, decode_rows, to_row, Filter, Order, Row, SelectQuery, Tables};
use crate::model::{FeatureFlag, FlagDraft};

use super::{fetch_soft, ServiceError, ServiceResult};

const FLAGS: &str = "feature_flags";

pub struct FlagBoard {
    tables: Arc<dyn Tables>,
}

impl FlagBoard {
    pub fn new(tables: Arc<dyn Tables>) -> Self {
        Self { tables }
    }

    pub async fn list(&self) -> ServiceResult<Vec<FeatureFlag>> {
        let query = SelectQuery::from(FLAGS).order(Order::asc("key"));
        fetch_soft(self.tables.as_ref(), &query).await
    }

    /// Upsert by key: update the existing flag or create it
    pub async fn set(&self, key: &str, enabled: bool) -> ServiceResult<FeatureFlag> {
        let key = key.trim();
        if key.is_empty() {
            return Err(ServiceError::Invalid("flag key is required".into()));
        }

        let mut patch = Row::new();
        patch.insert("enabled".to_string(), json!(enabled));
        let updated = self
            .tables
            .update(FLAGS, &[Filter::eq("key", key)], patch)
            .await?;
        if let Some(row) = updated.into_iter().next() {
            let flag: FeatureFlag = decode_row(row)?;
            info!(key = %flag.key, enabled, "feature flag updated");
            return Ok(flag);
        }

        let draft = FlagDraft {
            key: key.to_string(),
            description: None,
            enabled,
        };
        let row = self.tables.insert(FLAGS, to_row(&draft)?).await?;
        let flag: FeatureFlag = decode_row(row)?;
        info!(key = %flag.key, enabled, "feature flag created");
        Ok(flag)
    }

    /// Whether a flag is on. Missing flags and missing table read as off.
    pub async fn enabled(&self, key: &str) -> ServiceResult<bool> {
        let query = SelectQuery::from(FLAGS).filter(Filter::eq("key", key));
        let flags: Vec<FeatureFlag> = fetch_soft(self.tables.as_ref(), &query).await?;
        Ok(flags.first().map(|flag| flag.enabled).unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;

    #[tokio::test]
    async fn test_set_creates_then_updates() {
        let board = FlagBoard::new(Arc::new(MemoryBackend::new()));

        let created = board.set("omr_scanning", true).await.unwrap();
        assert!(created.enabled);
        assert!(board.enabled("omr_scanning").await.unwrap());

        let flipped = board.set("omr_scanning", false).await.unwrap();
        assert_eq!(flipped.key, "omr_scanning");
        assert!(!flipped.enabled);
        assert!(!board.enabled("omr_scanning").await.unwrap());

        // Still a single flag, not one per set()
        assert_eq!(board.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_flag_reads_as_off() {
        let board = FlagBoard::new(Arc::new(MemoryBackend::new()));
        assert!(!board.enabled("live_streaming").await.unwrap());
    }

    #[tokio::test]
    async fn test_list_sorts_by_key() {
        let board = FlagBoard::new(Arc::new(MemoryBackend::new()));
        board.set("omr_scanning", true).await.unwrap();
        board.set("blog", false).await.unwrap();
        board.set("live_streaming", true).await.unwrap();

        let keys: Vec<_> = board
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|flag| flag.key)
            .collect();
        assert_eq!(keys, vec!["blog", "live_streaming", "omr_scanning"]);
    }

    #[tokio::test]
    async fn test_blank_key_rejected() {
        let board = FlagBoard::new(Arc::new(MemoryBackend::new()));
        assert!(matches!(
            board.set("  ", true).await,
            Err(ServiceError::Invalid(_))
        ));
    }
}
