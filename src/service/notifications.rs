//! Announcements
//!
//! Console-sent notifications targeted at an audience (everyone, one
//! organization, or one role). Delivery fan-out happens server-side;
//! this side only records the send.

use std::sync::Arc;

use tracing::info;

use crate::backend::{decode_row, to_row, Order, SelectQuery, Tables};
use crate::model::{Audience, Notification, NotificationDraft};

use super::{fetch_soft, ServiceError, ServiceResult};

const NOTIFICATIONS: &str = "notifications";

pub struct Announcer {
    tables: Arc<dyn Tables>,
}

impl Announcer {
    pub fn new(tables: Arc<dyn Tables>) -> Self {
        Self { tables }
    }

    /// Send history, newest first
    pub async fn sent(&self) -> ServiceResult<Vec<Notification>> {
        let query = SelectQuery::from(NOTIFICATIONS).order(Order::desc("created_at"));
        fetch_soft(self.tables.as_ref(), &query).await
    }

    pub async fn send(
        &self,
        title: &str,
        body: &str,
        audience: Audience,
    ) -> ServiceResult<Notification> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ServiceError::Invalid("notification title is required".into()));
        }
        if body.trim().is_empty() {
            return Err(ServiceError::Invalid("notification body is required".into()));
        }
        let draft = NotificationDraft {
            title: title.to_string(),
            body: body.trim().to_string(),
            audience,
        };
        let row = self.tables.insert(NOTIFICATIONS, to_row(&draft)?).await?;
        let notification: Notification = decode_row(row)?;
        info!(
            notification_id = %notification.id,
            audience = %notification.audience,
            "announcement sent"
        );
        Ok(notification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use crate::model::Role;

    #[tokio::test]
    async fn test_send_and_history() {
        let announcer = Announcer::new(Arc::new(MemoryBackend::new()));

        let sent = announcer
            .send("Exam week", "Mock tests start Monday.", Audience::All)
            .await
            .unwrap();
        assert_eq!(sent.audience, Audience::All);

        announcer
            .send(
                "Teacher sync",
                "Monthly planning call.",
                Audience::RoleIs(Role::Teacher),
            )
            .await
            .unwrap();

        let history = announcer.sent().await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].audience, Audience::RoleIs(Role::Teacher));
    }

    #[tokio::test]
    async fn test_blank_fields_rejected() {
        let announcer = Announcer::new(Arc::new(MemoryBackend::new()));
        assert!(matches!(
            announcer.send("", "body", Audience::All).await,
            Err(ServiceError::Invalid(_))
        ));
        assert!(matches!(
            announcer.send("title", "  ", Audience::All).await,
            Err(ServiceError::Invalid(_))
        ));
    }
}
