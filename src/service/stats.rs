//! Platform Stats
//!
//! Headline counts for the dashboard. A platform operator sees totals
//! across every organization; an org admin sees their own slice. Counts
//! read only the `id` column and treat unprovisioned tables as zero so a
//! half-provisioned environment still renders a dashboard.

use std::sync::Arc;

use futures_util::try_join;
use serde::Serialize;
use uuid::Uuid;

use crate::backend::{Filter, SelectQuery, Tables};

use super::{soft_rows, ServiceResult};

/// Headline counts shown on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub organizations: usize,
    pub users: usize,
    pub courses: usize,
    pub streams: usize,
}

pub struct PlatformStats {
    tables: Arc<dyn Tables>,
}

impl PlatformStats {
    pub fn new(tables: Arc<dyn Tables>) -> Self {
        Self { tables }
    }

    pub async fn snapshot(&self, org: Option<Uuid>) -> ServiceResult<StatsSnapshot> {
        let (organizations, users, courses, streams) = try_join!(
            self.count("organizations", org.map(|id| Filter::eq("id", id))),
            self.count("users", org.map(|id| Filter::eq("org_id", id))),
            self.count("courses", org.map(|id| Filter::eq("org_id", id))),
            self.count("streams", org.map(|id| Filter::eq("org_id", id))),
        )?;
        Ok(StatsSnapshot {
            organizations,
            users,
            courses,
            streams,
        })
    }

    async fn count(&self, table: &str, filter: Option<Filter>) -> ServiceResult<usize> {
        let mut query = SelectQuery::from(table).columns("id");
        if let Some(filter) = filter {
            query = query.filter(filter);
        }
        let rows = soft_rows(self.tables.fetch(&query).await, table)?;
        Ok(rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use serde_json::json;

    fn seeded() -> (Arc<MemoryBackend>, Uuid, Uuid) {
        let backend = Arc::new(MemoryBackend::new());
        let org_a = Uuid::new_v4();
        let org_b = Uuid::new_v4();
        backend.seed(
            "organizations",
            vec![json!({"id": org_a}), json!({"id": org_b})],
        );
        backend.seed(
            "users",
            vec![
                json!({"id": Uuid::new_v4(), "org_id": org_a}),
                json!({"id": Uuid::new_v4(), "org_id": org_a}),
                json!({"id": Uuid::new_v4(), "org_id": org_b}),
            ],
        );
        backend.seed("courses", vec![json!({"id": Uuid::new_v4(), "org_id": org_a})]);
        (backend, org_a, org_b)
    }

    #[tokio::test]
    async fn test_platform_wide_snapshot() {
        let (backend, _, _) = seeded();
        let stats = PlatformStats::new(backend);
        let snapshot = stats.snapshot(None).await.unwrap();
        assert_eq!(snapshot.organizations, 2);
        assert_eq!(snapshot.users, 3);
        assert_eq!(snapshot.courses, 1);
        // streams table never provisioned
        assert_eq!(snapshot.streams, 0);
    }

    #[tokio::test]
    async fn test_org_scoped_snapshot() {
        let (backend, org_a, _) = seeded();
        let stats = PlatformStats::new(backend);
        let snapshot = stats.snapshot(Some(org_a)).await.unwrap();
        assert_eq!(snapshot.organizations, 1);
        assert_eq!(snapshot.users, 2);
        assert_eq!(snapshot.courses, 1);
        assert_eq!(snapshot.streams, 0);
    }
}
