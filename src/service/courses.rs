//! Course Catalog and Assignment
//!
//! Courses per tenant, the assignment screen's fan-out load (users and
//! courses fetched concurrently), individual assignment writes, and the
//! bulk-assignment planner. Bulk assignment is deliberately a dry run:
//! it computes exactly the rows it would insert and stops there, until
//! the enrollment pipeline owns the real write.

use std::sync::Arc;

use futures_util::try_join;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::backend::{decode_row, decode_rows, to_row, Filter, Order, Row, SelectQuery, Tables};
use crate::model::{
    AssignmentDraft, Course, CourseAssignment, CourseDraft, CourseStatus, User,
};

use super::{fetch_soft, ServiceError, ServiceResult};

const TABLE: &str = "courses";
const ASSIGNMENTS: &str = "course_assignments";

/// Filters for the course list
#[derive(Debug, Clone, Default)]
pub struct CourseQuery {
    pub org_id: Option<Uuid>,
    pub search: Option<String>,
    pub status: Option<CourseStatus>,
}

impl CourseQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn org(mut self, org_id: Uuid) -> Self {
        self.org_id = Some(org_id);
        self
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    pub fn status(mut self, status: CourseStatus) -> Self {
        self.status = Some(status);
        self
    }
}

/// What bulk assignment would write, without writing it
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentPlan {
    /// Rows that would be inserted
    pub pairs: Vec<AssignmentDraft>,
    /// Requested pairs skipped because they already exist
    pub skipped_existing: usize,
}

impl AssignmentPlan {
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Summary line for the confirmation dialog
    pub fn describe(&self) -> String {
        format!(
            "{} new assignment(s), {} already in place",
            self.pairs.len(),
            self.skipped_existing
        )
    }
}

/// The course catalog
pub struct CourseCatalog {
    tables: Arc<dyn Tables>,
}

impl CourseCatalog {
    pub fn new(tables: Arc<dyn Tables>) -> Self {
        Self { tables }
    }

    pub fn select_for(query: &CourseQuery) -> SelectQuery {
        let mut select = SelectQuery::from(TABLE).order(Order::desc("created_at"));
        if let Some(org_id) = query.org_id {
            select = select.filter(Filter::eq("org_id", org_id));
        }
        if let Some(text) = query.search.as_deref().filter(|t| !t.trim().is_empty()) {
            select = select.filter(Filter::ilike("title", text.trim()));
        }
        if let Some(status) = query.status {
            select = select.filter(Filter::eq("status", status));
        }
        select
    }

    pub async fn list(&self, query: &CourseQuery) -> ServiceResult<Vec<Course>> {
        fetch_soft(self.tables.as_ref(), &Self::select_for(query)).await
    }

    pub async fn create(&self, draft: CourseDraft) -> ServiceResult<Course> {
        if draft.title.trim().is_empty() {
            return Err(ServiceError::Invalid("course title is required".into()));
        }
        let row = self.tables.insert(TABLE, to_row(&draft)?).await?;
        Ok(decode_row(row)?)
    }

    pub async fn set_status(&self, id: Uuid, status: CourseStatus) -> ServiceResult<Course> {
        let mut patch = Row::new();
        patch.insert("status".to_string(), json!(status));
        let updated = self
            .tables
            .update(TABLE, &[Filter::eq("id", id)], patch)
            .await?;
        let mut courses: Vec<Course> = decode_rows(updated)?;
        if courses.is_empty() {
            return Err(ServiceError::NotFound(format!("course {id}")));
        }
        Ok(courses.remove(0))
    }

    /// Everything the assignment screen needs, loaded concurrently. The
    /// screen renders once, after both reads land.
    pub async fn assignment_basis(&self, org_id: Uuid) -> ServiceResult<(Vec<User>, Vec<Course>)> {
        let users_query = SelectQuery::from("users")
            .filter(Filter::eq("org_id", org_id))
            .order(Order::asc("full_name"));
        let courses_query = Self::select_for(&CourseQuery::new().org(org_id));

        let users = fetch_soft::<User>(self.tables.as_ref(), &users_query);
        let courses = fetch_soft::<Course>(self.tables.as_ref(), &courses_query);
        let (users, courses) = try_join!(users, courses)?;
        Ok((users, courses))
    }

    /// Assign one user to one course
    pub async fn assign(&self, user_id: Uuid, course_id: Uuid) -> ServiceResult<CourseAssignment> {
        let draft = AssignmentDraft { user_id, course_id };
        let row = self.tables.insert(ASSIGNMENTS, to_row(&draft)?).await?;
        let assignment: CourseAssignment = decode_row(row)?;
        info!(user_id = %user_id, course_id = %course_id, "course assigned");
        Ok(assignment)
    }

    /// Assignments already on file for the given courses
    pub async fn existing_assignments(
        &self,
        course_ids: &[Uuid],
    ) -> ServiceResult<Vec<CourseAssignment>> {
        if course_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids = course_ids.iter().map(Uuid::to_string).collect();
        let query = SelectQuery::from(ASSIGNMENTS).filter(Filter::is_in("course_id", ids));
        fetch_soft(self.tables.as_ref(), &query).await
    }

    /// Cross-product planner used by `simulate_bulk`. Pure so the
    /// dedupe rule is testable without a backend.
    pub fn plan_bulk(
        user_ids: &[Uuid],
        course_ids: &[Uuid],
        existing: &[CourseAssignment],
    ) -> AssignmentPlan {
        let mut pairs = Vec::new();
        let mut skipped_existing = 0;
        for &user_id in user_ids {
            for &course_id in course_ids {
                let already = existing
                    .iter()
                    .any(|a| a.user_id == user_id && a.course_id == course_id);
                if already {
                    skipped_existing += 1;
                } else {
                    pairs.push(AssignmentDraft { user_id, course_id });
                }
            }
        }
        AssignmentPlan {
            pairs,
            skipped_existing,
        }
    }

    /// Dry-run bulk assignment: fetch what exists, plan the rest, write
    /// nothing.
    pub async fn simulate_bulk(
        &self,
        user_ids: &[Uuid],
        course_ids: &[Uuid],
    ) -> ServiceResult<AssignmentPlan> {
        let existing = self.existing_assignments(course_ids).await?;
        let plan = Self::plan_bulk(user_ids, course_ids, &existing);
        info!(
            new = plan.pairs.len(),
            skipped = plan.skipped_existing,
            "bulk assignment planned (dry run)"
        );
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;

    const ORG: &str = "11111111-1111-4111-8111-111111111111";

    fn uuid(n: &str) -> Uuid {
        n.parse().unwrap()
    }

    fn seeded_backend() -> Arc<MemoryBackend> {
        let backend = Arc::new(MemoryBackend::new());
        backend.seed(
            "users",
            vec![
                json!({"id": "aaaaaaaa-aaaa-4aaa-8aaa-aaaaaaaaaaaa", "full_name": "Asha", "email": "asha@dps.test", "role": "student", "status": "active", "org_id": ORG}),
                json!({"id": "bbbbbbbb-bbbb-4bbb-8bbb-bbbbbbbbbbbb", "full_name": "Ravi", "email": "ravi@dps.test", "role": "student", "status": "active", "org_id": ORG}),
            ],
        );
        backend.seed(
            TABLE,
            vec![
                json!({"id": "cccccccc-cccc-4ccc-8ccc-cccccccccccc", "org_id": ORG, "title": "Physics XII", "status": "published"}),
                json!({"id": "dddddddd-dddd-4ddd-8ddd-dddddddddddd", "org_id": ORG, "title": "Chemistry XII", "status": "draft"}),
            ],
        );
        backend
    }

    #[tokio::test]
    async fn test_assignment_basis_loads_both_sides() {
        let catalog = CourseCatalog::new(seeded_backend());
        let (users, courses) = catalog.assignment_basis(uuid(ORG)).await.unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(courses.len(), 2);
        // Users come back sorted for the picker
        assert_eq!(users[0].full_name, "Asha");
    }

    #[tokio::test]
    async fn test_assign_writes_one_row() {
        let backend = seeded_backend();
        let catalog = CourseCatalog::new(backend.clone());
        let assignment = catalog
            .assign(
                uuid("aaaaaaaa-aaaa-4aaa-8aaa-aaaaaaaaaaaa"),
                uuid("cccccccc-cccc-4ccc-8ccc-cccccccccccc"),
            )
            .await
            .unwrap();
        assert_eq!(assignment.course_id, uuid("cccccccc-cccc-4ccc-8ccc-cccccccccccc"));
        assert_eq!(backend.table_rows(ASSIGNMENTS).len(), 1);
    }

    #[test]
    fn test_plan_bulk_skips_existing_pairs() {
        let u1 = uuid("aaaaaaaa-aaaa-4aaa-8aaa-aaaaaaaaaaaa");
        let u2 = uuid("bbbbbbbb-bbbb-4bbb-8bbb-bbbbbbbbbbbb");
        let c1 = uuid("cccccccc-cccc-4ccc-8ccc-cccccccccccc");
        let c2 = uuid("dddddddd-dddd-4ddd-8ddd-dddddddddddd");
        let existing = vec![CourseAssignment {
            id: Uuid::new_v4(),
            user_id: u1,
            course_id: c1,
            assigned_at: None,
        }];

        let plan = CourseCatalog::plan_bulk(&[u1, u2], &[c1, c2], &existing);
        assert_eq!(plan.pairs.len(), 3);
        assert_eq!(plan.skipped_existing, 1);
        assert!(!plan
            .pairs
            .iter()
            .any(|p| p.user_id == u1 && p.course_id == c1));
    }

    #[test]
    fn test_plan_compares_by_value() {
        let u1 = uuid("aaaaaaaa-aaaa-4aaa-8aaa-aaaaaaaaaaaa");
        let c1 = uuid("cccccccc-cccc-4ccc-8ccc-cccccccccccc");

        let plan = CourseCatalog::plan_bulk(&[u1], &[c1], &[]);
        let expected = AssignmentPlan {
            pairs: vec![AssignmentDraft {
                user_id: u1,
                course_id: c1,
            }],
            skipped_existing: 0,
        };
        assert_eq!(plan, expected);
    }

    #[tokio::test]
    async fn test_simulate_bulk_never_writes() {
        let backend = seeded_backend();
        backend.seed(
            ASSIGNMENTS,
            vec![json!({
                "id": "eeeeeeee-eeee-4eee-8eee-eeeeeeeeeeee",
                "user_id": "aaaaaaaa-aaaa-4aaa-8aaa-aaaaaaaaaaaa",
                "course_id": "cccccccc-cccc-4ccc-8ccc-cccccccccccc"
            })],
        );
        let catalog = CourseCatalog::new(backend.clone());

        let plan = catalog
            .simulate_bulk(
                &[
                    uuid("aaaaaaaa-aaaa-4aaa-8aaa-aaaaaaaaaaaa"),
                    uuid("bbbbbbbb-bbbb-4bbb-8bbb-bbbbbbbbbbbb"),
                ],
                &[
                    uuid("cccccccc-cccc-4ccc-8ccc-cccccccccccc"),
                    uuid("dddddddd-dddd-4ddd-8ddd-dddddddddddd"),
                ],
            )
            .await
            .unwrap();

        assert_eq!(plan.pairs.len(), 3);
        assert_eq!(plan.skipped_existing, 1);
        // Dry run: the table still holds exactly the seeded row
        assert_eq!(backend.table_rows(ASSIGNMENTS).len(), 1);
    }

    #[tokio::test]
    async fn test_create_requires_title() {
        let catalog = CourseCatalog::new(Arc::new(MemoryBackend::new()));
        let draft = CourseDraft::new(uuid(ORG), "  ");
        assert!(matches!(
            catalog.create(draft).await,
            Err(ServiceError::Invalid(_))
        ));
    }
}
