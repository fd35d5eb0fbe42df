//! OMR Desk
//!
//! Template management for answer sheets plus a read-only view over scan
//! results. The scanning pipeline writes `omr_results` out of band; demo
//! environments seed it from [`sample_results`] instead.

use std::sync::Arc;

use uuid::Uuid;

use crate::backend::{decode_row, to_row, Filter, Order, SelectQuery, Tables};
use crate::model::{OmrResult, OmrTemplate, OmrTemplateDraft};

use super::{fetch_soft, ServiceError, ServiceResult};

const TEMPLATES: &str = "omr_templates";
const RESULTS: &str = "omr_results";

pub struct OmrDesk {
    tables: Arc<dyn Tables>,
}

impl OmrDesk {
    pub fn new(tables: Arc<dyn Tables>) -> Self {
        Self { tables }
    }

    pub async fn templates(&self, org_id: Uuid) -> ServiceResult<Vec<OmrTemplate>> {
        let query = SelectQuery::from(TEMPLATES)
            .filter(Filter::eq("org_id", org_id))
            .order(Order::desc("created_at"));
        fetch_soft(self.tables.as_ref(), &query).await
    }

    pub async fn create_template(&self, draft: OmrTemplateDraft) -> ServiceResult<OmrTemplate> {
        if draft.name.trim().is_empty() {
            return Err(ServiceError::Invalid("template name is required".into()));
        }
        if draft.question_count == 0 {
            return Err(ServiceError::Invalid(
                "template needs at least one question".into(),
            ));
        }
        if draft.choices_per_question < 2 {
            return Err(ServiceError::Invalid(
                "questions need at least two choices".into(),
            ));
        }
        let row = self.tables.insert(TEMPLATES, to_row(&draft)?).await?;
        Ok(decode_row(row)?)
    }

    /// Scan results, newest first, optionally narrowed to one template
    pub async fn results(&self, template_id: Option<Uuid>) -> ServiceResult<Vec<OmrResult>> {
        let mut query = SelectQuery::from(RESULTS).order(Order::desc("scanned_at"));
        if let Some(id) = template_id {
            query = query.filter(Filter::eq("template_id", id));
        }
        fetch_soft(self.tables.as_ref(), &query).await
    }
}

/// Fixture results for demo and offline environments, where no scanner
/// feeds the results table.
pub fn sample_results() -> Vec<OmrResult> {
    let sheet = |name: &str, score: u32, scanned_at: &str| OmrResult {
        id: Uuid::new_v4(),
        template_id: None,
        student_name: name.to_string(),
        score,
        total: 40,
        scanned_at: scanned_at.parse().ok(),
    };
    vec![
        sheet("Asha Nair", 37, "2026-02-12T09:30:00Z"),
        sheet("Rohan Mehta", 32, "2026-02-12T09:31:00Z"),
        sheet("Priya Iyer", 40, "2026-02-12T09:32:00Z"),
        sheet("Kabir Shah", 21, "2026-02-12T09:33:00Z"),
        sheet("Divya Pillai", 28, "2026-02-12T09:34:00Z"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use serde_json::json;

    #[tokio::test]
    async fn test_template_validation() {
        let desk = OmrDesk::new(Arc::new(MemoryBackend::new()));
        let org_id = Uuid::new_v4();

        let no_questions = OmrTemplateDraft {
            org_id,
            name: "Weekly mock".to_string(),
            question_count: 0,
            choices_per_question: 4,
        };
        assert!(matches!(
            desk.create_template(no_questions).await,
            Err(ServiceError::Invalid(_))
        ));

        let one_choice = OmrTemplateDraft {
            org_id,
            name: "Weekly mock".to_string(),
            question_count: 40,
            choices_per_question: 1,
        };
        assert!(matches!(
            desk.create_template(one_choice).await,
            Err(ServiceError::Invalid(_))
        ));

        let valid = OmrTemplateDraft {
            org_id,
            name: "Weekly mock".to_string(),
            question_count: 40,
            choices_per_question: 4,
        };
        let template = desk.create_template(valid).await.unwrap();
        assert_eq!(template.question_count, 40);

        let listed = desk.templates(org_id).await.unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[tokio::test]
    async fn test_results_narrow_to_template() {
        let backend = Arc::new(MemoryBackend::new());
        let template_id = Uuid::new_v4();
        backend.seed(
            RESULTS,
            vec![
                json!({"id": Uuid::new_v4(), "template_id": template_id, "student_name": "Asha", "score": 37, "total": 40}),
                json!({"id": Uuid::new_v4(), "template_id": Uuid::new_v4(), "student_name": "Rohan", "score": 30, "total": 40}),
            ],
        );
        let desk = OmrDesk::new(backend);

        assert_eq!(desk.results(None).await.unwrap().len(), 2);
        let narrowed = desk.results(Some(template_id)).await.unwrap();
        assert_eq!(narrowed.len(), 1);
        assert_eq!(narrowed[0].student_name, "Asha");
    }

    #[test]
    fn test_sample_results_are_plausible() {
        let samples = sample_results();
        assert!(!samples.is_empty());
        for sheet in &samples {
            assert!(sheet.score <= sheet.total);
            assert!(sheet.percent() <= 100);
        }
    }
}
