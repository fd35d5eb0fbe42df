//! Content Library and Quiz Bank
//!
//! Library items attach to a course or float at the org level. Quizzes
//! hold their questions in a child table; question shape is validated
//! here because a malformed question renders as garbage on the learner
//! side.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::backend::{decode_row, to_row, Filter, Order, SelectQuery, Tables};
use crate::model::{
    ContentDraft, ContentItem, ContentKind, Question, QuestionDraft, Quiz, QuizDraft,
};

use super::{fetch_soft, ServiceError, ServiceResult};

const CONTENT: &str = "content_items";
const QUIZZES: &str = "quizzes";
const QUESTIONS: &str = "questions";

/// Filters for the content library
#[derive(Debug, Clone, Default)]
pub struct ContentQuery {
    pub org_id: Option<Uuid>,
    pub course_id: Option<Uuid>,
    pub kind: Option<ContentKind>,
    pub search: Option<String>,
}

impl ContentQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn org(mut self, org_id: Uuid) -> Self {
        self.org_id = Some(org_id);
        self
    }

    pub fn course(mut self, course_id: Uuid) -> Self {
        self.course_id = Some(course_id);
        self
    }

    pub fn kind(mut self, kind: ContentKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }
}

/// The content library
pub struct ContentLibrary {
    tables: Arc<dyn Tables>,
}

impl ContentLibrary {
    pub fn new(tables: Arc<dyn Tables>) -> Self {
        Self { tables }
    }

    pub fn select_for(query: &ContentQuery) -> SelectQuery {
        let mut select = SelectQuery::from(CONTENT).order(Order::desc("created_at"));
        if let Some(org_id) = query.org_id {
            select = select.filter(Filter::eq("org_id", org_id));
        }
        if let Some(course_id) = query.course_id {
            select = select.filter(Filter::eq("course_id", course_id));
        }
        if let Some(kind) = query.kind {
            select = select.filter(Filter::eq("kind", kind));
        }
        if let Some(text) = query.search.as_deref().filter(|t| !t.trim().is_empty()) {
            select = select.filter(Filter::ilike("title", text.trim()));
        }
        select
    }

    pub async fn list(&self, query: &ContentQuery) -> ServiceResult<Vec<ContentItem>> {
        fetch_soft(self.tables.as_ref(), &Self::select_for(query)).await
    }

    pub async fn add(&self, draft: ContentDraft) -> ServiceResult<ContentItem> {
        if draft.title.trim().is_empty() {
            return Err(ServiceError::Invalid("content title is required".into()));
        }
        if draft.url.trim().is_empty() {
            return Err(ServiceError::Invalid("content URL is required".into()));
        }
        let row = self.tables.insert(CONTENT, to_row(&draft)?).await?;
        Ok(decode_row(row)?)
    }

    pub async fn remove(&self, id: Uuid) -> ServiceResult<()> {
        let gone = self
            .tables
            .delete(CONTENT, &[Filter::eq("id", id)])
            .await?;
        if gone == 0 {
            return Err(ServiceError::NotFound(format!("content item {id}")));
        }
        info!(content_id = %id, "content item removed");
        Ok(())
    }
}

/// The quiz bank
pub struct QuizBank {
    tables: Arc<dyn Tables>,
}

impl QuizBank {
    pub fn new(tables: Arc<dyn Tables>) -> Self {
        Self { tables }
    }

    pub async fn quizzes(&self, org_id: Option<Uuid>) -> ServiceResult<Vec<Quiz>> {
        let mut query = SelectQuery::from(QUIZZES).order(Order::desc("created_at"));
        if let Some(org_id) = org_id {
            query = query.filter(Filter::eq("org_id", org_id));
        }
        fetch_soft(self.tables.as_ref(), &query).await
    }

    pub async fn create_quiz(&self, draft: QuizDraft) -> ServiceResult<Quiz> {
        if draft.title.trim().is_empty() {
            return Err(ServiceError::Invalid("quiz title is required".into()));
        }
        let row = self.tables.insert(QUIZZES, to_row(&draft)?).await?;
        Ok(decode_row(row)?)
    }

    /// Questions in authoring order
    pub async fn questions(&self, quiz_id: Uuid) -> ServiceResult<Vec<Question>> {
        let query = SelectQuery::from(QUESTIONS)
            .filter(Filter::eq("quiz_id", quiz_id))
            .order(Order::asc("created_at"));
        fetch_soft(self.tables.as_ref(), &query).await
    }

    /// Add a question. At least two options, and the answer key must
    /// point inside them.
    pub async fn add_question(&self, draft: QuestionDraft) -> ServiceResult<Question> {
        if draft.prompt.trim().is_empty() {
            return Err(ServiceError::Invalid("question prompt is required".into()));
        }
        if draft.options.len() < 2 {
            return Err(ServiceError::Invalid(
                "a question needs at least two options".into(),
            ));
        }
        if draft.options.iter().any(|o| o.trim().is_empty()) {
            return Err(ServiceError::Invalid("options cannot be blank".into()));
        }
        if (draft.correct_index as usize) >= draft.options.len() {
            return Err(ServiceError::Invalid(format!(
                "correct option {} is outside the {} options",
                draft.correct_index,
                draft.options.len()
            )));
        }
        let row = self.tables.insert(QUESTIONS, to_row(&draft)?).await?;
        Ok(decode_row(row)?)
    }

    pub async fn remove_question(&self, id: Uuid) -> ServiceResult<()> {
        let gone = self
            .tables
            .delete(QUESTIONS, &[Filter::eq("id", id)])
            .await?;
        if gone == 0 {
            return Err(ServiceError::NotFound(format!("question {id}")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use serde_json::json;

    const ORG: &str = "11111111-1111-4111-8111-111111111111";

    fn org_id() -> Uuid {
        ORG.parse().unwrap()
    }

    #[tokio::test]
    async fn test_library_filters_by_kind_and_course() {
        let backend = Arc::new(MemoryBackend::new());
        backend.seed(
            CONTENT,
            vec![
                json!({"id": "11111111-0000-4000-8000-000000000001", "org_id": ORG, "course_id": "cccccccc-cccc-4ccc-8ccc-cccccccccccc", "title": "Kinematics Lecture", "kind": "video", "url": "https://cdn.test/kinematics.mp4"}),
                json!({"id": "11111111-0000-4000-8000-000000000002", "org_id": ORG, "title": "Syllabus", "kind": "document", "url": "https://cdn.test/syllabus.pdf"}),
            ],
        );
        let library = ContentLibrary::new(backend);

        let videos = library
            .list(&ContentQuery::new().org(org_id()).kind(ContentKind::Video))
            .await
            .unwrap();
        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].title, "Kinematics Lecture");
    }

    #[tokio::test]
    async fn test_add_question_validations() {
        let bank = QuizBank::new(Arc::new(MemoryBackend::new()));
        let quiz_id = Uuid::new_v4();

        let single_option = QuestionDraft {
            quiz_id,
            prompt: "Pick one".to_string(),
            options: vec!["only".to_string()],
            correct_index: 0,
        };
        assert!(matches!(
            bank.add_question(single_option).await,
            Err(ServiceError::Invalid(_))
        ));

        let answer_out_of_range = QuestionDraft {
            quiz_id,
            prompt: "2 + 2 = ?".to_string(),
            options: vec!["3".to_string(), "4".to_string()],
            correct_index: 2,
        };
        assert!(matches!(
            bank.add_question(answer_out_of_range).await,
            Err(ServiceError::Invalid(_))
        ));

        let valid = QuestionDraft {
            quiz_id,
            prompt: "2 + 2 = ?".to_string(),
            options: vec!["3".to_string(), "4".to_string()],
            correct_index: 1,
        };
        let question = bank.add_question(valid).await.unwrap();
        assert_eq!(question.correct_index, 1);
    }

    #[tokio::test]
    async fn test_questions_come_back_in_authoring_order() {
        let backend = Arc::new(MemoryBackend::new());
        let quiz = "99999999-9999-4999-8999-999999999999";
        backend.seed(
            QUESTIONS,
            vec![
                json!({"id": "11111111-0000-4000-8000-000000000002", "quiz_id": quiz, "prompt": "Second", "options": ["a", "b"], "correct_index": 0, "created_at": "2026-02-01T10:05:00Z"}),
                json!({"id": "11111111-0000-4000-8000-000000000001", "quiz_id": quiz, "prompt": "First", "options": ["a", "b"], "correct_index": 1, "created_at": "2026-02-01T10:00:00Z"}),
            ],
        );
        let bank = QuizBank::new(backend);
        let questions = bank.questions(quiz.parse().unwrap()).await.unwrap();
        assert_eq!(questions[0].prompt, "First");
        assert_eq!(questions[1].prompt, "Second");
    }

    #[tokio::test]
    async fn test_remove_missing_content_reports_not_found() {
        let backend = Arc::new(MemoryBackend::new());
        backend.provision(CONTENT);
        let library = ContentLibrary::new(backend);
        let result = library.remove(Uuid::new_v4()).await;
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }
}
