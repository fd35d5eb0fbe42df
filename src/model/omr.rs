//! OMR Entities
//!
//! Answer-sheet templates and scan results. Scanning itself happens in a
//! separate pipeline; the console manages templates and reads results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An answer-sheet layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OmrTemplate {
    pub id: Uuid,
    pub org_id: Uuid,
    pub name: String,
    pub question_count: u32,
    pub choices_per_question: u32,
    pub created_at: Option<DateTime<Utc>>,
}

/// Payload for creating a template
#[derive(Debug, Clone, Serialize)]
pub struct OmrTemplateDraft {
    pub org_id: Uuid,
    pub name: String,
    pub question_count: u32,
    pub choices_per_question: u32,
}

/// One scanned sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OmrResult {
    pub id: Uuid,
    pub template_id: Option<Uuid>,
    pub student_name: String,
    pub score: u32,
    pub total: u32,
    pub scanned_at: Option<DateTime<Utc>>,
}

impl OmrResult {
    /// Score as a whole percentage, zero when the sheet had no questions
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            0
        } else {
            ((self.score as f64 / self.total as f64) * 100.0).round() as u8
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_percent() {
        let result = OmrResult {
            id: Uuid::new_v4(),
            template_id: None,
            student_name: "Asha".to_string(),
            score: 37,
            total: 40,
            scanned_at: None,
        };
        assert_eq!(result.percent(), 93);

        let empty = OmrResult { score: 0, total: 0, ..result };
        assert_eq!(empty.percent(), 0);
    }
}
