//! Fetch Outcome
//!
//! Reads against tenant tables have three meaningfully different results:
//! rows came back, the table is not provisioned for this environment, or
//! the request genuinely failed. Collapsing the second case into the third
//! used to paint error banners over screens that should just look empty,
//! so the distinction is kept explicit in the type.

use super::error::BackendError;
use super::row::Row;

/// Result of a table read
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// The read succeeded (possibly with zero rows)
    Rows(Vec<Row>),
    /// The table does not exist in this environment yet
    NotProvisioned,
    /// The read failed for a real reason
    Failed(BackendError),
}

impl FetchOutcome {
    /// Classify a raw read result, routing missing-relation errors into
    /// `NotProvisioned`
    pub fn from_result(result: Result<Vec<Row>, BackendError>) -> Self {
        match result {
            Ok(rows) => Self::Rows(rows),
            Err(err) if err.is_missing_relation() => Self::NotProvisioned,
            Err(err) => Self::Failed(err),
        }
    }

    /// True when rows came back
    pub fn is_rows(&self) -> bool {
        matches!(self, Self::Rows(_))
    }

    /// Rows when present, `None` for the other two cases
    pub fn rows(self) -> Option<Vec<Row>> {
        match self {
            Self::Rows(rows) => Some(rows),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_relation_becomes_not_provisioned() {
        let err = BackendError::api(Some("42P01".to_string()), "relation does not exist");
        assert_eq!(
            FetchOutcome::from_result(Err(err)),
            FetchOutcome::NotProvisioned
        );
    }

    #[test]
    fn test_other_errors_stay_failures() {
        let err = BackendError::Timeout;
        assert_eq!(
            FetchOutcome::from_result(Err(err.clone())),
            FetchOutcome::Failed(err)
        );
    }

    #[test]
    fn test_empty_rows_are_not_a_failure() {
        let outcome = FetchOutcome::from_result(Ok(Vec::new()));
        assert!(outcome.is_rows());
        assert_eq!(outcome.rows(), Some(Vec::new()));
    }
}
