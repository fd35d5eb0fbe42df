//! Backend Error Types
//!
//! Errors surfaced by the hosted-backend client boundary. Every transport
//! (in-memory fake, native REST client, browser client) maps its failures
//! into this one enum so callers never match on transport specifics.

use thiserror::Error;

/// Postgres error code for "relation does not exist". Environments are
/// provisioned tenant by tenant, so a missing table is an expected state
/// rather than a bug.
pub const MISSING_RELATION_CODE: &str = "42P01";

/// Errors that can occur when talking to the hosted backend
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    /// Could not reach the backend at all
    #[error("Backend unavailable")]
    Unavailable,

    /// Request exceeded the configured timeout
    #[error("Request timeout")]
    Timeout,

    /// The backend answered with an error body
    #[error("API error {}: {message}", .code.as_deref().unwrap_or("-"))]
    Api {
        /// Postgres/PostgREST error code, when present
        code: Option<String>,
        message: String,
    },

    /// Transport-level failure that is neither a timeout nor a refused
    /// connection (TLS, malformed response, interrupted body)
    #[error("Request failed: {0}")]
    Transport(String),

    /// A row did not match the expected entity shape
    #[error("Decode error: {0}")]
    Decode(String),

    /// Operation requires a signed-in session and none is held
    #[error("No active session")]
    NoSession,

    /// Credentials were rejected by the auth endpoint
    #[error("Invalid credentials")]
    InvalidCredentials,
}

impl BackendError {
    /// Construct an API error from an error-body code and message
    pub fn api(code: Option<String>, message: impl Into<String>) -> Self {
        Self::Api {
            code,
            message: message.into(),
        }
    }

    /// The error code reported by the backend, if any
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Api { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// True when the failure means "this tenant's table is not provisioned
    /// yet" and callers should degrade to an empty view
    pub fn is_missing_relation(&self) -> bool {
        self.code() == Some(MISSING_RELATION_CODE)
    }
}

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_relation_detection() {
        let err = BackendError::api(
            Some(MISSING_RELATION_CODE.to_string()),
            "relation \"public.polls\" does not exist",
        );
        assert!(err.is_missing_relation());

        let other = BackendError::api(Some("23505".to_string()), "duplicate key");
        assert!(!other.is_missing_relation());

        assert!(!BackendError::Timeout.is_missing_relation());
    }

    #[test]
    fn test_api_error_display_includes_code() {
        let err = BackendError::api(Some("42P01".to_string()), "relation missing");
        let text = err.to_string();
        assert!(text.contains("42P01"));
        assert!(text.contains("relation missing"));
    }
}
