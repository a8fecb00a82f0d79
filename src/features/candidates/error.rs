//! Submission failure taxonomy

use thiserror::Error;
use tracing::error;

use crate::core::error::AppError;

/// Why a submission was rejected
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// Client-correctable input problem, reported verbatim
    #[error("{0}")]
    Validation(String),

    /// Storage or database failure after validation passed
    #[error("{}", .0.detail())]
    Persistence(#[from] AppError),
}

impl SubmissionError {
    pub fn validation(message: impl Into<String>) -> Self {
        SubmissionError::Validation(message.into())
    }
}

impl From<SubmissionError> for AppError {
    fn from(err: SubmissionError) -> Self {
        match err {
            SubmissionError::Validation(msg) => AppError::Validation(msg),
            SubmissionError::Persistence(AppError::Conflict(msg)) => AppError::Conflict(msg),
            // Server-side faults still answer with a client-error status and the
            // underlying message; the distinction is kept in the logs.
            SubmissionError::Persistence(other) => {
                error!("Submission persistence failure: {:?}", other);
                AppError::BadRequest(other.detail())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_passes_message_through() {
        let err: AppError = SubmissionError::validation("Minimum 2 documents required").into();
        assert!(matches!(err, AppError::Validation(ref m) if m == "Minimum 2 documents required"));
    }

    #[test]
    fn test_conflict_stays_conflict() {
        let err: AppError =
            SubmissionError::Persistence(AppError::Conflict("duplicate".to_string())).into();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn test_storage_failure_becomes_bad_request_with_detail() {
        let err: AppError =
            SubmissionError::Persistence(AppError::Storage("disk full".to_string())).into();
        assert!(matches!(err, AppError::BadRequest(ref m) if m == "disk full"));
    }
}
