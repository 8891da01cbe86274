//! Review store error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("user not found: {0}")]
    UserNotFound(i64),

    #[error("word not found: {0}")]
    WordNotFound(i64),

    #[error("review not found: {0}")]
    ReviewNotFound(i64),

    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Whether the caller may safely retry the operation. The failed write
    /// was rolled back either way; a retried `record_outcome` that already
    /// committed would double-count, so only transport-level failures are
    /// marked retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Unavailable(_) => true,
            Self::Sqlite(rusqlite::Error::SqliteFailure(e, _)) => matches!(
                e.code,
                rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
            ),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_not_retryable() {
        assert!(!StoreError::ReviewNotFound(42).is_retryable());
        assert!(!StoreError::UserNotFound(1).is_retryable());
    }

    #[test]
    fn unavailable_is_retryable() {
        assert!(StoreError::Unavailable("disk full".to_string()).is_retryable());
    }

    #[test]
    fn error_display_names_the_entity() {
        assert_eq!(
            StoreError::WordNotFound(7).to_string(),
            "word not found: 7"
        );
    }
}
