use std::time::Duration;
use thiserror::Error;

/// Result type for protection store operations
pub type TrackerResult<T> = Result<T, TrackerError>;

/// Protection store errors
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Store operation timed out after {0:?}")]
    Timeout(Duration),

    #[error("Invalid id in store: {0}")]
    InvalidId(i64),
}
