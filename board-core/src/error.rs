//! Error types for board operations.

use thiserror::Error;

/// Result type for board operations.
pub type BoardResult<T> = Result<T, BoardError>;

/// Errors that can occur in board operations.
#[derive(Debug, Error)]
pub enum BoardError {
    /// Action or frame serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
