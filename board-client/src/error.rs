//! Errors raised by the client transports.
//!
//! None of these escape the sync engine; they are logged and turned into
//! state transitions or dropped sends.

use thiserror::Error;

/// Result type for client transport operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur when talking to the board server.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The configured server URL is invalid.
    #[error("invalid board server URL: {0}")]
    InvalidUrl(String),
    /// HTTP layer failed (connection, timeout, etc.).
    #[error("board server HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The server answered with a non-success status.
    #[error("board server returned status {0}")]
    Status(u16),
    /// JSON parsing failed.
    #[error("failed to parse board payload: {0}")]
    Json(#[from] serde_json::Error),
    /// WebSocket transport failed.
    #[error("push channel error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
    /// The server broke the handshake sequence.
    #[error("push channel handshake failed: {0}")]
    Handshake(String),
    /// The handshake did not complete in time.
    #[error("push channel handshake timed out after {0}ms")]
    HandshakeTimeout(u64),
    /// The push link writer has already shut down.
    #[error("push channel closed")]
    LinkClosed,
}

impl ClientError {
    /// Returns true for transient failures worth another attempt later.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Http(_)
                | Self::Status(_)
                | Self::WebSocket(_)
                | Self::HandshakeTimeout(_)
                | Self::LinkClosed
        )
    }
}

impl From<board_core::BoardError> for ClientError {
    fn from(err: board_core::BoardError) -> Self {
        match err {
            board_core::BoardError::Serialization(e) => Self::Json(e),
        }
    }
}
