//! Transport-level error types.

use thiserror::Error;

/// Errors that can occur during a socket transport operation.
#[derive(Debug, Error)]
pub enum TransportError {
    /// WebSocket connection/send/receive error.
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// The connection (or its background task) is gone.
    #[error("connection closed: {0}")]
    Closed(String),

    /// Request timed out after the configured duration.
    #[error("request timed out after {ms}ms")]
    Timeout { ms: u64 },

    /// A frame could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An unexpected error.
    #[error("{0}")]
    Other(String),
}
