//! Provider-level error type.

use thiserror::Error;

use sockrpc_core::{TransportError, ValidationError};

/// Errors surfaced to provider callers.
///
/// Transport and validation failures pass through transparently so the
/// caller sees the underlying message unchanged.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The underlying connection failed; propagated unwrapped.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The transport resolved but the response failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// `remove_all_listeners` was called with a name outside the
    /// `socket_*` table.
    #[error("unknown socket event: {0}")]
    UnknownSocketEvent(String),
}
