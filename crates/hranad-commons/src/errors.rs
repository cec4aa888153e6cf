//! Shared protocol error type for hranad.
//!
//! Errors here are the ones that cross crate boundaries: stream-level
//! failures raised by the registry and request framing failures raised by the
//! handlers. Per-request execution failures stay inside the pipeline result
//! array and never become a `ProtocolError`.

use thiserror::Error;

/// Errors surfaced to the client as a top-level `{"error": …}` body.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// The presented baton is not in the registry (consumed, expired, or
    /// never issued). The display text is part of the wire contract.
    #[error("Invalid or expired baton")]
    UnknownBaton,

    /// The request body could not be understood (malformed JSON, missing
    /// required fields, wrong HTTP method).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Unexpected server-side failure.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ProtocolError {
    /// Creates an InvalidRequest error with a message.
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// Creates an Internal error with a message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

/// Result type alias using ProtocolError.
pub type Result<T> = std::result::Result<T, ProtocolError>;
