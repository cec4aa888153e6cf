//! Error types for hranad-core.

use thiserror::Error;

/// Errors raised by a [`crate::SqlBackend`] or by the statement executor.
///
/// Messages end up verbatim in per-request `{"error": {"message": …}}`
/// entries, so they are written for the client, not the operator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Statement preparation or execution failed.
    #[error("{0}")]
    Execution(String),

    /// A named argument matched no placeholder in the statement.
    #[error("unknown named parameter: {0}")]
    UnknownParameter(String),
}

/// Result type for backend and executor operations.
pub type Result<T> = std::result::Result<T, BackendError>;
