//! Domain-level error type shared across the workspace.

use crate::types::DbId;

/// Errors raised by domain logic. The HTTP layer maps each variant to a
/// status code and a stable error code string.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// An entity addressed by numeric id does not exist.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// An entity addressed by its codigo (slug) does not exist.
    #[error("{entity} '{codigo}' not found")]
    NotFoundCodigo { entity: &'static str, codigo: String },

    /// Input failed domain validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The operation conflicts with current state (duplicate codigo,
    /// illegal state transition, ...).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Missing or invalid credentials.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated but not allowed.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Unexpected internal failure.
    #[error("Internal error: {0}")]
    Internal(String),
}
