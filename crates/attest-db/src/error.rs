//! Database error types for attest-db.

use attest_core::errors::CoreError;
use thiserror::Error;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed or returned malformed data.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// A referenced record (e.g. the situation of a new acceptance test) does not exist.
    #[error("Missing reference: {entity} {id}")]
    MissingReference { entity: &'static str, id: String },

    /// Invalid state encountered (e.g., a disallowed transition).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// The acting user lacks the capability for this mutation.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<CoreError> for DatabaseError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound { .. } => Self::NoResult,
            CoreError::InvalidTransition { .. } | CoreError::Validation(_) => {
                Self::InvalidState(err.to_string())
            }
            CoreError::Forbidden(message) => Self::Forbidden(message),
            CoreError::Other(e) => Self::Other(e),
        }
    }
}
