//! Database error types for augur-db.

use augur_config::ConfigError;
use augur_core::errors::CoreError;
use thiserror::Error;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed, or a stored value could not be decoded.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// A uniqueness constraint rejected the write.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The question already carries an outcome.
    #[error("Question {question_id} is already resolved")]
    AlreadyResolved { question_id: i64 },

    /// Argument validation or other domain rule failure.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The database configuration could not be resolved.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DatabaseError {
    /// Whether this error is a caller-side validation failure.
    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::Core(CoreError::InvalidArgument(_)))
    }
}
