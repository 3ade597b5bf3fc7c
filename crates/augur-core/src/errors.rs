//! Cross-cutting error types for Augur.
//!
//! Storage errors live in `augur-db` (`DatabaseError`), configuration errors
//! in `augur-config` (`ConfigError`). Both wrap or sit alongside `CoreError`.

use thiserror::Error;

/// Errors that can be raised by any Augur crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A caller-supplied argument failed validation.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CoreError {
    /// Shorthand for [`CoreError::InvalidArgument`].
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

/// Reject surrogate keys that can never exist (`id < 1`).
///
/// # Errors
///
/// Returns `CoreError::InvalidArgument` naming the offending parameter.
pub fn ensure_id(name: &str, id: i64) -> Result<i64, CoreError> {
    if id < 1 {
        return Err(CoreError::invalid(format!(
            "{name} must be a positive integer, got {id}"
        )));
    }
    Ok(id)
}
