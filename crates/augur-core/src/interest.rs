//! Interest normalization.
//!
//! Interests are category labels shared by users and questions. They are
//! always stored and compared in trimmed lowercase form; every operation
//! that accepts an interest, for writing or filtering, passes it through
//! here first.

use crate::errors::CoreError;

/// Trim and lowercase a single interest.
///
/// # Errors
///
/// Returns `CoreError::InvalidArgument` if the interest is empty after trimming.
pub fn normalize_interest(raw: &str) -> Result<String, CoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CoreError::invalid("interest must not be empty"));
    }
    Ok(trimmed.to_lowercase())
}

/// Normalize a list of interests, preserving order.
///
/// # Errors
///
/// Returns `CoreError::InvalidArgument` if any entry is empty after trimming.
pub fn normalize_interests<I, S>(raw: I) -> Result<Vec<String>, CoreError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw.into_iter()
        .map(|interest| normalize_interest(interest.as_ref()))
        .collect()
}

/// Normalize an optional filter. `None` means "no filter".
///
/// # Errors
///
/// Returns `CoreError::InvalidArgument` for `Some("")` or whitespace.
pub fn normalize_filter(raw: Option<&str>) -> Result<Option<String>, CoreError> {
    raw.map(normalize_interest).transpose()
}
