//! Row-to-entity parsing helpers.
//!
//! Timestamps are written as fixed-width RFC 3339 UTC text with microsecond
//! precision so that `ORDER BY` on the text column is chronological. List
//! fields are JSON arrays in TEXT columns, decoded on read.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::DatabaseError;

/// Format a timestamp for storage, e.g. `2026-10-14T09:30:00.000000Z`.
#[must_use]
pub fn to_storage(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a required TEXT column as `DateTime<Utc>`.
///
/// Accepts RFC 3339 and `YYYY-MM-DD HH:MM:SS`.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string cannot be parsed as either format.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    augur_core::timestamp::parse(s)
        .map_err(|e| DatabaseError::Query(format!("Failed to parse datetime '{s}': {e}")))
}

/// Parse an optional TEXT column as `Option<DateTime<Utc>>`.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if a non-empty string cannot be parsed.
pub fn parse_optional_datetime(s: Option<&str>) -> Result<Option<DateTime<Utc>>, DatabaseError> {
    match s {
        Some(s) if !s.is_empty() => Ok(Some(parse_datetime(s)?)),
        _ => Ok(None),
    }
}

/// Parse a TEXT column into a serde-deserializable enum.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string does not match any enum variant.
pub fn parse_enum<T: serde::de::DeserializeOwned>(s: &str) -> Result<T, DatabaseError> {
    serde_json::from_value(serde_json::Value::String(s.to_string()))
        .map_err(|e| DatabaseError::Query(format!("Failed to parse enum from '{s}': {e}")))
}

/// Read a nullable TEXT column. Returns `None` for both SQL NULL and empty string.
///
/// `row.get::<String>(idx)` on a NULL column returns an error, not `""`.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_opt_string(row: &libsql::Row, idx: i32) -> Result<Option<String>, DatabaseError> {
    match row.get::<Option<String>>(idx)? {
        Some(s) if s.is_empty() => Ok(None),
        other => Ok(other),
    }
}

/// Read a nullable INTEGER column holding a boolean.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_opt_bool(row: &libsql::Row, idx: i32) -> Result<Option<bool>, DatabaseError> {
    Ok(row.get::<Option<i64>>(idx)?.map(|v| v != 0))
}

/// Encode a list field as JSON text.
///
/// # Errors
///
/// Returns `DatabaseError::Other` if serialization fails.
pub fn encode_list(items: &[String]) -> Result<String, DatabaseError> {
    serde_json::to_string(items).map_err(|e| DatabaseError::Other(e.into()))
}

/// Decode a JSON array TEXT column into a list of strings.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the text is not a JSON array of strings.
pub fn decode_list(s: &str) -> Result<Vec<String>, DatabaseError> {
    serde_json::from_str(s)
        .map_err(|e| DatabaseError::Query(format!("Invalid JSON list in column: {e}")))
}

/// Decode a nullable JSON array TEXT column.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if a non-empty string is not a JSON array of strings.
pub fn decode_optional_list(s: Option<&str>) -> Result<Option<Vec<String>>, DatabaseError> {
    match s {
        Some(s) if !s.is_empty() => Ok(Some(decode_list(s)?)),
        _ => Ok(None),
    }
}

/// Collect caller-supplied strings into an owned list.
pub fn to_owned_list<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items.into_iter().map(|s| s.as_ref().to_string()).collect()
}

/// Turn a UNIQUE constraint failure into `DatabaseError::Conflict`.
///
/// Other errors pass through unchanged.
#[must_use]
pub fn conflict_on_unique(error: DatabaseError, what: impl FnOnce() -> String) -> DatabaseError {
    match &error {
        DatabaseError::LibSql(e) if e.to_string().contains("UNIQUE constraint failed") => {
            DatabaseError::Conflict(what())
        }
        _ => error,
    }
}
