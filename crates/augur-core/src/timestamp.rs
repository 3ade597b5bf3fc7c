//! Serde helpers for the caller-facing timestamp format.
//!
//! Entities serialize their timestamps as `YYYY-MM-DD HH:MM:SS` (UTC, whole
//! seconds). Deserialization also accepts RFC 3339 so values read back from
//! storage or other tools parse either way.
//!
//! ```ignore
//! #[derive(Serialize, Deserialize)]
//! struct Record {
//!     #[serde(with = "augur_core::timestamp")]
//!     pub created_at: DateTime<Utc>,
//!
//!     #[serde(default, with = "augur_core::timestamp::option")]
//!     pub resolved_at: Option<DateTime<Utc>>,
//! }
//! ```

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// `strftime` pattern of serialized timestamps.
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format a timestamp in [`DISPLAY_FORMAT`].
#[must_use]
pub fn format(dt: &DateTime<Utc>) -> String {
    dt.format(DISPLAY_FORMAT).to_string()
}

/// Parse either [`DISPLAY_FORMAT`] or RFC 3339 into UTC.
///
/// # Errors
///
/// Returns the `chrono` parse error of the [`DISPLAY_FORMAT`] attempt when
/// neither format matches.
pub fn parse(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, DISPLAY_FORMAT).map(|naive| naive.and_utc())
}

pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&format(dt))
}

pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(d)?;
    parse(&raw).map_err(serde::de::Error::custom)
}

/// Same format for `Option<DateTime<Utc>>`; `None` serializes as `null`.
pub mod option {
    use super::{DateTime, Deserialize, Deserializer, Serializer, Utc};

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(dt: &Option<DateTime<Utc>>, s: S) -> Result<S::Ok, S::Error> {
        match dt {
            Some(dt) => s.serialize_some(&super::format(dt)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        Option::<String>::deserialize(d)?
            .map(|raw| super::parse(&raw).map_err(serde::de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn format_drops_subseconds() {
        let dt = Utc.with_ymd_and_hms(2026, 10, 14, 9, 5, 7).unwrap()
            + chrono::Duration::milliseconds(250);
        assert_eq!(format(&dt), "2026-10-14 09:05:07");
    }

    #[test]
    fn parse_accepts_both_formats() {
        let expected = Utc.with_ymd_and_hms(2026, 10, 14, 9, 5, 7).unwrap();
        assert_eq!(parse("2026-10-14 09:05:07").unwrap(), expected);
        assert_eq!(parse("2026-10-14T09:05:07Z").unwrap(), expected);
        assert_eq!(parse("2026-10-14T11:05:07+02:00").unwrap(), expected);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse("next tuesday").is_err());
        assert!(parse("").is_err());
    }
}
