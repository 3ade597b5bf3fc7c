//! Resolution-date heuristic and resolution note limits.
//!
//! When a generated question is saved, its expected resolution date is
//! guessed from phrases in the question text. The scan is a case-insensitive
//! substring match over a fixed keyword order; the first keyword found wins.

use chrono::{DateTime, Datelike, Duration, Utc, Weekday};

/// Maximum length of a stored resolution note, in characters.
pub const MAX_NOTE_CHARS: usize = 500;

/// Horizon used for "this week" and for text with no recognized phrase.
pub const DEFAULT_HORIZON_DAYS: i64 = 7;

/// Time phrase detected in a question's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionHint {
    Tomorrow,
    ThisWeek,
    Weekend,
    Unspecified,
}

impl ResolutionHint {
    /// Detect the first matching phrase in `text`, checked in the order
    /// `tomorrow`, `this week`, `weekend`.
    #[must_use]
    pub fn detect(text: &str) -> Self {
        let lowered = text.to_lowercase();
        if lowered.contains("tomorrow") {
            Self::Tomorrow
        } else if lowered.contains("this week") {
            Self::ThisWeek
        } else if lowered.contains("weekend") {
            Self::Weekend
        } else {
            Self::Unspecified
        }
    }

    /// Days from `now` until resolution.
    #[must_use]
    pub fn days_from(self, now: DateTime<Utc>) -> i64 {
        match self {
            Self::Tomorrow => 1,
            Self::ThisWeek | Self::Unspecified => DEFAULT_HORIZON_DAYS,
            Self::Weekend => days_until_sunday(now.weekday()),
        }
    }
}

/// Days until the next Sunday, `0` when `weekday` is already Sunday.
fn days_until_sunday(weekday: Weekday) -> i64 {
    // num_days_from_monday: Mon = 0 .. Sun = 6
    6 - i64::from(weekday.num_days_from_monday())
}

/// Expected resolution date of a question asked at `now`.
#[must_use]
pub fn extract_resolution_date(question_text: &str, now: DateTime<Utc>) -> DateTime<Utc> {
    let hint = ResolutionHint::detect(question_text);
    now + Duration::days(hint.days_from(now))
}

/// Cut a resolution note to [`MAX_NOTE_CHARS`] characters.
///
/// Counts `char`s so multi-byte text is never split mid-character.
#[must_use]
pub fn truncate_note(note: &str) -> String {
    match note.char_indices().nth(MAX_NOTE_CHARS) {
        Some((byte_idx, _)) => note[..byte_idx].to_string(),
        None => note.to_string(),
    }
}
