//! Local calendar dates.
//!
//! The backend thinks in UTC, the user thinks in wall-clock time. Every
//! "is this challenge today" comparison goes through these helpers so both
//! sides of the comparison are local dates.

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};

use crate::error::ChallengeError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Wall-clock date at the instant's own offset.
pub fn local_date(instant: DateTime<FixedOffset>) -> NaiveDate {
    instant.date_naive()
}

/// Wall-clock date of a UTC instant viewed from `offset`.
pub fn local_date_at(instant: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    offset.from_utc_datetime(&instant.naive_utc()).date_naive()
}

/// `YYYY-MM-DD` for the instant's local date.
pub fn to_local_date(instant: DateTime<FixedOffset>) -> String {
    format_date(local_date(instant))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a `YYYY-MM-DD` challenge date.
pub fn parse_challenge_date(value: &str) -> Result<NaiveDate, ChallengeError> {
    let trimmed = value.trim();
    // chrono accepts unpadded fields; the wire format is always padded.
    if trimmed.len() != 10 {
        return Err(ChallengeError::InvalidDateFormat {
            value: value.to_string(),
        });
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| {
        ChallengeError::InvalidDateFormat {
            value: value.to_string(),
        }
    })
}
