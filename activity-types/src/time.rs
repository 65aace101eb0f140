//! Timestamp handling.
//!
//! The backend reports every timestamp as a display string in
//! [`TIMESTAMP_FORMAT`]. Filter bounds typed by a user are parsed more
//! leniently by [`parse_bound`].

use chrono::{NaiveDate, NaiveDateTime};

use crate::TypesError;

/// Format of every timestamp the backend reports.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const BOUND_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parse a backend timestamp.
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime, TypesError> {
    NaiveDateTime::parse_from_str(s.trim(), TIMESTAMP_FORMAT)
        .map_err(|_| TypesError::InvalidTimestamp(s.to_string()))
}

/// Parse a filter bound.
///
/// Accepts the backend format, minute precision, `T`-separated forms and
/// bare dates. A bare date means midnight at the start of that day.
pub fn parse_bound(s: &str) -> Result<NaiveDateTime, TypesError> {
    let s = s.trim();
    for format in BOUND_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(parsed);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| TypesError::InvalidTimestamp(s.to_string()))
}
