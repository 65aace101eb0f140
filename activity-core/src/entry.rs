//! Audit log lines.
//!
//! Each entry is a single immutable line `[local-timestamp] message`.
//! The log is persisted as the ordered sequence of these lines.

use std::fmt;

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Timestamp layout inside the brackets.
pub const ENTRY_TIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// One audit line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogEntry(String);

impl LogEntry {
    /// Stamp a message with the given local time.
    pub fn at(time: NaiveDateTime, message: &str) -> Self {
        Self(format!("[{}] {}", time.format(ENTRY_TIME_FORMAT), message))
    }

    /// Stamp a message with the current local time.
    pub fn now(message: &str) -> Self {
        Self::at(Local::now().naive_local(), message)
    }

    /// Wrap a line that was already formatted (e.g. read back from disk).
    pub fn from_line(line: String) -> Self {
        Self(line)
    }

    /// The full line.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Name of an export artifact, unique per millisecond.
pub fn export_file_name(prefix: &str, millis: i64) -> String {
    format!("{prefix}-{millis}.txt")
}

/// Newline-joined body of an export artifact.
pub fn export_contents(entries: &[LogEntry]) -> String {
    entries
        .iter()
        .map(LogEntry::as_str)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 7)
            .unwrap()
            .and_hms_opt(12, 4, 5)
            .unwrap()
    }

    #[test]
    fn entry_has_bracketed_zero_padded_timestamp() {
        let entry = LogEntry::at(noon(), "Fetched catalog");
        assert_eq!(entry.as_str(), "[2025/03/07 12:04:05] Fetched catalog");
    }

    #[test]
    fn entry_serializes_as_plain_string() {
        let entry = LogEntry::at(noon(), "x");
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json, serde_json::json!("[2025/03/07 12:04:05] x"));

        let back: LogEntry = serde_json::from_value(json).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn export_name_carries_millis() {
        assert_eq!(
            export_file_name("activity-logs", 1733000000123),
            "activity-logs-1733000000123.txt"
        );
    }

    #[test]
    fn export_joins_with_newlines() {
        let entries = vec![
            LogEntry::from_line("one".into()),
            LogEntry::from_line("two".into()),
        ];
        assert_eq!(export_contents(&entries), "one\ntwo");
        assert_eq!(export_contents(&[]), "");
    }
}
