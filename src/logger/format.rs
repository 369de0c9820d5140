//! Canonical line layout.
//!
//! `<identifier>(<pid>): <YYYY-MM-DD HH:MM:SS,mmm>;<LEVEL>: <message>`
//!
//! The line carries no terminator; sinks append `\n` when writing.

use crate::logger::core::LogRecord;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

pub fn format_record(record: &LogRecord<'_>) -> String {
    format!(
        "{}({}): {};{}: {}",
        record.identifier,
        record.pid,
        record.timestamp.format(TIMESTAMP_FORMAT),
        record.level.as_str(),
        record.message
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::core::LogLevel;
    use chrono::{Local, TimeZone};

    fn record_at<'a>(level: LogLevel, message: &'a str) -> LogRecord<'a> {
        let timestamp = Local
            .with_ymd_and_hms(2024, 1, 15, 9, 5, 7)
            .single()
            .unwrap()
            + chrono::Duration::milliseconds(42);
        LogRecord {
            timestamp,
            level,
            identifier: "ingest",
            pid: 4242,
            message,
        }
    }

    #[test]
    fn test_format_exact_layout() {
        let line = format_record(&record_at(LogLevel::Info, "started"));
        assert_eq!(line, "ingest(4242): 2024-01-15 09:05:07,042;INFO: started");
    }

    #[test]
    fn test_format_level_names_match_methods() {
        let warn = format_record(&record_at(LogLevel::Warn, "w"));
        let err = format_record(&record_at(LogLevel::Error, "e"));
        assert!(warn.contains(";WARN: w"));
        assert!(err.contains(";ERROR: e"));
    }

    // edge case: empty message keeps the trailing separator
    #[test]
    fn test_format_empty_message() {
        let line = format_record(&record_at(LogLevel::Debug, ""));
        assert!(line.ends_with(";DEBUG: "));
        assert!(!line.ends_with('\n'));
    }

    #[test]
    fn test_format_is_deterministic() {
        let record = record_at(LogLevel::Error, "same");
        assert_eq!(format_record(&record), format_record(&record));
    }
}
