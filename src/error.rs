//! Error taxonomy for the logging service.
//!
//! Logging calls themselves never return these; they are surfaced by
//! configuration mutations and, after the fact, through
//! `LoggingService::take_last_error`.

use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("invalid logging level: {value}")]
    InvalidLevel { value: String },

    #[error("invalid configuration for `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("log file {} unavailable: {source}", path.display())]
    SinkUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("rotation of {} failed: {source}", path.display())]
    RotationFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("console write failed: {source}")]
    ConsoleWrite {
        #[source]
        source: io::Error,
    },

    #[error("cannot load configuration from {}: {reason}", path.display())]
    ConfigLoad { path: PathBuf, reason: String },
}

impl LoggingError {
    pub(crate) fn invalid_level(value: impl ToString) -> Self {
        LoggingError::InvalidLevel {
            value: value.to_string(),
        }
    }
}
