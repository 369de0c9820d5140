//! Logging primitives shared by every part of the service.
//!
//! Responsibilities:
//! - Define the ordered `LogLevel` used for threshold filtering
//! - Define `LogRecord`, the per-call value handed to the formatter
//! - Provide the `Logger` trait whose convenience methods every handle exposes
//!
//! Levels are owned by this crate so callers never need to depend on another
//! logging ecosystem to configure the service.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local};
use serde::{Deserialize, Deserializer};

use crate::error::LoggingError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum LogLevel {
    Debug = 10,
    Info = 20,
    Warn = 30,
    Error = 40,
}

impl LogLevel {
    pub const ALL: [LogLevel; 4] = [
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
    ];

    /// Upper-case name as it appears in formatted lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    /// Numeric value on the conventional 10/20/30/40 scale.
    pub fn number(&self) -> u8 {
        *self as u8
    }

    /// Inverse of [`LogLevel::number`]. Anything off the scale is rejected.
    pub fn from_number(number: u64) -> Result<Self, LoggingError> {
        LogLevel::ALL
            .into_iter()
            .find(|level| u64::from(level.number()) == number)
            .ok_or_else(|| LoggingError::invalid_level(number))
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" | "ERR" => Ok(LogLevel::Error),
            _ => Err(LoggingError::invalid_level(s)),
        }
    }
}

impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Name(String),
            Number(u64),
        }

        let parsed = match Repr::deserialize(deserializer)? {
            Repr::Name(name) => name.parse(),
            Repr::Number(number) => LogLevel::from_number(number),
        };
        parsed.map_err(serde::de::Error::custom)
    }
}

/// One log call, captured just long enough to be formatted.
#[derive(Debug, Clone)]
pub struct LogRecord<'a> {
    pub timestamp: DateTime<Local>,
    pub level: LogLevel,
    pub identifier: &'a str,
    pub pid: u32,
    pub message: &'a str,
}

impl<'a> LogRecord<'a> {
    /// Stamps the record with the wall clock and the current process id.
    pub fn new(level: LogLevel, identifier: &'a str, message: &'a str) -> Self {
        Self {
            timestamp: Local::now(),
            level,
            identifier,
            pid: std::process::id(),
            message,
        }
    }
}

/// Logging surface shared by every handle.
///
/// Must be `Send + Sync + 'static` so handles can move between threads. The
/// only required method is `log`; the per-level helpers delegate to it.
pub trait Logger: Send + Sync + 'static {
    /// Emit a message at the given level. Never fails.
    fn log(&self, level: LogLevel, message: &str);

    fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }
    fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }
    fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }
    fn err(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }
}
