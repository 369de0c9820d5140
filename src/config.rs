//! Construction options for the logging service.
//!
//! Only the configuration handed to the call that creates the singleton is
//! ever used; see [`crate::logger::Registry::get`].

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::LoggingError;
use crate::logger::{ConsoleStream, LogLevel, RotationPolicy};

pub const DEFAULT_LOG_SIZE: u64 = 1_000_000;
pub const DEFAULT_MAX_NUM_LOGS: u32 = 500;

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig {
    pub logging_level: LogLevel,
    /// Log file; `None` logs to the console only.
    pub logfile: Option<PathBuf>,
    pub tee_to_console: bool,
    /// Shown at the start of every line. Defaults to the program name.
    pub msg_identifier: Option<String>,
    pub rotating_logs: bool,
    pub log_size: u64,
    pub max_num_logs: u32,
    pub logger_name: Option<String>,
    pub console_stream: ConsoleStream,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            logging_level: LogLevel::Info,
            logfile: None,
            tee_to_console: true,
            msg_identifier: None,
            rotating_logs: true,
            log_size: DEFAULT_LOG_SIZE,
            max_num_logs: DEFAULT_MAX_NUM_LOGS,
            logger_name: None,
            console_stream: ConsoleStream::default(),
        }
    }
}

impl ServiceConfig {
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.logging_level = level;
        self
    }

    pub fn with_logfile(mut self, path: impl Into<PathBuf>) -> Self {
        self.logfile = Some(path.into());
        self
    }

    pub fn tee_to_console(mut self, tee: bool) -> Self {
        self.tee_to_console = tee;
        self
    }

    pub fn with_msg_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.msg_identifier = Some(identifier.into());
        self
    }

    pub fn rotating_logs(mut self, rotate: bool) -> Self {
        self.rotating_logs = rotate;
        self
    }

    pub fn with_log_size(mut self, bytes: u64) -> Self {
        self.log_size = bytes;
        self
    }

    pub fn with_max_num_logs(mut self, count: u32) -> Self {
        self.max_num_logs = count;
        self
    }

    pub fn with_logger_name(mut self, name: impl Into<String>) -> Self {
        self.logger_name = Some(name.into());
        self
    }

    pub fn with_console_stream(mut self, stream: ConsoleStream) -> Self {
        self.console_stream = stream;
        self
    }

    pub fn from_json_str(content: &str) -> Result<Self, LoggingError> {
        serde_json::from_str(content).map_err(|e| LoggingError::ConfigLoad {
            path: PathBuf::from("<inline>"),
            reason: e.to_string(),
        })
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, LoggingError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| LoggingError::ConfigLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&content).map_err(|e| LoggingError::ConfigLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Validates the options and fills in derived defaults.
    pub(crate) fn resolve(self) -> Result<ResolvedConfig, LoggingError> {
        if self.log_size == 0 {
            return Err(invalid("log_size", "must be a positive number of bytes"));
        }
        if self.max_num_logs == 0 {
            return Err(invalid("max_num_logs", "must be positive"));
        }
        if matches!(&self.msg_identifier, Some(id) if id.trim().is_empty()) {
            return Err(invalid("msg_identifier", "must not be empty"));
        }
        if matches!(&self.logger_name, Some(name) if name.trim().is_empty()) {
            return Err(invalid("logger_name", "must not be empty"));
        }
        if matches!(&self.logfile, Some(path) if path.as_os_str().is_empty()) {
            return Err(invalid("logfile", "must not be an empty path"));
        }

        Ok(ResolvedConfig {
            level: self.logging_level,
            logfile: self.logfile,
            tee_to_console: self.tee_to_console,
            identifier: self.msg_identifier.unwrap_or_else(program_name),
            name: self.logger_name.unwrap_or_else(default_logger_name),
            rotation: self
                .rotating_logs
                .then(|| RotationPolicy::new(self.log_size, self.max_num_logs)),
            console_stream: self.console_stream,
        })
    }
}

/// Configuration with every default applied.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedConfig {
    pub level: LogLevel,
    pub logfile: Option<PathBuf>,
    pub tee_to_console: bool,
    pub identifier: String,
    pub name: String,
    pub rotation: Option<RotationPolicy>,
    pub console_stream: ConsoleStream,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            logfile: None,
            tee_to_console: true,
            identifier: program_name(),
            name: default_logger_name(),
            rotation: Some(RotationPolicy::new(DEFAULT_LOG_SIZE, DEFAULT_MAX_NUM_LOGS)),
            console_stream: ConsoleStream::default(),
        }
    }
}

fn invalid(field: &'static str, reason: &str) -> LoggingError {
    LoggingError::InvalidConfig {
        field,
        reason: reason.to_string(),
    }
}

/// Base name of `argv[0]`, falling back to the logger name.
fn program_name() -> String {
    std::env::args_os()
        .next()
        .and_then(|arg0| {
            Path::new(&arg0)
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
        })
        .filter(|name| !name.is_empty())
        .unwrap_or_else(default_logger_name)
}

fn default_logger_name() -> String {
    env!("CARGO_CRATE_NAME").to_string()
}
