//! The shared logging service and its process-wide facade.
//!
//! Every `LoggingService` is a thin handle onto one `ServiceState` held by the
//! process registry. Obtaining a handle twice, from any module or thread,
//! yields the same logger; changing its level or log file through one handle
//! changes it for all of them.
//!
//! - `LoggingService`: the cloneable handle
//! - `Logger`: trait providing `debug`/`info`/`warn`/`err`
//! - `LogLevel`: ordered levels used for threshold filtering
//! - `Registry`: create-once holder of the state
//!
//! ```rust,no_run
//! use logging_singleton::{Logger, LoggingService, LogLevel, ServiceConfig};
//!
//! let log = LoggingService::with_config(
//!     ServiceConfig::default().with_logfile("/tmp/my_log.log"),
//! )?;
//! log.info("Doing something...");
//!
//! // Same logger; the configuration below is ignored.
//! let other = LoggingService::with_config(ServiceConfig::default().with_level(LogLevel::Debug))?;
//! assert!(other.ptr_eq(&log));
//! other.set_logging_level(LogLevel::Debug);
//! assert_eq!(log.logging_level(), LogLevel::Debug);
//! # Ok::<(), logging_singleton::LoggingError>(())
//! ```

pub mod core;
pub mod format;
pub mod registry;
pub mod rotation;
pub mod sink;

#[cfg(test)]
mod tests;

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use self::core::{LogLevel, LogRecord, Logger};
pub use format::format_record;
pub use registry::Registry;
pub use rotation::RotationPolicy;
pub use sink::{ConsoleSink, ConsoleStream, FileSink, Sink};

use crate::config::ServiceConfig;
use crate::error::LoggingError;
use registry::{GLOBAL, ServiceState};

/// Handle onto the process-wide logger. Cheap to clone.
#[derive(Clone)]
pub struct LoggingService {
    state: Arc<ServiceState>,
}

impl Default for LoggingService {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggingService {
    /// The process-wide logger, created with default settings if nobody has
    /// configured it yet.
    pub fn new() -> Self {
        GLOBAL.get_or_default()
    }

    /// The process-wide logger. `config` only takes effect if this call
    /// creates it; otherwise it is discarded without error.
    pub fn with_config(config: ServiceConfig) -> Result<Self, LoggingError> {
        GLOBAL.get(Some(config))
    }

    pub(crate) fn from_state(state: Arc<ServiceState>) -> Self {
        Self { state }
    }

    pub fn logging_level(&self) -> LogLevel {
        self.state.level()
    }

    /// Applies to every handle, starting with the next log call.
    pub fn set_logging_level(&self, level: LogLevel) {
        self.state.set_level(level);
    }

    /// Sets the level by name (`"DEBUG"`, `"warning"`, ...).
    pub fn set_level(&self, name: &str) -> Result<(), LoggingError> {
        self.set_logging_level(name.parse()?);
        Ok(())
    }

    pub fn log_file(&self) -> Option<PathBuf> {
        self.state.log_file()
    }

    /// Redirects file output to `path`, creating it if needed.
    ///
    /// The new file is opened before the old one is closed; on failure the
    /// previous destination stays active and the error is returned.
    pub fn set_log_file(&self, path: impl AsRef<Path>) -> Result<(), LoggingError> {
        self.state.set_log_file(path.as_ref())
    }

    /// Closes the log file. Console output, if enabled, continues.
    pub fn clear_log_file(&self) {
        self.state.clear_log_file();
    }

    /// Sends console output to `writer` instead of stdout/stderr. Has no
    /// effect when the service was configured without console output.
    pub fn set_console_writer(&self, writer: Box<dyn Write + Send>) {
        self.set_console_sink(Box::new(ConsoleSink::from_writer(writer)));
    }

    pub fn set_console_sink(&self, sink: Box<dyn Sink>) {
        self.state.set_console_sink(sink);
    }

    pub fn flush(&self) -> Result<(), LoggingError> {
        self.state.flush()
    }

    pub fn name(&self) -> &str {
        self.state.name()
    }

    pub fn msg_identifier(&self) -> &str {
        self.state.identifier()
    }

    /// Lines the file sink could not write.
    pub fn dropped_writes(&self) -> u64 {
        self.state.dropped_writes()
    }

    /// Most recent sink failure since the last call.
    pub fn take_last_error(&self) -> Option<LoggingError> {
        self.state.take_last_error()
    }

    pub fn ptr_eq(&self, other: &LoggingService) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }
}

impl Logger for LoggingService {
    fn log(&self, level: LogLevel, message: &str) {
        self.state.emit(level, message);
    }
}

impl fmt::Debug for LoggingService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<LoggingService {:p}>", Arc::as_ptr(&self.state))
    }
}

/// Log through the process-wide service.
pub fn log(level: LogLevel, message: &str) {
    GLOBAL.get_or_default().log(level, message);
}

/// Convenience functions
pub fn debug(msg: &str) {
    log(LogLevel::Debug, msg);
}

pub fn info(msg: &str) {
    log(LogLevel::Info, msg);
}

pub fn warn(msg: &str) {
    log(LogLevel::Warn, msg);
}

pub fn err(msg: &str) {
    log(LogLevel::Error, msg);
}
