//! Process-wide holder of the one logger state.
//!
//! The first `Registry::get` builds the `ServiceState` from its configuration;
//! every later call returns a handle to that same state and drops whatever
//! configuration it was given. Concurrent first callers are resolved by the
//! `OnceCell`: exactly one state is built, and the losing configurations are
//! discarded the same way as any later one. This first-wins rule is intended,
//! not an error.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, AtomicU64, Ordering};

use once_cell::sync::OnceCell;
use parking_lot::Mutex;

use crate::config::{ResolvedConfig, ServiceConfig};
use crate::error::LoggingError;
use crate::logger::LoggingService;
use crate::logger::core::{LogLevel, LogRecord};
use crate::logger::format::format_record;
use crate::logger::rotation::RotationPolicy;
use crate::logger::sink::{ConsoleSink, FileSink, Sink};

/// Registry backing `LoggingService::new` and `LoggingService::with_config`.
pub(crate) static GLOBAL: Registry = Registry::new();

pub struct Registry {
    cell: OnceCell<Arc<ServiceState>>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    /// Returns a handle to the singleton, creating it from `config` if this
    /// is the first call.
    ///
    /// Once the state exists `config` is ignored entirely, even when it
    /// differs from the configuration in force. An invalid configuration on
    /// the first call is rejected and leaves the registry empty.
    pub fn get(&self, config: Option<ServiceConfig>) -> Result<LoggingService, LoggingError> {
        if let Some(state) = self.cell.get() {
            return Ok(LoggingService::from_state(Arc::clone(state)));
        }
        let resolved = config.unwrap_or_default().resolve()?;
        let state = self
            .cell
            .get_or_init(|| Arc::new(ServiceState::new(resolved)));
        Ok(LoggingService::from_state(Arc::clone(state)))
    }

    /// Like `get(None)`, which cannot fail.
    pub fn get_or_default(&self) -> LoggingService {
        let state = self
            .cell
            .get_or_init(|| Arc::new(ServiceState::new(ResolvedConfig::default())));
        LoggingService::from_state(Arc::clone(state))
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }
}

struct Sinks {
    console: Option<Box<dyn Sink>>,
    file: Option<FileSink>,
}

/// The shared logger. Never constructed outside a `Registry`.
pub(crate) struct ServiceState {
    level: AtomicU8,
    identifier: String,
    name: String,
    rotation: Option<RotationPolicy>,
    sinks: Mutex<Sinks>,
    dropped: AtomicU64,
    last_error: Mutex<Option<LoggingError>>,
}

impl ServiceState {
    fn new(config: ResolvedConfig) -> Self {
        let console = config
            .tee_to_console
            .then(|| Box::new(ConsoleSink::new(config.console_stream)) as Box<dyn Sink>);

        let mut open_error = None;
        let file = config.logfile.map(|path| {
            FileSink::open(&path, config.rotation).unwrap_or_else(|err| {
                open_error = Some(err);
                FileSink::degraded(path, config.rotation)
            })
        });

        let state = Self {
            level: AtomicU8::new(config.level.number()),
            identifier: config.identifier,
            name: config.name,
            rotation: config.rotation,
            sinks: Mutex::new(Sinks { console, file }),
            dropped: AtomicU64::new(0),
            last_error: Mutex::new(None),
        };
        if let Some(err) = open_error {
            let mut sinks = state.sinks.lock();
            state.report(&mut sinks, err);
        }
        state
    }

    pub(crate) fn level(&self) -> LogLevel {
        LogLevel::from_number(u64::from(self.level.load(Ordering::Acquire)))
            .unwrap_or(LogLevel::Info)
    }

    pub(crate) fn set_level(&self, level: LogLevel) {
        self.level.store(level.number(), Ordering::Release);
    }

    pub(crate) fn identifier(&self) -> &str {
        &self.identifier
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn emit(&self, level: LogLevel, message: &str) {
        if level < self.level() {
            return;
        }
        // Stamped under the lock so file order matches timestamp order.
        let mut sinks = self.sinks.lock();
        let line = format_record(&LogRecord::new(level, &self.identifier, message));
        if let Some(console) = sinks.console.as_mut() {
            let _ = console.write_line(&line);
        }

        let Some(file) = sinks.file.as_mut() else {
            return;
        };
        if file.is_degraded() {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return;
        }
        let result = file.write_line(&line);
        let recovered = file.take_rotation_error();

        if let Some(err) = recovered {
            self.report(&mut sinks, err);
        }
        if let Err(err) = result {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            self.report(&mut sinks, err);
        }
    }

    /// Best-effort console diagnostic plus the stored error for
    /// `take_last_error`.
    fn report(&self, sinks: &mut Sinks, err: LoggingError) {
        if let Some(console) = sinks.console.as_mut() {
            let message = format!("log file sink failure: {err}");
            let line = format_record(&LogRecord::new(LogLevel::Error, &self.identifier, &message));
            let _ = console.write_line(&line);
        }
        *self.last_error.lock() = Some(err);
    }

    pub(crate) fn log_file(&self) -> Option<PathBuf> {
        self.sinks
            .lock()
            .file
            .as_ref()
            .map(|file| file.path().to_path_buf())
    }

    /// Opens `path` before touching the current sink, so a failure leaves the
    /// old destination in place.
    pub(crate) fn set_log_file(&self, path: &Path) -> Result<(), LoggingError> {
        let mut sinks = self.sinks.lock();
        let replacement = FileSink::open(path, self.rotation)?;
        if let Some(mut old) = sinks.file.replace(replacement) {
            let _ = old.flush();
        }
        Ok(())
    }

    pub(crate) fn clear_log_file(&self) {
        let mut sinks = self.sinks.lock();
        if let Some(mut old) = sinks.file.take() {
            let _ = old.flush();
        }
    }

    /// Replaces the console destination; ignored when console output is off.
    pub(crate) fn set_console_sink(&self, sink: Box<dyn Sink>) {
        let mut sinks = self.sinks.lock();
        if let Some(console) = sinks.console.as_mut() {
            *console = sink;
        }
    }

    pub(crate) fn flush(&self) -> Result<(), LoggingError> {
        let mut sinks = self.sinks.lock();
        if let Some(console) = sinks.console.as_mut() {
            console.flush()?;
        }
        if let Some(file) = sinks.file.as_mut() {
            file.flush()?;
        }
        Ok(())
    }

    pub(crate) fn dropped_writes(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    pub(crate) fn take_last_error(&self) -> Option<LoggingError> {
        self.last_error.lock().take()
    }
}
