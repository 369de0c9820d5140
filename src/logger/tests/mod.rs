//! Tests for the logging service.
//!
//! Everything here builds its own `Registry`, so tests stay isolated from each
//! other and from the process-wide service.


use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::config::ServiceConfig;
use crate::error::LoggingError;
use crate::logger::{LoggingService, Registry, Sink};

/// Writer that keeps everything written to it.
#[derive(Clone, Default)]
struct CapturedOutput {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl CapturedOutput {
    fn writer(&self) -> Box<dyn Write + Send> {
        Box::new(self.clone())
    }

    fn contents(&self) -> String {
        String::from_utf8(self.buf.lock().unwrap().clone()).unwrap()
    }

    fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }
}

impl Write for CapturedOutput {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.lock().unwrap().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Sink that only counts how often it was asked to write.
#[derive(Clone, Default)]
struct CountingSink {
    calls: Arc<AtomicUsize>,
}

impl CountingSink {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Sink for CountingSink {
    fn write_line(&mut self, _line: &str) -> Result<(), LoggingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// A service backed by a fresh registry.
fn isolated_service(config: ServiceConfig) -> LoggingService {
    Registry::new().get(Some(config)).unwrap()
}

/// Service with console output redirected into a buffer.
fn captured_service(config: ServiceConfig) -> (LoggingService, CapturedOutput) {
    let service = isolated_service(config);
    let output = CapturedOutput::default();
    service.set_console_writer(output.writer());
    (service, output)
}

/// Length of a formatted line including its terminator.
fn line_len(identifier: &str, level: &str, message: &str) -> u64 {
    let pid_len = std::process::id().to_string().len();
    // "<id>(<pid>): " + "YYYY-MM-DD HH:MM:SS,mmm" + ";<LEVEL>: " + message + "\n"
    (identifier.len() + 1 + pid_len + 3 + 23 + 1 + level.len() + 2 + message.len() + 1) as u64
}
