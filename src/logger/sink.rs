//! Output destinations for formatted lines.
//!
//! - `Sink`: trait every destination implements
//! - `ConsoleSink`: stdout/stderr, or any writer handed in for capture
//! - `FileSink`: append-mode log file, rolled over by a `RotationPolicy`
//!
//! Sinks are not synchronized themselves; the service state serializes every
//! call behind its own lock.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::LoggingError;
use crate::logger::rotation::RotationPolicy;

/// A destination for complete, already formatted lines.
pub trait Sink: Send + 'static {
    /// Write `line` followed by a terminator. `Err` means the line was dropped.
    fn write_line(&mut self, line: &str) -> Result<(), LoggingError>;

    /// Flush any buffered bytes.
    fn flush(&mut self) -> Result<(), LoggingError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleStream {
    Stdout,
    #[default]
    Stderr,
}

pub struct ConsoleSink {
    writer: Box<dyn Write + Send>,
}

impl ConsoleSink {
    pub fn new(stream: ConsoleStream) -> Self {
        let writer: Box<dyn Write + Send> = match stream {
            ConsoleStream::Stdout => Box::new(io::stdout()),
            ConsoleStream::Stderr => Box::new(io::stderr()),
        };
        Self { writer }
    }

    /// Console sink writing somewhere other than the process streams.
    pub fn from_writer(writer: Box<dyn Write + Send>) -> Self {
        Self { writer }
    }
}

impl Sink for ConsoleSink {
    fn write_line(&mut self, line: &str) -> Result<(), LoggingError> {
        let buf = terminated(line);
        self.writer
            .write_all(buf.as_bytes())
            .and_then(|()| self.writer.flush())
            .map_err(|source| LoggingError::ConsoleWrite { source })
    }

    fn flush(&mut self) -> Result<(), LoggingError> {
        self.writer
            .flush()
            .map_err(|source| LoggingError::ConsoleWrite { source })
    }
}

/// Log file sink. Owns the only handle to the active file.
///
/// A sink whose handle was lost (open, write or rotation failure with no
/// usable fallback) is degraded: it keeps its path but drops every line until
/// it is replaced.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    file: Option<File>,
    size: u64,
    rotation: Option<RotationPolicy>,
    rotation_error: Option<LoggingError>,
}

impl FileSink {
    /// Opens or creates `path` for appending; size bookkeeping starts from the
    /// file's current length.
    pub fn open(
        path: impl Into<PathBuf>,
        rotation: Option<RotationPolicy>,
    ) -> Result<Self, LoggingError> {
        let path = path.into();
        let (file, size) = open_append(&path).map_err(|source| {
            LoggingError::SinkUnavailable {
                path: path.clone(),
                source,
            }
        })?;
        Ok(Self {
            path,
            file: Some(file),
            size,
            rotation,
            rotation_error: None,
        })
    }

    /// A sink for `path` that has no handle.
    pub fn degraded(path: impl Into<PathBuf>, rotation: Option<RotationPolicy>) -> Self {
        Self {
            path: path.into(),
            file: None,
            size: 0,
            rotation,
            rotation_error: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bytes written to the active file, as tracked since it was opened.
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn is_degraded(&self) -> bool {
        self.file.is_none()
    }

    /// Rotation failure that was recovered from by appending to the old file.
    pub fn take_rotation_error(&mut self) -> Option<LoggingError> {
        self.rotation_error.take()
    }

    fn roll_over(&mut self, policy: RotationPolicy) -> Result<(), LoggingError> {
        if let Some(mut file) = self.file.take() {
            let _ = file.flush();
        }
        let rotation_failure = |source: io::Error| LoggingError::RotationFailure {
            path: self.path.clone(),
            source,
        };

        policy.rotate(&self.path).map_err(rotation_failure)?;
        let file = File::create(&self.path).map_err(rotation_failure)?;
        self.file = Some(file);
        self.size = 0;
        Ok(())
    }

    fn append(&mut self, line: &str) -> Result<(), LoggingError> {
        let Some(file) = self.file.as_mut() else {
            return Err(LoggingError::SinkUnavailable {
                path: self.path.clone(),
                source: io::Error::other("file sink is degraded"),
            });
        };

        let buf = terminated(line);
        if let Err(source) = file.write_all(buf.as_bytes()) {
            self.file = None;
            return Err(LoggingError::SinkUnavailable {
                path: self.path.clone(),
                source,
            });
        }
        self.size += buf.len() as u64;
        Ok(())
    }
}

impl Sink for FileSink {
    fn write_line(&mut self, line: &str) -> Result<(), LoggingError> {
        if let Some(policy) = self.rotation
            && self.file.is_some()
            && policy.should_rotate(self.size, line.len())
            && let Err(err) = self.roll_over(policy)
        {
            // Fall back to the file as it stands after the failed rollover.
            match open_append(&self.path) {
                Ok((file, size)) => {
                    self.file = Some(file);
                    self.size = size;
                    self.rotation_error = Some(err);
                }
                Err(_) => {
                    self.file = None;
                    return Err(err);
                }
            }
        }
        self.append(line)
    }

    fn flush(&mut self) -> Result<(), LoggingError> {
        match self.file.as_mut() {
            Some(file) => file.flush().map_err(|source| LoggingError::SinkUnavailable {
                path: self.path.clone(),
                source,
            }),
            None => Ok(()),
        }
    }
}

fn open_append(path: &Path) -> io::Result<(File, u64)> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let size = file.metadata()?.len();
    Ok((file, size))
}

fn terminated(line: &str) -> String {
    let mut buf = String::with_capacity(line.len() + 1);
    buf.push_str(line);
    buf.push('\n');
    buf
}
