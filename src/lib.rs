//! A single logging service shared by every module of a program.
//!
//! Rather than a tree of named loggers, every request for a logger returns a
//! handle onto the same process-wide instance. The first request configures
//! it; later requests get the existing instance and their configuration is
//! ignored. Level and log file can be changed afterwards through any handle.

pub mod config;
pub mod error;
pub mod logger;

pub use config::ServiceConfig;
pub use error::LoggingError;
pub use logger::{ConsoleStream, LogLevel, Logger, LoggingService, Registry};
