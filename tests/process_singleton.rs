//! The process-wide service, exercised the way an application would.
//!
//! A single test so nothing else in this binary touches the global instance.

use std::fs;
use std::thread;

use logging_singleton::{LogLevel, Logger, LoggingService, ServiceConfig, logger};

#[test]
fn process_wide_service_is_shared_by_every_caller() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.log");

    let log1 = LoggingService::with_config(
        ServiceConfig::default()
            .with_logfile(&path)
            .with_msg_identifier("main")
            .tee_to_console(false),
    )
    .unwrap();
    let log2 = LoggingService::new();
    let log3 = LoggingService::with_config(ServiceConfig::default().with_level(LogLevel::Debug)).unwrap();

    assert!(log1.ptr_eq(&log2));
    assert!(log1.ptr_eq(&log3));
    assert!(format!("{log1:?}").starts_with("<LoggingService 0x"));

    // Construction config of log3 was discarded.
    assert_eq!(log3.logging_level(), LogLevel::Info);
    assert_eq!(log3.log_file(), Some(path.clone()));

    logger::info("from helper");
    logger::debug("hidden");
    log3.set_logging_level(LogLevel::Debug);
    assert_eq!(log1.logging_level(), LogLevel::Debug);
    logger::debug("shown");

    thread::spawn(|| LoggingService::new().warn("from thread"))
        .join()
        .unwrap();
    log2.err("from handle");
    log1.flush().unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].ends_with(";INFO: from helper"));
    assert!(lines[1].ends_with(";DEBUG: shown"));
    assert!(lines[2].ends_with(";WARN: from thread"));
    assert!(lines[3].ends_with(";ERROR: from handle"));
    assert!(lines.iter().all(|l| l.starts_with("main(")));
}
