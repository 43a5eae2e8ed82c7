//! Integration tests for Engine logging system
//!
//! Run with: cargo test --test logging_integration_tests

use potato_engine::potato::content::Mesh;
use potato_engine::potato::log::{LogEntry, LogSeverity, Logger};
use potato_engine::potato::Engine;
use serial_test::serial;
use std::sync::{Arc, Mutex};

// ============================================================================
// TEST LOGGER IMPLEMENTATION
// ============================================================================

/// Test logger that captures log entries for verification
struct TestLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl TestLogger {
    fn new() -> (Self, Arc<Mutex<Vec<LogEntry>>>) {
        let entries = Arc::new(Mutex::new(Vec::new()));
        (Self { entries: entries.clone() }, entries)
    }
}

impl Logger for TestLogger {
    fn log(&self, entry: &LogEntry) {
        self.entries.lock().unwrap().push(entry.clone());
    }
}

// ============================================================================
// LOGGING TESTS
// ============================================================================

#[test]
#[serial]
fn test_integration_custom_logger() {
    let (test_logger, entries) = TestLogger::new();
    Engine::set_logger(test_logger);

    Engine::log(LogSeverity::Info, "test::module", "Test info message".to_string());
    Engine::log(LogSeverity::Warn, "test::module", "Test warning message".to_string());
    Engine::log_detailed(LogSeverity::Error, "test::module", "Test error message".to_string(), "lib.rs", 7);

    Engine::reset_logger();

    let entries = entries.lock().unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].severity, LogSeverity::Info);
    assert_eq!(entries[1].message, "Test warning message");
    assert_eq!(entries[2].file, Some("lib.rs"));
    assert_eq!(entries[2].line, Some(7));
}

#[test]
#[serial]
fn test_integration_invalid_mesh_logs_error_with_location() {
    let (test_logger, entries) = TestLogger::new();
    Engine::set_logger(test_logger);

    let result = Mesh::new().validate();
    Engine::reset_logger();

    assert!(result.is_err());
    let entries = entries.lock().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].severity, LogSeverity::Error);
    assert_eq!(entries[0].source, "potato::Mesh");
    assert_eq!(entries[0].message, "Mesh has no positions");
    assert!(entries[0].file.is_some());
    assert!(entries[0].line.is_some());
}
