//! Unit tests for error.rs
//!
//! Tests all Error variants and their implementations (Display, Debug, Clone, std::error::Error).

use crate::error::{Error, Result};

// ============================================================================
// ERROR DISPLAY TESTS
// ============================================================================

#[test]
fn test_initialization_failed_display() {
    let err = Error::InitializationFailed("Platform layer refused to start".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Initialization failed"));
    assert!(display.contains("Platform layer refused to start"));
}

#[test]
fn test_invalid_resource_display() {
    let err = Error::InvalidResource("Mesh has no positions".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Invalid resource"));
    assert!(display.contains("Mesh has no positions"));
}

#[test]
fn test_out_of_memory_display() {
    assert_eq!(format!("{}", Error::OutOfMemory), "Out of memory");
}

#[test]
fn test_capacity_overflow_display() {
    assert_eq!(format!("{}", Error::CapacityOverflow), "Capacity overflow");
}

#[test]
fn test_index_out_of_range_display() {
    let err = Error::IndexOutOfRange { index: 7, len: 3 };
    assert_eq!(format!("{}", err), "Index out of range: index is 7 but length is 3");
}

#[test]
fn test_empty_container_display() {
    assert_eq!(format!("{}", Error::EmptyContainer), "Container is empty");
}

// ============================================================================
// ERROR TRAIT IMPLEMENTATIONS
// ============================================================================

#[test]
fn test_error_is_std_error() {
    let err = Error::OutOfMemory;
    let _: &dyn std::error::Error = &err;
}

#[test]
fn test_error_debug() {
    let debug = format!("{:?}", Error::IndexOutOfRange { index: 1, len: 0 });
    assert!(debug.contains("IndexOutOfRange"));
    assert!(debug.contains("index: 1"));

    let debug = format!("{:?}", Error::InvalidResource("res".to_string()));
    assert!(debug.contains("InvalidResource"));
}

#[test]
fn test_error_clone_and_eq() {
    let err1 = Error::InitializationFailed("init".to_string());
    let err2 = err1.clone();
    assert_eq!(err1, err2);
    assert_ne!(err1, Error::InitializationFailed("other".to_string()));
    assert_ne!(Error::OutOfMemory, Error::CapacityOverflow);
}

// ============================================================================
// ERROR PROPAGATION TESTS
// ============================================================================

#[test]
fn test_error_propagation_with_question_mark() {
    fn inner() -> Result<i32> {
        Err(Error::EmptyContainer)
    }

    fn outer() -> Result<i32> {
        inner()?;
        Ok(42)
    }

    assert_eq!(outer(), Err(Error::EmptyContainer));
}

#[test]
fn test_engine_bail_returns_invalid_resource() {
    fn validate(count: usize) -> Result<usize> {
        if count == 0 {
            crate::engine_bail!("potato::test", "Count must be positive, got {}", count);
        }
        Ok(count)
    }

    assert_eq!(validate(3), Ok(3));
    assert_eq!(
        validate(0),
        Err(Error::InvalidResource("Count must be positive, got 0".to_string()))
    );
}
