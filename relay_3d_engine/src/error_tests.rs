//! Unit tests for error.rs
//!
//! Tests all Error variants, their trait implementations and the error macros.

use crate::error::{Error, Relay3dError, Relay3dResult, Result};

// ============================================================================
// ERROR DISPLAY TESTS
// ============================================================================

#[test]
fn test_backend_error_display() {
    let err = Error::BackendError("shader compile failed".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Backend error"));
    assert!(display.contains("shader compile failed"));
}

#[test]
fn test_invalid_resource_display() {
    let err = Error::InvalidResource("cache capacity too large".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Invalid resource"));
    assert!(display.contains("cache capacity too large"));
}

#[test]
fn test_initialization_failed_display() {
    let err = Error::InitializationFailed("window creation failed".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Initialization failed"));
    assert!(display.contains("window creation failed"));
}

#[test]
fn test_render_thread_terminated_display() {
    assert_eq!(format!("{}", Error::RenderThreadTerminated), "Render thread terminated");
}

// ============================================================================
// ERROR TRAIT IMPLEMENTATIONS
// ============================================================================

#[test]
fn test_error_is_std_error() {
    let err = Error::RenderThreadTerminated;
    let _: &dyn std::error::Error = &err;
}

#[test]
fn test_error_debug_names_variant() {
    assert!(format!("{:?}", Error::BackendError("x".to_string())).contains("BackendError"));
    assert!(format!("{:?}", Error::InvalidResource("x".to_string())).contains("InvalidResource"));
    assert!(format!("{:?}", Error::RenderThreadTerminated).contains("RenderThreadTerminated"));
}

#[test]
fn test_error_clone() {
    let err1 = Error::InitializationFailed("init".to_string());
    let err2 = err1.clone();
    assert_eq!(format!("{}", err1), format!("{}", err2));
}

#[test]
fn test_short_names_alias_relay3d_error() {
    let err: Relay3dError = Error::InvalidResource("alias".to_string());
    let result: Relay3dResult<()> = Err(err);
    let short: Result<()> = result;
    assert!(matches!(short, Err(Relay3dError::InvalidResource(msg)) if msg == "alias"));
}

// ============================================================================
// RESULT / PROPAGATION TESTS
// ============================================================================

#[test]
fn test_error_propagation_with_question_mark() {
    fn inner() -> Result<i32> {
        Err(Error::RenderThreadTerminated)
    }

    fn outer() -> Result<i32> {
        inner()?;
        Ok(42)
    }

    assert!(matches!(outer(), Err(Error::RenderThreadTerminated)));
}

// ============================================================================
// MACRO TESTS
// ============================================================================

#[test]
fn test_engine_err_builds_backend_error() {
    let err = crate::engine_err!("relay3d::test", "bad slot {}", 9);
    match err {
        Error::BackendError(msg) => assert_eq!(msg, "bad slot 9"),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_engine_bail_returns_early() {
    fn check(value: u32) -> Result<u32> {
        if value == 0 {
            crate::engine_bail!("relay3d::test", "value must be non-zero");
        }
        Ok(value * 2)
    }

    assert_eq!(check(4).unwrap(), 8);
    assert!(matches!(check(0), Err(Error::BackendError(_))));
}
