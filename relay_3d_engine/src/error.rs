//! Error types for the Relay3D engine
//!
//! This module defines the error types used throughout the engine,
//! including rendering, initialization, and resource management.

use std::fmt;

/// Result type for Relay3D engine operations
pub type Relay3dResult<T> = std::result::Result<T, Relay3dError>;

/// Relay3D engine errors
#[derive(Debug, Clone)]
pub enum Relay3dError {
    /// Backend-specific error (OpenGL, Vulkan, etc.)
    BackendError(String),

    /// Invalid resource (buffer, texture, cache configuration, etc.)
    InvalidResource(String),

    /// Initialization failed (renderer, window, render thread)
    InitializationFailed(String),

    /// The render path failed once and no longer accepts frames
    RenderThreadTerminated,
}

impl fmt::Display for Relay3dError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Relay3dError::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Relay3dError::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Relay3dError::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Relay3dError::RenderThreadTerminated => write!(f, "Render thread terminated"),
        }
    }
}

impl std::error::Error for Relay3dError {}

/// Short names used inside the crate and by `relay3d::*` imports
pub use Relay3dError as Error;
pub type Result<T> = Relay3dResult<T>;

// ===== ERROR MACROS =====

/// Log an ERROR message and build a `Relay3dError::BackendError` from it
///
/// # Example
///
/// ```no_run
/// # use relay_3d_engine::engine_err;
/// let err = engine_err!("relay3d::Renderer", "Unknown pass {}", 3);
/// ```
#[macro_export]
macro_rules! engine_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::relay3d::Relay3dError::BackendError(message)
    }};
}

/// Log an ERROR message and return it as `Err(Relay3dError::BackendError)`
///
/// # Example
///
/// ```no_run
/// # use relay_3d_engine::engine_bail;
/// fn check(count: u32) -> relay_3d_engine::relay3d::Relay3dResult<()> {
///     if count == 0 {
///         engine_bail!("relay3d::Renderer", "Count must be non-zero");
///     }
///     Ok(())
/// }
/// ```
#[macro_export]
macro_rules! engine_bail {
    ($source:expr, $($arg:tt)*) => {
        return Err($crate::engine_err!($source, $($arg)*))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
