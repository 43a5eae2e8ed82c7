//! Error types for the Potato engine
//!
//! This module defines the error types used throughout the engine,
//! including initialization, content import and the checked container API.

use std::fmt;

/// Result type for Potato engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Potato engine errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Initialization failed (engine, platform, subsystems)
    InitializationFailed(String),

    /// Invalid resource (mesh, scene, import data, etc.)
    InvalidResource(String),

    /// The global allocator refused a request
    OutOfMemory,

    /// A requested capacity does not fit in the address space
    CapacityOverflow,

    /// Index is not a live slot of the container
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Number of live elements at the time of the call
        len: usize,
    },

    /// Access to the first/last element of an empty container
    EmptyContainer,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::OutOfMemory => write!(f, "Out of memory"),
            Error::CapacityOverflow => write!(f, "Capacity overflow"),
            Error::IndexOutOfRange { index, len } => {
                write!(f, "Index out of range: index is {} but length is {}", index, len)
            }
            Error::EmptyContainer => write!(f, "Container is empty"),
        }
    }
}

impl std::error::Error for Error {}

/// Build an `Error::InvalidResource` and log it as an ERROR
///
/// # Example
///
/// ```ignore
/// let mesh = scene.lod_group(name)
///     .ok_or_else(|| engine_err!("potato::Scene", "LOD group '{}' not found", name))?;
/// ```
#[macro_export]
macro_rules! engine_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::potato::Error::InvalidResource(message)
    }};
}

/// Log and return an `Error::InvalidResource` from the current function
///
/// # Example
///
/// ```ignore
/// if mesh.positions.is_empty() {
///     engine_bail!("potato::Mesh", "Mesh has no positions");
/// }
/// ```
#[macro_export]
macro_rules! engine_bail {
    ($source:expr, $($arg:tt)*) => {
        return Err($crate::engine_err!($source, $($arg)*))
    };
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
