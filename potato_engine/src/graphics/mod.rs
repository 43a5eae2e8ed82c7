//! Graphics layer
//!
//! The engine talks to a rendering backend only through the
//! [`PlatformInterface`] function table.

mod platform;

pub use platform::PlatformInterface;
