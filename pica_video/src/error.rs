//! Error types for the Pica video core
//!
//! This module defines the error types shared by the renderpass cache and
//! the graphics backends that implement its collaborator traits.

use std::fmt;

/// Result type for video core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Video core errors
#[derive(Debug, Clone)]
pub enum Error {
    /// Backend-specific error (Vulkan, OpenGL, etc.)
    BackendError(String),

    /// Out of host or GPU memory
    OutOfMemory,

    /// Invalid resource (render pass, framebuffer, image view, etc.)
    InvalidResource(String),

    /// Initialization failed (device wrapper, scheduler, format table)
    InitializationFailed(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of GPU memory"),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ===== ERROR MACROS =====

/// Log an ERROR message and build an `Error::BackendError` from it
///
/// # Example
///
/// ```no_run
/// # use pica_video::video_err;
/// let err = video_err!("pica::vulkan", "Failed to create render pass: {}", -2);
/// ```
#[macro_export]
macro_rules! video_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::video_error!($source, "{}", message);
        $crate::pica::Error::BackendError(message)
    }};
}

/// Log an ERROR message and return early with `Err(Error::BackendError)`
///
/// # Example
///
/// ```no_run
/// # use pica_video::video_bail;
/// fn check(width: u32) -> pica_video::pica::Result<()> {
///     if width == 0 {
///         video_bail!("pica::RenderpassCache", "Framebuffer width must be non-zero");
///     }
///     Ok(())
/// }
/// ```
#[macro_export]
macro_rules! video_bail {
    ($source:expr, $($arg:tt)*) => {
        return Err($crate::video_err!($source, $($arg)*))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
