/*!
# Pica Video Core

Backend-agnostic part of the renderer that translates the emulated GPU's
fixed-function output into a modern graphics API.

The centerpiece is the **RenderpassCache**: it brackets the rasterizer's
draws into rendering scopes, decides when a scope can continue and when it
must be closed (with barriers) and reopened, and caches the native render
pass and framebuffer objects that the traditional path needs.

## Architecture

- **FormatProvider**: maps abstract pixel formats to native formats and
  reports backend capabilities
- **GraphicsDevice**: creates and destroys native render passes/framebuffers
- **CommandRecorder**: FIFO of `RenderCommand`s replayed by the backend
- **FramebufferDescriptor**: attachment set supplied by the rasterizer

Backend crates (e.g. `pica_video_renderer_vulkan`) implement these traits.
*/

// Internal modules
mod error;
mod video_core;
pub mod log;
pub mod renderer;

// Main pica namespace module
pub mod pica {
    // Error types
    pub use crate::error::{Error, Result};

    // Global state (logger)
    pub use crate::video_core::VideoCore;

    // Logging sub-module (types only, macros live at the crate root)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Render sub-module with all rendering types
    pub mod render {
        pub use crate::renderer::*;
    }
}
