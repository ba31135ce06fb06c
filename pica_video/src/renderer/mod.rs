/// Renderer module - renderpass cache and the types it exchanges with the
/// rasterizer and the graphics backend

// Module declarations
pub mod pixel_format;
pub mod handle;
pub mod render_target;
pub mod frame_buffer;
pub mod render_pass;
pub mod command;
pub mod device;
pub mod config;
pub mod renderpass_table;
pub mod rendering_path;
pub mod renderpass_cache;

// Re-export everything
pub use pixel_format::*;
pub use handle::*;
pub use render_target::*;
pub use frame_buffer::*;
pub use render_pass::*;
pub use command::*;
pub use device::*;
pub use config::*;
pub use renderpass_table::{color_slot, depth_slot, MAX_COLOR_FORMATS, MAX_DEPTH_FORMATS, DEPTH_FORMAT_OFFSET};
pub use rendering_path::RenderingMode;
pub use renderpass_cache::*;

// Mock backend for tests (no GPU required)
#[cfg(test)]
pub mod mock_device;
