/// Collaborator traits implemented by graphics backends

use crate::error::Result;
use crate::renderer::{
    FramebufferHandle, FramebufferInfo, NativeFormat, PixelFormat, RenderPassDesc,
    RenderPassHandle,
};

/// Format and capability queries answered by the backend
pub trait FormatProvider: Send + Sync {
    /// Native format backing an abstract format
    ///
    /// `PixelFormat::Invalid` must map to `NativeFormat::UNDEFINED`.
    fn native_format(&self, format: PixelFormat) -> NativeFormat;

    /// Whether rendering scopes can be opened without a render pass object
    fn dynamic_rendering_supported(&self) -> bool;

    /// Whether submitting work at the end of large scopes helps this GPU
    fn should_flush(&self) -> bool;
}

/// Factory for the native objects owned by the renderpass cache
///
/// Creation failures are reported as errors; the embedding renderer treats
/// them as fatal.
pub trait GraphicsDevice: Send + Sync {
    /// Create a render pass object
    fn create_render_pass(&self, desc: &RenderPassDesc) -> Result<RenderPassHandle>;

    /// Destroy a render pass object
    fn destroy_render_pass(&self, render_pass: RenderPassHandle);

    /// Create a framebuffer binding `info`'s views to `render_pass`
    fn create_framebuffer(
        &self,
        info: &FramebufferInfo,
        render_pass: RenderPassHandle,
    ) -> Result<FramebufferHandle>;

    /// Destroy a framebuffer object
    fn destroy_framebuffer(&self, framebuffer: FramebufferHandle);
}
