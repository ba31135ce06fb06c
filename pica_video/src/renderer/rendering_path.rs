/// Rendering paths - how a scope is opened and closed on the native API
///
/// Selected once when the cache is built: `DynamicRenderingPath` when the
/// backend can open scopes without render pass objects, `RenderPassPath`
/// otherwise.

use std::sync::Mutex;
use rustc_hash::FxHashMap;
use crate::error::Result;
use crate::renderer::renderpass_table::{lock_table, RenderpassKey, RenderpassTable};
use crate::renderer::{
    AttachmentType, BarrierBatch, FormatProvider, FramebufferDescriptor, FramebufferHandle,
    FramebufferInfo, GraphicsDevice, RenderCommand, RenderingInfo,
};
use crate::video_debug;

/// Which path a cache uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderingMode {
    /// Scopes are opened directly on image views
    Dynamic,
    /// Scopes are opened on cached render pass + framebuffer pairs
    RenderPass,
}

/// Cache state a path may read or populate while opening a scope
pub(crate) struct ScopeResources<'a> {
    pub(crate) device: &'a dyn GraphicsDevice,
    pub(crate) formats: &'a dyn FormatProvider,
    pub(crate) renderpasses: &'a Mutex<RenderpassTable>,
    pub(crate) framebuffers: &'a mut FxHashMap<FramebufferInfo, FramebufferHandle>,
}

pub(crate) trait RenderingPath: Send + Sync {
    fn mode(&self) -> RenderingMode;

    /// Command opening the scope described by `info`
    fn begin(
        &self,
        resources: &mut ScopeResources<'_>,
        info: &RenderingInfo,
        framebuffer: &dyn FramebufferDescriptor,
    ) -> Result<RenderCommand>;

    /// Command closing the scope described by `info`
    fn end(&self, info: &RenderingInfo) -> RenderCommand;
}

/// Path for backends with dynamic rendering; creates no native objects
pub(crate) struct DynamicRenderingPath;

impl RenderingPath for DynamicRenderingPath {
    fn mode(&self) -> RenderingMode {
        RenderingMode::Dynamic
    }

    fn begin(
        &self,
        _resources: &mut ScopeResources<'_>,
        info: &RenderingInfo,
        _framebuffer: &dyn FramebufferDescriptor,
    ) -> Result<RenderCommand> {
        Ok(RenderCommand::BeginRendering(*info))
    }

    fn end(&self, info: &RenderingInfo) -> RenderCommand {
        RenderCommand::EndRendering(BarrierBatch::for_scope(info))
    }
}

/// Path for backends that need a render pass + framebuffer per scope
pub(crate) struct RenderPassPath;

impl RenderingPath for RenderPassPath {
    fn mode(&self) -> RenderingMode {
        RenderingMode::RenderPass
    }

    fn begin(
        &self,
        resources: &mut ScopeResources<'_>,
        info: &RenderingInfo,
        framebuffer: &dyn FramebufferDescriptor,
    ) -> Result<RenderCommand> {
        let key = RenderpassKey::new(
            framebuffer.format(AttachmentType::Color),
            framebuffer.format(AttachmentType::DepthStencil),
            info.do_clear,
        );
        let render_pass =
            lock_table(resources.renderpasses)?.get_or_create(resources.device, resources.formats, key)?;

        let key = FramebufferInfo {
            color: info.color.image_view,
            depth: info.depth.image_view,
            width: framebuffer.width(),
            height: framebuffer.height(),
        };

        let handle = match resources.framebuffers.get(&key) {
            Some(handle) => *handle,
            None => {
                let handle = resources.device.create_framebuffer(&key, render_pass)?;
                video_debug!(
                    "pica::RenderpassCache",
                    "Created framebuffer {:?} ({}x{}) on render pass {:?}",
                    handle,
                    key.width,
                    key.height,
                    render_pass
                );
                resources.framebuffers.insert(key, handle);
                handle
            }
        };

        Ok(RenderCommand::BeginRenderPass {
            render_pass,
            framebuffer: handle,
            render_area: info.render_area,
            clear: info.clear,
            attachment_count: info.attachment_count(),
        })
    }

    fn end(&self, info: &RenderingInfo) -> RenderCommand {
        RenderCommand::EndRenderPass(BarrierBatch::for_scope(info))
    }
}
