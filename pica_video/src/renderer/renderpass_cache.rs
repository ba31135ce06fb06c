/// RenderpassCache - render scope state machine and native object caches
///
/// Sits between the rasterizer and the graphics backend. For every draw the
/// rasterizer calls `begin_rendering`; the cache either continues the open
/// scope, or closes it (with barriers) and opens a new one, creating or
/// reusing native render pass and framebuffer objects as needed.
///
/// # Threading
///
/// `get_renderpass` takes `&self` and is guarded by its own lock, so a
/// pipeline warm-up thread may call it while the render thread draws. The
/// scope state (`begin_rendering`, `end_rendering`, `clear_framebuffers`)
/// takes `&mut self` and belongs to the single render thread.

use std::sync::{Arc, Mutex};
use rustc_hash::FxHashMap;
use crate::error::Result;
use crate::renderer::renderpass_table::{lock_table, RenderpassKey, RenderpassTable};
use crate::renderer::rendering_path::{
    DynamicRenderingPath, RenderPassPath, RenderingMode, RenderingPath, ScopeResources,
};
use crate::renderer::{
    AspectMask, AttachmentType, ClearValue, CommandRecorder, FormatProvider,
    FramebufferDescriptor, FramebufferHandle, FramebufferInfo, GraphicsDevice, NativeFormat,
    PixelFormat, RenderPassDesc, RenderPassHandle, RenderTarget, RendererConfig, RenderingInfo,
};
use crate::{video_debug, video_info, video_trace};

const LOG_SOURCE: &str = "pica::RenderpassCache";

/// Render scope state machine plus render pass / framebuffer caches
///
/// # Example
///
/// ```no_run
/// # use std::sync::Arc;
/// # use pica_video::pica::render::*;
/// # fn run(
/// #     device: Arc<dyn GraphicsDevice>,
/// #     formats: Arc<dyn FormatProvider>,
/// #     recorder: Arc<dyn CommandRecorder>,
/// #     framebuffer: &Framebuffer,
/// # ) -> pica_video::pica::Result<()> {
/// let mut cache = RenderpassCache::new(device, formats, recorder, &RendererConfig::default());
///
/// cache.begin_rendering(framebuffer, true, ClearValue::Color([0.0, 0.0, 0.0, 1.0]))?;
/// // ... record draws ...
/// cache.end_rendering()?;
/// # Ok(())
/// # }
/// ```
pub struct RenderpassCache {
    device: Arc<dyn GraphicsDevice>,
    formats: Arc<dyn FormatProvider>,
    recorder: Arc<dyn CommandRecorder>,
    path: Box<dyn RenderingPath>,
    renderpasses: Mutex<RenderpassTable>,
    framebuffers: FxHashMap<FramebufferInfo, FramebufferHandle>,
    present_renderpass: RenderPassHandle,
    info: RenderingInfo,
    rendering: bool,
    cmd_count: u32,
    flush_threshold: u32,
    proactive_flush: Option<bool>,
}

impl RenderpassCache {
    /// Create an empty cache
    ///
    /// The rendering path is chosen here, once: dynamic rendering when the
    /// backend supports it and `config` allows it.
    pub fn new(
        device: Arc<dyn GraphicsDevice>,
        formats: Arc<dyn FormatProvider>,
        recorder: Arc<dyn CommandRecorder>,
        config: &RendererConfig,
    ) -> Self {
        let path: Box<dyn RenderingPath> =
            if config.allow_dynamic_rendering && formats.dynamic_rendering_supported() {
                Box::new(DynamicRenderingPath)
            } else {
                Box::new(RenderPassPath)
            };

        video_info!(LOG_SOURCE, "Using {:?} rendering path", path.mode());

        Self {
            device,
            formats,
            recorder,
            path,
            renderpasses: Mutex::new(RenderpassTable::new()),
            framebuffers: FxHashMap::default(),
            present_renderpass: RenderPassHandle::NULL,
            info: RenderingInfo::default(),
            rendering: false,
            cmd_count: 0,
            flush_threshold: config.flush_threshold,
            proactive_flush: config.proactive_flush,
        }
    }

    /// Rendering path selected at construction
    pub fn mode(&self) -> RenderingMode {
        self.path.mode()
    }

    /// Whether a rendering scope is open
    pub fn is_rendering(&self) -> bool {
        self.rendering
    }

    /// Descriptor of the most recently begun scope
    pub fn rendering_info(&self) -> &RenderingInfo {
        &self.info
    }

    /// Draws counted since the last proactive flush
    pub fn draw_count(&self) -> u32 {
        self.cmd_count
    }

    /// Number of cached framebuffer objects
    pub fn framebuffer_count(&self) -> usize {
        self.framebuffers.len()
    }

    /// Number of render pass objects in the keyed table
    pub fn renderpass_count(&self) -> usize {
        lock_table(&self.renderpasses).map(|table| table.len()).unwrap_or(0)
    }

    /// Destroy every cached framebuffer
    ///
    /// Call when framebuffer dimensions go stale (resolution change,
    /// swapchain recreation) and only once no unflushed command references
    /// them. Render passes are keyed by format and stay valid.
    pub fn clear_framebuffers(&mut self) {
        if self.framebuffers.is_empty() {
            return;
        }
        let count = self.framebuffers.len();
        for (_, framebuffer) in self.framebuffers.drain() {
            self.device.destroy_framebuffer(framebuffer);
        }
        video_debug!(LOG_SOURCE, "Destroyed {} cached framebuffers", count);
    }

    /// Begin a rendering scope on `framebuffer`, unless the identical scope
    /// is already open
    ///
    /// A call that lands while a scope is open counts as one draw towards
    /// the proactive flush threshold.
    pub fn begin_rendering(
        &mut self,
        framebuffer: &dyn FramebufferDescriptor,
        do_clear: bool,
        clear: ClearValue,
    ) -> Result<()> {
        let mut new_info = RenderingInfo {
            color: RenderTarget {
                aspect: AspectMask::COLOR,
                image: framebuffer.image(AttachmentType::Color),
                image_view: framebuffer.image_view(AttachmentType::Color),
            },
            depth: RenderTarget {
                aspect: AspectMask::DEPTH,
                image: framebuffer.image(AttachmentType::DepthStencil),
                image_view: framebuffer.image_view(AttachmentType::DepthStencil),
            },
            render_area: framebuffer.render_area(),
            clear,
            do_clear,
        };

        if framebuffer.has_stencil() {
            new_info.depth.aspect |= AspectMask::STENCIL;
        }

        if self.rendering {
            self.cmd_count += 1;
            if self.info == new_info {
                video_trace!(LOG_SOURCE, "Continuing scope ({} draws)", self.cmd_count);
                return Ok(());
            }
        }

        self.end_rendering()?;

        // The scope only opens once its begin command exists
        let mut resources = ScopeResources {
            device: self.device.as_ref(),
            formats: self.formats.as_ref(),
            renderpasses: &self.renderpasses,
            framebuffers: &mut self.framebuffers,
        };
        let command = self.path.begin(&mut resources, &new_info, framebuffer)?;
        self.recorder.record(command);
        self.info = new_info;
        self.rendering = true;

        Ok(())
    }

    /// Close the open rendering scope, if any
    ///
    /// Records the end of the scope followed by one barrier per bound
    /// attachment. When enough draws accumulated and the flush hint holds,
    /// the recorder is flushed afterwards.
    pub fn end_rendering(&mut self) -> Result<()> {
        if !self.rendering {
            return Ok(());
        }

        self.rendering = false;
        self.recorder.record(self.path.end(&self.info));

        // Tiled GPUs (Mali in particular) perform better when each major
        // render pass is submitted on its own.
        if self.cmd_count > self.flush_threshold && self.should_flush() {
            video_trace!(LOG_SOURCE, "Flushing after {} draws", self.cmd_count);
            self.recorder.flush()?;
            self.cmd_count = 0;
        }

        Ok(())
    }

    /// Render pass for a color/depth format pair, created on first use
    ///
    /// `PixelFormat::Invalid` means the attachment is absent.
    ///
    /// # Panics
    ///
    /// Panics when `color` is not a color format or `depth` not a depth
    /// format.
    pub fn get_renderpass(
        &self,
        color: PixelFormat,
        depth: PixelFormat,
        is_clear: bool,
    ) -> Result<RenderPassHandle> {
        let key = RenderpassKey::new(color, depth, is_clear);
        lock_table(&self.renderpasses)?.get_or_create(
            self.device.as_ref(),
            self.formats.as_ref(),
            key,
        )
    }

    /// Create the render pass used to draw into the swapchain
    ///
    /// The cache owns the pass; creating another destroys the previous one.
    pub fn create_present_renderpass(&mut self, format: NativeFormat) -> Result<RenderPassHandle> {
        let render_pass = self.device.create_render_pass(&RenderPassDesc::present(format))?;
        if !self.present_renderpass.is_null() {
            self.device.destroy_render_pass(self.present_renderpass);
        }
        self.present_renderpass = render_pass;
        video_debug!(LOG_SOURCE, "Created present render pass {:?} ({:?})", render_pass, format);
        Ok(render_pass)
    }

    /// Present render pass, null until `create_present_renderpass`
    pub fn present_renderpass(&self) -> RenderPassHandle {
        self.present_renderpass
    }

    fn should_flush(&self) -> bool {
        self.proactive_flush.unwrap_or_else(|| self.formats.should_flush())
    }
}

impl Drop for RenderpassCache {
    fn drop(&mut self) {
        if !self.present_renderpass.is_null() {
            self.device.destroy_render_pass(self.present_renderpass);
        }
        let device = self.device.as_ref();
        match self.renderpasses.get_mut() {
            Ok(table) => table.destroy_all(device),
            Err(poisoned) => poisoned.into_inner().destroy_all(device),
        }
        self.clear_framebuffers();
    }
}

#[cfg(test)]
#[path = "renderpass_cache_tests.rs"]
mod tests;
