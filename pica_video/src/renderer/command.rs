/// Command stream produced by the renderpass cache
///
/// Commands are plain values pushed to a `CommandRecorder` and replayed by
/// the backend in the exact order they were recorded.

use bitflags::bitflags;
use crate::error::Result;
use crate::renderer::{
    AspectMask, ClearValue, FramebufferHandle, ImageHandle, Rect2D, RenderPassHandle,
    RenderingInfo,
};

bitflags! {
    /// Memory access types ordered by a barrier
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct AccessFlags: u32 {
        const SHADER_READ = 1 << 0;
        const COLOR_ATTACHMENT_WRITE = 1 << 1;
        const DEPTH_STENCIL_ATTACHMENT_READ = 1 << 2;
        const DEPTH_STENCIL_ATTACHMENT_WRITE = 1 << 3;
        const TRANSFER_READ = 1 << 4;
    }
}

bitflags! {
    /// Pipeline stages a barrier waits on / blocks
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PipelineStageFlags: u32 {
        const FRAGMENT_SHADER = 1 << 0;
        const EARLY_FRAGMENT_TESTS = 1 << 1;
        const LATE_FRAGMENT_TESTS = 1 << 2;
        const COLOR_ATTACHMENT_OUTPUT = 1 << 3;
        const TRANSFER = 1 << 4;
    }
}

/// Image memory barrier for one attachment
///
/// The image stays in the general layout; the barrier covers mip level 0
/// and every array layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttachmentBarrier {
    pub image: ImageHandle,
    pub aspect: AspectMask,
    pub src_access: AccessFlags,
    pub dst_access: AccessFlags,
}

/// Barriers inserted after a rendering scope closes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BarrierBatch {
    pub src_stage: PipelineStageFlags,
    pub dst_stage: PipelineStageFlags,
    pub barriers: Vec<AttachmentBarrier>,
}

impl BarrierBatch {
    /// Barriers making the writes of a finished scope visible
    ///
    /// Color becomes readable by shaders and transfers; depth/stencil stays
    /// usable by the depth tests of the next scope.
    pub fn for_scope(info: &RenderingInfo) -> Self {
        let mut batch = BarrierBatch::default();

        if info.color.is_bound() {
            batch.barriers.push(AttachmentBarrier {
                image: info.color.image,
                aspect: AspectMask::COLOR,
                src_access: AccessFlags::COLOR_ATTACHMENT_WRITE,
                dst_access: AccessFlags::SHADER_READ | AccessFlags::TRANSFER_READ,
            });
            batch.src_stage |= PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT;
            batch.dst_stage |= PipelineStageFlags::FRAGMENT_SHADER | PipelineStageFlags::TRANSFER;
        }

        if info.depth.is_bound() {
            batch.barriers.push(AttachmentBarrier {
                image: info.depth.image,
                aspect: info.depth.aspect,
                src_access: AccessFlags::DEPTH_STENCIL_ATTACHMENT_WRITE,
                dst_access: AccessFlags::DEPTH_STENCIL_ATTACHMENT_READ
                    | AccessFlags::DEPTH_STENCIL_ATTACHMENT_WRITE,
            });
            batch.src_stage |= PipelineStageFlags::EARLY_FRAGMENT_TESTS
                | PipelineStageFlags::LATE_FRAGMENT_TESTS;
            batch.dst_stage |= PipelineStageFlags::LATE_FRAGMENT_TESTS;
        }

        batch
    }

    pub fn is_empty(&self) -> bool {
        self.barriers.is_empty()
    }
}

/// A command recorded by the renderpass cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderCommand {
    /// Open a dynamic rendering scope directly on the scope's views
    BeginRendering(RenderingInfo),

    /// Open a render pass instance on a cached render pass / framebuffer
    BeginRenderPass {
        render_pass: RenderPassHandle,
        framebuffer: FramebufferHandle,
        render_area: Rect2D,
        clear: ClearValue,
        /// Number of attachments, one clear value is supplied per attachment
        attachment_count: u32,
    },

    /// Close a dynamic rendering scope, then insert the barriers
    EndRendering(BarrierBatch),

    /// Close a render pass instance, then insert the barriers
    EndRenderPass(BarrierBatch),
}

impl RenderCommand {
    /// Whether the command opens a scope
    pub fn is_begin(&self) -> bool {
        matches!(self, RenderCommand::BeginRendering(_) | RenderCommand::BeginRenderPass { .. })
    }

    /// Whether the command closes a scope
    pub fn is_end(&self) -> bool {
        matches!(self, RenderCommand::EndRendering(_) | RenderCommand::EndRenderPass(_))
    }

    /// Barriers carried by a closing command
    pub fn barriers(&self) -> Option<&BarrierBatch> {
        match self {
            RenderCommand::EndRendering(batch) | RenderCommand::EndRenderPass(batch) => Some(batch),
            _ => None,
        }
    }
}

/// FIFO of commands awaiting execution on the graphics queue
///
/// `record` never reorders: commands execute in the order they were pushed.
pub trait CommandRecorder: Send + Sync {
    /// Append a command
    fn record(&self, command: RenderCommand);

    /// Submit every command recorded so far
    fn flush(&self) -> Result<()>;

    /// Commands recorded but not yet submitted
    fn pending_count(&self) -> usize;
}
