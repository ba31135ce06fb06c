/// Replay of `RenderCommand`s into a Vulkan command buffer

use ash::vk;
use ash::vk::Handle;
use pica_video::pica::Result;
use pica_video::pica::render::{
    AccessFlags, AspectMask, BarrierBatch, ClearValue, PipelineStageFlags, Rect2D,
    RenderCommand, RenderingInfo,
};
use pica_video::video_bail;

const LOG_SOURCE: &str = "pica::vulkan";

pub(crate) fn access_to_vk(access: AccessFlags) -> vk::AccessFlags {
    let mut flags = vk::AccessFlags::empty();
    if access.contains(AccessFlags::SHADER_READ) {
        flags |= vk::AccessFlags::SHADER_READ;
    }
    if access.contains(AccessFlags::COLOR_ATTACHMENT_WRITE) {
        flags |= vk::AccessFlags::COLOR_ATTACHMENT_WRITE;
    }
    if access.contains(AccessFlags::DEPTH_STENCIL_ATTACHMENT_READ) {
        flags |= vk::AccessFlags::DEPTH_STENCIL_ATTACHMENT_READ;
    }
    if access.contains(AccessFlags::DEPTH_STENCIL_ATTACHMENT_WRITE) {
        flags |= vk::AccessFlags::DEPTH_STENCIL_ATTACHMENT_WRITE;
    }
    if access.contains(AccessFlags::TRANSFER_READ) {
        flags |= vk::AccessFlags::TRANSFER_READ;
    }
    flags
}

pub(crate) fn stages_to_vk(stages: PipelineStageFlags) -> vk::PipelineStageFlags {
    let mut flags = vk::PipelineStageFlags::empty();
    if stages.contains(PipelineStageFlags::FRAGMENT_SHADER) {
        flags |= vk::PipelineStageFlags::FRAGMENT_SHADER;
    }
    if stages.contains(PipelineStageFlags::EARLY_FRAGMENT_TESTS) {
        flags |= vk::PipelineStageFlags::EARLY_FRAGMENT_TESTS;
    }
    if stages.contains(PipelineStageFlags::LATE_FRAGMENT_TESTS) {
        flags |= vk::PipelineStageFlags::LATE_FRAGMENT_TESTS;
    }
    if stages.contains(PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT) {
        flags |= vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT;
    }
    if stages.contains(PipelineStageFlags::TRANSFER) {
        flags |= vk::PipelineStageFlags::TRANSFER;
    }
    flags
}

pub(crate) fn aspect_to_vk(aspect: AspectMask) -> vk::ImageAspectFlags {
    let mut flags = vk::ImageAspectFlags::empty();
    if aspect.contains(AspectMask::COLOR) {
        flags |= vk::ImageAspectFlags::COLOR;
    }
    if aspect.contains(AspectMask::DEPTH) {
        flags |= vk::ImageAspectFlags::DEPTH;
    }
    if aspect.contains(AspectMask::STENCIL) {
        flags |= vk::ImageAspectFlags::STENCIL;
    }
    flags
}

pub(crate) fn rect_to_vk(rect: Rect2D) -> vk::Rect2D {
    vk::Rect2D {
        offset: vk::Offset2D { x: rect.x, y: rect.y },
        extent: vk::Extent2D { width: rect.width, height: rect.height },
    }
}

pub(crate) fn clear_to_vk(clear: ClearValue) -> vk::ClearValue {
    match clear {
        ClearValue::Color(color) => vk::ClearValue {
            color: vk::ClearColorValue { float32: color },
        },
        ClearValue::DepthStencil { depth, stencil } => vk::ClearValue {
            depth_stencil: vk::ClearDepthStencilValue { depth, stencil },
        },
    }
}

fn load_op_for(do_clear: bool) -> vk::AttachmentLoadOp {
    if do_clear {
        vk::AttachmentLoadOp::CLEAR
    } else {
        vk::AttachmentLoadOp::LOAD
    }
}

/// Whether every scope opened in `commands` is closed, in order
pub fn scopes_balanced(commands: &[RenderCommand]) -> bool {
    let mut open = false;
    for command in commands {
        if command.is_begin() {
            if open {
                return false;
            }
            open = true;
        } else if command.is_end() {
            if !open {
                return false;
            }
            open = false;
        }
    }
    !open
}

pub(crate) fn image_barriers(batch: &BarrierBatch) -> Vec<vk::ImageMemoryBarrier<'static>> {
    batch
        .barriers
        .iter()
        .map(|barrier| {
            vk::ImageMemoryBarrier::default()
                .src_access_mask(access_to_vk(barrier.src_access))
                .dst_access_mask(access_to_vk(barrier.dst_access))
                .old_layout(vk::ImageLayout::GENERAL)
                .new_layout(vk::ImageLayout::GENERAL)
                .src_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
                .dst_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
                .image(vk::Image::from_raw(barrier.image.as_raw()))
                .subresource_range(vk::ImageSubresourceRange {
                    aspect_mask: aspect_to_vk(barrier.aspect),
                    base_mip_level: 0,
                    level_count: 1,
                    base_array_layer: 0,
                    layer_count: vk::REMAINING_ARRAY_LAYERS,
                })
        })
        .collect()
}

/// Records `RenderCommand`s into a command buffer
pub(crate) struct CommandReplay<'a> {
    pub(crate) device: &'a ash::Device,
    pub(crate) dynamic_rendering: Option<&'a ash::khr::dynamic_rendering::Device>,
    pub(crate) command_buffer: vk::CommandBuffer,
}

impl CommandReplay<'_> {
    /// Record one command
    ///
    /// # Safety
    ///
    /// `command_buffer` must be in the recording state and every handle in
    /// `command` must be alive.
    pub(crate) unsafe fn record(&self, command: &RenderCommand) -> Result<()> {
        match command {
            RenderCommand::BeginRendering(info) => self.begin_rendering(info)?,
            RenderCommand::BeginRenderPass {
                render_pass,
                framebuffer,
                render_area,
                clear,
                attachment_count,
            } => {
                let clear_values = vec![clear_to_vk(*clear); *attachment_count as usize];
                let render_pass_info = vk::RenderPassBeginInfo::default()
                    .render_pass(vk::RenderPass::from_raw(render_pass.as_raw()))
                    .framebuffer(vk::Framebuffer::from_raw(framebuffer.as_raw()))
                    .render_area(rect_to_vk(*render_area))
                    .clear_values(&clear_values);

                self.device.cmd_begin_render_pass(
                    self.command_buffer,
                    &render_pass_info,
                    vk::SubpassContents::INLINE,
                );
            }
            RenderCommand::EndRendering(batch) => {
                match self.dynamic_rendering {
                    Some(loader) => loader.cmd_end_rendering(self.command_buffer),
                    None => video_bail!(LOG_SOURCE, "EndRendering recorded without dynamic rendering"),
                }
                self.barrier(batch);
            }
            RenderCommand::EndRenderPass(batch) => {
                self.device.cmd_end_render_pass(self.command_buffer);
                self.barrier(batch);
            }
        }
        Ok(())
    }

    unsafe fn begin_rendering(&self, info: &RenderingInfo) -> Result<()> {
        let Some(loader) = self.dynamic_rendering else {
            video_bail!(LOG_SOURCE, "BeginRendering recorded without dynamic rendering");
        };

        // One clear value serves every attachment
        let clear = clear_to_vk(info.clear);
        let load_op = load_op_for(info.do_clear);

        let color_attachment = vk::RenderingAttachmentInfo::default()
            .image_view(vk::ImageView::from_raw(info.color.image_view.as_raw()))
            .image_layout(vk::ImageLayout::GENERAL)
            .load_op(load_op)
            .store_op(vk::AttachmentStoreOp::STORE)
            .clear_value(clear);
        let depth_attachment = vk::RenderingAttachmentInfo::default()
            .image_view(vk::ImageView::from_raw(info.depth.image_view.as_raw()))
            .image_layout(vk::ImageLayout::GENERAL)
            .load_op(load_op)
            .store_op(vk::AttachmentStoreOp::STORE)
            .clear_value(clear);

        let color_attachments: &[vk::RenderingAttachmentInfo] = if info.color.is_bound() {
            std::slice::from_ref(&color_attachment)
        } else {
            &[]
        };

        let mut rendering_info = vk::RenderingInfo::default()
            .render_area(rect_to_vk(info.render_area))
            .layer_count(1)
            .color_attachments(color_attachments);

        if info.depth.is_bound() {
            rendering_info = rendering_info.depth_attachment(&depth_attachment);
        }
        if info.has_stencil() {
            rendering_info = rendering_info.stencil_attachment(&depth_attachment);
        }

        loader.cmd_begin_rendering(self.command_buffer, &rendering_info);
        Ok(())
    }

    unsafe fn barrier(&self, batch: &BarrierBatch) {
        if batch.is_empty() {
            return;
        }
        let barriers = image_barriers(batch);
        self.device.cmd_pipeline_barrier(
            self.command_buffer,
            stages_to_vk(batch.src_stage),
            stages_to_vk(batch.dst_stage),
            vk::DependencyFlags::BY_REGION,
            &[],
            &[],
            &barriers,
        );
    }
}

#[cfg(test)]
#[path = "vulkan_command_tests.rs"]
mod tests;
