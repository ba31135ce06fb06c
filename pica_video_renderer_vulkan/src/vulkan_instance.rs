/// VulkanInstance - Vulkan implementation of FormatProvider and GraphicsDevice
///
/// Wraps an instance and logical device created by the embedding renderer.
/// The wrapped handles are borrowed, not owned: dropping a `VulkanInstance`
/// destroys nothing.

use std::sync::Arc;
use ash::vk;
use ash::vk::Handle;
use pica_video::pica::{Error, Result};
use pica_video::pica::render::{
    FormatProvider, FramebufferHandle, FramebufferInfo, GraphicsDevice, ImageLayout, LoadOp,
    NativeFormat, PixelFormat, RenderPassDesc, RenderPassHandle, StoreOp,
};
use pica_video::{video_debug, video_err, video_error, video_info, video_warn};

use crate::vulkan_format::{from_native, to_native, FormatTable};

const LOG_SOURCE: &str = "pica::vulkan";

/// ARM (Mali)
pub const VENDOR_ID_ARM: u32 = 0x13B5;

/// Handles and capabilities of a device created by the embedding renderer
#[derive(Clone)]
pub struct VulkanDeviceInfo {
    pub instance: ash::Instance,
    pub physical_device: vk::PhysicalDevice,
    pub device: ash::Device,
    pub graphics_queue: vk::Queue,
    pub graphics_queue_family: u32,
    /// `VK_KHR_dynamic_rendering` was enabled on `device`
    pub dynamic_rendering: bool,
}

/// Vulkan device wrapper used by the renderpass cache
pub struct VulkanInstance {
    instance: ash::Instance,
    physical_device: vk::PhysicalDevice,
    device: Arc<ash::Device>,
    graphics_queue: vk::Queue,
    graphics_queue_family: u32,
    dynamic_rendering: bool,
    vendor_id: u32,
    formats: FormatTable,
}

/// Map a failed creation call to an engine error
///
/// Out-of-memory results become `Error::OutOfMemory`; everything else is a
/// `BackendError`.
pub(crate) fn creation_error(what: &str, result: vk::Result) -> Error {
    match result {
        vk::Result::ERROR_OUT_OF_HOST_MEMORY | vk::Result::ERROR_OUT_OF_DEVICE_MEMORY => {
            video_error!(LOG_SOURCE, "Out of memory creating {}: {:?}", what, result);
            Error::OutOfMemory
        }
        other => video_err!(LOG_SOURCE, "Failed to create {}: {:?}", what, other),
    }
}

/// Whether work should be submitted at the end of large render passes
pub fn vendor_prefers_flush(vendor_id: u32) -> bool {
    vendor_id == VENDOR_ID_ARM
}

impl VulkanInstance {
    /// Wrap an existing device
    ///
    /// Queries the physical device for its vendor and attachment format
    /// support.
    pub fn new(info: VulkanDeviceInfo) -> Result<Self> {
        if info.graphics_queue == vk::Queue::null() {
            return Err(Error::InitializationFailed(
                "VulkanDeviceInfo has no graphics queue".to_string(),
            ));
        }

        let properties =
            unsafe { info.instance.get_physical_device_properties(info.physical_device) };
        let device_name = properties
            .device_name_as_c_str()
            .unwrap_or(c"<unknown>")
            .to_string_lossy()
            .into_owned();

        let formats = FormatTable::query(&info.instance, info.physical_device);
        for (format, resolved) in formats.fallbacks() {
            video_warn!(LOG_SOURCE, "{:?} attachments unsupported, using {:?}", format, resolved);
        }

        video_info!(
            LOG_SOURCE,
            "Using {} (vendor 0x{:04X}, dynamic rendering: {})",
            device_name,
            properties.vendor_id,
            info.dynamic_rendering
        );

        Ok(Self {
            instance: info.instance,
            physical_device: info.physical_device,
            device: Arc::new(info.device),
            graphics_queue: info.graphics_queue,
            graphics_queue_family: info.graphics_queue_family,
            dynamic_rendering: info.dynamic_rendering,
            vendor_id: properties.vendor_id,
            formats,
        })
    }

    pub fn instance(&self) -> &ash::Instance {
        &self.instance
    }

    pub fn physical_device(&self) -> vk::PhysicalDevice {
        self.physical_device
    }

    pub fn device(&self) -> &Arc<ash::Device> {
        &self.device
    }

    pub fn graphics_queue(&self) -> vk::Queue {
        self.graphics_queue
    }

    pub fn graphics_queue_family(&self) -> u32 {
        self.graphics_queue_family
    }

    pub fn vendor_id(&self) -> u32 {
        self.vendor_id
    }

    /// Vulkan format backing `format` on this device
    pub fn vk_format(&self, format: PixelFormat) -> vk::Format {
        self.formats.get(format)
    }

    fn load_op_to_vk(load_op: LoadOp) -> vk::AttachmentLoadOp {
        match load_op {
            LoadOp::Load => vk::AttachmentLoadOp::LOAD,
            LoadOp::Clear => vk::AttachmentLoadOp::CLEAR,
            LoadOp::DontCare => vk::AttachmentLoadOp::DONT_CARE,
        }
    }

    fn store_op_to_vk(store_op: StoreOp) -> vk::AttachmentStoreOp {
        match store_op {
            StoreOp::Store => vk::AttachmentStoreOp::STORE,
            StoreOp::DontCare => vk::AttachmentStoreOp::DONT_CARE,
        }
    }

    pub(crate) fn image_layout_to_vk(layout: ImageLayout) -> vk::ImageLayout {
        match layout {
            ImageLayout::Undefined => vk::ImageLayout::UNDEFINED,
            ImageLayout::General => vk::ImageLayout::GENERAL,
            ImageLayout::PresentSrc => vk::ImageLayout::PRESENT_SRC_KHR,
        }
    }

    fn attachment_description(desc: &RenderPassDesc, format: NativeFormat) -> vk::AttachmentDescription {
        vk::AttachmentDescription::default()
            .format(from_native(format))
            .samples(vk::SampleCountFlags::TYPE_1)
            .load_op(Self::load_op_to_vk(desc.load_op))
            .store_op(Self::store_op_to_vk(desc.store_op()))
            .stencil_load_op(Self::load_op_to_vk(desc.load_op))
            .stencil_store_op(Self::store_op_to_vk(desc.store_op()))
            .initial_layout(Self::image_layout_to_vk(desc.initial_layout))
            .final_layout(Self::image_layout_to_vk(desc.final_layout))
    }
}

impl FormatProvider for VulkanInstance {
    fn native_format(&self, format: PixelFormat) -> NativeFormat {
        to_native(self.formats.get(format))
    }

    fn dynamic_rendering_supported(&self) -> bool {
        self.dynamic_rendering
    }

    fn should_flush(&self) -> bool {
        vendor_prefers_flush(self.vendor_id)
    }
}

impl GraphicsDevice for VulkanInstance {
    fn create_render_pass(&self, desc: &RenderPassDesc) -> Result<RenderPassHandle> {
        let mut attachments = Vec::with_capacity(2);
        let mut color_attachment_refs = Vec::with_capacity(1);
        let mut depth_attachment_ref: Option<vk::AttachmentReference> = None;

        if desc.has_color() {
            attachments.push(Self::attachment_description(desc, desc.color_format));
            color_attachment_refs.push(vk::AttachmentReference::default()
                .attachment(0)
                .layout(vk::ImageLayout::GENERAL));
        }

        if desc.has_depth() {
            let depth_index = attachments.len() as u32;
            attachments.push(Self::attachment_description(desc, desc.depth_format));
            depth_attachment_ref = Some(vk::AttachmentReference::default()
                .attachment(depth_index)
                .layout(vk::ImageLayout::GENERAL));
        }

        let mut subpass = vk::SubpassDescription::default()
            .pipeline_bind_point(vk::PipelineBindPoint::GRAPHICS)
            .color_attachments(&color_attachment_refs);

        if let Some(ref depth_ref) = depth_attachment_ref {
            subpass = subpass.depth_stencil_attachment(depth_ref);
        }

        let render_pass_info = vk::RenderPassCreateInfo::default()
            .attachments(&attachments)
            .subpasses(std::slice::from_ref(&subpass));

        let render_pass = unsafe { self.device.create_render_pass(&render_pass_info, None) }
            .map_err(|e| creation_error("render pass", e))?;

        video_debug!(
            LOG_SOURCE,
            "Created render pass {:?} (color {:?}, depth {:?}, {:?})",
            render_pass,
            from_native(desc.color_format),
            from_native(desc.depth_format),
            desc.load_op
        );

        Ok(RenderPassHandle::from_raw(render_pass.as_raw()))
    }

    fn destroy_render_pass(&self, render_pass: RenderPassHandle) {
        if render_pass.is_null() {
            return;
        }
        unsafe {
            self.device
                .destroy_render_pass(vk::RenderPass::from_raw(render_pass.as_raw()), None);
        }
    }

    fn create_framebuffer(
        &self,
        info: &FramebufferInfo,
        render_pass: RenderPassHandle,
    ) -> Result<FramebufferHandle> {
        let attachments: Vec<vk::ImageView> = info
            .attachments()
            .into_iter()
            .map(|view| vk::ImageView::from_raw(view.as_raw()))
            .collect();

        let framebuffer_info = vk::FramebufferCreateInfo::default()
            .render_pass(vk::RenderPass::from_raw(render_pass.as_raw()))
            .attachments(&attachments)
            .width(info.width)
            .height(info.height)
            .layers(1);

        let framebuffer = unsafe { self.device.create_framebuffer(&framebuffer_info, None) }
            .map_err(|e| creation_error("framebuffer", e))?;

        Ok(FramebufferHandle::from_raw(framebuffer.as_raw()))
    }

    fn destroy_framebuffer(&self, framebuffer: FramebufferHandle) {
        if framebuffer.is_null() {
            return;
        }
        unsafe {
            self.device
                .destroy_framebuffer(vk::Framebuffer::from_raw(framebuffer.as_raw()), None);
        }
    }
}

/// Whether `VK_KHR_dynamic_rendering` is listed in `extensions`
pub fn has_dynamic_rendering(extensions: &[vk::ExtensionProperties]) -> bool {
    extensions.iter().any(|extension| {
        extension
            .extension_name_as_c_str()
            .map(|name| name == ash::khr::dynamic_rendering::NAME)
            .unwrap_or(false)
    })
}

#[cfg(test)]
#[path = "vulkan_instance_tests.rs"]
mod tests;
