/// Framebuffer descriptors supplied by the rasterizer, and the keys of the
/// native framebuffer cache

use crate::renderer::{
    AttachmentType, ImageHandle, ImageViewHandle, PixelFormat, Rect2D,
};

/// Attachment set the rasterizer wants to draw into
///
/// Implemented by the texture runtime's framebuffer object. The cache only
/// borrows the images and views: they must stay alive until every command
/// referencing them has been flushed.
pub trait FramebufferDescriptor {
    /// Abstract format of the attachment (`Invalid` when unbound)
    fn format(&self, attachment: AttachmentType) -> PixelFormat;

    /// Image bound to the attachment (null when unbound)
    fn image(&self, attachment: AttachmentType) -> ImageHandle;

    /// Image view bound to the attachment (null when unbound)
    fn image_view(&self, attachment: AttachmentType) -> ImageViewHandle;

    /// Area of the attachments touched by the scope
    fn render_area(&self) -> Rect2D;

    /// Attachment width in pixels
    fn width(&self) -> u32;

    /// Attachment height in pixels
    fn height(&self) -> u32;

    /// Whether the depth attachment also carries stencil
    fn has_stencil(&self) -> bool {
        self.format(AttachmentType::DepthStencil).has_stencil()
    }
}

/// Plain framebuffer descriptor
///
/// # Example
///
/// ```
/// use pica_video::pica::render::{
///     Framebuffer, FramebufferDescriptor, ImageHandle, ImageViewHandle, PixelFormat, Rect2D,
/// };
///
/// let framebuffer = Framebuffer::new(400, 240)
///     .with_color(PixelFormat::RGBA8, ImageHandle(1), ImageViewHandle(2))
///     .with_depth(PixelFormat::D24S8, ImageHandle(3), ImageViewHandle(4));
/// assert!(framebuffer.has_stencil());
/// assert_eq!(framebuffer.render_area(), Rect2D::from_extent(400, 240));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    formats: [PixelFormat; 2],
    images: [ImageHandle; 2],
    image_views: [ImageViewHandle; 2],
    render_area: Rect2D,
    width: u32,
    height: u32,
}

impl Framebuffer {
    /// Framebuffer with no attachments covering the whole extent
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            formats: [PixelFormat::Invalid; 2],
            images: [ImageHandle::NULL; 2],
            image_views: [ImageViewHandle::NULL; 2],
            render_area: Rect2D::from_extent(width, height),
            width,
            height,
        }
    }

    /// Bind the color attachment
    pub fn with_color(mut self, format: PixelFormat, image: ImageHandle, view: ImageViewHandle) -> Self {
        self.bind(AttachmentType::Color, format, image, view);
        self
    }

    /// Bind the depth/stencil attachment
    pub fn with_depth(mut self, format: PixelFormat, image: ImageHandle, view: ImageViewHandle) -> Self {
        self.bind(AttachmentType::DepthStencil, format, image, view);
        self
    }

    /// Restrict rendering to a sub-rectangle
    pub fn with_render_area(mut self, render_area: Rect2D) -> Self {
        self.render_area = render_area;
        self
    }

    fn bind(&mut self, attachment: AttachmentType, format: PixelFormat, image: ImageHandle, view: ImageViewHandle) {
        let index = attachment.index();
        self.formats[index] = format;
        self.images[index] = image;
        self.image_views[index] = view;
    }
}

impl FramebufferDescriptor for Framebuffer {
    fn format(&self, attachment: AttachmentType) -> PixelFormat {
        self.formats[attachment.index()]
    }

    fn image(&self, attachment: AttachmentType) -> ImageHandle {
        self.images[attachment.index()]
    }

    fn image_view(&self, attachment: AttachmentType) -> ImageViewHandle {
        self.image_views[attachment.index()]
    }

    fn render_area(&self) -> Rect2D {
        self.render_area
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }
}

/// Key of a cached native framebuffer
///
/// Owns nothing: the views belong to the texture runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FramebufferInfo {
    pub color: ImageViewHandle,
    pub depth: ImageViewHandle,
    pub width: u32,
    pub height: u32,
}

impl Default for FramebufferInfo {
    fn default() -> Self {
        Self {
            color: ImageViewHandle::NULL,
            depth: ImageViewHandle::NULL,
            width: 1,
            height: 1,
        }
    }
}

impl FramebufferInfo {
    /// Bound views in attachment order (color first)
    pub fn attachments(&self) -> Vec<ImageViewHandle> {
        [self.color, self.depth]
            .into_iter()
            .filter(|view| !view.is_null())
            .collect()
    }
}
