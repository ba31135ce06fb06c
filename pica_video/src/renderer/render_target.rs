/// RenderTarget / RenderingInfo - description of an active rendering scope

use bitflags::bitflags;
use crate::renderer::{ImageHandle, ImageViewHandle};

bitflags! {
    /// Image aspects covered by an attachment or barrier
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct AspectMask: u32 {
        const COLOR = 1 << 0;
        const DEPTH = 1 << 1;
        const STENCIL = 1 << 2;
    }
}

/// 2D rectangle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rect2D {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect2D {
    /// Rectangle anchored at the origin
    pub fn from_extent(width: u32, height: u32) -> Self {
        Self { x: 0, y: 0, width, height }
    }
}

/// Clear value for an attachment
///
/// Mirrors the 16-byte native clear union: equality compares the raw bytes,
/// so `-0.0` and `0.0` differ and a NaN payload equals itself.
#[derive(Debug, Clone, Copy)]
pub enum ClearValue {
    /// Color clear value (RGBA)
    Color([f32; 4]),
    /// Depth/stencil clear value
    DepthStencil { depth: f32, stencil: u32 },
}

impl ClearValue {
    /// Raw bytes as laid out in the native clear union
    pub fn to_bytes(self) -> [u8; 16] {
        match self {
            ClearValue::Color(rgba) => bytemuck::cast(rgba),
            ClearValue::DepthStencil { depth, stencil } => {
                bytemuck::cast([depth.to_bits(), stencil, 0u32, 0u32])
            }
        }
    }
}

impl Default for ClearValue {
    fn default() -> Self {
        ClearValue::Color([0.0; 4])
    }
}

impl PartialEq for ClearValue {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for ClearValue {}

/// One attachment slot of a rendering scope
///
/// A target whose view is null means "slot unused". Two targets are equal
/// when they reference the same image view.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderTarget {
    pub aspect: AspectMask,
    pub image: ImageHandle,
    pub image_view: ImageViewHandle,
}

impl RenderTarget {
    /// Whether an image view is bound to this slot
    pub fn is_bound(&self) -> bool {
        !self.image_view.is_null()
    }
}

impl PartialEq for RenderTarget {
    fn eq(&self, other: &Self) -> bool {
        self.image_view == other.image_view
    }
}

impl Eq for RenderTarget {}

/// Descriptor of the most recently begun rendering scope
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderingInfo {
    pub color: RenderTarget,
    pub depth: RenderTarget,
    pub render_area: Rect2D,
    pub clear: ClearValue,
    pub do_clear: bool,
}

impl RenderingInfo {
    /// Number of bound attachments (0..=2)
    pub fn attachment_count(&self) -> u32 {
        self.color.is_bound() as u32 + self.depth.is_bound() as u32
    }

    /// Whether the depth slot also covers stencil
    pub fn has_stencil(&self) -> bool {
        self.depth.is_bound() && self.depth.aspect.contains(AspectMask::STENCIL)
    }
}
