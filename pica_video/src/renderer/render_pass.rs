/// Render pass descriptors - how attachments are loaded, stored and
/// transitioned by a native render pass object

use crate::renderer::NativeFormat;

/// Load operation for an attachment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadOp {
    /// Load existing content
    Load,
    /// Clear the content
    Clear,
    /// Don't care about existing content
    DontCare,
}

impl LoadOp {
    /// Load op selected by a scope's clear flag
    pub fn from_clear(do_clear: bool) -> Self {
        if do_clear {
            LoadOp::Clear
        } else {
            LoadOp::Load
        }
    }
}

/// Store operation for an attachment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    /// Store the rendered content
    Store,
    /// Don't care about storing the content
    DontCare,
}

/// Image layout
///
/// Emulated surfaces stay in `General` for their whole life; only the
/// presentation pass transitions to `PresentSrc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageLayout {
    /// Undefined layout (contents discarded)
    Undefined,
    /// General layout (any access)
    General,
    /// Layout for presenting to swapchain
    PresentSrc,
}

/// Descriptor for creating a render pass with at most one color and one
/// depth/stencil attachment and a single subpass
///
/// An undefined format means the attachment is absent. Color and depth store
/// their contents; stencil follows the depth load op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderPassDesc {
    pub color_format: NativeFormat,
    pub depth_format: NativeFormat,
    pub load_op: LoadOp,
    pub initial_layout: ImageLayout,
    pub final_layout: ImageLayout,
}

impl RenderPassDesc {
    /// Descriptor used by the renderpass table
    pub fn emulated(color_format: NativeFormat, depth_format: NativeFormat, is_clear: bool) -> Self {
        Self {
            color_format,
            depth_format,
            load_op: LoadOp::from_clear(is_clear),
            initial_layout: ImageLayout::General,
            final_layout: ImageLayout::General,
        }
    }

    /// Descriptor of the swapchain presentation pass
    pub fn present(color_format: NativeFormat) -> Self {
        Self {
            color_format,
            depth_format: NativeFormat::UNDEFINED,
            load_op: LoadOp::Clear,
            initial_layout: ImageLayout::Undefined,
            final_layout: ImageLayout::PresentSrc,
        }
    }

    pub fn has_color(&self) -> bool {
        !self.color_format.is_undefined()
    }

    pub fn has_depth(&self) -> bool {
        !self.depth_format.is_undefined()
    }

    /// Store op of color and depth
    pub fn store_op(&self) -> StoreOp {
        StoreOp::Store
    }
}
