/// PixelFormat - abstract pixel formats of the emulated GPU

/// Pixel format of an emulated surface
///
/// The ordinals are fixed: the renderpass table derives its slot indices
/// directly from them (see `renderpass_table`).
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u32)]
pub enum PixelFormat {
    // Shared between textures and color buffers
    RGBA8 = 0,
    RGB8 = 1,
    RGB5A1 = 2,
    RGB565 = 3,
    RGBA4 = 4,

    // Texture-only formats
    IA8 = 5,
    RG8 = 6,
    I8 = 7,
    A8 = 8,
    IA4 = 9,
    I4 = 10,
    A4 = 11,
    ETC1 = 12,
    ETC1A4 = 13,

    // Depth buffer-only formats
    D16 = 14,
    // 15 is reserved by the hardware
    D24 = 16,
    D24S8 = 17,

    /// No surface bound to this slot
    Invalid = 255,
}

/// Classification of a surface by the role its format allows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceType {
    Color,
    Texture,
    Depth,
    DepthStencil,
    Invalid,
}

/// Attachment slot of a framebuffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachmentType {
    Color,
    DepthStencil,
}

impl AttachmentType {
    /// Index into per-attachment arrays (color first)
    pub fn index(self) -> usize {
        match self {
            AttachmentType::Color => 0,
            AttachmentType::DepthStencil => 1,
        }
    }
}

impl PixelFormat {
    /// Every format that can be bound as a render target, color first
    pub const ATTACHMENT_FORMATS: [PixelFormat; 8] = [
        PixelFormat::RGBA8,
        PixelFormat::RGB8,
        PixelFormat::RGB5A1,
        PixelFormat::RGB565,
        PixelFormat::RGBA4,
        PixelFormat::D16,
        PixelFormat::D24,
        PixelFormat::D24S8,
    ];

    /// Numeric ordinal of the format
    pub fn ordinal(self) -> u32 {
        self as u32
    }

    /// Surface type implied by the format
    pub fn surface_type(self) -> SurfaceType {
        match self {
            PixelFormat::RGBA8
            | PixelFormat::RGB8
            | PixelFormat::RGB5A1
            | PixelFormat::RGB565
            | PixelFormat::RGBA4 => SurfaceType::Color,
            PixelFormat::IA8
            | PixelFormat::RG8
            | PixelFormat::I8
            | PixelFormat::A8
            | PixelFormat::IA4
            | PixelFormat::I4
            | PixelFormat::A4
            | PixelFormat::ETC1
            | PixelFormat::ETC1A4 => SurfaceType::Texture,
            PixelFormat::D16 | PixelFormat::D24 => SurfaceType::Depth,
            PixelFormat::D24S8 => SurfaceType::DepthStencil,
            PixelFormat::Invalid => SurfaceType::Invalid,
        }
    }

    /// Whether the format carries a stencil component
    pub fn has_stencil(self) -> bool {
        self.surface_type() == SurfaceType::DepthStencil
    }

    /// Whether the format can back the depth/stencil attachment
    pub fn is_depth(self) -> bool {
        matches!(self.surface_type(), SurfaceType::Depth | SurfaceType::DepthStencil)
    }

    /// Whether the format can back the color attachment
    pub fn is_color(self) -> bool {
        self.surface_type() == SurfaceType::Color
    }
}
