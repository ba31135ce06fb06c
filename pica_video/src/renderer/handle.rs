/// Opaque native handles
///
/// The core never interprets these values; backends convert them to and from
/// their own handle types (for Vulkan, `vk::Handle::as_raw` / `from_raw`).
/// The raw value 0 is the null handle, as in Vulkan and OpenGL.

macro_rules! native_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u64);

        impl $name {
            /// The null handle
            pub const NULL: Self = Self(0);

            /// Wrap a raw backend handle
            pub const fn from_raw(raw: u64) -> Self {
                Self(raw)
            }

            /// Raw backend handle
            pub const fn as_raw(self) -> u64 {
                self.0
            }

            /// Whether this is the null handle
            pub const fn is_null(self) -> bool {
                self.0 == 0
            }
        }
    };
}

native_handle!(
    /// Image owned by the texture runtime
    ImageHandle
);
native_handle!(
    /// View of an image, used as an attachment
    ImageViewHandle
);
native_handle!(
    /// Native render pass object
    RenderPassHandle
);
native_handle!(
    /// Native framebuffer object
    FramebufferHandle
);

/// Backend format identifier (e.g. the raw `VkFormat` value)
///
/// 0 means "undefined": the attachment is not used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NativeFormat(pub u32);

impl NativeFormat {
    pub const UNDEFINED: Self = Self(0);

    pub fn is_undefined(self) -> bool {
        self == Self::UNDEFINED
    }
}
