/// Pixel format to Vulkan format mapping
///
/// Every `PixelFormat` has a preferred `vk::Format`. A few have no universally
/// supported Vulkan counterpart for the use they are put to and carry a
/// fallback that is picked when the device lacks the required features.

use ash::vk;
use rustc_hash::FxHashMap;
use pica_video::pica::render::{NativeFormat, PixelFormat, SurfaceType};

/// Every format that can back a surface
pub const ALL_PIXEL_FORMATS: [PixelFormat; 17] = [
    PixelFormat::RGBA8,
    PixelFormat::RGB8,
    PixelFormat::RGB5A1,
    PixelFormat::RGB565,
    PixelFormat::RGBA4,
    PixelFormat::IA8,
    PixelFormat::RG8,
    PixelFormat::I8,
    PixelFormat::A8,
    PixelFormat::IA4,
    PixelFormat::I4,
    PixelFormat::A4,
    PixelFormat::ETC1,
    PixelFormat::ETC1A4,
    PixelFormat::D16,
    PixelFormat::D24,
    PixelFormat::D24S8,
];

/// Vulkan format preferred for `format`
///
/// Texture-only formats are decoded to RGBA8 on upload.
pub fn preferred_format(format: PixelFormat) -> vk::Format {
    match format {
        PixelFormat::RGBA8 => vk::Format::R8G8B8A8_UNORM,
        PixelFormat::RGB8 => vk::Format::R8G8B8_UNORM,
        PixelFormat::RGB5A1 => vk::Format::R5G5B5A1_UNORM_PACK16,
        PixelFormat::RGB565 => vk::Format::R5G6B5_UNORM_PACK16,
        PixelFormat::RGBA4 => vk::Format::R4G4B4A4_UNORM_PACK16,
        PixelFormat::D16 => vk::Format::D16_UNORM,
        PixelFormat::D24 => vk::Format::X8_D24_UNORM_PACK32,
        PixelFormat::D24S8 => vk::Format::D24_UNORM_S8_UINT,
        PixelFormat::Invalid => vk::Format::UNDEFINED,
        _ => vk::Format::R8G8B8A8_UNORM,
    }
}

/// Replacement used when the preferred format lacks the required features
pub fn fallback_format(format: PixelFormat) -> Option<vk::Format> {
    match format {
        PixelFormat::RGB8 => Some(vk::Format::R8G8B8A8_UNORM),
        PixelFormat::D24 => Some(vk::Format::D32_SFLOAT),
        PixelFormat::D24S8 => Some(vk::Format::D32_SFLOAT_S8_UINT),
        _ => None,
    }
}

/// Optimal-tiling features a format must support to back `format`
pub fn required_features(format: PixelFormat) -> vk::FormatFeatureFlags {
    match format.surface_type() {
        SurfaceType::Color => {
            vk::FormatFeatureFlags::COLOR_ATTACHMENT | vk::FormatFeatureFlags::SAMPLED_IMAGE
        }
        SurfaceType::Depth | SurfaceType::DepthStencil => {
            vk::FormatFeatureFlags::DEPTH_STENCIL_ATTACHMENT
        }
        SurfaceType::Texture => vk::FormatFeatureFlags::SAMPLED_IMAGE,
        SurfaceType::Invalid => vk::FormatFeatureFlags::empty(),
    }
}

pub fn to_native(format: vk::Format) -> NativeFormat {
    NativeFormat(format.as_raw() as u32)
}

pub fn from_native(format: NativeFormat) -> vk::Format {
    vk::Format::from_raw(format.0 as i32)
}

/// Resolved `PixelFormat` → `vk::Format` table for one physical device
#[derive(Debug, Clone, Default)]
pub struct FormatTable {
    formats: FxHashMap<PixelFormat, vk::Format>,
}

impl FormatTable {
    /// Resolve every format against `supports(format, features)`
    ///
    /// The preferred format wins when supported, then the fallback. When
    /// neither is supported the preferred format is kept and creation will
    /// fail on the device.
    pub fn build(mut supports: impl FnMut(vk::Format, vk::FormatFeatureFlags) -> bool) -> Self {
        let mut formats = FxHashMap::default();
        for format in ALL_PIXEL_FORMATS {
            let features = required_features(format);
            let preferred = preferred_format(format);
            let resolved = if supports(preferred, features) {
                preferred
            } else {
                match fallback_format(format) {
                    Some(fallback) if supports(fallback, features) => fallback,
                    _ => preferred,
                }
            };
            formats.insert(format, resolved);
        }
        Self { formats }
    }

    /// Table built from `vkGetPhysicalDeviceFormatProperties`
    pub fn query(instance: &ash::Instance, physical_device: vk::PhysicalDevice) -> Self {
        Self::build(|format, features| unsafe {
            instance
                .get_physical_device_format_properties(physical_device, format)
                .optimal_tiling_features
                .contains(features)
        })
    }

    /// Vulkan format backing `format`; `UNDEFINED` for `Invalid`
    pub fn get(&self, format: PixelFormat) -> vk::Format {
        self.formats
            .get(&format)
            .copied()
            .unwrap_or(vk::Format::UNDEFINED)
    }

    /// Formats that resolved to their fallback
    pub fn fallbacks(&self) -> Vec<(PixelFormat, vk::Format)> {
        let mut used: Vec<_> = self
            .formats
            .iter()
            .filter(|(format, resolved)| **resolved != preferred_format(**format))
            .map(|(format, resolved)| (*format, *resolved))
            .collect();
        used.sort_by_key(|(format, _)| *format);
        used
    }
}

#[cfg(test)]
#[path = "vulkan_format_tests.rs"]
mod tests;
