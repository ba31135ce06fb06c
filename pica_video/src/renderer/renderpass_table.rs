/// Fixed-size table of render pass objects keyed by
/// (color format slot, depth format slot, clear-vs-load)

use std::sync::{Mutex, MutexGuard};
use crate::error::{Error, Result};
use crate::renderer::{
    FormatProvider, GraphicsDevice, PixelFormat, RenderPassDesc, RenderPassHandle,
};
use crate::video_debug;

/// Number of color-capable formats (`RGBA8..=RGBA4`)
pub const MAX_COLOR_FORMATS: usize = 5;

/// Number of depth slots (`D16..=D24S8`, including the reserved ordinal 15)
pub const MAX_DEPTH_FORMATS: usize = 4;

/// Ordinal of the first depth format
pub const DEPTH_FORMAT_OFFSET: u32 = PixelFormat::D16 as u32;

/// Table slot of a color format; `Invalid` maps to the reserved last slot
///
/// # Panics
///
/// Panics when `format` is not a color format: the caller handed a format
/// the table was not sized for.
pub fn color_slot(format: PixelFormat) -> usize {
    if format == PixelFormat::Invalid {
        return MAX_COLOR_FORMATS;
    }
    let slot = format.ordinal() as usize;
    assert!(
        slot < MAX_COLOR_FORMATS,
        "Invalid color format {:?} (slot {}, max {})",
        format,
        slot,
        MAX_COLOR_FORMATS
    );
    slot
}

/// Table slot of a depth format; `Invalid` maps to the reserved last slot
///
/// # Panics
///
/// Panics when `format` is not a depth format.
pub fn depth_slot(format: PixelFormat) -> usize {
    if format == PixelFormat::Invalid {
        return MAX_DEPTH_FORMATS;
    }
    let slot = format.ordinal().checked_sub(DEPTH_FORMAT_OFFSET).map(|s| s as usize);
    match slot {
        Some(slot) if slot < MAX_DEPTH_FORMATS => slot,
        _ => panic!(
            "Invalid depth format {:?} (ordinal {}, expected {}..{})",
            format,
            format.ordinal(),
            DEPTH_FORMAT_OFFSET,
            DEPTH_FORMAT_OFFSET as usize + MAX_DEPTH_FORMATS
        ),
    }
}

type Slots = [[[RenderPassHandle; 2]; MAX_DEPTH_FORMATS + 1]; MAX_COLOR_FORMATS + 1];

/// Table key with its slot indices already resolved
///
/// Built before the table lock is taken so a bad format panics without
/// poisoning the lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RenderpassKey {
    pub(crate) color: PixelFormat,
    pub(crate) depth: PixelFormat,
    pub(crate) is_clear: bool,
    color_index: usize,
    depth_index: usize,
}

impl RenderpassKey {
    /// # Panics
    ///
    /// Panics when `color` is not a color format or `depth` not a depth
    /// format.
    pub(crate) fn new(color: PixelFormat, depth: PixelFormat, is_clear: bool) -> Self {
        Self {
            color,
            depth,
            is_clear,
            color_index: color_slot(color),
            depth_index: depth_slot(depth),
        }
    }
}

/// Lazily populated render pass table
///
/// Entries are never evicted; they are destroyed together with the table's
/// owner through `destroy_all`.
pub(crate) struct RenderpassTable {
    slots: Slots,
}

impl RenderpassTable {
    pub(crate) fn new() -> Self {
        Self {
            slots: [[[RenderPassHandle::NULL; 2]; MAX_DEPTH_FORMATS + 1]; MAX_COLOR_FORMATS + 1],
        }
    }

    /// Return the cached pass for `key`, creating it on first use
    pub(crate) fn get_or_create(
        &mut self,
        device: &dyn GraphicsDevice,
        formats: &dyn FormatProvider,
        key: RenderpassKey,
    ) -> Result<RenderPassHandle> {
        let slot = &mut self.slots[key.color_index][key.depth_index][key.is_clear as usize];
        if slot.is_null() {
            let desc = RenderPassDesc::emulated(
                formats.native_format(key.color),
                formats.native_format(key.depth),
                key.is_clear,
            );
            *slot = device.create_render_pass(&desc)?;
            video_debug!(
                "pica::RenderpassCache",
                "Created render pass {:?} for color {:?}, depth {:?}, clear {}",
                *slot,
                key.color,
                key.depth,
                key.is_clear
            );
        }

        Ok(*slot)
    }

    /// Number of populated entries
    pub(crate) fn len(&self) -> usize {
        self.slots
            .iter()
            .flatten()
            .flatten()
            .filter(|pass| !pass.is_null())
            .count()
    }

    /// Destroy every populated entry and reset it to null
    pub(crate) fn destroy_all(&mut self, device: &dyn GraphicsDevice) {
        for pass in self.slots.iter_mut().flatten().flatten() {
            if !pass.is_null() {
                device.destroy_render_pass(*pass);
                *pass = RenderPassHandle::NULL;
            }
        }
    }
}

/// Lock the shared table
pub(crate) fn lock_table(table: &Mutex<RenderpassTable>) -> Result<MutexGuard<'_, RenderpassTable>> {
    table
        .lock()
        .map_err(|_| Error::BackendError("Renderpass table lock poisoned".to_string()))
}

#[cfg(test)]
#[path = "renderpass_table_tests.rs"]
mod tests;
