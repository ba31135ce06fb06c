/// Mock backend for unit tests (no GPU required)
///
/// Native objects are tracked in a slot map so tests can detect leaked
/// handles and double destruction.

#[cfg(test)]
use std::sync::Mutex;
#[cfg(test)]
use std::sync::atomic::{AtomicBool, Ordering};
#[cfg(test)]
use slotmap::{DefaultKey, Key, KeyData, SlotMap};

#[cfg(test)]
use crate::error::{Error, Result};
#[cfg(test)]
use crate::renderer::{
    CommandRecorder, FormatProvider, FramebufferHandle, FramebufferInfo, GraphicsDevice,
    NativeFormat, PixelFormat, RenderCommand, RenderPassDesc, RenderPassHandle,
};

// ============================================================================
// Mock GraphicsDevice
// ============================================================================

#[cfg(test)]
#[derive(Debug, Clone)]
pub enum MockObject {
    RenderPass(RenderPassDesc),
    Framebuffer {
        info: FramebufferInfo,
        render_pass: RenderPassHandle,
    },
}

#[cfg(test)]
#[derive(Default)]
struct MockDeviceState {
    objects: SlotMap<DefaultKey, MockObject>,
    render_passes_created: usize,
    framebuffers_created: usize,
    render_passes_destroyed: usize,
    framebuffers_destroyed: usize,
    invalid_destroys: usize,
}

#[cfg(test)]
#[derive(Default)]
pub struct MockDevice {
    state: Mutex<MockDeviceState>,
    fail_creation: AtomicBool,
}

#[cfg(test)]
fn handle_of(key: DefaultKey) -> u64 {
    key.data().as_ffi()
}

#[cfg(test)]
fn key_of(raw: u64) -> DefaultKey {
    KeyData::from_ffi(raw).into()
}

#[cfg(test)]
impl MockDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following creation fail with `Error::OutOfMemory`
    pub fn set_fail_creation(&self, fail: bool) {
        self.fail_creation.store(fail, Ordering::SeqCst);
    }

    /// Objects created and not yet destroyed
    pub fn live_objects(&self) -> usize {
        self.state.lock().unwrap().objects.len()
    }

    pub fn render_passes_created(&self) -> usize {
        self.state.lock().unwrap().render_passes_created
    }

    pub fn framebuffers_created(&self) -> usize {
        self.state.lock().unwrap().framebuffers_created
    }

    pub fn render_passes_destroyed(&self) -> usize {
        self.state.lock().unwrap().render_passes_destroyed
    }

    pub fn framebuffers_destroyed(&self) -> usize {
        self.state.lock().unwrap().framebuffers_destroyed
    }

    /// Destroy calls on unknown, already destroyed or mistyped handles
    pub fn invalid_destroys(&self) -> usize {
        self.state.lock().unwrap().invalid_destroys
    }

    /// Live object behind a raw handle
    pub fn object(&self, raw: u64) -> Option<MockObject> {
        self.state.lock().unwrap().objects.get(key_of(raw)).cloned()
    }

    fn insert(&self, object: MockObject) -> Result<u64> {
        if self.fail_creation.load(Ordering::SeqCst) {
            return Err(Error::OutOfMemory);
        }
        let mut state = self.state.lock().unwrap();
        match object {
            MockObject::RenderPass(_) => state.render_passes_created += 1,
            MockObject::Framebuffer { .. } => state.framebuffers_created += 1,
        }
        Ok(handle_of(state.objects.insert(object)))
    }
}

#[cfg(test)]
impl GraphicsDevice for MockDevice {
    fn create_render_pass(&self, desc: &RenderPassDesc) -> Result<RenderPassHandle> {
        self.insert(MockObject::RenderPass(*desc)).map(RenderPassHandle)
    }

    fn destroy_render_pass(&self, render_pass: RenderPassHandle) {
        let mut state = self.state.lock().unwrap();
        let key = key_of(render_pass.as_raw());
        match state.objects.get(key) {
            Some(MockObject::RenderPass(_)) => {
                state.objects.remove(key);
                state.render_passes_destroyed += 1;
            }
            _ => state.invalid_destroys += 1,
        }
    }

    fn create_framebuffer(
        &self,
        info: &FramebufferInfo,
        render_pass: RenderPassHandle,
    ) -> Result<FramebufferHandle> {
        self.insert(MockObject::Framebuffer { info: *info, render_pass })
            .map(FramebufferHandle)
    }

    fn destroy_framebuffer(&self, framebuffer: FramebufferHandle) {
        let mut state = self.state.lock().unwrap();
        let key = key_of(framebuffer.as_raw());
        match state.objects.get(key) {
            Some(MockObject::Framebuffer { .. }) => {
                state.objects.remove(key);
                state.framebuffers_destroyed += 1;
            }
            _ => state.invalid_destroys += 1,
        }
    }
}

// ============================================================================
// Mock FormatProvider
// ============================================================================

#[cfg(test)]
pub struct MockFormatProvider {
    pub dynamic_rendering: bool,
    pub should_flush: AtomicBool,
}

#[cfg(test)]
impl MockFormatProvider {
    pub fn new(dynamic_rendering: bool, should_flush: bool) -> Self {
        Self {
            dynamic_rendering,
            should_flush: AtomicBool::new(should_flush),
        }
    }

    /// Native format reported for `format`
    pub fn native(format: PixelFormat) -> NativeFormat {
        match format {
            PixelFormat::Invalid => NativeFormat::UNDEFINED,
            other => NativeFormat(100 + other.ordinal()),
        }
    }
}

#[cfg(test)]
impl FormatProvider for MockFormatProvider {
    fn native_format(&self, format: PixelFormat) -> NativeFormat {
        Self::native(format)
    }

    fn dynamic_rendering_supported(&self) -> bool {
        self.dynamic_rendering
    }

    fn should_flush(&self) -> bool {
        self.should_flush.load(Ordering::SeqCst)
    }
}

// ============================================================================
// Mock CommandRecorder
// ============================================================================

#[cfg(test)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recorded {
    Command(RenderCommand),
    Flush,
}

#[cfg(test)]
#[derive(Default)]
pub struct MockRecorder {
    log: Mutex<Vec<Recorded>>,
}

#[cfg(test)]
impl MockRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded so far, flushes included, in order
    pub fn log(&self) -> Vec<Recorded> {
        self.log.lock().unwrap().clone()
    }

    /// Recorded commands in order
    pub fn commands(&self) -> Vec<RenderCommand> {
        self.log
            .lock()
            .unwrap()
            .iter()
            .filter_map(|entry| match entry {
                Recorded::Command(command) => Some(command.clone()),
                Recorded::Flush => None,
            })
            .collect()
    }

    pub fn begin_count(&self) -> usize {
        self.commands().iter().filter(|c| c.is_begin()).count()
    }

    pub fn end_count(&self) -> usize {
        self.commands().iter().filter(|c| c.is_end()).count()
    }

    pub fn flush_count(&self) -> usize {
        self.log.lock().unwrap().iter().filter(|e| **e == Recorded::Flush).count()
    }
}

#[cfg(test)]
impl CommandRecorder for MockRecorder {
    fn record(&self, command: RenderCommand) {
        self.log.lock().unwrap().push(Recorded::Command(command));
    }

    fn flush(&self) -> Result<()> {
        self.log.lock().unwrap().push(Recorded::Flush);
        Ok(())
    }

    fn pending_count(&self) -> usize {
        self.log
            .lock()
            .unwrap()
            .iter()
            .rev()
            .take_while(|entry| **entry != Recorded::Flush)
            .count()
    }
}

#[cfg(test)]
#[path = "mock_device_tests.rs"]
mod tests;
