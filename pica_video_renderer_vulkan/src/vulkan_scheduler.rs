/// VulkanScheduler - Vulkan implementation of CommandRecorder
///
/// Commands are buffered in submission order. `flush` replays them into a
/// command buffer, submits it on the graphics queue and waits for the GPU,
/// so the next batch can reuse the same command buffer.

use std::sync::{Arc, Mutex, MutexGuard};
use std::sync::atomic::{AtomicU64, Ordering};
use ash::vk;
use pica_video::pica::{Error, Result};
use pica_video::pica::render::{CommandRecorder, FormatProvider, RenderCommand};
use pica_video::{video_bail, video_err, video_error, video_trace, video_warn};

use crate::vulkan_command::{scopes_balanced, CommandReplay};
use crate::vulkan_instance::{creation_error, VulkanInstance};

const LOG_SOURCE: &str = "pica::vulkan";

pub struct VulkanScheduler {
    device: Arc<ash::Device>,
    dynamic_rendering: Option<ash::khr::dynamic_rendering::Device>,
    graphics_queue: vk::Queue,
    command_pool: vk::CommandPool,
    command_buffer: vk::CommandBuffer,
    fence: vk::Fence,
    /// Held for the whole flush; also serializes queue access
    pending: Mutex<Vec<RenderCommand>>,
    submissions: AtomicU64,
}

impl VulkanScheduler {
    /// Create a scheduler submitting to `instance`'s graphics queue
    pub fn new(instance: &VulkanInstance) -> Result<Self> {
        let device = instance.device().clone();

        let command_pool_create_info = vk::CommandPoolCreateInfo::default()
            .queue_family_index(instance.graphics_queue_family())
            .flags(vk::CommandPoolCreateFlags::RESET_COMMAND_BUFFER);

        let command_pool = unsafe { device.create_command_pool(&command_pool_create_info, None) }
            .map_err(|e| creation_error("command pool", e))?;

        let command_buffer_allocate_info = vk::CommandBufferAllocateInfo::default()
            .command_pool(command_pool)
            .level(vk::CommandBufferLevel::PRIMARY)
            .command_buffer_count(1);

        let command_buffer = match unsafe { device.allocate_command_buffers(&command_buffer_allocate_info) } {
            Ok(buffers) => buffers[0],
            Err(e) => {
                unsafe { device.destroy_command_pool(command_pool, None) };
                return Err(creation_error("command buffer", e));
            }
        };

        let fence = match unsafe { device.create_fence(&vk::FenceCreateInfo::default(), None) } {
            Ok(fence) => fence,
            Err(e) => {
                unsafe { device.destroy_command_pool(command_pool, None) };
                return Err(creation_error("submit fence", e));
            }
        };

        let dynamic_rendering = instance
            .dynamic_rendering_supported()
            .then(|| ash::khr::dynamic_rendering::Device::new(instance.instance(), &device));

        Ok(Self {
            device,
            dynamic_rendering,
            graphics_queue: instance.graphics_queue(),
            command_pool,
            command_buffer,
            fence,
            pending: Mutex::new(Vec::new()),
            submissions: AtomicU64::new(0),
        })
    }

    /// Number of batches submitted so far
    pub fn submission_count(&self) -> u64 {
        self.submissions.load(Ordering::Relaxed)
    }

    fn lock_pending(&self) -> Result<MutexGuard<'_, Vec<RenderCommand>>> {
        self.pending
            .lock()
            .map_err(|_| Error::BackendError("Command queue lock poisoned".to_string()))
    }

    fn submit(&self, commands: &[RenderCommand]) -> Result<()> {
        let replay = CommandReplay {
            device: &self.device,
            dynamic_rendering: self.dynamic_rendering.as_ref(),
            command_buffer: self.command_buffer,
        };

        unsafe {
            self.device
                .reset_command_buffer(self.command_buffer, vk::CommandBufferResetFlags::empty())
                .map_err(|e| video_err!(LOG_SOURCE, "Failed to reset command buffer: {:?}", e))?;

            let begin_info = vk::CommandBufferBeginInfo::default()
                .flags(vk::CommandBufferUsageFlags::ONE_TIME_SUBMIT);
            self.device
                .begin_command_buffer(self.command_buffer, &begin_info)
                .map_err(|e| video_err!(LOG_SOURCE, "Failed to begin command buffer: {:?}", e))?;

            for command in commands {
                if let Err(e) = replay.record(command) {
                    // Leave the buffer in a resettable state
                    let _ = self.device.end_command_buffer(self.command_buffer);
                    return Err(e);
                }
            }

            self.device
                .end_command_buffer(self.command_buffer)
                .map_err(|e| video_err!(LOG_SOURCE, "Failed to end command buffer: {:?}", e))?;

            let command_buffers = [self.command_buffer];
            let submit_info = vk::SubmitInfo::default().command_buffers(&command_buffers);

            self.device
                .queue_submit(self.graphics_queue, &[submit_info], self.fence)
                .map_err(|e| video_err!(LOG_SOURCE, "Failed to submit commands to GPU queue: {:?}", e))?;

            self.device
                .wait_for_fences(&[self.fence], true, u64::MAX)
                .map_err(|e| video_err!(LOG_SOURCE, "Failed to wait for submit fence: {:?}", e))?;

            self.device
                .reset_fences(&[self.fence])
                .map_err(|e| video_err!(LOG_SOURCE, "Failed to reset submit fence: {:?}", e))?;
        }

        Ok(())
    }
}

/// Run `submit` on the queued commands and clear the queue only if it
/// succeeded; a failed batch stays queued for the next flush
pub(crate) fn drain_on_success(
    pending: &mut Vec<RenderCommand>,
    submit: impl FnOnce(&[RenderCommand]) -> Result<()>,
) -> Result<usize> {
    if let Err(e) = submit(pending.as_slice()) {
        video_warn!(LOG_SOURCE, "Submit failed, keeping {} queued commands", pending.len());
        return Err(e);
    }
    let count = pending.len();
    pending.clear();
    Ok(count)
}

impl CommandRecorder for VulkanScheduler {
    fn record(&self, command: RenderCommand) {
        match self.pending.lock() {
            Ok(mut pending) => pending.push(command),
            Err(_) => video_error!(LOG_SOURCE, "Dropping {:?}: command queue lock poisoned", command),
        }
    }

    fn flush(&self) -> Result<()> {
        let mut pending = self.lock_pending()?;
        if pending.is_empty() {
            return Ok(());
        }
        if !scopes_balanced(&pending) {
            video_bail!(LOG_SOURCE, "Flush requested while a rendering scope is open");
        }

        let count = drain_on_success(&mut pending, |commands| self.submit(commands))?;

        let submissions = self.submissions.fetch_add(1, Ordering::Relaxed) + 1;
        video_trace!(LOG_SOURCE, "Submitted batch {} ({} commands)", submissions, count);
        Ok(())
    }

    fn pending_count(&self) -> usize {
        self.pending.lock().map(|pending| pending.len()).unwrap_or(0)
    }
}

impl Drop for VulkanScheduler {
    fn drop(&mut self) {
        unsafe {
            // flush always waits, so the fence is never pending here
            self.device.destroy_fence(self.fence, None);
            self.device.destroy_command_pool(self.command_pool, None);
        }
    }
}

#[cfg(test)]
#[path = "vulkan_scheduler_tests.rs"]
mod tests;
