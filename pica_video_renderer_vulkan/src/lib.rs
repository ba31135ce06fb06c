/*!
# Pica Video - Vulkan Backend

Vulkan implementation of the `pica_video` collaborator traits, using the Ash
library for Vulkan bindings.

- [`VulkanInstance`] wraps a device created by the embedding renderer and
  implements `FormatProvider` and `GraphicsDevice`
- [`VulkanScheduler`] implements `CommandRecorder` on the graphics queue

# Example

```no_run
use std::sync::Arc;
use pica_video::pica::render::{RenderpassCache, RendererConfig};
use pica_video_renderer_vulkan::{VulkanDeviceInfo, VulkanInstance, VulkanScheduler};

# fn run(info: VulkanDeviceInfo) -> pica_video::pica::Result<()> {
let instance = Arc::new(VulkanInstance::new(info)?);
let scheduler = Arc::new(VulkanScheduler::new(&instance)?);
let cache = RenderpassCache::new(
    instance.clone(),
    instance.clone(),
    scheduler,
    &RendererConfig::default(),
);
# Ok(())
# }
```
*/

mod vulkan_command;
mod vulkan_format;
mod vulkan_instance;
mod vulkan_scheduler;

pub use vulkan_command::scopes_balanced;
pub use vulkan_format::{fallback_format, preferred_format, FormatTable};
pub use vulkan_instance::{has_dynamic_rendering, vendor_prefers_flush, VulkanDeviceInfo, VulkanInstance, VENDOR_ID_ARM};
pub use vulkan_scheduler::VulkanScheduler;
