/// Renderer configuration consumed by the renderpass cache

/// Default number of draws after which a closed scope triggers a flush
pub const DEFAULT_FLUSH_THRESHOLD: u32 = 20;

/// Renderer configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RendererConfig {
    /// Use dynamic rendering when the backend supports it
    pub allow_dynamic_rendering: bool,
    /// Draws accumulated before a closing scope forces a submission
    pub flush_threshold: u32,
    /// Override of the backend's flush hint (None = ask the backend)
    pub proactive_flush: Option<bool>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            allow_dynamic_rendering: true,
            flush_threshold: DEFAULT_FLUSH_THRESHOLD,
            proactive_flush: None,
        }
    }
}
