//! Client behavior configuration.

use campus_chat_domain::{GenerationParams, RenderMode};
use std::time::Duration;

/// Default interval between status polls.
pub const DEFAULT_STATUS_INTERVAL: Duration = Duration::from_secs(10);

/// Runtime configuration for the chat use cases.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Sampling parameters sent with every prompt.
    pub generation: GenerationParams,
    /// How assistant messages are rendered.
    pub render_mode: RenderMode,
    /// Interval between background status polls.
    pub status_interval: Duration,
    /// Whether the status monitor runs at all.
    pub status_polling: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            generation: GenerationParams::default(),
            render_mode: RenderMode::default(),
            status_interval: DEFAULT_STATUS_INTERVAL,
            status_polling: true,
        }
    }
}

impl ClientConfig {
    pub fn with_generation(mut self, generation: GenerationParams) -> Self {
        self.generation = generation;
        self
    }

    pub fn with_render_mode(mut self, mode: RenderMode) -> Self {
        self.render_mode = mode;
        self
    }

    pub fn with_status_interval(mut self, interval: Duration) -> Self {
        self.status_interval = interval;
        self
    }

    pub fn with_status_polling(mut self, enabled: bool) -> Self {
        self.status_polling = enabled;
        self
    }
}
