//! Real-time websocket configuration.

use serde::{Deserialize, Serialize};

/// WebSocket engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Per-connection outbound buffer size.
    #[serde(default = "default_buffer")]
    pub channel_buffer_size: usize,
    /// Capacity of the push-event queue between HTTP handlers and the
    /// websocket registry.
    #[serde(default = "default_queue")]
    pub event_queue_size: usize,
    /// Maximum simultaneous connections per user.
    #[serde(default = "default_max_per_user")]
    pub max_connections_per_user: usize,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            channel_buffer_size: default_buffer(),
            event_queue_size: default_queue(),
            max_connections_per_user: default_max_per_user(),
        }
    }
}

fn default_buffer() -> usize {
    64
}

fn default_queue() -> usize {
    1024
}

fn default_max_per_user() -> usize {
    8
}
