//! Session limits configuration.

use serde::Deserialize;

use super::defaults::default_session_queue;

/// Session limits configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Outbound stanzas buffered per session before writes are dropped
    /// (default: 256).
    #[serde(default = "default_session_queue")]
    pub session_queue: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            session_queue: default_session_queue(),
        }
    }
}
