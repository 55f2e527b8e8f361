//! Default value functions for configuration.

// =============================================================================
// Limits Defaults
// =============================================================================

pub fn default_session_queue() -> usize {
    256
}
