//! Telemetry utilities for request timing and tracing spans.

use std::time::Instant;

/// Guard for timing a dispatched request.
///
/// Records latency under its route label when dropped.
pub struct RequestTimer {
    route: String,
    start: Instant,
}

impl RequestTimer {
    /// Start timing a request.
    pub fn new(route: impl Into<String>) -> Self {
        Self {
            route: route.into(),
            start: Instant::now(),
        }
    }
}

impl Drop for RequestTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        crate::metrics::record_iq(&self.route, duration);
    }
}

/// Standardized span constructors.
pub mod spans {
    use slxmpp_proto::Iq;
    use tracing::{Span, debug_span};

    /// Span for one dispatched IQ.
    pub fn iq(route: &str, iq: &Iq) -> Span {
        let from = iq.from.as_ref().map(ToString::to_string).unwrap_or_default();
        debug_span!("xmpp.iq", route = %route, id = %iq.id, from = %from)
    }
}
