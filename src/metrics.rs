//! Prometheus metrics collection for slxmppd.
//!
//! Exposed over HTTP by [`crate::http`].
//!
//! - `xmpp_iq_total{route}` - IQ requests handled per dispatch route
//! - `xmpp_iq_duration_seconds{route}` - Handler latency histogram
//! - `xmpp_iq_errors_total{route,error}` - Failed requests by error code
//! - `xmpp_roster_push_fanout` - Interested sessions per roster push

use prometheus::{
    Encoder, Histogram, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts,
    Registry, TextEncoder,
};
use std::sync::OnceLock;

/// Global Prometheus registry for all metrics.
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::new)
}

// ========================================================================
// Counters
// ========================================================================

/// IQ requests by route.
pub static IQ_COUNTER: OnceLock<IntCounterVec> = OnceLock::new();

/// Failed IQ requests by route and error code.
pub static IQ_ERRORS: OnceLock<IntCounterVec> = OnceLock::new();

/// Roster pushes issued (one per changed item, regardless of fan-out).
pub static ROSTER_PUSHES: OnceLock<IntCounter> = OnceLock::new();

/// Removals that were saved for the requester but not for the contact.
pub static PARTIAL_REMOVALS: OnceLock<IntCounter> = OnceLock::new();

// ========================================================================
// Gauges
// ========================================================================

/// Currently bound sessions.
pub static CONNECTED_SESSIONS: OnceLock<IntGauge> = OnceLock::new();

// ========================================================================
// Histograms
// ========================================================================

/// Handler latency by route.
pub static IQ_LATENCY: OnceLock<HistogramVec> = OnceLock::new();

/// Interested sessions reached by one roster push.
pub static ROSTER_PUSH_FANOUT: OnceLock<Histogram> = OnceLock::new();

/// Initialize the Prometheus metrics registry.
///
/// Call once at startup; recording before `init` is a no-op.
pub fn init() {
    let r = registry();

    macro_rules! register {
        ($metric:ident, $init:expr) => {
            match $init {
                Ok(m) => {
                    if let Err(e) = r.register(Box::new(m.clone())) {
                        tracing::warn!(error = %e, concat!("Failed to register metric ", stringify!($metric)));
                    }
                    let _ = $metric.set(m);
                }
                Err(e) => {
                    tracing::error!(error = %e, concat!("Failed to create metric ", stringify!($metric)));
                }
            }
        };
    }

    register!(IQ_COUNTER, IntCounterVec::new(Opts::new("xmpp_iq_total", "IQ requests handled by route"), &["route"]));
    register!(IQ_LATENCY, HistogramVec::new(
        HistogramOpts::new("xmpp_iq_duration_seconds", "IQ handler latency by route")
            .buckets(vec![0.00005, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5]),
        &["route"]));
    register!(IQ_ERRORS, IntCounterVec::new(Opts::new("xmpp_iq_errors_total", "IQ errors by route and kind"), &["route", "error"]));
    register!(ROSTER_PUSHES, IntCounter::new("xmpp_roster_pushes_total", "Roster pushes issued"));
    register!(ROSTER_PUSH_FANOUT, Histogram::with_opts(
        HistogramOpts::new("xmpp_roster_push_fanout", "Interested sessions per roster push")
            .buckets(vec![0.0, 1.0, 2.0, 3.0, 5.0, 10.0, 25.0])));
    register!(PARTIAL_REMOVALS, IntCounter::new("xmpp_partial_removals_total", "Roster removals persisted for only one account"));
    register!(CONNECTED_SESSIONS, IntGauge::new("xmpp_connected_sessions", "Currently bound sessions"));
}

/// Gather all metrics and encode them in Prometheus text format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = registry().gather();
    let mut buffer = vec![];
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode Prometheus metrics");
        return String::new();
    }
    match String::from_utf8(buffer) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Prometheus metrics were not valid UTF-8");
            String::new()
        }
    }
}

/// Record a handled IQ with its latency.
#[inline]
pub fn record_iq(route: &str, duration_secs: f64) {
    if let Some(c) = IQ_COUNTER.get() {
        c.with_label_values(&[route]).inc();
    }
    if let Some(h) = IQ_LATENCY.get() {
        h.with_label_values(&[route]).observe(duration_secs);
    }
}

/// Record a failed IQ.
#[inline]
pub fn record_iq_error(route: &str, error: &str) {
    if let Some(c) = IQ_ERRORS.get() {
        c.with_label_values(&[route, error]).inc();
    }
}

/// Record one roster push and how many sessions it was sent to.
#[inline]
pub fn record_roster_push(recipients: usize) {
    if let Some(c) = ROSTER_PUSHES.get() {
        c.inc();
    }
    if let Some(h) = ROSTER_PUSH_FANOUT.get() {
        h.observe(recipients as f64);
    }
}

#[inline]
pub fn record_partial_removal() {
    if let Some(c) = PARTIAL_REMOVALS.get() {
        c.inc();
    }
}

#[inline]
pub fn set_connected_sessions(count: usize) {
    if let Some(g) = CONNECTED_SESSIONS.get() {
        g.set(i64::try_from(count).unwrap_or(i64::MAX));
    }
}
