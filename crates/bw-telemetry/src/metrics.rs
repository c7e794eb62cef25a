//! Prometheus metrics for Boltwire.
//!
//! All metrics follow the naming convention: `bw_<component>_<metric>_<unit>`
//!
//! The statics are created lazily and live in a dedicated [`REGISTRY`];
//! [`register_metrics`] adds them to it so that [`encode_metrics`] exports
//! them. Recording works whether or not they were registered.

use lazy_static::lazy_static;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // BOLT MESSAGE METRICS
    // =========================================================================

    /// Requests successfully decoded, by message name
    pub static ref BOLT_MESSAGES_DECODED: IntCounterVec = IntCounterVec::new(
        Opts::new("bw_bolt_messages_decoded_total", "Total Bolt requests decoded"),
        &["message"]
    ).expect("metric creation failed");

    /// Requests rejected during decoding, by reason
    pub static ref BOLT_MESSAGES_REJECTED: IntCounterVec = IntCounterVec::new(
        Opts::new("bw_bolt_messages_rejected_total", "Total Bolt requests rejected"),
        &["reason"]  // reason: unknown_struct/illegal_size/illegal_argument/<reader label>
    ).expect("metric creation failed");

    /// Decode duration histogram
    pub static ref BOLT_DECODE_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "bw_bolt_decode_duration_seconds",
            "Time spent decoding a single Bolt request"
        ).buckets(vec![0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05])
    ).expect("metric creation failed");

    // =========================================================================
    // RAFT SAFETY METRICS
    // =========================================================================

    /// Safety checks performed
    pub static ref RAFT_SAFETY_CHECKS: IntCounter = IntCounter::new(
        "bw_raft_safety_checks_total",
        "Total cluster safety checks performed"
    ).expect("metric creation failed");

    /// Safety violations found, by kind
    pub static ref RAFT_SAFETY_VIOLATIONS: IntCounterVec = IntCounterVec::new(
        Opts::new("bw_raft_safety_violations_total", "Total cluster safety violations detected"),
        &["violation"]  // violation: diverged_log/multiple_leaders
    ).expect("metric creation failed");
}

/// Register all metrics with the global registry.
///
/// Calling this more than once is harmless.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Bolt messages
        Box::new(BOLT_MESSAGES_DECODED.clone()),
        Box::new(BOLT_MESSAGES_REJECTED.clone()),
        Box::new(BOLT_DECODE_DURATION.clone()),
        // Raft safety
        Box::new(RAFT_SAFETY_CHECKS.clone()),
        Box::new(RAFT_SAFETY_VIOLATIONS.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }
    Ok(())
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}
