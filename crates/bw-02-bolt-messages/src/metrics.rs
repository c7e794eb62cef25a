//! # Decoder Metrics
//!
//! Records decode outcomes into the shared `bw-telemetry` metrics.
//!
//! ## Usage
//!
//! Enable with the `metrics` feature:
//! ```toml
//! bw-02-bolt-messages = { path = "...", features = ["metrics"] }
//! ```
//!
//! ## Metrics Exported
//!
//! - `bw_bolt_messages_decoded_total` - Requests decoded, by message name
//! - `bw_bolt_messages_rejected_total` - Requests rejected, by reason
//! - `bw_bolt_decode_duration_seconds` - Histogram of decode times

#[cfg(feature = "metrics")]
use bw_telemetry::metrics::{BOLT_DECODE_DURATION, BOLT_MESSAGES_DECODED, BOLT_MESSAGES_REJECTED};

/// Record a successfully decoded request
#[cfg(feature = "metrics")]
pub fn record_message_decoded(message: &str) {
    BOLT_MESSAGES_DECODED.with_label_values(&[message]).inc();
}

/// Record a rejected request with reason
#[cfg(feature = "metrics")]
pub fn record_message_rejected(reason: &str) {
    BOLT_MESSAGES_REJECTED.with_label_values(&[reason]).inc();
}

/// Record decode latency
#[cfg(feature = "metrics")]
pub fn record_decode_latency(seconds: f64) {
    BOLT_DECODE_DURATION.observe(seconds);
}

// No-op implementations when metrics feature is disabled
#[cfg(not(feature = "metrics"))]
pub fn record_message_decoded(_message: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_message_rejected(_reason: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_decode_latency(_seconds: f64) {}
