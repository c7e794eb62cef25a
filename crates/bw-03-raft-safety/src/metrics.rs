//! # Safety Check Metrics
//!
//! Enable with the `metrics` feature:
//! ```toml
//! bw-03-raft-safety = { path = "...", features = ["metrics"] }
//! ```
//!
//! ## Metrics Exported
//!
//! - `bw_raft_safety_checks_total` - Counter of safety checks run
//! - `bw_raft_safety_violations_total` - Counter of violations found (by kind)

#[cfg(feature = "metrics")]
use bw_telemetry::metrics::{RAFT_SAFETY_CHECKS, RAFT_SAFETY_VIOLATIONS};

/// Record a safety check
#[cfg(feature = "metrics")]
pub fn record_safety_check() {
    RAFT_SAFETY_CHECKS.inc();
}

/// Record a violation by kind
#[cfg(feature = "metrics")]
pub fn record_violation(violation: &str) {
    RAFT_SAFETY_VIOLATIONS.with_label_values(&[violation]).inc();
}

// No-op implementations when metrics feature is disabled
#[cfg(not(feature = "metrics"))]
pub fn record_safety_check() {}

#[cfg(not(feature = "metrics"))]
pub fn record_violation(_violation: &str) {}
