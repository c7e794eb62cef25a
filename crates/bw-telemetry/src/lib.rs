//! # Boltwire Telemetry
//!
//! Logging and metrics shared by the Boltwire crates.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bw_telemetry::{TelemetryConfig, init_telemetry};
//!
//! fn main() {
//!     let config = TelemetryConfig::from_env();
//!     init_telemetry(&config).expect("Failed to init telemetry");
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `BW_SERVICE_NAME` | `boltwire` | Service name in logs |
//! | `BW_LOG_LEVEL` | `info` | Log level filter (`RUST_LOG` wins) |
//! | `BW_JSON_LOGS` | `false` | JSON formatted output |
//! | `BW_CONSOLE_OUTPUT` | `true` | Write logs to stdout |
//! | `BW_METRICS_PORT` | `9100` | Port a host exposes metrics on |

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::init_logging;
pub use metrics::{
    encode_metrics, register_metrics, BOLT_DECODE_DURATION,
    BOLT_MESSAGES_DECODED, BOLT_MESSAGES_REJECTED, RAFT_SAFETY_CHECKS, RAFT_SAFETY_VIOLATIONS,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Register metrics and install the log subscriber.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    // Metrics first, they don't depend on the subscriber
    register_metrics()?;
    init_logging(config)?;

    tracing::info!(
        service = %config.service_name,
        json_logs = config.json_logs,
        metrics_port = config.metrics_port,
        "Telemetry initialized"
    );
    Ok(())
}
