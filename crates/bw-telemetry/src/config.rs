//! Telemetry configuration from environment variables.

use std::env;

/// Configuration for logging and metrics.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name attached to log output
    pub service_name: String,

    /// Log level filter (trace, debug, info, warn, error)
    pub log_level: String,

    /// Whether to enable console output
    pub console_output: bool,

    /// Whether to enable JSON formatted logs
    pub json_logs: bool,

    /// Prometheus metrics port
    pub metrics_port: u16,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "boltwire".to_string(),
            log_level: "info".to_string(),
            console_output: true,
            json_logs: false,
            metrics_port: 9100,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `BW_SERVICE_NAME`: Service name (default: boltwire)
    /// - `BW_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `BW_CONSOLE_OUTPUT`: Enable console output (default: true)
    /// - `BW_JSON_LOGS`: Enable JSON logs (default: false in dev, true in containers)
    /// - `BW_METRICS_PORT`: Prometheus metrics port (default: 9100)
    pub fn from_env() -> Self {
        let is_container =
            env::var("KUBERNETES_SERVICE_HOST").is_ok() || env::var("DOCKER_CONTAINER").is_ok();

        Self {
            service_name: env::var("BW_SERVICE_NAME").unwrap_or_else(|_| "boltwire".to_string()),

            log_level: env::var("BW_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),

            console_output: env::var("BW_CONSOLE_OUTPUT")
                .map(|v| parse_flag(&v))
                .unwrap_or(true),

            json_logs: env::var("BW_JSON_LOGS")
                .map(|v| parse_flag(&v))
                .unwrap_or(is_container),

            metrics_port: env::var("BW_METRICS_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(9100),
        }
    }

    /// Configuration for a command line tool: plain console output only.
    pub fn for_tool(name: &str, log_level: &str) -> Self {
        Self {
            service_name: name.to_string(),
            log_level: log_level.to_string(),
            json_logs: false,
            ..Self::default()
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "yes" | "on")
}
