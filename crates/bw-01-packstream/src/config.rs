//! Codec limits.
//!
//! Declared lengths are checked against these limits before any allocation
//! takes place, so a peer cannot force large allocations by announcing
//! oversized strings or collections.

use serde::{Deserialize, Serialize};
use std::env;

/// Limits applied while reading Packstream values.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackstreamConfig {
    /// Maximum string payload in bytes
    pub max_string_length: u64,
    /// Maximum byte array payload in bytes
    pub max_bytes_length: u64,
    /// Maximum number of list elements
    pub max_list_length: u64,
    /// Maximum number of map entries
    pub max_map_length: u64,
    /// Maximum nesting of lists, maps and structs within a single value
    pub max_nesting_depth: usize,
}

impl Default for PackstreamConfig {
    fn default() -> Self {
        Self {
            max_string_length: 16 * 1024 * 1024, // 16 MiB
            max_bytes_length: 16 * 1024 * 1024,
            max_list_length: 1_000_000,
            max_map_length: 1_000_000,
            max_nesting_depth: 64,
        }
    }
}

impl PackstreamConfig {
    /// Configuration without any limit beyond what the wire format can express.
    pub fn unlimited() -> Self {
        Self {
            max_string_length: u64::MAX,
            max_bytes_length: u64::MAX,
            max_list_length: u64::MAX,
            max_map_length: u64::MAX,
            max_nesting_depth: usize::MAX,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `BW_PACKSTREAM_MAX_STRING_LENGTH` (default: 16 MiB)
    /// - `BW_PACKSTREAM_MAX_BYTES_LENGTH` (default: 16 MiB)
    /// - `BW_PACKSTREAM_MAX_LIST_LENGTH` (default: 1,000,000)
    /// - `BW_PACKSTREAM_MAX_MAP_LENGTH` (default: 1,000,000)
    /// - `BW_PACKSTREAM_MAX_NESTING_DEPTH` (default: 64)
    ///
    /// Unparseable values fall back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            max_string_length: env_or("BW_PACKSTREAM_MAX_STRING_LENGTH", defaults.max_string_length),
            max_bytes_length: env_or("BW_PACKSTREAM_MAX_BYTES_LENGTH", defaults.max_bytes_length),
            max_list_length: env_or("BW_PACKSTREAM_MAX_LIST_LENGTH", defaults.max_list_length),
            max_map_length: env_or("BW_PACKSTREAM_MAX_MAP_LENGTH", defaults.max_map_length),
            max_nesting_depth: env_or("BW_PACKSTREAM_MAX_NESTING_DEPTH", defaults.max_nesting_depth),
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
