//! Protocol versions and negotiated connection features.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Bolt protocol version as agreed during the handshake.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProtocolVersion {
    pub major: u8,
    pub minor: u8,
}

impl ProtocolVersion {
    pub const V4_4: Self = Self::new(4, 4);
    pub const V5_0: Self = Self::new(5, 0);
    pub const V5_1: Self = Self::new(5, 1);
    pub const V5_2: Self = Self::new(5, 2);
    pub const V5_3: Self = Self::new(5, 3);
    pub const V5_4: Self = Self::new(5, 4);

    /// Every version a decoder registry exists for, oldest first.
    pub const SUPPORTED: [Self; 6] = [
        Self::V4_4,
        Self::V5_0,
        Self::V5_1,
        Self::V5_2,
        Self::V5_3,
        Self::V5_4,
    ];

    pub const fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }

    pub fn is_supported(&self) -> bool {
        Self::SUPPORTED.contains(self)
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for ProtocolVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (major, minor) = s
            .trim()
            .split_once('.')
            .ok_or_else(|| format!("Invalid protocol version '{s}': expected <major>.<minor>"))?;
        let major = major
            .parse()
            .map_err(|_| format!("Invalid major version in '{s}'"))?;
        let minor = minor
            .parse()
            .map_err(|_| format!("Invalid minor version in '{s}'"))?;
        Ok(Self::new(major, minor))
    }
}

/// Optional protocol features a 4.4 client may request through `patch_bolt`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Feature {
    /// Date-time values are transmitted in UTC
    UtcDateTime,
}

impl Feature {
    pub const ALL: [Feature; 1] = [Feature::UtcDateTime];

    /// Identifier used on the wire.
    pub fn id(&self) -> &'static str {
        match self {
            Self::UtcDateTime => "utc",
        }
    }

    /// Matches a wire identifier case-sensitively.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.id() == id)
    }
}

/// Per-connection state the decoders consult.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectionContext {
    pub version: ProtocolVersion,
    pub features: BTreeSet<Feature>,
}

impl ConnectionContext {
    pub fn new(version: ProtocolVersion) -> Self {
        Self {
            version,
            features: BTreeSet::new(),
        }
    }

    pub fn with_feature(mut self, feature: Feature) -> Self {
        self.features.insert(feature);
        self
    }

    pub fn has_feature(&self, feature: Feature) -> bool {
        self.features.contains(&feature)
    }

    /// Whether date-time structs use the UTC encoding.
    ///
    /// Always the case from 5.0 on; 4.4 connections opt in via `patch_bolt`.
    pub fn utc_date_time(&self) -> bool {
        self.version >= ProtocolVersion::V5_0 || self.has_feature(Feature::UtcDateTime)
    }
}
