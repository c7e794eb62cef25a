//! Notification filtering requested by the client (5.2+).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lowest severity a client wants to receive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Information,
    Warning,
}

impl Severity {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Information => "INFORMATION",
            Self::Warning => "WARNING",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "INFORMATION" => Some(Self::Information),
            "WARNING" => Some(Self::Warning),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Notification classification (called category before 5.6).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Classification {
    Hint,
    Unrecognized,
    Unsupported,
    Performance,
    Deprecation,
    Security,
    Topology,
    Generic,
    Schema,
}

impl Classification {
    pub const ALL: [Classification; 9] = [
        Self::Hint,
        Self::Unrecognized,
        Self::Unsupported,
        Self::Performance,
        Self::Deprecation,
        Self::Security,
        Self::Topology,
        Self::Generic,
        Self::Schema,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Hint => "HINT",
            Self::Unrecognized => "UNRECOGNIZED",
            Self::Unsupported => "UNSUPPORTED",
            Self::Performance => "PERFORMANCE",
            Self::Deprecation => "DEPRECATION",
            Self::Security => "SECURITY",
            Self::Topology => "TOPOLOGY",
            Self::Generic => "GENERIC",
            Self::Schema => "SCHEMA",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

/// Effective notification configuration for a connection or transaction.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum NotificationsConfig {
    /// Nothing requested; server defaults apply
    #[default]
    Default,
    /// Minimum severity `OFF`: no notifications at all
    Disabled,
    /// Explicit severity and/or disabled classifications
    Selective {
        minimum_severity: Option<Severity>,
        disabled_classifications: Option<Vec<Classification>>,
    },
}

impl NotificationsConfig {
    /// Whether a notification with the given attributes should be sent.
    pub fn allows(&self, severity: Severity, classification: Classification) -> bool {
        match self {
            Self::Default => true,
            Self::Disabled => false,
            Self::Selective {
                minimum_severity,
                disabled_classifications,
            } => {
                let severity_ok = minimum_severity.map_or(true, |min| severity >= min);
                let class_ok = disabled_classifications
                    .as_ref()
                    .map_or(true, |disabled| !disabled.contains(&classification));
                severity_ok && class_ok
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_names() {
        for c in Classification::ALL {
            assert_eq!(Classification::from_name(c.name()), Some(c));
        }
        assert_eq!(Classification::from_name("hint"), None);
    }

    #[test]
    fn test_allows() {
        let config = NotificationsConfig::Selective {
            minimum_severity: Some(Severity::Warning),
            disabled_classifications: Some(vec![Classification::Hint]),
        };
        assert!(config.allows(Severity::Warning, Classification::Performance));
        assert!(!config.allows(Severity::Information, Classification::Performance));
        assert!(!config.allows(Severity::Warning, Classification::Hint));

        assert!(NotificationsConfig::Default.allows(Severity::Information, Classification::Hint));
        assert!(!NotificationsConfig::Disabled.allows(Severity::Warning, Classification::Schema));
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Classification::Deprecation).unwrap();
        assert_eq!(json, "\"DEPRECATION\"");
        let severity: Severity = serde_json::from_str("\"WARNING\"").unwrap();
        assert_eq!(severity, Severity::Warning);
    }
}
