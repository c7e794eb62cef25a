//! Notification filter parsing for HELLO, BEGIN and RUN (5.2+).

use crate::codec::{non_null, optional_string, string_list};
use crate::domain::{AnyMap, Classification, DecodeError, DecodeResult, NotificationsConfig, Severity};

pub const MINIMUM_SEVERITY_KEY: &str = "notifications_minimum_severity";
pub const DISABLED_CLASSIFICATIONS_KEY: &str = "notifications_disabled_classifications";
/// Name of the classification list before it was renamed.
pub const DISABLED_CATEGORIES_KEY: &str = "notifications_disabled_categories";

const SEVERITY_OFF: &str = "OFF";

fn disabled_classifications(meta: &AnyMap) -> DecodeResult<Option<Vec<Classification>>> {
    let mut result: Option<Vec<Classification>> = None;

    for key in [DISABLED_CLASSIFICATIONS_KEY, DISABLED_CATEGORIES_KEY] {
        let Some(value) = non_null(meta, key) else {
            continue;
        };
        let names = string_list(value, key)?;
        let collected = result.get_or_insert_with(Vec::new);
        for name in names {
            let classification = Classification::from_name(&name).ok_or_else(|| {
                DecodeError::illegal_argument(key, format!("Unknown classification: '{name}'"))
            })?;
            if !collected.contains(&classification) {
                collected.push(classification);
            }
        }
    }
    Ok(result)
}

/// Builds the notification configuration from a metadata map.
///
/// Without any of the keys the server default applies. A minimum severity
/// of `OFF` disables notifications whatever else was sent.
pub(crate) fn notifications_config(meta: &AnyMap) -> DecodeResult<NotificationsConfig> {
    let severity = optional_string(meta, MINIMUM_SEVERITY_KEY)?;
    let disabled = disabled_classifications(meta)?;

    match (severity, disabled) {
        (None, None) => Ok(NotificationsConfig::Default),
        (Some(s), _) if s == SEVERITY_OFF => Ok(NotificationsConfig::Disabled),
        (severity, disabled_classifications) => {
            let minimum_severity = severity
                .map(|name| {
                    Severity::from_name(&name).ok_or_else(|| {
                        DecodeError::illegal_argument(
                            MINIMUM_SEVERITY_KEY,
                            format!("Expected one of OFF, WARNING, INFORMATION but got '{name}'"),
                        )
                    })
                })
                .transpose()?;
            Ok(NotificationsConfig::Selective {
                minimum_severity,
                disabled_classifications,
            })
        }
    }
}
