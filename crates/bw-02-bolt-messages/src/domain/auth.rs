//! Authentication tokens carried by LOGON (and HELLO before 5.1).

use super::{AnyMap, AnyValue};
use bytes::Bytes;
use std::fmt;

pub const SCHEME_KEY: &str = "scheme";
pub const PRINCIPAL_KEY: &str = "principal";
pub const CREDENTIALS_KEY: &str = "credentials";

const REDACTED: &str = "******";

/// Key/value pairs presented for authentication.
///
/// `credentials` is always held as bytes. The [`fmt::Debug`] output never
/// shows its content.
#[derive(Clone, PartialEq, Default)]
pub struct AuthToken {
    entries: AnyMap,
}

impl AuthToken {
    /// Wraps entries whose `credentials` (if any) have already been
    /// converted to bytes.
    pub(crate) fn from_entries(entries: AnyMap) -> Self {
        Self { entries }
    }

    pub fn scheme(&self) -> Option<&str> {
        self.entries.get(SCHEME_KEY).and_then(AnyValue::as_str)
    }

    pub fn principal(&self) -> Option<&str> {
        self.entries.get(PRINCIPAL_KEY).and_then(AnyValue::as_str)
    }

    pub fn credentials(&self) -> Option<&Bytes> {
        self.entries.get(CREDENTIALS_KEY).and_then(AnyValue::as_bytes)
    }

    pub fn get(&self, key: &str) -> Option<&AnyValue> {
        self.entries.get(key)
    }

    pub fn entries(&self) -> &AnyMap {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (key, value) in self.entries.iter() {
            if key == CREDENTIALS_KEY {
                map.entry(&key, &REDACTED);
            } else {
                map.entry(&key, value);
            }
        }
        map.finish()
    }
}
