//! Typed access to entries of decoded metadata maps.
//!
//! Every failure names the offending key through
//! [`DecodeError::IllegalStructArgument`].

use crate::domain::{AnyMap, AnyValue, DecodeError, DecodeResult};
use bw_01_packstream::{OrderedMap, Value};

pub const EXPECTED_NON_NULL: &str = "Expected value to be non-null";
pub const EXPECTED_STRING: &str = "Expected string";
pub const EXPECTED_INTEGER: &str = "Expected integer";
pub const EXPECTED_MAP: &str = "Expected map";
pub const EXPECTED_STRING_LIST: &str = "Expected list of strings";
pub const EXPECTED_STRING_MAP: &str = "Must be a map with string keys and string values.";

/// Looks up `key`, treating an explicit null the same as absence.
pub fn non_null<'a>(map: &'a AnyMap, key: &str) -> Option<&'a AnyValue> {
    map.get(key).filter(|v| !v.is_null())
}

pub fn required_string(map: &AnyMap, key: &str) -> DecodeResult<String> {
    let value = non_null(map, key)
        .ok_or_else(|| DecodeError::illegal_argument(key, EXPECTED_NON_NULL))?;
    value
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| DecodeError::illegal_argument(key, EXPECTED_STRING))
}

pub fn optional_string(map: &AnyMap, key: &str) -> DecodeResult<Option<String>> {
    non_null(map, key)
        .map(|v| {
            v.as_str()
                .map(str::to_owned)
                .ok_or_else(|| DecodeError::illegal_argument(key, EXPECTED_STRING))
        })
        .transpose()
}

pub fn optional_int(map: &AnyMap, key: &str) -> DecodeResult<Option<i64>> {
    non_null(map, key)
        .map(|v| {
            v.as_int()
                .ok_or_else(|| DecodeError::illegal_argument(key, EXPECTED_INTEGER))
        })
        .transpose()
}

pub fn optional_map<'a>(map: &'a AnyMap, key: &str) -> DecodeResult<Option<&'a AnyMap>> {
    non_null(map, key)
        .map(|v| {
            v.as_map()
                .ok_or_else(|| DecodeError::illegal_argument(key, EXPECTED_MAP))
        })
        .transpose()
}

/// List of strings, empty when absent.
pub fn optional_string_list(map: &AnyMap, key: &str) -> DecodeResult<Vec<String>> {
    match non_null(map, key) {
        None => Ok(Vec::new()),
        Some(value) => string_list(value, key),
    }
}

/// Converts a value that must be a list of strings.
pub fn string_list(value: &AnyValue, field: &str) -> DecodeResult<Vec<String>> {
    let items = value
        .as_list()
        .ok_or_else(|| DecodeError::illegal_argument(field, EXPECTED_STRING_LIST))?;
    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_owned)
                .ok_or_else(|| DecodeError::illegal_argument(field, EXPECTED_STRING_LIST))
        })
        .collect()
}

/// Converts a value that must be a map whose values are all strings.
pub fn string_map(value: Option<&AnyValue>, field: &str) -> DecodeResult<OrderedMap<String>> {
    let Some(Value::Map(entries)) = value else {
        return Err(DecodeError::illegal_argument(field, EXPECTED_STRING_MAP));
    };
    entries
        .iter()
        .map(|(k, v)| match v {
            Value::String(s) => Ok((k.to_owned(), s.clone())),
            _ => Err(DecodeError::illegal_argument(field, EXPECTED_STRING_MAP)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta() -> AnyMap {
        let mut map = AnyMap::new();
        map.insert("s", AnyValue::from("value"));
        map.insert("i", AnyValue::from(7));
        map.insert("null", AnyValue::Null);
        map.insert(
            "list",
            AnyValue::from(vec![AnyValue::from("a"), AnyValue::from("b")]),
        );
        map.insert("mixed", AnyValue::from(vec![AnyValue::from("a"), AnyValue::from(1)]));
        map
    }

    #[test]
    fn test_required_string() {
        let meta = meta();
        assert_eq!(required_string(&meta, "s").unwrap(), "value");
        assert_eq!(
            required_string(&meta, "missing").unwrap_err().to_string(),
            "Illegal value for field \"missing\": Expected value to be non-null"
        );
        assert_eq!(
            required_string(&meta, "null").unwrap_err().to_string(),
            "Illegal value for field \"null\": Expected value to be non-null"
        );
        assert_eq!(
            required_string(&meta, "i").unwrap_err().to_string(),
            "Illegal value for field \"i\": Expected string"
        );
    }

    #[test]
    fn test_optional_accessors() {
        let meta = meta();
        assert_eq!(optional_string(&meta, "missing").unwrap(), None);
        assert_eq!(optional_string(&meta, "null").unwrap(), None);
        assert_eq!(optional_int(&meta, "i").unwrap(), Some(7));
        assert!(optional_int(&meta, "s").is_err());
        assert!(optional_map(&meta, "s").is_err());
        assert_eq!(optional_map(&meta, "missing").unwrap(), None);
    }

    #[test]
    fn test_string_lists() {
        let meta = meta();
        assert_eq!(optional_string_list(&meta, "list").unwrap(), vec!["a", "b"]);
        assert!(optional_string_list(&meta, "missing").unwrap().is_empty());
        assert_eq!(
            optional_string_list(&meta, "mixed").unwrap_err().to_string(),
            "Illegal value for field \"mixed\": Expected list of strings"
        );
    }

    #[test]
    fn test_string_map() {
        let mut inner = AnyMap::new();
        inner.insert("product", AnyValue::from("driver/1.0"));
        let value = AnyValue::Map(inner.clone());
        assert_eq!(
            string_map(Some(&value), "agent").unwrap().get("product").map(String::as_str),
            Some("driver/1.0")
        );

        inner.insert("version", AnyValue::from(1));
        let err = string_map(Some(&AnyValue::Map(inner)), "agent").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Illegal value for field \"agent\": Must be a map with string keys and string values."
        );
        assert!(string_map(None, "agent").is_err());
    }
}
