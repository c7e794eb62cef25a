//! Client supplied routing hints.

use bw_01_packstream::OrderedMap;

/// Routing context from HELLO (or ROUTE).
///
/// `enabled` reflects presence of the `routing` key alone: an empty map
/// still enables routing.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct RoutingContext {
    pub enabled: bool,
    pub parameters: OrderedMap<String>,
}

impl RoutingContext {
    pub fn new(enabled: bool, parameters: OrderedMap<String>) -> Self {
        Self {
            enabled,
            parameters,
        }
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).map(String::as_str)
    }
}
