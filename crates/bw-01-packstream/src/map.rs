//! Insertion-ordered string-keyed map.
//!
//! Packstream maps are looked up by key but re-encoded in the order their
//! entries were read. Equality ignores entry order.

use std::collections::HashMap;
use std::fmt;

/// Map with unique string keys that remembers insertion order.
#[derive(Clone)]
pub struct OrderedMap<V> {
    entries: Vec<(String, V)>,
    index: HashMap<String, usize>,
}

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// Inserts a value, returning the previous value for the key if any.
    ///
    /// Replacing an existing key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        if let Some(&position) = self.index.get(&key) {
            return Some(std::mem::replace(&mut self.entries[position].1, value));
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, value));
        None
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        match self.index.get(key) {
            Some(&i) => Some(&mut self.entries[i].1),
            None => None,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Removes an entry, shifting later entries down by one.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let position = self.index.remove(key)?;
        let (_, value) = self.entries.remove(position);
        for slot in self.index.values_mut() {
            if *slot > position {
                *slot -= 1;
            }
        }
        Some(value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: PartialEq> PartialEq for OrderedMap<V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(k, v)| other.get(k).map_or(false, |o| o == v))
    }
}

impl<V: fmt::Debug> fmt::Debug for OrderedMap<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<V> IntoIterator for OrderedMap<V> {
    type Item = (String, V);
    type IntoIter = std::vec::IntoIter<(String, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for OrderedMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_preserved() {
        let map: OrderedMap<i32> = [("b", 1), ("a", 2), ("c", 3)].into_iter().collect();
        let keys: Vec<_> = map.keys().collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut map = OrderedMap::new();
        map.insert("x", 1);
        map.insert("y", 2);
        assert_eq!(map.insert("x", 3), Some(1));
        assert_eq!(map.iter().next(), Some(("x", &3)));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_remove_reindexes() {
        let mut map: OrderedMap<i32> = [("a", 1), ("b", 2), ("c", 3)].into_iter().collect();
        assert_eq!(map.remove("a"), Some(1));
        assert_eq!(map.get("c"), Some(&3));
        assert_eq!(map.get("b"), Some(&2));
        assert!(!map.contains_key("a"));
    }

    #[test]
    fn test_equality_ignores_order() {
        let a: OrderedMap<i32> = [("a", 1), ("b", 2)].into_iter().collect();
        let b: OrderedMap<i32> = [("b", 2), ("a", 1)].into_iter().collect();
        let c: OrderedMap<i32> = [("b", 2), ("a", 3)].into_iter().collect();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
