//! Cache of recently appended entries.
//!
//! Lets a leader ship entries to followers without reading them back from
//! the log. Disabled until [`InFlightCache::enable`] is called; while
//! disabled every operation is a no-op.

use super::RaftLogEntry;
use std::collections::BTreeMap;

/// Default maximum number of cached entries.
pub const DEFAULT_IN_FLIGHT_ENTRIES: usize = 1024;

#[derive(Clone, Debug)]
pub struct InFlightCache {
    enabled: bool,
    max_entries: usize,
    entries: BTreeMap<i64, RaftLogEntry>,
}

impl InFlightCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            enabled: false,
            max_entries,
            entries: BTreeMap::new(),
        }
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Caches `entry`, evicting the lowest indices beyond capacity.
    pub fn put(&mut self, index: i64, entry: RaftLogEntry) {
        if !self.enabled {
            return;
        }
        self.entries.insert(index, entry);
        while self.entries.len() > self.max_entries {
            self.entries.pop_first();
        }
    }

    pub fn get(&self, index: i64) -> Option<&RaftLogEntry> {
        self.entries.get(&index)
    }

    /// Drops `from_index` and everything after it.
    pub fn truncate(&mut self, from_index: i64) {
        self.entries.split_off(&from_index);
    }

    /// Drops everything up to and including `up_to_index`.
    pub fn prune(&mut self, up_to_index: i64) {
        self.entries = self.entries.split_off(&(up_to_index + 1));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for InFlightCache {
    fn default() -> Self {
        Self::new(DEFAULT_IN_FLIGHT_ENTRIES)
    }
}
