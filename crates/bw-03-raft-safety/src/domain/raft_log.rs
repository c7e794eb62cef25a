//! Raft log model.
//!
//! Indices start at 0. An empty log has an append index of -1, and
//! `prev_index` is the last index removed by pruning (-1 if none).

use super::{RaftLogError, RaftLogResult};
use serde::{Deserialize, Serialize};

/// A replicated log entry.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RaftLogEntry {
    pub term: u64,
    pub content: String,
}

impl RaftLogEntry {
    pub fn new(term: u64, content: impl Into<String>) -> Self {
        Self {
            term,
            content: content.into(),
        }
    }
}

/// Read access to a Raft log.
pub trait ReadableRaftLog {
    /// Index of the last entry, -1 when nothing was ever appended.
    fn append_index(&self) -> i64;

    /// Last index removed by pruning, -1 when nothing was pruned.
    fn prev_index(&self) -> i64;

    /// Term of the entry at `index`, `None` outside the log.
    fn read_entry_term(&self, index: i64) -> RaftLogResult<Option<u64>>;

    /// Entry at `index`, `None` outside the log.
    fn read_entry(&self, index: i64) -> RaftLogResult<Option<RaftLogEntry>>;
}

/// Mutable Raft log.
pub trait RaftLog: ReadableRaftLog {
    /// Appends entries after the current append index and returns the new
    /// append index.
    fn append(&mut self, entries: &[RaftLogEntry]) -> RaftLogResult<i64>;

    /// Removes `from_index` and every entry after it.
    fn truncate(&mut self, from_index: i64) -> RaftLogResult<()>;

    /// Drops entries up to and including `safe_index`; returns the new
    /// `prev_index`.
    fn prune(&mut self, safe_index: i64) -> RaftLogResult<i64>;
}

/// Log kept entirely in memory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InMemoryRaftLog {
    entries: Vec<RaftLogEntry>,
    prev_index: i64,
}

impl InMemoryRaftLog {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            prev_index: -1,
        }
    }

    fn offset(&self, index: i64) -> Option<usize> {
        if index <= self.prev_index || index > self.append_index() {
            return None;
        }
        usize::try_from(index - self.prev_index - 1).ok()
    }
}

impl Default for InMemoryRaftLog {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadableRaftLog for InMemoryRaftLog {
    fn append_index(&self) -> i64 {
        self.prev_index + self.entries.len() as i64
    }

    fn prev_index(&self) -> i64 {
        self.prev_index
    }

    fn read_entry_term(&self, index: i64) -> RaftLogResult<Option<u64>> {
        Ok(self.read_entry(index)?.map(|e| e.term))
    }

    fn read_entry(&self, index: i64) -> RaftLogResult<Option<RaftLogEntry>> {
        Ok(self.offset(index).map(|i| self.entries[i].clone()))
    }
}

impl RaftLog for InMemoryRaftLog {
    fn append(&mut self, entries: &[RaftLogEntry]) -> RaftLogResult<i64> {
        self.entries.extend_from_slice(entries);
        Ok(self.append_index())
    }

    fn truncate(&mut self, from_index: i64) -> RaftLogResult<()> {
        let append_index = self.append_index();
        if from_index > append_index {
            return Err(RaftLogError::TruncateBeyondEnd {
                from_index,
                append_index,
            });
        }
        let offset = self.offset(from_index).ok_or(RaftLogError::EntryPruned {
            index: from_index,
            prev_index: self.prev_index,
        })?;
        self.entries.truncate(offset);
        Ok(())
    }

    fn prune(&mut self, safe_index: i64) -> RaftLogResult<i64> {
        let safe_index = safe_index.min(self.append_index());
        if safe_index > self.prev_index {
            let count = (safe_index - self.prev_index) as usize;
            self.entries.drain(..count);
            self.prev_index = safe_index;
        }
        Ok(self.prev_index)
    }
}
