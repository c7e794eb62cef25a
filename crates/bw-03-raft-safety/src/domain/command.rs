use super::{InFlightCache, RaftLog, RaftLogEntry, RaftLogError, RaftLogResult};
use serde::{Deserialize, Serialize};

/// A change to a member's log, emitted as part of an outcome.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RaftLogCommand {
    /// Append one entry at `index`
    Append { index: i64, entry: RaftLogEntry },
    /// Append entries starting at `base_index`
    BatchAppend {
        base_index: i64,
        entries: Vec<RaftLogEntry>,
    },
    /// Remove `from_index` and everything after it
    Truncate { from_index: i64 },
    /// Drop entries up to and including `prune_index`
    Prune { prune_index: i64 },
}

impl RaftLogCommand {
    pub fn apply_to_log<L: RaftLog + ?Sized>(&self, log: &mut L) -> RaftLogResult<()> {
        match self {
            Self::Append { index, entry } => {
                ensure_contiguous(log, *index)?;
                log.append(std::slice::from_ref(entry))?;
            }
            Self::BatchAppend {
                base_index,
                entries,
            } => {
                ensure_contiguous(log, *base_index)?;
                log.append(entries)?;
            }
            Self::Truncate { from_index } => log.truncate(*from_index)?,
            Self::Prune { prune_index } => {
                log.prune(*prune_index)?;
            }
        }
        Ok(())
    }

    pub fn apply_to_cache(&self, cache: &mut InFlightCache) {
        match self {
            Self::Append { index, entry } => cache.put(*index, entry.clone()),
            Self::BatchAppend {
                base_index,
                entries,
            } => {
                for (index, entry) in (*base_index..).zip(entries) {
                    cache.put(index, entry.clone());
                }
            }
            Self::Truncate { from_index } => cache.truncate(*from_index),
            Self::Prune { prune_index } => cache.prune(*prune_index),
        }
    }
}

fn ensure_contiguous<L: RaftLog + ?Sized>(log: &L, index: i64) -> RaftLogResult<()> {
    let expected = log.append_index() + 1;
    if index != expected {
        return Err(RaftLogError::NonContiguousAppend {
            expected,
            actual: index,
        });
    }
    Ok(())
}
