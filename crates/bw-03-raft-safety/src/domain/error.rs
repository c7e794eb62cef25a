//! Error types for Raft log manipulation.

use super::MemberId;
use thiserror::Error;

/// Errors raised while applying log commands or outcomes.
///
/// None of them are retried; an outcome whose command fails is left
/// partially applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RaftLogError {
    #[error("Non-contiguous append: expected index {expected}, got {actual}")]
    NonContiguousAppend { expected: i64, actual: i64 },

    #[error("Cannot truncate from index {from_index}: entries up to {commit_index} are committed")]
    TruncateCommitted { from_index: i64, commit_index: i64 },

    #[error("Cannot truncate from index {from_index}: log ends at {append_index}")]
    TruncateBeyondEnd { from_index: i64, append_index: i64 },

    #[error("Entry {index} has been pruned (log starts after {prev_index})")]
    EntryPruned { index: i64, prev_index: i64 },

    #[error("Unknown member: {0}")]
    UnknownMember(MemberId),

    #[error("Log I/O error: {0}")]
    Io(String),
}

/// Result type for log operations.
pub type RaftLogResult<T> = Result<T, RaftLogError>;
