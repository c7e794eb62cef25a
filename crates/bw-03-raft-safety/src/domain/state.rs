//! Per-member Raft state that can be compared across members.

use super::{
    InFlightCache, InMemoryRaftLog, MemberId, Outcome, RaftLog, RaftLogCommand, RaftLogError,
    RaftLogResult, ReadableRaftLog,
};
use std::collections::BTreeSet;
use tracing::trace;

/// Read access to a member's Raft state.
pub trait ReadableRaftState {
    fn myself(&self) -> MemberId;
    fn voting_members(&self) -> &BTreeSet<MemberId>;
    fn term(&self) -> u64;
    fn leader(&self) -> Option<MemberId>;
    fn voted_for(&self) -> Option<MemberId>;
    fn votes_for_me(&self) -> &BTreeSet<MemberId>;
    fn commit_index(&self) -> i64;
    fn entry_log(&self) -> &dyn ReadableRaftLog;
}

/// Raft state of one member, updated only through [`Outcome`]s.
#[derive(Clone, Debug)]
pub struct ComparableRaftState<L = InMemoryRaftLog> {
    myself: MemberId,
    voting_members: BTreeSet<MemberId>,
    term: u64,
    leader: Option<MemberId>,
    voted_for: Option<MemberId>,
    votes_for_me: BTreeSet<MemberId>,
    commit_index: i64,
    entry_log: L,
    in_flight_cache: InFlightCache,
}

impl ComparableRaftState<InMemoryRaftLog> {
    /// Fresh state: term 0, nothing committed, empty in-memory log.
    pub fn new(myself: MemberId, voting_members: BTreeSet<MemberId>) -> Self {
        Self::with_log(myself, voting_members, InMemoryRaftLog::new(), InFlightCache::default())
    }
}

impl<L: RaftLog> ComparableRaftState<L> {
    pub fn with_log(
        myself: MemberId,
        voting_members: BTreeSet<MemberId>,
        entry_log: L,
        in_flight_cache: InFlightCache,
    ) -> Self {
        Self {
            myself,
            voting_members,
            term: 0,
            leader: None,
            voted_for: None,
            votes_for_me: BTreeSet::new(),
            commit_index: -1,
            entry_log,
            in_flight_cache,
        }
    }

    pub fn in_flight_cache(&self) -> &InFlightCache {
        &self.in_flight_cache
    }

    pub fn in_flight_cache_mut(&mut self) -> &mut InFlightCache {
        &mut self.in_flight_cache
    }

    /// Applies `outcome`.
    ///
    /// Scalar fields are copied first, then log commands run in order
    /// against the log and the in-flight cache. The first failing command
    /// stops the update; earlier changes are kept.
    pub fn update(&mut self, outcome: &Outcome) -> RaftLogResult<()> {
        self.term = outcome.term();
        self.voted_for = outcome.voted_for();
        self.leader = outcome.leader();
        self.votes_for_me = outcome.votes_for_me().clone();
        self.commit_index = outcome.commit_index();

        for command in outcome.log_commands() {
            if let RaftLogCommand::Truncate { from_index } = command {
                if *from_index <= self.commit_index {
                    return Err(RaftLogError::TruncateCommitted {
                        from_index: *from_index,
                        commit_index: self.commit_index,
                    });
                }
            }
            command.apply_to_log(&mut self.entry_log)?;
            command.apply_to_cache(&mut self.in_flight_cache);
        }

        trace!(
            member = %self.myself,
            term = self.term,
            commit_index = self.commit_index,
            append_index = self.entry_log.append_index(),
            "Applied outcome"
        );
        Ok(())
    }
}

impl<L: RaftLog> ReadableRaftState for ComparableRaftState<L> {
    fn myself(&self) -> MemberId {
        self.myself
    }

    fn voting_members(&self) -> &BTreeSet<MemberId> {
        &self.voting_members
    }

    fn term(&self) -> u64 {
        self.term
    }

    fn leader(&self) -> Option<MemberId> {
        self.leader
    }

    fn voted_for(&self) -> Option<MemberId> {
        self.voted_for
    }

    fn votes_for_me(&self) -> &BTreeSet<MemberId> {
        &self.votes_for_me
    }

    fn commit_index(&self) -> i64 {
        self.commit_index
    }

    fn entry_log(&self) -> &dyn ReadableRaftLog {
        &self.entry_log
    }
}

/// Two states are equal when their Raft fields and log contents match.
/// The in-flight cache is not part of the comparison.
impl<L: RaftLog> PartialEq for ComparableRaftState<L> {
    fn eq(&self, other: &Self) -> bool {
        self.myself == other.myself
            && self.voting_members == other.voting_members
            && self.term == other.term
            && self.leader == other.leader
            && self.voted_for == other.voted_for
            && self.votes_for_me == other.votes_for_me
            && self.commit_index == other.commit_index
            && same_entries(&self.entry_log, &other.entry_log)
    }
}

fn same_entries(a: &dyn ReadableRaftLog, b: &dyn ReadableRaftLog) -> bool {
    if a.append_index() != b.append_index() || a.prev_index() != b.prev_index() {
        return false;
    }
    (a.prev_index() + 1..=a.append_index()).all(|index| {
        matches!((a.read_entry(index), b.read_entry(index)), (Ok(x), Ok(y)) if x == y)
    })
}
