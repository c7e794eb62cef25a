use super::{MemberId, RaftLogCommand, ReadableRaftState, Role};
use std::collections::BTreeSet;

/// State changes computed by a role handler for one member.
///
/// Starts as a copy of the member's current state; the handler then
/// overrides whatever changed. Applied with
/// [`ComparableRaftState::update`](super::ComparableRaftState::update).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outcome {
    next_role: Role,
    term: u64,
    leader: Option<MemberId>,
    voted_for: Option<MemberId>,
    votes_for_me: BTreeSet<MemberId>,
    commit_index: i64,
    log_commands: Vec<RaftLogCommand>,
}

impl Outcome {
    pub fn new<S: ReadableRaftState + ?Sized>(current_role: Role, state: &S) -> Self {
        Self {
            next_role: current_role,
            term: state.term(),
            leader: state.leader(),
            voted_for: state.voted_for(),
            votes_for_me: state.votes_for_me().clone(),
            commit_index: state.commit_index(),
            log_commands: Vec::new(),
        }
    }

    pub fn with_next_role(mut self, role: Role) -> Self {
        self.next_role = role;
        self
    }

    pub fn with_term(mut self, term: u64) -> Self {
        self.term = term;
        self
    }

    pub fn with_leader(mut self, leader: Option<MemberId>) -> Self {
        self.leader = leader;
        self
    }

    pub fn with_voted_for(mut self, voted_for: Option<MemberId>) -> Self {
        self.voted_for = voted_for;
        self
    }

    pub fn with_votes_for_me(mut self, votes: BTreeSet<MemberId>) -> Self {
        self.votes_for_me = votes;
        self
    }

    /// Adds a single vote to the current set.
    pub fn with_vote_for_me(mut self, voter: MemberId) -> Self {
        self.votes_for_me.insert(voter);
        self
    }

    pub fn with_commit_index(mut self, commit_index: i64) -> Self {
        self.commit_index = commit_index;
        self
    }

    pub fn with_log_command(mut self, command: RaftLogCommand) -> Self {
        self.log_commands.push(command);
        self
    }

    pub fn next_role(&self) -> Role {
        self.next_role
    }

    pub fn term(&self) -> u64 {
        self.term
    }

    pub fn leader(&self) -> Option<MemberId> {
        self.leader
    }

    pub fn voted_for(&self) -> Option<MemberId> {
        self.voted_for
    }

    pub fn votes_for_me(&self) -> &BTreeSet<MemberId> {
        &self.votes_for_me
    }

    pub fn commit_index(&self) -> i64 {
        self.commit_index
    }

    pub fn log_commands(&self) -> &[RaftLogCommand] {
        &self.log_commands
    }
}
