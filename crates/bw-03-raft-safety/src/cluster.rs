//! Roles and states of every member of a simulated cluster.

use crate::domain::{ComparableRaftState, MemberId, Outcome, RaftLogError, RaftLogResult, Role};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

#[derive(Clone, Debug, PartialEq)]
pub struct ClusterState {
    roles: BTreeMap<MemberId, Role>,
    states: BTreeMap<MemberId, ComparableRaftState>,
}

impl ClusterState {
    /// Every member starts as a follower with fresh state; all of them vote.
    pub fn new(members: impl IntoIterator<Item = MemberId>) -> Self {
        let voting: BTreeSet<MemberId> = members.into_iter().collect();
        let roles = voting.iter().map(|m| (*m, Role::Follower)).collect();
        let states = voting
            .iter()
            .map(|m| (*m, ComparableRaftState::new(*m, voting.clone())))
            .collect();
        Self { roles, states }
    }

    /// Applies `outcome` to `member`'s state and moves it to the outcome's
    /// next role.
    ///
    /// The role is only changed once every log command succeeded.
    pub fn apply(&mut self, member: MemberId, outcome: &Outcome) -> RaftLogResult<()> {
        let state = self
            .states
            .get_mut(&member)
            .ok_or(RaftLogError::UnknownMember(member))?;
        state.update(outcome)?;

        let role = self.roles.entry(member).or_default();
        if *role != outcome.next_role() {
            debug!(
                member = %member,
                from = %role,
                to = %outcome.next_role(),
                term = outcome.term(),
                "Role change"
            );
            *role = outcome.next_role();
        }
        Ok(())
    }

    pub fn members(&self) -> impl Iterator<Item = MemberId> + '_ {
        self.states.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn role(&self, member: MemberId) -> Option<Role> {
        self.roles.get(&member).copied()
    }

    pub fn state(&self, member: MemberId) -> Option<&ComparableRaftState> {
        self.states.get(&member)
    }

    pub fn roles(&self) -> impl Iterator<Item = (MemberId, Role)> + '_ {
        self.roles.iter().map(|(m, r)| (*m, *r))
    }

    pub fn states(&self) -> impl Iterator<Item = &ComparableRaftState> {
        self.states.values()
    }
}
