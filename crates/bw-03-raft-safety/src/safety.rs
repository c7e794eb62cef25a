//! # Cluster Safety Checks
//!
//! Pure checks over a [`ClusterState`] snapshot:
//!
//! - **Election safety**: at most one leader per term
//! - **Log safety**: members agree on every entry any of them committed
//!
//! Meant for simulation and test tooling, after all outcomes of a round
//! have been applied.

use crate::cluster::ClusterState;
use crate::domain::{MemberId, RaftLogEntry, RaftLogResult, ReadableRaftState, Role};
use crate::metrics;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

/// A broken Raft safety property.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Violation {
    DivergedLog,
    MultipleLeaders,
}

impl Violation {
    /// Metric label.
    pub fn label(&self) -> &'static str {
        match self {
            Violation::DivergedLog => "diverged_log",
            Violation::MultipleLeaders => "multiple_leaders",
        }
    }
}

/// True when two distinct members lead in the same term.
pub fn multiple_leaders_in_same_term(cluster: &ClusterState) -> bool {
    let mut leaders: BTreeMap<u64, MemberId> = BTreeMap::new();
    for (member, role) in cluster.roles() {
        if role != Role::Leader {
            continue;
        }
        let Some(state) = cluster.state(member) else {
            continue;
        };
        match leaders.get(&state.term()) {
            Some(other) if *other != member => return true,
            _ => {
                leaders.insert(state.term(), member);
            }
        }
    }
    false
}

/// True when members disagree on an entry that at least one of them has
/// committed.
///
/// Walks indices from 0 upwards. At each index, the entries of every
/// member whose commit index covers it must be equal. The walk stops once
/// no member has committed beyond the current index.
pub fn inconsistent_committed_log_entries(cluster: &ClusterState) -> RaftLogResult<bool> {
    let mut index = 0;
    loop {
        let mut expected: Option<RaftLogEntry> = None;
        let mut more_committed = false;

        for state in cluster.states() {
            if state.commit_index() >= index {
                if let Some(entry) = state.entry_log().read_entry(index)? {
                    match &expected {
                        None => expected = Some(entry),
                        Some(first) if *first != entry => return Ok(true),
                        Some(_) => {}
                    }
                }
            }
            more_committed |= state.commit_index() > index;
        }

        if !more_committed {
            return Ok(false);
        }
        index += 1;
    }
}

/// Every violation present in `cluster`.
pub fn violations(cluster: &ClusterState) -> RaftLogResult<BTreeSet<Violation>> {
    metrics::record_safety_check();

    let mut found = BTreeSet::new();
    if inconsistent_committed_log_entries(cluster)? {
        found.insert(Violation::DivergedLog);
    }
    if multiple_leaders_in_same_term(cluster) {
        found.insert(Violation::MultipleLeaders);
    }

    for violation in &found {
        warn!(violation = violation.label(), members = cluster.len(), "Cluster safety violation");
        metrics::record_violation(violation.label());
    }
    Ok(found)
}

/// Per-member summary included in a [`SafetyReport`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberSummary {
    pub member: MemberId,
    pub role: Role,
    pub term: u64,
    pub commit_index: i64,
    pub append_index: i64,
}

/// Serialisable result of a safety check.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyReport {
    pub violations: BTreeSet<Violation>,
    pub members: Vec<MemberSummary>,
}

impl SafetyReport {
    pub fn check(cluster: &ClusterState) -> RaftLogResult<Self> {
        let violations = violations(cluster)?;
        let members = cluster
            .roles()
            .filter_map(|(member, role)| {
                cluster.state(member).map(|state| MemberSummary {
                    member,
                    role,
                    term: state.term(),
                    commit_index: state.commit_index(),
                    append_index: state.entry_log().append_index(),
                })
            })
            .collect();
        Ok(Self {
            violations,
            members,
        })
    }

    pub fn is_safe(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
