//! # Simulated Raft Rounds
//!
//! Drives a small cluster through elections and replication by producing
//! outcomes the way role handlers would, and checks the cluster after
//! every round.

#[cfg(test)]
mod tests {
    use bw_03_raft_safety::{
        safety, ClusterState, MemberId, Outcome, RaftLogCommand, RaftLogEntry, ReadableRaftState,
        Role, SafetyReport, Violation,
    };
    use rand::seq::SliceRandom;
    use rand::Rng;
    use std::collections::BTreeSet;

    // =============================================================================
    // SIMULATION HELPERS
    // =============================================================================

    struct Simulation {
        members: Vec<MemberId>,
        cluster: ClusterState,
        term: u64,
    }

    impl Simulation {
        fn new(size: usize) -> Self {
            let members: Vec<MemberId> = (0..size).map(|_| MemberId::random()).collect();
            let cluster = ClusterState::new(members.iter().copied());
            Self {
                members,
                cluster,
                term: 0,
            }
        }

        fn outcome(&self, member: MemberId) -> Outcome {
            Outcome::new(
                self.cluster.role(member).unwrap(),
                self.cluster.state(member).unwrap(),
            )
        }

        /// `leader` wins an election; everyone else follows it.
        fn elect(&mut self, leader: MemberId) {
            self.term += 1;
            let voters: BTreeSet<MemberId> = self.members.iter().copied().collect();
            for member in self.members.clone() {
                let role = if member == leader {
                    Role::Leader
                } else {
                    Role::Follower
                };
                let mut outcome = self
                    .outcome(member)
                    .with_next_role(role)
                    .with_term(self.term)
                    .with_leader(Some(leader))
                    .with_voted_for(Some(leader));
                if member == leader {
                    outcome = outcome.with_votes_for_me(voters.clone());
                }
                self.cluster.apply(member, &outcome).unwrap();
            }
        }

        /// The leader replicates one entry to every member and commits it.
        fn replicate(&mut self, leader: MemberId, content: &str) {
            let state = self.cluster.state(leader).unwrap();
            let index = state.entry_log().append_index() + 1;
            let entry = RaftLogEntry::new(self.term, content);

            for member in self.members.clone() {
                let outcome = self
                    .outcome(member)
                    .with_commit_index(index)
                    .with_log_command(RaftLogCommand::Append {
                        index,
                        entry: entry.clone(),
                    });
                self.cluster.apply(member, &outcome).unwrap();
            }
        }
    }

    // =============================================================================
    // HEALTHY CLUSTERS
    // =============================================================================

    #[test]
    fn test_healthy_rounds_stay_safe() {
        let mut rng = rand::thread_rng();
        let mut sim = Simulation::new(5);

        for round in 0..20 {
            if round % 5 == 0 {
                let leader = *sim.members.choose(&mut rng).unwrap();
                sim.elect(leader);
            }
            let leader = sim
                .cluster
                .roles()
                .find(|(_, role)| *role == Role::Leader)
                .map(|(member, _)| member)
                .unwrap();
            for i in 0..rng.gen_range(1..4) {
                sim.replicate(leader, &format!("round-{round}-{i}"));
            }

            assert!(safety::violations(&sim.cluster).unwrap().is_empty());
        }

        let committed: Vec<i64> = sim.cluster.states().map(|s| s.commit_index()).collect();
        assert!(committed.iter().all(|c| *c == committed[0]));
        assert!(committed[0] >= 19);
    }

    // =============================================================================
    // FAULTS
    // =============================================================================

    #[test]
    fn test_split_brain_detected() {
        bw_telemetry::metrics::register_metrics().unwrap();
        let violations_before = bw_telemetry::metrics::RAFT_SAFETY_VIOLATIONS
            .with_label_values(&["multiple_leaders"])
            .get();

        let mut sim = Simulation::new(3);
        let (a, b) = (sim.members[0], sim.members[1]);
        sim.elect(a);

        // b believes it won the same term
        let outcome = sim
            .outcome(b)
            .with_next_role(Role::Leader)
            .with_leader(Some(b));
        sim.cluster.apply(b, &outcome).unwrap();

        let report = SafetyReport::check(&sim.cluster).unwrap();
        assert_eq!(report.violations, BTreeSet::from([Violation::MultipleLeaders]));
        assert!(report.to_json().unwrap().contains("MULTIPLE_LEADERS"));

        let violations_after = bw_telemetry::metrics::RAFT_SAFETY_VIOLATIONS
            .with_label_values(&["multiple_leaders"])
            .get();
        assert!(violations_after > violations_before);
        assert!(bw_telemetry::metrics::encode_metrics()
            .unwrap()
            .contains("bw_raft_safety_violations_total"));
    }

    #[test]
    fn test_diverged_commit_detected() {
        let mut sim = Simulation::new(2);
        let (a, b) = (sim.members[0], sim.members[1]);
        sim.elect(a);
        sim.replicate(a, "shared");

        for (member, content) in [(a, "left"), (b, "right")] {
            let outcome = sim
                .outcome(member)
                .with_commit_index(1)
                .with_log_command(RaftLogCommand::Append {
                    index: 1,
                    entry: RaftLogEntry::new(1, content),
                });
            sim.cluster.apply(member, &outcome).unwrap();
        }

        assert_eq!(
            safety::violations(&sim.cluster).unwrap(),
            BTreeSet::from([Violation::DivergedLog])
        );
    }

    #[test]
    fn test_follower_conflict_resolution_is_safe() {
        let mut sim = Simulation::new(2);
        let (a, b) = (sim.members[0], sim.members[1]);
        sim.elect(a);
        sim.replicate(a, "committed");

        // b holds an uncommitted conflicting entry, then truncates and
        // takes the leader's
        let stray = sim.outcome(b).with_log_command(RaftLogCommand::Append {
            index: 1,
            entry: RaftLogEntry::new(1, "stray"),
        });
        sim.cluster.apply(b, &stray).unwrap();
        assert!(safety::violations(&sim.cluster).unwrap().is_empty());

        let fix = sim
            .outcome(b)
            .with_log_command(RaftLogCommand::Truncate { from_index: 1 });
        sim.cluster.apply(b, &fix).unwrap();
        sim.replicate(a, "next");

        assert!(safety::violations(&sim.cluster).unwrap().is_empty());
        assert_eq!(
            sim.cluster.state(b).unwrap().entry_log().read_entry(1).unwrap(),
            Some(RaftLogEntry::new(1, "next"))
        );
    }
}
