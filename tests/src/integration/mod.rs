//! Cross-crate integration tests.

mod bolt_flows;
mod raft_rounds;
