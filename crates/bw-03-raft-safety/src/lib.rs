//! # bw-03-raft-safety
//!
//! Raft state model for checking cluster safety in simulations.
//!
//! ## Flow
//!
//! ```text
//! role handler ──Outcome──→ ClusterState::apply ──→ ComparableRaftState::update
//!                                                     │ scalars, then log commands
//!                                                     ↓
//!                                          safety::violations(&cluster)
//! ```
//!
//! Each member owns its state and log; the cluster keeps roles separately.
//! Applying an outcome is not atomic: a failing log command leaves the
//! earlier changes of that outcome in place.
//!
//! ## Usage
//!
//! ```rust
//! use bw_03_raft_safety::{safety, ClusterState, MemberId, Outcome, Role};
//!
//! let (a, b) = (MemberId::random(), MemberId::random());
//! let mut cluster = ClusterState::new([a, b]);
//!
//! for member in [a, b] {
//!     let outcome = Outcome::new(Role::Follower, cluster.state(member).unwrap())
//!         .with_next_role(Role::Leader)
//!         .with_term(1);
//!     cluster.apply(member, &outcome).unwrap();
//! }
//!
//! assert!(safety::multiple_leaders_in_same_term(&cluster));
//! ```

pub mod cluster;
pub mod domain;
pub mod metrics;
pub mod safety;

// Re-export main types
pub use cluster::ClusterState;
pub use domain::*;
pub use safety::{SafetyReport, Violation};
