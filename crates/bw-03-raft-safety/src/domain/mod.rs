//! Domain layer for the Raft safety model.

mod command;
mod error;
mod in_flight;
mod member;
mod outcome;
mod raft_log;
mod state;

pub use command::*;
pub use error::*;
pub use in_flight::*;
pub use member::*;
pub use outcome::*;
pub use raft_log::*;
pub use state::*;
