//! Domain types for Bolt request decoding.

mod auth;
mod error;
mod message;
mod notifications;
mod routing;
mod values;
mod version;

pub use auth::*;
pub use error::*;
pub use message::*;
pub use notifications::*;
pub use routing::*;
pub use values::*;
pub use version::*;
