//! # Message Decoders
//!
//! One stateless function per request message and protocol revision, with
//! the signature the struct registry expects:
//! `fn(&ConnectionContext, &mut PackstreamBuf, StructHeader) -> DecodeResult<RequestMessage>`.
//!
//! The struct header has already been consumed; each decoder checks the
//! declared field count before reading anything else. Behaviour that
//! differs between protocol revisions lives in separate functions built
//! from shared parts, never in version checks inside a decoder.

mod auth;
mod hello;
mod notifications;
mod routing;
mod simple;
mod stream;
mod telemetry;
mod transaction;

pub use auth::decode_logon;
pub use hello::{decode_hello_v44, decode_hello_v50, decode_hello_v51, decode_hello_v52, decode_hello_v53};
pub use routing::decode_route;
pub use simple::{decode_commit, decode_goodbye, decode_logoff, decode_reset, decode_rollback};
pub use stream::{decode_discard, decode_pull};
pub use telemetry::decode_telemetry;
pub use transaction::{decode_begin_v44, decode_begin_v52, decode_run_v44, decode_run_v52};

use crate::codec::{ensure_struct_size, in_field, read_primitive_map};
use crate::domain::{AnyMap, ConnectionContext, DecodeResult};
use bw_01_packstream::{PackstreamBuf, StructHeader};

/// Field name attributed to reader failures inside a metadata map.
pub const EXTRA_FIELD: &str = "extra";

/// Checks a single-field struct and reads its metadata map with the
/// restricted reader.
fn read_single_metadata(
    ctx: &ConnectionContext,
    buf: &mut PackstreamBuf,
    header: StructHeader,
) -> DecodeResult<AnyMap> {
    ensure_struct_size(header, 1)?;
    in_field(EXTRA_FIELD, read_primitive_map(ctx, buf))
}
