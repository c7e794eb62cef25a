//! # Value Reading
//!
//! Reads parameter and metadata values on top of the Packstream codec.
//!
//! Whether structs may appear inside a value is decided by a
//! [`StructPolicy`] threaded through every read. Messages exchanged before
//! authentication (HELLO, LOGON) and all metadata maps use
//! [`StructPolicy::Forbidden`]: the first struct marker fails the read, so
//! no struct decoding path is reachable for an unauthenticated peer.
//! Query parameters use the value struct registry of the connection.

mod fields;
mod structs;

pub use fields::*;
pub use structs::*;

use crate::domain::{AnyMap, AnyValue, BoltStruct, ConnectionContext, DecodeError, DecodeResult};
use bw_01_packstream::{PackstreamBuf, ReaderError, StructHeader, StructRegistry};

/// Registry of structs allowed inside values.
pub type ValueStructRegistry = StructRegistry<ConnectionContext, BoltStruct, DecodeError>;

/// Whether structs are accepted while reading a value.
#[derive(Clone, Copy, Debug)]
pub enum StructPolicy<'a> {
    /// Any struct fails the read
    Forbidden,
    /// Structs are decoded through the given registry
    Allowed(&'a ValueStructRegistry),
}

/// Reads a single value of any type.
pub fn read_value(
    ctx: &ConnectionContext,
    buf: &mut PackstreamBuf,
    policy: StructPolicy<'_>,
) -> DecodeResult<AnyValue> {
    buf.read_value_with(&mut |b: &mut PackstreamBuf, header: StructHeader| match policy {
        StructPolicy::Forbidden => Err(DecodeError::from(ReaderError::UnexpectedStruct {
            tag: header.tag,
            length: header.length,
        })),
        StructPolicy::Allowed(registry) => registry.read(ctx, b, header),
    })
}

/// Reads a map of values.
pub fn read_map(
    ctx: &ConnectionContext,
    buf: &mut PackstreamBuf,
    policy: StructPolicy<'_>,
) -> DecodeResult<AnyMap> {
    buf.read_map(|b| read_value(ctx, b, policy))
}

/// Reads a map that may only hold primitive values, lists and maps.
pub fn read_primitive_map(ctx: &ConnectionContext, buf: &mut PackstreamBuf) -> DecodeResult<AnyMap> {
    read_map(ctx, buf, StructPolicy::Forbidden)
}

/// Fails unless a struct declares exactly `expected` fields.
pub fn ensure_struct_size(header: StructHeader, expected: u64) -> DecodeResult<()> {
    if header.length != expected {
        return Err(DecodeError::IllegalStructSize {
            expected,
            actual: header.length,
        });
    }
    Ok(())
}

/// Attributes reader failures to `field`; decoder failures pass through.
pub fn in_field<T>(field: &str, result: DecodeResult<T>) -> DecodeResult<T> {
    result.map_err(|e| match e {
        DecodeError::Reader(cause) => DecodeError::illegal_argument_caused_by(field, cause),
        other => other,
    })
}
