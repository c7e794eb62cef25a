//! Requests without fields.

use crate::codec::ensure_struct_size;
use crate::domain::{ConnectionContext, DecodeResult, RequestMessage};
use bw_01_packstream::{PackstreamBuf, StructHeader};

fn empty(header: StructHeader, message: RequestMessage) -> DecodeResult<RequestMessage> {
    ensure_struct_size(header, 0)?;
    Ok(message)
}

pub fn decode_goodbye(
    _: &ConnectionContext,
    _: &mut PackstreamBuf,
    header: StructHeader,
) -> DecodeResult<RequestMessage> {
    empty(header, RequestMessage::Goodbye)
}

pub fn decode_reset(
    _: &ConnectionContext,
    _: &mut PackstreamBuf,
    header: StructHeader,
) -> DecodeResult<RequestMessage> {
    empty(header, RequestMessage::Reset)
}

pub fn decode_commit(
    _: &ConnectionContext,
    _: &mut PackstreamBuf,
    header: StructHeader,
) -> DecodeResult<RequestMessage> {
    empty(header, RequestMessage::Commit)
}

pub fn decode_rollback(
    _: &ConnectionContext,
    _: &mut PackstreamBuf,
    header: StructHeader,
) -> DecodeResult<RequestMessage> {
    empty(header, RequestMessage::Rollback)
}

/// LOGOFF carries nothing; the buffer is never touched.
pub fn decode_logoff(
    _: &ConnectionContext,
    _: &mut PackstreamBuf,
    header: StructHeader,
) -> DecodeResult<RequestMessage> {
    empty(header, RequestMessage::Logoff)
}
