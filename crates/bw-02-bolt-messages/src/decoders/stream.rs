//! PULL and DISCARD.

use crate::codec::{ensure_struct_size, in_field, optional_int, read_primitive_map};
use crate::domain::{
    AnyMap, ConnectionContext, DecodeError, DecodeResult, RequestMessage, StreamRequest,
    STREAM_ALL,
};
use bw_01_packstream::{PackstreamBuf, StructHeader};

pub const N_KEY: &str = "n";
pub const QID_KEY: &str = "qid";

fn stream_request(meta: &AnyMap) -> DecodeResult<StreamRequest> {
    let n = optional_int(meta, N_KEY)?
        .ok_or_else(|| DecodeError::illegal_argument(N_KEY, "Expecting size to be defined"))?;
    if n != STREAM_ALL && n < 1 {
        return Err(DecodeError::illegal_argument(
            N_KEY,
            format!("Expecting size to be at least 1 or -1 but got: {n}"),
        ));
    }

    let statement_id = optional_int(meta, QID_KEY)?.unwrap_or(STREAM_ALL);
    if statement_id < STREAM_ALL {
        return Err(DecodeError::illegal_argument(
            QID_KEY,
            format!("Expecting statement id to be at least -1 but got: {statement_id}"),
        ));
    }

    Ok(StreamRequest { n, statement_id })
}

fn read_stream_request(
    ctx: &ConnectionContext,
    buf: &mut PackstreamBuf,
    header: StructHeader,
) -> DecodeResult<StreamRequest> {
    ensure_struct_size(header, 1)?;
    let meta = in_field("extra", read_primitive_map(ctx, buf))?;
    stream_request(&meta)
}

pub fn decode_pull(
    ctx: &ConnectionContext,
    buf: &mut PackstreamBuf,
    header: StructHeader,
) -> DecodeResult<RequestMessage> {
    read_stream_request(ctx, buf, header).map(RequestMessage::Pull)
}

pub fn decode_discard(
    ctx: &ConnectionContext,
    buf: &mut PackstreamBuf,
    header: StructHeader,
) -> DecodeResult<RequestMessage> {
    read_stream_request(ctx, buf, header).map(RequestMessage::Discard)
}
