//! TELEMETRY (5.4+): which driver API submitted the following work.

use crate::codec::{ensure_struct_size, in_field};
use crate::domain::{ConnectionContext, DecodeError, DecodeResult, DriverInterface, RequestMessage};
use bw_01_packstream::{PackstreamBuf, StructHeader};

pub const API_FIELD: &str = "api";

pub fn decode_telemetry(
    _: &ConnectionContext,
    buf: &mut PackstreamBuf,
    header: StructHeader,
) -> DecodeResult<RequestMessage> {
    ensure_struct_size(header, 1)?;
    let api = in_field(API_FIELD, buf.read_int().map_err(DecodeError::from))?;
    let interface = DriverInterface::from_id(api).ok_or_else(|| {
        DecodeError::illegal_argument(API_FIELD, format!("Unknown driver interface type {api}"))
    })?;
    Ok(RequestMessage::Telemetry(interface))
}
