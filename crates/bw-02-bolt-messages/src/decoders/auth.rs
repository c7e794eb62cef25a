//! LOGON and authentication token extraction.

use super::read_single_metadata;
use crate::codec::{non_null, required_string, EXPECTED_STRING};
use crate::domain::{
    AnyMap, AnyValue, AuthToken, ConnectionContext, DecodeError, DecodeResult, LogonMessage,
    RequestMessage, CREDENTIALS_KEY, PRINCIPAL_KEY, SCHEME_KEY,
};
use bw_01_packstream::{PackstreamBuf, StructHeader};
use bytes::Bytes;

/// Builds an authentication token from the given entries.
///
/// `scheme` is required; `principal` must be a string when given.
/// `credentials` given as a string is converted to its UTF-8 bytes, byte
/// arrays are kept and a null value drops the entry.
pub(crate) fn auth_token(mut entries: AnyMap) -> DecodeResult<AuthToken> {
    required_string(&entries, SCHEME_KEY)?;
    if let Some(principal) = non_null(&entries, PRINCIPAL_KEY) {
        if principal.as_str().is_none() {
            return Err(DecodeError::illegal_argument(PRINCIPAL_KEY, EXPECTED_STRING));
        }
    }

    match entries.remove(CREDENTIALS_KEY) {
        None | Some(AnyValue::Null) => {}
        Some(AnyValue::String(secret)) => {
            entries.insert(CREDENTIALS_KEY, AnyValue::Bytes(Bytes::from(secret.into_bytes())));
        }
        Some(AnyValue::Bytes(secret)) => {
            entries.insert(CREDENTIALS_KEY, AnyValue::Bytes(secret));
        }
        Some(_) => {
            return Err(DecodeError::illegal_argument(
                CREDENTIALS_KEY,
                "Expected string or byte array",
            ))
        }
    }

    Ok(AuthToken::from_entries(entries))
}

/// LOGON (5.1+): a single authentication map.
pub fn decode_logon(
    ctx: &ConnectionContext,
    buf: &mut PackstreamBuf,
    header: StructHeader,
) -> DecodeResult<RequestMessage> {
    let meta = read_single_metadata(ctx, buf, header)?;
    Ok(RequestMessage::Logon(LogonMessage {
        auth: auth_token(meta)?,
    }))
}
