//! Routing context parsing and the ROUTE request.

use crate::codec::{
    ensure_struct_size, in_field, optional_string, read_primitive_map, read_value, string_list,
    StructPolicy, EXPECTED_MAP,
};
use crate::domain::{
    AnyMap, AnyValue, ConnectionContext, DecodeError, DecodeResult, RequestMessage,
    RouteMessage, RoutingContext,
};
use bw_01_packstream::{OrderedMap, PackstreamBuf, StructHeader};

pub const ROUTING_KEY: &str = "routing";

/// Flattens routing parameters into strings.
///
/// Strings are kept, other scalars are rendered with their natural text
/// form and null entries are dropped. Lists, maps and structs have no
/// meaningful routing interpretation and are rejected.
pub(crate) fn routing_parameters(entries: &AnyMap, field: &str) -> DecodeResult<OrderedMap<String>> {
    let mut parameters = OrderedMap::with_capacity(entries.len());
    for (key, value) in entries.iter() {
        let text = match value {
            AnyValue::Null => continue,
            AnyValue::String(s) => s.clone(),
            AnyValue::Boolean(b) => b.to_string(),
            AnyValue::Int(i) => i.to_string(),
            AnyValue::Float(f) => f.to_string(),
            _ => {
                return Err(DecodeError::illegal_argument(
                    field,
                    format!("Expected routing parameter '{key}' to be a scalar value"),
                ))
            }
        };
        parameters.insert(key, text);
    }
    Ok(parameters)
}

/// Reads the optional `routing` entry of a HELLO metadata map.
///
/// Presence alone enables routing, even with no parameters.
pub(crate) fn routing_context(meta: &AnyMap) -> DecodeResult<RoutingContext> {
    match meta.get(ROUTING_KEY) {
        None | Some(AnyValue::Null) => Ok(RoutingContext::disabled()),
        Some(AnyValue::Map(entries)) => Ok(RoutingContext::new(
            true,
            routing_parameters(entries, ROUTING_KEY)?,
        )),
        Some(_) => Err(DecodeError::illegal_argument(ROUTING_KEY, EXPECTED_MAP)),
    }
}

/// ROUTE: routing map, bookmark list and a `{db, imp_user}` map.
pub fn decode_route(
    ctx: &ConnectionContext,
    buf: &mut PackstreamBuf,
    header: StructHeader,
) -> DecodeResult<RequestMessage> {
    ensure_struct_size(header, 3)?;

    let routing = in_field(ROUTING_KEY, read_primitive_map(ctx, buf))?;
    let routing = RoutingContext::new(true, routing_parameters(&routing, ROUTING_KEY)?);

    let bookmarks = in_field("bookmarks", read_value(ctx, buf, StructPolicy::Forbidden))?;
    let bookmarks = match bookmarks {
        AnyValue::Null => Vec::new(),
        value => string_list(&value, "bookmarks")?,
    };

    let extra = in_field("extra", read_value(ctx, buf, StructPolicy::Forbidden))?;
    let (database, impersonated_user) = match extra {
        AnyValue::Null => (None, None),
        AnyValue::Map(map) => (optional_string(&map, "db")?, optional_string(&map, "imp_user")?),
        _ => return Err(DecodeError::illegal_argument("extra", EXPECTED_MAP)),
    };

    Ok(RequestMessage::Route(RouteMessage {
        routing,
        bookmarks,
        database,
        impersonated_user,
    }))
}
