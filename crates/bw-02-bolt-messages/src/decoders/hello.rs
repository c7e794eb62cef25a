//! HELLO, one decoder per protocol revision.
//!
//! | Version | Differences |
//! |---------|-------------|
//! | 4.4 | authentication token inline, `patch_bolt` features |
//! | 5.0 | no `patch_bolt` |
//! | 5.1 | authentication moved to LOGON |
//! | 5.2 | notification filters |
//! | 5.3 | `bolt_agent` required |
//!
//! Features requested through `patch_bolt` are reported in the message;
//! recording them on the connection is up to the session layer.

use super::auth::auth_token;
use super::notifications::{
    notifications_config, DISABLED_CATEGORIES_KEY, DISABLED_CLASSIFICATIONS_KEY,
    MINIMUM_SEVERITY_KEY,
};
use super::read_single_metadata;
use super::routing::{routing_context, ROUTING_KEY};
use crate::codec::{non_null, required_string, string_list, string_map};
use crate::domain::{
    AnyMap, AuthToken, BoltAgent, ConnectionContext, DecodeError, DecodeResult, Feature, HelloMessage,
    NotificationsConfig, RequestMessage,
};
use bw_01_packstream::{PackstreamBuf, StructHeader};
use tracing::trace;

pub const USER_AGENT_KEY: &str = "user_agent";
pub const BOLT_AGENT_KEY: &str = "bolt_agent";
pub const PATCH_BOLT_KEY: &str = "patch_bolt";

/// Keys that configure the connection rather than authenticate it.
const CONNECTION_KEYS: [&str; 7] = [
    USER_AGENT_KEY,
    BOLT_AGENT_KEY,
    ROUTING_KEY,
    PATCH_BOLT_KEY,
    MINIMUM_SEVERITY_KEY,
    DISABLED_CLASSIFICATIONS_KEY,
    DISABLED_CATEGORIES_KEY,
];

/// Parts every revision shares: `user_agent` and `routing`.
fn base_hello(meta: &AnyMap) -> DecodeResult<HelloMessage> {
    Ok(HelloMessage {
        user_agent: required_string(meta, USER_AGENT_KEY)?,
        bolt_agent: None,
        routing: routing_context(meta)?,
        notifications: NotificationsConfig::Default,
        features: Vec::new(),
        auth: None,
    })
}

/// Requested features, ignoring identifiers this server does not know.
fn patch_bolt(meta: &AnyMap) -> DecodeResult<Vec<Feature>> {
    let Some(value) = non_null(meta, PATCH_BOLT_KEY) else {
        return Ok(Vec::new());
    };

    let mut features = Vec::new();
    for id in string_list(value, PATCH_BOLT_KEY)? {
        match Feature::from_id(&id) {
            Some(feature) if !features.contains(&feature) => features.push(feature),
            Some(_) => {}
            None => trace!(feature = %id, "Ignoring unknown patch_bolt feature"),
        }
    }
    Ok(features)
}

/// Authentication entries: everything but the connection keys.
fn inline_auth(meta: &AnyMap) -> DecodeResult<AuthToken> {
    let entries: AnyMap = meta
        .iter()
        .filter(|(key, _)| !CONNECTION_KEYS.contains(key))
        .map(|(key, value)| (key, value.clone()))
        .collect();
    auth_token(entries)
}

fn bolt_agent(meta: &AnyMap) -> DecodeResult<BoltAgent> {
    let mut entries = string_map(meta.get(BOLT_AGENT_KEY), BOLT_AGENT_KEY)?;
    let product = entries.remove("product").ok_or_else(|| {
        DecodeError::illegal_argument(BOLT_AGENT_KEY, "Expected map to contain key: 'product'.")
    })?;

    Ok(BoltAgent {
        product,
        platform: entries.remove("platform"),
        language: entries.remove("language"),
        language_details: entries.remove("language_details"),
    })
}

pub fn decode_hello_v44(
    ctx: &ConnectionContext,
    buf: &mut PackstreamBuf,
    header: StructHeader,
) -> DecodeResult<RequestMessage> {
    let meta = read_single_metadata(ctx, buf, header)?;
    let mut hello = base_hello(&meta)?;
    hello.features = patch_bolt(&meta)?;
    hello.auth = Some(inline_auth(&meta)?);
    Ok(RequestMessage::Hello(hello))
}

pub fn decode_hello_v50(
    ctx: &ConnectionContext,
    buf: &mut PackstreamBuf,
    header: StructHeader,
) -> DecodeResult<RequestMessage> {
    let meta = read_single_metadata(ctx, buf, header)?;
    let mut hello = base_hello(&meta)?;
    hello.auth = Some(inline_auth(&meta)?);
    Ok(RequestMessage::Hello(hello))
}

pub fn decode_hello_v51(
    ctx: &ConnectionContext,
    buf: &mut PackstreamBuf,
    header: StructHeader,
) -> DecodeResult<RequestMessage> {
    let meta = read_single_metadata(ctx, buf, header)?;
    Ok(RequestMessage::Hello(base_hello(&meta)?))
}

pub fn decode_hello_v52(
    ctx: &ConnectionContext,
    buf: &mut PackstreamBuf,
    header: StructHeader,
) -> DecodeResult<RequestMessage> {
    let meta = read_single_metadata(ctx, buf, header)?;
    let mut hello = base_hello(&meta)?;
    hello.notifications = notifications_config(&meta)?;
    Ok(RequestMessage::Hello(hello))
}

pub fn decode_hello_v53(
    ctx: &ConnectionContext,
    buf: &mut PackstreamBuf,
    header: StructHeader,
) -> DecodeResult<RequestMessage> {
    let meta = read_single_metadata(ctx, buf, header)?;
    let mut hello = base_hello(&meta)?;
    hello.bolt_agent = Some(bolt_agent(&meta)?);
    hello.notifications = notifications_config(&meta)?;
    Ok(RequestMessage::Hello(hello))
}
