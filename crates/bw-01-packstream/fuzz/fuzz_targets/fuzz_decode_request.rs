//! Fuzz target for Bolt request decoding.
//!
//! Drives arbitrary bytes through every registered protocol revision.
//! Decoding must never panic, and nothing before authentication may
//! decode a value struct.
//!
//! ## Running
//!
//! ```bash
//! cd crates/bw-01-packstream
//! cargo +nightly fuzz run fuzz_decode_request
//! ```

#![no_main]

use bw_02_bolt_messages::{
    AnyValue, BoltMessageDecoder, ConnectionContext, Feature, ProtocolVersion, RequestMessage,
};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, arbitrary::Arbitrary)]
struct FuzzInput {
    /// Index into the supported versions
    version: u8,
    /// Whether the utc patch was negotiated
    utc: bool,
    /// Raw request bytes
    request: Vec<u8>,
}

fn contains_struct(value: &AnyValue) -> bool {
    match value {
        AnyValue::Struct(_) => true,
        AnyValue::List(items) => items.iter().any(contains_struct),
        AnyValue::Map(map) => map.values().any(contains_struct),
        _ => false,
    }
}

fuzz_target!(|input: FuzzInput| {
    let supported = ProtocolVersion::SUPPORTED;
    let version = supported[input.version as usize % supported.len()];
    let mut ctx = ConnectionContext::new(version);
    if input.utc {
        ctx = ctx.with_feature(Feature::UtcDateTime);
    }

    let decoder = BoltMessageDecoder::new();
    match decoder.decode_bytes(&ctx, &input.request) {
        Ok(RequestMessage::Hello(hello)) => {
            if let Some(auth) = hello.auth {
                assert!(!auth.entries().values().any(contains_struct));
            }
        }
        Ok(RequestMessage::Logon(logon)) => {
            assert!(!logon.auth.entries().values().any(contains_struct));
        }
        Ok(_) | Err(_) => {}
    }
});
