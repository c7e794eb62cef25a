//! # Message Registries
//!
//! One tag → decoder table per protocol revision. Each revision is derived
//! from its predecessor, replacing or adding only the decoders that
//! changed:
//!
//! | Version | Changes |
//! |---------|---------|
//! | 4.4 | base set |
//! | 5.0 | HELLO without `patch_bolt` |
//! | 5.1 | HELLO without auth, LOGON and LOGOFF |
//! | 5.2 | notification filters in HELLO, BEGIN and RUN |
//! | 5.3 | HELLO requires `bolt_agent` |
//! | 5.4 | TELEMETRY |

use crate::decoders::*;
use crate::domain::{tag, ConnectionContext, DecodeError, DecodeResult, ProtocolVersion, RequestMessage};
use bw_01_packstream::StructRegistry;
use lazy_static::lazy_static;
use std::collections::BTreeMap;

/// Request decoders for a single protocol revision.
pub type MessageRegistry = StructRegistry<ConnectionContext, RequestMessage, DecodeError>;

lazy_static! {
    static ref DEFAULT_REGISTRIES: MessageRegistries = MessageRegistries::new();
}

/// All request registries, keyed by protocol version.
#[derive(Clone, Debug)]
pub struct MessageRegistries {
    by_version: BTreeMap<ProtocolVersion, MessageRegistry>,
}

impl MessageRegistries {
    pub fn new() -> Self {
        let v44 = MessageRegistry::builder()
            .register(tag::HELLO, decode_hello_v44)
            .register(tag::GOODBYE, decode_goodbye)
            .register(tag::RESET, decode_reset)
            .register(tag::RUN, decode_run_v44)
            .register(tag::BEGIN, decode_begin_v44)
            .register(tag::COMMIT, decode_commit)
            .register(tag::ROLLBACK, decode_rollback)
            .register(tag::DISCARD, decode_discard)
            .register(tag::PULL, decode_pull)
            .register(tag::ROUTE, decode_route)
            .build();

        let v50 = v44.to_builder().register(tag::HELLO, decode_hello_v50).build();

        let v51 = v50
            .to_builder()
            .register(tag::HELLO, decode_hello_v51)
            .register(tag::LOGON, decode_logon)
            .register(tag::LOGOFF, decode_logoff)
            .build();

        let v52 = v51
            .to_builder()
            .register(tag::HELLO, decode_hello_v52)
            .register(tag::RUN, decode_run_v52)
            .register(tag::BEGIN, decode_begin_v52)
            .build();

        let v53 = v52.to_builder().register(tag::HELLO, decode_hello_v53).build();

        let v54 = v53
            .to_builder()
            .register(tag::TELEMETRY, decode_telemetry)
            .build();

        let by_version = BTreeMap::from([
            (ProtocolVersion::V4_4, v44),
            (ProtocolVersion::V5_0, v50),
            (ProtocolVersion::V5_1, v51),
            (ProtocolVersion::V5_2, v52),
            (ProtocolVersion::V5_3, v53),
            (ProtocolVersion::V5_4, v54),
        ]);
        Self { by_version }
    }

    /// Shared instance with the built-in registries.
    pub fn global() -> &'static MessageRegistries {
        &DEFAULT_REGISTRIES
    }

    pub fn get(&self, version: ProtocolVersion) -> Option<&MessageRegistry> {
        self.by_version.get(&version)
    }

    /// Registry for `version`, or [`DecodeError::UnsupportedVersion`].
    pub fn for_version(&self, version: ProtocolVersion) -> DecodeResult<&MessageRegistry> {
        self.get(version)
            .ok_or(DecodeError::UnsupportedVersion(version))
    }

    pub fn versions(&self) -> impl Iterator<Item = ProtocolVersion> + '_ {
        self.by_version.keys().copied()
    }
}

impl Default for MessageRegistries {
    fn default() -> Self {
        Self::new()
    }
}
