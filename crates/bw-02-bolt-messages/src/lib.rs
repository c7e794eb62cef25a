//! # bw-02-bolt-messages
//!
//! Bolt request decoding on top of the Packstream codec.
//!
//! ## Architecture
//!
//! ```text
//! bytes ──→ [BoltMessageDecoder] ──struct header──→ [MessageRegistry for version]
//!                                                          │ tag
//!                                                          ↓
//!                                                  decode_xxx(ctx, buf, header)
//!                                                          │
//!                                                          ↓
//!                                                   RequestMessage
//! ```
//!
//! Decoders are stateless functions. Ordering between messages (HELLO
//! before LOGON before RUN) is enforced by the session layer, not here.
//!
//! ## Security
//!
//! - HELLO, LOGON and every metadata map are read with
//!   [`StructPolicy::Forbidden`]: a struct anywhere in them fails the read
//! - `credentials` are stored as bytes and never printed by `Debug`
//! - All declared lengths are bounded by [`bw_01_packstream::PackstreamConfig`]
//!
//! ## Usage
//!
//! ```rust
//! use bw_01_packstream::{PackstreamBuf, StructHeader};
//! use bw_02_bolt_messages::{tag, BoltMessageDecoder, ConnectionContext, ProtocolVersion};
//!
//! let mut buf = PackstreamBuf::new();
//! buf.write_struct_header(StructHeader::new(0, tag::RESET)).unwrap();
//!
//! let ctx = ConnectionContext::new(ProtocolVersion::V5_4);
//! let message = BoltMessageDecoder::new().decode(&ctx, &mut buf).unwrap();
//! assert_eq!(message.name(), "RESET");
//! ```

pub mod codec;
pub mod decoders;
pub mod domain;
pub mod metrics;
pub mod registry;
pub mod service;

// Re-export main types
pub use codec::{
    legacy_value_structs, read_map, read_primitive_map, read_value, utc_value_structs,
    value_structs, StructPolicy, ValueStructRegistry,
};
pub use domain::*;
pub use registry::{MessageRegistries, MessageRegistry};
pub use service::BoltMessageDecoder;
