//! # bw-01-packstream
//!
//! Packstream binary codec for the Bolt protocol.
//!
//! ## Wire Format
//!
//! Every value starts with a one-byte marker identifying its type and,
//! for sized types, either the length itself (low nibble) or the width of
//! a big-endian length prefix that follows:
//!
//! ```text
//! 0x00-0x7F, 0xF0-0xFF   tiny int (marker is the value)
//! 0x80 | n               string, n < 16 bytes      D0/D1/D2: u8/u16/u32 length
//! 0x90 | n               list, n < 16 elements     D4/D5/D6
//! 0xA0 | n               map, n < 16 entries       D8/D9/DA
//! 0xB0 | n, tag          struct with n fields
//! C0 null   C1 float64   C2 false   C3 true
//! C8/C9/CA/CB            int8/16/32/64
//! CC/CD/CE               bytes with u8/u16/u32 length
//! ```
//!
//! Everything else is reserved and rejected on read.
//!
//! ## Structs
//!
//! Struct payloads are opaque to the codec. A [`StructRegistry`] maps tags
//! to typed readers; higher layers build one registry per protocol
//! revision and share it between connections.
//!
//! ## Limits
//!
//! [`PackstreamConfig`] bounds declared lengths and nesting depth. Limits
//! are enforced on the declared length before any payload is allocated.
//!
//! ## Usage
//!
//! ```rust
//! use bw_01_packstream::{PackstreamBuf, Value};
//!
//! let mut buf = PackstreamBuf::new();
//! buf.write_string("hello").unwrap();
//! buf.write_int(42);
//!
//! assert_eq!(buf.read_value().unwrap(), Value::from("hello"));
//! assert_eq!(buf.read_int().unwrap(), 42);
//! ```

pub mod buf;
pub mod config;
pub mod error;
pub mod map;
pub mod marker;
pub mod struct_registry;
pub mod value;

// Re-export main types
pub use buf::PackstreamBuf;
pub use config::PackstreamConfig;
pub use error::{ReaderError, ReaderErrorKind, ReaderResult, WriterError, WriterResult};
pub use map::OrderedMap;
pub use marker::{LengthPrefix, Type, TypeMarker};
pub use struct_registry::{StructHeader, StructReader, StructRegistry, StructRegistryBuilder};
pub use value::{StructValue, Value, ValueMap};
