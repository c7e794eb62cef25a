//! # Type Markers
//!
//! Every Packstream value starts with a marker byte which fully determines
//! its type and, for variable-length types, how its length is encoded.
//!
//! ```text
//! 0x00..=0x7F  TINY_INT (positive)      0xC8..=0xCB  INT8 / INT16 / INT32 / INT64
//! 0x80..=0x8F  TINY_STRING (nibble)     0xCC..=0xCE  BYTES8 / BYTES16 / BYTES32
//! 0x90..=0x9F  TINY_LIST (nibble)       0xD0..=0xD2  STRING8 / STRING16 / STRING32
//! 0xA0..=0xAF  TINY_MAP (nibble)        0xD4..=0xD6  LIST8 / LIST16 / LIST32
//! 0xB0..=0xBF  TINY_STRUCT (nibble)     0xD8..=0xDA  MAP8 / MAP16 / MAP32
//! 0xC0 NULL  0xC1 FLOAT64  0xC2 FALSE  0xC3 TRUE
//! 0xF0..=0xFF  TINY_INT (negative)      everything else is RESERVED
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// High level value type as observed through a marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    None,
    Boolean,
    Int,
    Float,
    Bytes,
    String,
    List,
    Map,
    Struct,
    Reserved,
}

impl Type {
    /// Upper-case wire name of the type.
    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Boolean => "BOOLEAN",
            Self::Int => "INT",
            Self::Float => "FLOAT",
            Self::Bytes => "BYTES",
            Self::String => "STRING",
            Self::List => "LIST",
            Self::Map => "MAP",
            Self::Struct => "STRUCT",
            Self::Reserved => "RESERVED",
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How the length of a value follows its marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LengthPrefix {
    /// Fixed-size value, no length.
    None,
    /// Length stored in the low nibble of the marker itself.
    Nibble,
    Uint8,
    Uint16,
    Uint32,
}

impl LengthPrefix {
    /// Number of bytes following the marker which carry the length.
    pub fn encoded_size(&self) -> usize {
        match self {
            Self::None | Self::Nibble => 0,
            Self::Uint8 => 1,
            Self::Uint16 => 2,
            Self::Uint32 => 4,
        }
    }

    /// Largest length representable with this prefix.
    pub fn max_value(&self) -> u64 {
        match self {
            Self::None => 0,
            Self::Nibble => 0x0F,
            Self::Uint8 => u8::MAX as u64,
            Self::Uint16 => u16::MAX as u64,
            Self::Uint32 => u32::MAX as u64,
        }
    }
}

/// Concrete marker encodings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeMarker {
    TinyInt,
    Int8,
    Int16,
    Int32,
    Int64,
    Float64,
    False,
    True,
    Null,
    TinyString,
    String8,
    String16,
    String32,
    Bytes8,
    Bytes16,
    Bytes32,
    TinyList,
    List8,
    List16,
    List32,
    TinyMap,
    Map8,
    Map16,
    Map32,
    TinyStruct,
    Reserved,
}

/// Lowest tiny int value; values in `TINY_INT_MIN..=TINY_INT_MAX` are inlined.
pub const TINY_INT_MIN: i64 = -16;
/// Highest tiny int value.
pub const TINY_INT_MAX: i64 = 127;

impl TypeMarker {
    /// Markers usable for strings, narrowest first.
    pub const STRING_TYPES: [TypeMarker; 4] = [
        TypeMarker::TinyString,
        TypeMarker::String8,
        TypeMarker::String16,
        TypeMarker::String32,
    ];
    /// Markers usable for byte arrays, narrowest first.
    pub const BYTES_TYPES: [TypeMarker; 3] =
        [TypeMarker::Bytes8, TypeMarker::Bytes16, TypeMarker::Bytes32];
    /// Markers usable for lists, narrowest first.
    pub const LIST_TYPES: [TypeMarker; 4] = [
        TypeMarker::TinyList,
        TypeMarker::List8,
        TypeMarker::List16,
        TypeMarker::List32,
    ];
    /// Markers usable for maps, narrowest first.
    pub const MAP_TYPES: [TypeMarker; 4] = [
        TypeMarker::TinyMap,
        TypeMarker::Map8,
        TypeMarker::Map16,
        TypeMarker::Map32,
    ];
    /// Markers usable for structs.
    pub const STRUCT_TYPES: [TypeMarker; 1] = [TypeMarker::TinyStruct];

    /// Resolves a marker byte.
    pub fn from_byte(b: u8) -> Self {
        match b {
            0x00..=0x7F | 0xF0..=0xFF => Self::TinyInt,
            0x80..=0x8F => Self::TinyString,
            0x90..=0x9F => Self::TinyList,
            0xA0..=0xAF => Self::TinyMap,
            0xB0..=0xBF => Self::TinyStruct,
            0xC0 => Self::Null,
            0xC1 => Self::Float64,
            0xC2 => Self::False,
            0xC3 => Self::True,
            0xC8 => Self::Int8,
            0xC9 => Self::Int16,
            0xCA => Self::Int32,
            0xCB => Self::Int64,
            0xCC => Self::Bytes8,
            0xCD => Self::Bytes16,
            0xCE => Self::Bytes32,
            0xD0 => Self::String8,
            0xD1 => Self::String16,
            0xD2 => Self::String32,
            0xD4 => Self::List8,
            0xD5 => Self::List16,
            0xD6 => Self::List32,
            0xD8 => Self::Map8,
            0xD9 => Self::Map16,
            0xDA => Self::Map32,
            _ => Self::Reserved,
        }
    }

    /// Base encoding of this marker (low nibble clear for nibble markers).
    pub fn value(&self) -> u8 {
        match self {
            Self::TinyInt => 0x00,
            Self::TinyString => 0x80,
            Self::TinyList => 0x90,
            Self::TinyMap => 0xA0,
            Self::TinyStruct => 0xB0,
            Self::Null => 0xC0,
            Self::Float64 => 0xC1,
            Self::False => 0xC2,
            Self::True => 0xC3,
            Self::Int8 => 0xC8,
            Self::Int16 => 0xC9,
            Self::Int32 => 0xCA,
            Self::Int64 => 0xCB,
            Self::Bytes8 => 0xCC,
            Self::Bytes16 => 0xCD,
            Self::Bytes32 => 0xCE,
            Self::String8 => 0xD0,
            Self::String16 => 0xD1,
            Self::String32 => 0xD2,
            Self::List8 => 0xD4,
            Self::List16 => 0xD5,
            Self::List32 => 0xD6,
            Self::Map8 => 0xD8,
            Self::Map16 => 0xD9,
            Self::Map32 => 0xDA,
            Self::Reserved => 0xC4,
        }
    }

    /// Value type this marker introduces.
    pub fn type_(&self) -> Type {
        match self {
            Self::TinyInt | Self::Int8 | Self::Int16 | Self::Int32 | Self::Int64 => Type::Int,
            Self::Float64 => Type::Float,
            Self::False | Self::True => Type::Boolean,
            Self::Null => Type::None,
            Self::TinyString | Self::String8 | Self::String16 | Self::String32 => Type::String,
            Self::Bytes8 | Self::Bytes16 | Self::Bytes32 => Type::Bytes,
            Self::TinyList | Self::List8 | Self::List16 | Self::List32 => Type::List,
            Self::TinyMap | Self::Map8 | Self::Map16 | Self::Map32 => Type::Map,
            Self::TinyStruct => Type::Struct,
            Self::Reserved => Type::Reserved,
        }
    }

    /// Length encoding used by this marker.
    pub fn length_prefix(&self) -> LengthPrefix {
        match self {
            Self::TinyString | Self::TinyList | Self::TinyMap | Self::TinyStruct => {
                LengthPrefix::Nibble
            }
            Self::String8 | Self::Bytes8 | Self::List8 | Self::Map8 => LengthPrefix::Uint8,
            Self::String16 | Self::Bytes16 | Self::List16 | Self::Map16 => LengthPrefix::Uint16,
            Self::String32 | Self::Bytes32 | Self::List32 | Self::Map32 => LengthPrefix::Uint32,
            _ => LengthPrefix::None,
        }
    }

    /// Whether the marker stores its length in the low nibble.
    pub fn is_nibble_marker(&self) -> bool {
        self.length_prefix() == LengthPrefix::Nibble
    }
}
