//! Error types for the Packstream codec.
//!
//! Every read failure maps onto one of three kinds: an unexpected value
//! type, an exceeded size limit, or a generically malformed structure.
//! The buffer position after a failed read is undefined; callers treat the
//! error as terminal for the value (or message) being decoded.

use crate::marker::{Type, TypeMarker};
use thiserror::Error;

/// Coarse classification of reader failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReaderErrorKind {
    /// A marker did not match the requested type.
    UnexpectedType,
    /// A declared length (or nesting depth) exceeded its configured maximum.
    LimitExceeded,
    /// Anything else: truncated input, unknown struct tags, bad UTF-8.
    Malformed,
}

/// Errors raised while reading Packstream values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReaderError {
    #[error("Unexpected type: Expected {expected} but got {actual}")]
    UnexpectedType { expected: Type, actual: Type },

    #[error("Unexpected type marker: Expected {expected:?} but got {actual:?}")]
    UnexpectedTypeMarker {
        expected: TypeMarker,
        actual: TypeMarker,
    },

    #[error("Value of size {actual} exceeded limit of {limit}")]
    LimitExceeded { limit: u64, actual: u64 },

    #[error("Value nesting exceeded limit of {limit} levels")]
    DepthExceeded { limit: usize },

    #[error("Unexpected struct tag: 0x{tag:02X}")]
    UnexpectedStruct { tag: u8, length: u64 },

    #[error("Unexpected end of input: {needed} bytes required but only {remaining} remaining")]
    Truncated { needed: usize, remaining: usize },

    #[error("Duplicate map key: \"{0}\"")]
    DuplicateMapKey(String),

    #[error("String value contains invalid UTF-8")]
    InvalidUtf8,

    #[error("{0}")]
    Malformed(String),
}

impl ReaderError {
    /// Classifies this error into one of the three reader failure kinds.
    pub fn kind(&self) -> ReaderErrorKind {
        match self {
            Self::UnexpectedType { .. } | Self::UnexpectedTypeMarker { .. } => {
                ReaderErrorKind::UnexpectedType
            }
            Self::LimitExceeded { .. } | Self::DepthExceeded { .. } => {
                ReaderErrorKind::LimitExceeded
            }
            Self::UnexpectedStruct { .. }
            | Self::Truncated { .. }
            | Self::DuplicateMapKey(_)
            | Self::InvalidUtf8
            | Self::Malformed(_) => ReaderErrorKind::Malformed,
        }
    }

    /// Short, stable label used for metrics and log fields.
    pub fn label(&self) -> &'static str {
        match self {
            Self::UnexpectedType { .. } => "unexpected_type",
            Self::UnexpectedTypeMarker { .. } => "unexpected_marker",
            Self::LimitExceeded { .. } => "limit_exceeded",
            Self::DepthExceeded { .. } => "depth_exceeded",
            Self::UnexpectedStruct { .. } => "unexpected_struct",
            Self::Truncated { .. } => "truncated",
            Self::DuplicateMapKey(_) => "duplicate_key",
            Self::InvalidUtf8 => "invalid_utf8",
            Self::Malformed(_) => "malformed",
        }
    }
}

/// Errors raised while writing Packstream values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WriterError {
    #[error("Length {length} exceeds the maximum encodable length of {max} for {type_}")]
    LengthOutOfRange { type_: Type, length: u64, max: u64 },

    #[error("Struct with {fields} fields exceeds the maximum of {max}")]
    StructTooLarge { fields: u64, max: u64 },
}

/// Result type for read operations.
pub type ReaderResult<T> = Result<T, ReaderError>;

/// Result type for write operations.
pub type WriterResult<T> = Result<T, WriterError>;
