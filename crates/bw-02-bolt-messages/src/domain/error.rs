//! Error types for message decoding.

use super::ProtocolVersion;
use bw_01_packstream::ReaderError;
use thiserror::Error;

/// Errors raised while decoding a single request.
///
/// All of them are terminal for the message being decoded. Whether the
/// connection survives is up to the caller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    /// Malformed wire data, including unknown struct tags.
    #[error(transparent)]
    Reader(#[from] ReaderError),

    #[error("Illegal struct size: Expected struct to be {expected} fields but got {actual}")]
    IllegalStructSize { expected: u64, actual: u64 },

    #[error("Illegal value for field \"{field}\": {reason}")]
    IllegalStructArgument {
        field: String,
        reason: String,
        #[source]
        source: Option<ReaderError>,
    },

    #[error("Unsupported protocol version: {0}")]
    UnsupportedVersion(ProtocolVersion),
}

/// Result type for decode operations.
pub type DecodeResult<T> = Result<T, DecodeError>;

impl DecodeError {
    pub fn illegal_argument(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::IllegalStructArgument {
            field: field.into(),
            reason: reason.into(),
            source: None,
        }
    }

    /// Wraps a reader failure that occurred while reading `field`.
    pub fn illegal_argument_caused_by(field: impl Into<String>, cause: ReaderError) -> Self {
        Self::IllegalStructArgument {
            field: field.into(),
            reason: cause.to_string(),
            source: Some(cause),
        }
    }

    /// Field named by an [`DecodeError::IllegalStructArgument`].
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::IllegalStructArgument { field, .. } => Some(field),
            _ => None,
        }
    }

    /// Short, stable label used for metrics and log fields.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Reader(ReaderError::UnexpectedStruct { .. }) => "unknown_struct",
            Self::Reader(e) => e.label(),
            Self::IllegalStructSize { .. } => "illegal_size",
            Self::IllegalStructArgument { .. } => "illegal_argument",
            Self::UnsupportedVersion(_) => "unsupported_version",
        }
    }
}
