//! # Packstream Buffer
//!
//! [`PackstreamBuf`] wraps a growable byte buffer: reads consume from the
//! front, writes append to the back. Reading is synchronous and never
//! blocks; when not enough bytes have been received the read fails with
//! [`ReaderError::Truncated`] and the transport decides whether to wait for
//! more data or drop the connection.
//!
//! Not thread-safe by itself: one buffer belongs to one connection and is
//! driven by one decode call at a time.

mod read;
mod write;


use crate::config::PackstreamConfig;
use crate::error::{ReaderError, ReaderResult};
use crate::marker::{Type, TypeMarker};
use bytes::{Bytes, BytesMut};

/// Byte buffer with typed Packstream read and write operations.
#[derive(Clone, Debug, Default)]
pub struct PackstreamBuf {
    inner: BytesMut,
    config: PackstreamConfig,
    depth: usize,
}

impl PackstreamBuf {
    /// Creates an empty buffer with default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty buffer with the given limits.
    pub fn with_config(config: PackstreamConfig) -> Self {
        Self {
            inner: BytesMut::new(),
            config,
            depth: 0,
        }
    }

    /// Takes ownership of already received bytes.
    pub fn from_bytes(bytes: impl Into<BytesMut>) -> Self {
        Self {
            inner: bytes.into(),
            config: PackstreamConfig::default(),
            depth: 0,
        }
    }

    /// Copies a slice into a new buffer.
    pub fn wrap(bytes: &[u8]) -> Self {
        Self::from_bytes(BytesMut::from(bytes))
    }

    /// Replaces the limits applied to subsequent reads.
    pub fn set_config(&mut self, config: PackstreamConfig) {
        self.config = config;
    }

    pub fn config(&self) -> &PackstreamConfig {
        &self.config
    }

    /// Appends received bytes to the end of the buffer.
    pub fn extend_from_slice(&mut self, bytes: &[u8]) {
        self.inner.extend_from_slice(bytes);
    }

    /// Number of unread bytes.
    pub fn remaining(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Unread bytes, without consuming them.
    pub fn as_slice(&self) -> &[u8] {
        &self.inner
    }

    /// Freezes the unread bytes into an immutable buffer.
    pub fn freeze(self) -> Bytes {
        self.inner.freeze()
    }

    pub fn into_inner(self) -> BytesMut {
        self.inner
    }

    /// Returns the next marker byte without consuming it.
    pub fn peek_marker_byte(&self) -> ReaderResult<u8> {
        self.inner.first().copied().ok_or(ReaderError::Truncated {
            needed: 1,
            remaining: 0,
        })
    }

    /// Returns the next marker without consuming it.
    pub fn peek_marker(&self) -> ReaderResult<TypeMarker> {
        self.peek_marker_byte().map(TypeMarker::from_byte)
    }

    /// Returns the type of the next value without consuming it.
    pub fn peek_type(&self) -> ReaderResult<Type> {
        self.peek_marker().map(|m| m.type_())
    }

    pub(crate) fn ensure(&self, needed: usize) -> ReaderResult<()> {
        if self.inner.len() < needed {
            return Err(ReaderError::Truncated {
                needed,
                remaining: self.inner.len(),
            });
        }
        Ok(())
    }

    /// Peeks at the next marker and checks its type. Nothing is consumed.
    pub(crate) fn expect_type(&self, expected: Type) -> ReaderResult<(u8, TypeMarker)> {
        let mb = self.peek_marker_byte()?;
        let marker = TypeMarker::from_byte(mb);
        if marker.type_() != expected {
            return Err(ReaderError::UnexpectedType {
                expected,
                actual: marker.type_(),
            });
        }
        Ok((mb, marker))
    }

    /// Upper bound for pre-allocating `declared` elements: every element
    /// occupies at least one byte.
    pub(crate) fn capacity_hint(&self, declared: u64) -> usize {
        declared.min(self.inner.len() as u64) as usize
    }

    /// Runs `f` one nesting level deeper, failing once the configured
    /// maximum depth is reached.
    pub(crate) fn descend<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        E: From<ReaderError>,
        F: FnOnce(&mut Self) -> Result<T, E>,
    {
        if self.depth >= self.config.max_nesting_depth {
            return Err(ReaderError::DepthExceeded {
                limit: self.config.max_nesting_depth,
            }
            .into());
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }
}

impl From<Bytes> for PackstreamBuf {
    fn from(bytes: Bytes) -> Self {
        Self::from_bytes(BytesMut::from(&bytes[..]))
    }
}
