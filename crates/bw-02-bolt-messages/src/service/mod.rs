//! Bolt message decoding service.
//!
//! Entry point for callers holding a dechunked request: reads the struct
//! header, picks the registry for the connection's protocol revision and
//! dispatches to the matching decoder. Every outcome is logged and
//! recorded in the decoder metrics.

use crate::domain::{ConnectionContext, DecodeError, DecodeResult, RequestMessage};
use crate::metrics;
use crate::registry::MessageRegistries;
use bw_01_packstream::{PackstreamBuf, PackstreamConfig, ReaderError};
use std::time::Instant;
use tracing::{debug, warn};

/// Stateless request decoder, shareable between connections.
#[derive(Clone, Debug)]
pub struct BoltMessageDecoder<'r> {
    registries: &'r MessageRegistries,
    config: PackstreamConfig,
}

impl BoltMessageDecoder<'static> {
    /// Decoder over the built-in registries with default limits.
    pub fn new() -> Self {
        Self::with_registries(MessageRegistries::global())
    }
}

impl Default for BoltMessageDecoder<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'r> BoltMessageDecoder<'r> {
    pub fn with_registries(registries: &'r MessageRegistries) -> Self {
        Self {
            registries,
            config: PackstreamConfig::default(),
        }
    }

    /// Limits applied by [`BoltMessageDecoder::decode_bytes`].
    pub fn with_config(mut self, config: PackstreamConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &PackstreamConfig {
        &self.config
    }

    /// Decodes the next request from `buf`.
    ///
    /// On failure the buffer position is unspecified; callers are
    /// expected to drop the rest of the message.
    pub fn decode(
        &self,
        ctx: &ConnectionContext,
        buf: &mut PackstreamBuf,
    ) -> DecodeResult<RequestMessage> {
        let start = Instant::now();
        let header = buf.peek_struct_header().ok();
        let result = self.dispatch(ctx, buf);
        metrics::record_decode_latency(start.elapsed().as_secs_f64());

        match &result {
            Ok(message) => {
                debug!(
                    version = %ctx.version,
                    message = message.name(),
                    tag = message.tag(),
                    fields = header.map(|h| h.length),
                    "Decoded request"
                );
                metrics::record_message_decoded(message.name());
            }
            Err(e) => {
                warn!(
                    version = %ctx.version,
                    tag = header.map(|h| h.tag),
                    reason = e.label(),
                    field = e.field().unwrap_or("-"),
                    error = %e,
                    "Rejected request"
                );
                metrics::record_message_rejected(e.label());
            }
        }
        result
    }

    /// Decodes a complete request; trailing bytes are an error.
    pub fn decode_bytes(
        &self,
        ctx: &ConnectionContext,
        bytes: &[u8],
    ) -> DecodeResult<RequestMessage> {
        let mut buf = PackstreamBuf::wrap(bytes);
        buf.set_config(self.config.clone());

        let message = self.decode(ctx, &mut buf)?;
        if !buf.is_empty() {
            let err = DecodeError::from(ReaderError::Malformed(format!(
                "{} unexpected bytes after {} message",
                buf.remaining(),
                message.name()
            )));
            warn!(version = %ctx.version, reason = err.label(), error = %err, "Rejected request");
            metrics::record_message_rejected(err.label());
            return Err(err);
        }
        Ok(message)
    }

    fn dispatch(
        &self,
        ctx: &ConnectionContext,
        buf: &mut PackstreamBuf,
    ) -> DecodeResult<RequestMessage> {
        let registry = self.registries.for_version(ctx.version)?;
        buf.read_struct(ctx, registry)
    }
}
