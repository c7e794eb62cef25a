//! bw-inspect: decode Bolt requests and Packstream values from hex.
//!
//! ```bash
//! # RESET on Bolt 5.4
//! bw-inspect request B00F
//!
//! # HELLO on 5.1
//! bw-inspect request --bolt 5.1 "B1 01 A1 8A 75 73 65 72 5F 61 67 65 6E 74 81 61"
//!
//! # Any value, structs shown raw
//! bw-inspect value "93 01 02 03"
//! ```
//!
//! Credentials inside decoded auth tokens are printed redacted.

use anyhow::{bail, Context, Result};
use bw_01_packstream::{PackstreamBuf, PackstreamConfig};
use bw_02_bolt_messages::{BoltMessageDecoder, ConnectionContext, Feature, ProtocolVersion};
use bw_telemetry::{init_telemetry, TelemetryConfig};
use clap::{Parser, Subcommand};

/// bw-inspect: Bolt request and Packstream value inspector
#[derive(Parser, Debug)]
#[command(name = "bw-inspect")]
#[command(about = "Decode hex-encoded Bolt requests and Packstream values")]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Print Prometheus metrics after decoding
    #[arg(long)]
    metrics: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode a single Bolt request (a struct, without chunking)
    Request {
        /// Hex bytes; whitespace is ignored
        hex: String,

        /// Negotiated protocol version
        #[arg(long, default_value = "5.4")]
        bolt: ProtocolVersion,

        /// Negotiate the `utc` patch (4.4 only)
        #[arg(long)]
        utc: bool,
    },
    /// Decode a single Packstream value
    Value {
        /// Hex bytes; whitespace is ignored
        hex: String,
    },
}

fn parse_hex(input: &str) -> Result<Vec<u8>> {
    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    hex::decode(&compact).with_context(|| format!("invalid hex input '{input}'"))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let telemetry = TelemetryConfig::for_tool("bw-inspect", &args.log_level);
    init_telemetry(&telemetry).context("failed to initialise telemetry")?;

    let limits = PackstreamConfig::from_env();
    bw_telemetry::log_event!(debug, "bw-inspect", "Packstream limits", ?limits);

    match args.command {
        Command::Request { hex, bolt, utc } => {
            if !bolt.is_supported() {
                bail!(
                    "unsupported protocol version {bolt}; supported: {}",
                    ProtocolVersion::SUPPORTED.map(|v| v.to_string()).join(", ")
                );
            }
            let mut ctx = ConnectionContext::new(bolt);
            if utc {
                ctx = ctx.with_feature(Feature::UtcDateTime);
            }

            let bytes = parse_hex(&hex)?;
            let message = BoltMessageDecoder::new()
                .with_config(limits)
                .decode_bytes(&ctx, &bytes)
                .with_context(|| format!("failed to decode request for Bolt {bolt}"))?;
            println!("{message:#?}");
        }
        Command::Value { hex } => {
            let bytes = parse_hex(&hex)?;
            let mut buf = PackstreamBuf::wrap(&bytes);
            buf.set_config(limits);
            let value = buf.read_value().context("failed to decode value")?;
            println!("{value:#?}");
            if !buf.is_empty() {
                println!("({} trailing bytes)", buf.remaining());
            }
        }
    }

    if args.metrics {
        print!("{}", bw_telemetry::encode_metrics()?);
    }
    Ok(())
}
