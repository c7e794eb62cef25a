//! Typed Bolt request messages.

use super::{AnyMap, AuthToken, Feature, NotificationsConfig, RoutingContext};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Struct tags of every request message.
pub mod tag {
    pub const HELLO: u8 = 0x01;
    pub const GOODBYE: u8 = 0x02;
    pub const RESET: u8 = 0x0F;
    pub const RUN: u8 = 0x10;
    pub const BEGIN: u8 = 0x11;
    pub const COMMIT: u8 = 0x12;
    pub const ROLLBACK: u8 = 0x13;
    pub const DISCARD: u8 = 0x2F;
    pub const PULL: u8 = 0x3F;
    pub const TELEMETRY: u8 = 0x54;
    pub const ROUTE: u8 = 0x66;
    pub const LOGON: u8 = 0x6A;
    pub const LOGOFF: u8 = 0x6B;
}

/// Client identification sent with HELLO from 5.3 on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoltAgent {
    pub product: String,
    pub platform: Option<String>,
    pub language: Option<String>,
    pub language_details: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct HelloMessage {
    pub user_agent: String,
    /// Present from 5.3 on
    pub bolt_agent: Option<BoltAgent>,
    pub routing: RoutingContext,
    pub notifications: NotificationsConfig,
    /// Features requested via `patch_bolt` (4.4 only)
    pub features: Vec<Feature>,
    /// Authentication before LOGON existed (4.4 and 5.0)
    pub auth: Option<AuthToken>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LogonMessage {
    pub auth: AuthToken,
}

/// Access mode of a transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AccessMode {
    Read,
    #[default]
    Write,
}

/// Transaction level metadata shared by RUN and BEGIN.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct TransactionMetadata {
    pub bookmarks: Vec<String>,
    pub tx_timeout: Option<Duration>,
    pub tx_metadata: Option<AnyMap>,
    pub mode: AccessMode,
    pub database: Option<String>,
    pub impersonated_user: Option<String>,
    /// Only read from 5.2 on
    pub notifications: NotificationsConfig,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RunMessage {
    pub query: String,
    pub parameters: AnyMap,
    pub metadata: TransactionMetadata,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BeginMessage {
    pub metadata: TransactionMetadata,
}

/// Sentinel for "all remaining records" and for "last statement".
pub const STREAM_ALL: i64 = -1;

/// Body of PULL and DISCARD.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StreamRequest {
    /// Number of records, or [`STREAM_ALL`]
    pub n: i64,
    /// Statement id, or [`STREAM_ALL`] for the last one
    pub statement_id: i64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RouteMessage {
    pub routing: RoutingContext,
    pub bookmarks: Vec<String>,
    pub database: Option<String>,
    pub impersonated_user: Option<String>,
}

/// API a driver used to submit work, reported through TELEMETRY.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DriverInterface {
    TransactionFunction,
    UnmanagedTransaction,
    ImplicitTransaction,
    ExecuteQuery,
}

impl DriverInterface {
    pub fn from_id(id: i64) -> Option<Self> {
        match id {
            0 => Some(Self::TransactionFunction),
            1 => Some(Self::UnmanagedTransaction),
            2 => Some(Self::ImplicitTransaction),
            3 => Some(Self::ExecuteQuery),
            _ => None,
        }
    }
}

/// Any decoded request.
#[derive(Clone, Debug, PartialEq)]
pub enum RequestMessage {
    Hello(HelloMessage),
    Logon(LogonMessage),
    Logoff,
    Goodbye,
    Reset,
    Run(RunMessage),
    Begin(BeginMessage),
    Commit,
    Rollback,
    Pull(StreamRequest),
    Discard(StreamRequest),
    Route(RouteMessage),
    Telemetry(DriverInterface),
}

impl RequestMessage {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Hello(_) => "HELLO",
            Self::Logon(_) => "LOGON",
            Self::Logoff => "LOGOFF",
            Self::Goodbye => "GOODBYE",
            Self::Reset => "RESET",
            Self::Run(_) => "RUN",
            Self::Begin(_) => "BEGIN",
            Self::Commit => "COMMIT",
            Self::Rollback => "ROLLBACK",
            Self::Pull(_) => "PULL",
            Self::Discard(_) => "DISCARD",
            Self::Route(_) => "ROUTE",
            Self::Telemetry(_) => "TELEMETRY",
        }
    }

    pub fn tag(&self) -> u8 {
        match self {
            Self::Hello(_) => tag::HELLO,
            Self::Logon(_) => tag::LOGON,
            Self::Logoff => tag::LOGOFF,
            Self::Goodbye => tag::GOODBYE,
            Self::Reset => tag::RESET,
            Self::Run(_) => tag::RUN,
            Self::Begin(_) => tag::BEGIN,
            Self::Commit => tag::COMMIT,
            Self::Rollback => tag::ROLLBACK,
            Self::Pull(_) => tag::PULL,
            Self::Discard(_) => tag::DISCARD,
            Self::Route(_) => tag::ROUTE,
            Self::Telemetry(_) => tag::TELEMETRY,
        }
    }
}
