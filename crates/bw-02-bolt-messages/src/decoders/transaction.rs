//! RUN and BEGIN, which share the transaction metadata map.

use super::notifications::notifications_config;
use crate::codec::{
    ensure_struct_size, in_field, optional_int, optional_map, optional_string,
    optional_string_list, read_map, read_primitive_map, value_structs, StructPolicy,
};
use crate::domain::{
    AccessMode, AnyMap, BeginMessage, ConnectionContext, DecodeError, DecodeResult,
    NotificationsConfig, RequestMessage, RunMessage, TransactionMetadata,
};
use bw_01_packstream::{PackstreamBuf, StructHeader};
use std::time::Duration;

pub const BOOKMARKS_KEY: &str = "bookmarks";
pub const TX_TIMEOUT_KEY: &str = "tx_timeout";
pub const TX_METADATA_KEY: &str = "tx_metadata";
pub const MODE_KEY: &str = "mode";
pub const DATABASE_KEY: &str = "db";
pub const IMPERSONATED_USER_KEY: &str = "imp_user";

const QUERY_FIELD: &str = "query";
const PARAMS_FIELD: &str = "params";
const METADATA_FIELD: &str = "metadata";

fn access_mode(meta: &AnyMap) -> DecodeResult<AccessMode> {
    match optional_string(meta, MODE_KEY)?.as_deref() {
        None | Some("w") => Ok(AccessMode::Write),
        Some("r") => Ok(AccessMode::Read),
        Some(other) => Err(DecodeError::illegal_argument(
            MODE_KEY,
            format!("Expected 'r' or 'w' but got '{other}'"),
        )),
    }
}

fn tx_timeout(meta: &AnyMap) -> DecodeResult<Option<Duration>> {
    optional_int(meta, TX_TIMEOUT_KEY)?
        .map(|millis| {
            u64::try_from(millis).map(Duration::from_millis).map_err(|_| {
                DecodeError::illegal_argument(
                    TX_TIMEOUT_KEY,
                    format!("Expected a non-negative number of milliseconds but got {millis}"),
                )
            })
        })
        .transpose()
}

/// Reads the transaction keys common to every revision.
fn transaction_metadata(meta: &AnyMap) -> DecodeResult<TransactionMetadata> {
    Ok(TransactionMetadata {
        bookmarks: optional_string_list(meta, BOOKMARKS_KEY)?,
        tx_timeout: tx_timeout(meta)?,
        tx_metadata: optional_map(meta, TX_METADATA_KEY)?.cloned(),
        mode: access_mode(meta)?,
        database: optional_string(meta, DATABASE_KEY)?,
        impersonated_user: optional_string(meta, IMPERSONATED_USER_KEY)?,
        notifications: NotificationsConfig::Default,
    })
}

fn transaction_metadata_with_notifications(meta: &AnyMap) -> DecodeResult<TransactionMetadata> {
    let mut metadata = transaction_metadata(meta)?;
    metadata.notifications = notifications_config(meta)?;
    Ok(metadata)
}

type MetadataParser = fn(&AnyMap) -> DecodeResult<TransactionMetadata>;

fn run(
    ctx: &ConnectionContext,
    buf: &mut PackstreamBuf,
    header: StructHeader,
    parse: MetadataParser,
) -> DecodeResult<RequestMessage> {
    ensure_struct_size(header, 3)?;

    let query = in_field(QUERY_FIELD, buf.read_string().map_err(DecodeError::from))?;
    let parameters = in_field(
        PARAMS_FIELD,
        read_map(ctx, buf, StructPolicy::Allowed(value_structs(ctx))),
    )?;
    let meta = in_field(METADATA_FIELD, read_primitive_map(ctx, buf))?;

    Ok(RequestMessage::Run(RunMessage {
        query,
        parameters,
        metadata: parse(&meta)?,
    }))
}

fn begin(
    ctx: &ConnectionContext,
    buf: &mut PackstreamBuf,
    header: StructHeader,
    parse: MetadataParser,
) -> DecodeResult<RequestMessage> {
    ensure_struct_size(header, 1)?;
    let meta = in_field(METADATA_FIELD, read_primitive_map(ctx, buf))?;
    Ok(RequestMessage::Begin(BeginMessage {
        metadata: parse(&meta)?,
    }))
}

pub fn decode_run_v44(
    ctx: &ConnectionContext,
    buf: &mut PackstreamBuf,
    header: StructHeader,
) -> DecodeResult<RequestMessage> {
    run(ctx, buf, header, transaction_metadata)
}

pub fn decode_run_v52(
    ctx: &ConnectionContext,
    buf: &mut PackstreamBuf,
    header: StructHeader,
) -> DecodeResult<RequestMessage> {
    run(ctx, buf, header, transaction_metadata_with_notifications)
}

pub fn decode_begin_v44(
    ctx: &ConnectionContext,
    buf: &mut PackstreamBuf,
    header: StructHeader,
) -> DecodeResult<RequestMessage> {
    begin(ctx, buf, header, transaction_metadata)
}

pub fn decode_begin_v52(
    ctx: &ConnectionContext,
    buf: &mut PackstreamBuf,
    header: StructHeader,
) -> DecodeResult<RequestMessage> {
    begin(ctx, buf, header, transaction_metadata_with_notifications)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{tag, AnyValue, BoltStruct, Date, ProtocolVersion, Severity};
    use bw_01_packstream::Value;

    fn write_meta(buf: &mut PackstreamBuf, meta: &[(&str, Value)]) {
        buf.write_map_header(meta.len()).unwrap();
        for (k, v) in meta {
            buf.write_string(k).unwrap();
            buf.write_value(v).unwrap();
        }
    }

    fn run_buf(query: &str, params: &[(&str, Value)], meta: &[(&str, Value)]) -> PackstreamBuf {
        let mut buf = PackstreamBuf::new();
        buf.write_string(query).unwrap();
        write_meta(&mut buf, params);
        write_meta(&mut buf, meta);
        buf
    }

    fn begin_metadata(
        version: ProtocolVersion,
        meta: &[(&str, Value)],
    ) -> DecodeResult<TransactionMetadata> {
        let mut buf = PackstreamBuf::new();
        write_meta(&mut buf, meta);
        let ctx = ConnectionContext::new(version);
        let decoder = if version >= ProtocolVersion::V5_2 {
            decode_begin_v52
        } else {
            decode_begin_v44
        };
        match decoder(&ctx, &mut buf, StructHeader::new(1, tag::BEGIN))? {
            RequestMessage::Begin(begin) => Ok(begin.metadata),
            other => panic!("unexpected message {other:?}"),
        }
    }

    #[test]
    fn test_run_defaults() {
        let mut buf = run_buf("RETURN 1", &[], &[]);
        let ctx = ConnectionContext::new(ProtocolVersion::V5_4);
        let message = decode_run_v52(&ctx, &mut buf, StructHeader::new(3, tag::RUN)).unwrap();

        let RequestMessage::Run(run) = message else {
            panic!("expected RUN");
        };
        assert_eq!(run.query, "RETURN 1");
        assert!(run.parameters.is_empty());
        assert_eq!(run.metadata, TransactionMetadata::default());
        assert!(buf.is_empty());
    }

    #[test]
    fn test_run_parameters_with_structs() {
        let mut buf = PackstreamBuf::new();
        buf.write_string("RETURN $d").unwrap();
        buf.write_map_header(1).unwrap();
        buf.write_string("d").unwrap();
        buf.write_struct_header(StructHeader::new(1, b'D')).unwrap();
        buf.write_int(19_000);
        buf.write_map_header(0).unwrap();

        let ctx = ConnectionContext::new(ProtocolVersion::V5_0);
        let RequestMessage::Run(run) =
            decode_run_v44(&ctx, &mut buf, StructHeader::new(3, tag::RUN)).unwrap()
        else {
            panic!("expected RUN");
        };
        assert_eq!(
            run.parameters.get("d"),
            Some(&AnyValue::Struct(BoltStruct::Date(Date { epoch_day: 19_000 })))
        );
    }

    #[test]
    fn test_run_rejects_struct_in_metadata() {
        let mut buf = PackstreamBuf::new();
        buf.write_string("RETURN 1").unwrap();
        buf.write_map_header(0).unwrap();
        buf.write_map_header(1).unwrap();
        buf.write_string("tx_metadata").unwrap();
        buf.write_struct_header(StructHeader::new(1, b'D')).unwrap();
        buf.write_int(1);

        let ctx = ConnectionContext::new(ProtocolVersion::V5_4);
        let err = decode_run_v52(&ctx, &mut buf, StructHeader::new(3, tag::RUN)).unwrap_err();
        assert_eq!(err.field(), Some("metadata"));
    }

    #[test]
    fn test_run_query_must_be_string() {
        let mut buf = PackstreamBuf::new();
        buf.write_int(1);
        let ctx = ConnectionContext::new(ProtocolVersion::V5_4);
        let err = decode_run_v52(&ctx, &mut buf, StructHeader::new(3, tag::RUN)).unwrap_err();
        assert_eq!(err.field(), Some("query"));
    }

    #[test]
    fn test_run_wrong_size() {
        let mut buf = run_buf("RETURN 1", &[], &[]);
        let ctx = ConnectionContext::new(ProtocolVersion::V5_4);
        assert_eq!(
            decode_run_v52(&ctx, &mut buf, StructHeader::new(2, tag::RUN)).unwrap_err(),
            DecodeError::IllegalStructSize {
                expected: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn test_begin_metadata() {
        let metadata = begin_metadata(
            ProtocolVersion::V4_4,
            &[
                ("bookmarks", Value::from(vec![Value::from("bm:1")])),
                ("tx_timeout", Value::from(1500)),
                ("mode", Value::from("r")),
                ("db", Value::from("neo4j")),
                ("imp_user", Value::from("bob")),
                ("notifications_minimum_severity", Value::from("OFF")),
            ],
        )
        .unwrap();

        assert_eq!(metadata.bookmarks, vec!["bm:1"]);
        assert_eq!(metadata.tx_timeout, Some(Duration::from_millis(1500)));
        assert_eq!(metadata.mode, AccessMode::Read);
        assert_eq!(metadata.database.as_deref(), Some("neo4j"));
        assert_eq!(metadata.impersonated_user.as_deref(), Some("bob"));
        // ignored before 5.2
        assert_eq!(metadata.notifications, NotificationsConfig::Default);
    }

    #[test]
    fn test_begin_notifications_from_52() {
        let metadata = begin_metadata(
            ProtocolVersion::V5_2,
            &[("notifications_minimum_severity", Value::from("WARNING"))],
        )
        .unwrap();
        assert_eq!(
            metadata.notifications,
            NotificationsConfig::Selective {
                minimum_severity: Some(Severity::Warning),
                disabled_classifications: None,
            }
        );
    }

    #[test]
    fn test_begin_invalid_values() {
        let err = begin_metadata(ProtocolVersion::V5_4, &[("mode", Value::from("x"))]).unwrap_err();
        assert_eq!(err.field(), Some("mode"));

        let err =
            begin_metadata(ProtocolVersion::V5_4, &[("tx_timeout", Value::from(-1))]).unwrap_err();
        assert_eq!(err.field(), Some("tx_timeout"));

        let err = begin_metadata(ProtocolVersion::V5_4, &[("bookmarks", Value::from("bm"))])
            .unwrap_err();
        assert_eq!(err.field(), Some("bookmarks"));
    }
}
