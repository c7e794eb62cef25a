//! # Bolt Decoding Flows
//!
//! Whole requests encoded with the Packstream writer and decoded through
//! [`BoltMessageDecoder`], covering what changes between protocol
//! revisions.

#[cfg(test)]
mod tests {
    use bw_01_packstream::{OrderedMap, PackstreamBuf, PackstreamConfig, StructHeader, Value};
    use bw_02_bolt_messages::{
        tag, AnyValue, BoltMessageDecoder, BoltStruct, ConnectionContext, DateTime, DecodeError,
        Feature, NotificationsConfig, ProtocolVersion, RequestMessage,
    };
    use rand::Rng;

    // =============================================================================
    // FIXTURES
    // =============================================================================

    fn map(entries: &[(&str, Value)]) -> Value {
        Value::Map(entries.iter().map(|(k, v)| (*k, v.clone())).collect())
    }

    fn request(tag: u8, fields: &[Value]) -> Vec<u8> {
        let mut buf = PackstreamBuf::new();
        buf.write_struct_header(StructHeader::new(fields.len() as u64, tag))
            .unwrap();
        for field in fields {
            buf.write_value(field).unwrap();
        }
        buf.freeze().to_vec()
    }

    fn decode(ctx: &ConnectionContext, bytes: &[u8]) -> Result<RequestMessage, DecodeError> {
        BoltMessageDecoder::new().decode_bytes(ctx, bytes)
    }

    fn hello_53() -> Vec<u8> {
        request(
            tag::HELLO,
            &[map(&[
                ("user_agent", Value::from("integration/1.0")),
                ("bolt_agent", map(&[("product", Value::from("integration/1.0"))])),
                ("routing", map(&[("region", Value::from("eu"))])),
            ])],
        )
    }

    /// RUN with a single `when` parameter holding a date-time struct
    fn run_with_date_time(struct_tag: u8) -> Vec<u8> {
        let mut buf = PackstreamBuf::new();
        buf.write_struct_header(StructHeader::new(3, tag::RUN)).unwrap();
        buf.write_string("RETURN $when").unwrap();
        buf.write_map_header(1).unwrap();
        buf.write_string("when").unwrap();
        buf.write_struct_header(StructHeader::new(3, struct_tag)).unwrap();
        buf.write_int(7200).write_int(0).write_int(3600);
        buf.write_map_header(0).unwrap();
        buf.freeze().to_vec()
    }

    fn when(message: RequestMessage) -> AnyValue {
        let RequestMessage::Run(run) = message else {
            panic!("expected RUN, got {message:?}");
        };
        run.parameters.get("when").cloned().unwrap()
    }

    // =============================================================================
    // SESSION FLOWS
    // =============================================================================

    #[test]
    fn test_full_session_on_54() {
        let ctx = ConnectionContext::new(ProtocolVersion::V5_4);
        let session = [
            hello_53(),
            request(
                tag::LOGON,
                &[map(&[
                    ("scheme", Value::from("basic")),
                    ("principal", Value::from("neo4j")),
                    ("credentials", Value::from("password")),
                ])],
            ),
            request(tag::TELEMETRY, &[Value::from(1)]),
            request(tag::BEGIN, &[map(&[("mode", Value::from("r"))])]),
            request(
                tag::RUN,
                &[Value::from("RETURN 1"), map(&[]), map(&[])],
            ),
            request(tag::PULL, &[map(&[("n", Value::from(1000))])]),
            request(tag::COMMIT, &[]),
            request(tag::LOGOFF, &[]),
            request(tag::GOODBYE, &[]),
        ];

        let names: Vec<&str> = session
            .iter()
            .map(|bytes| decode(&ctx, bytes).unwrap().name())
            .collect();
        assert_eq!(
            names,
            vec!["HELLO", "LOGON", "TELEMETRY", "BEGIN", "RUN", "PULL", "COMMIT", "LOGOFF", "GOODBYE"]
        );
    }

    #[test]
    fn test_hello_across_versions() {
        let bytes = request(
            tag::HELLO,
            &[map(&[
                ("user_agent", Value::from("integration/1.0")),
                ("scheme", Value::from("none")),
                ("patch_bolt", Value::from(vec![Value::from("utc")])),
                ("notifications_minimum_severity", Value::from("WARNING")),
            ])],
        );

        let hello = |version| match decode(&ConnectionContext::new(version), &bytes) {
            Ok(RequestMessage::Hello(hello)) => Ok(hello),
            Ok(other) => panic!("expected HELLO, got {other:?}"),
            Err(e) => Err(e),
        };

        let v44 = hello(ProtocolVersion::V4_4).unwrap();
        assert_eq!(v44.features, vec![Feature::UtcDateTime]);
        assert!(v44.auth.is_some());
        assert_eq!(v44.notifications, NotificationsConfig::Default);

        let v50 = hello(ProtocolVersion::V5_0).unwrap();
        assert!(v50.features.is_empty());
        assert!(v50.auth.is_some());

        let v51 = hello(ProtocolVersion::V5_1).unwrap();
        assert!(v51.auth.is_none());

        let v52 = hello(ProtocolVersion::V5_2).unwrap();
        assert!(matches!(v52.notifications, NotificationsConfig::Selective { .. }));

        // bolt_agent becomes mandatory
        assert_eq!(
            hello(ProtocolVersion::V5_3).unwrap_err().field(),
            Some("bolt_agent")
        );
    }

    #[test]
    fn test_routing_enabled_by_presence() {
        let ctx = ConnectionContext::new(ProtocolVersion::V5_4);
        let RequestMessage::Hello(hello) = decode(&ctx, &hello_53()).unwrap() else {
            panic!("expected HELLO");
        };
        assert!(hello.routing.enabled);
        assert_eq!(hello.routing.parameter("region"), Some("eu"));
    }

    // =============================================================================
    // VALUE STRUCTS
    // =============================================================================

    #[test]
    fn test_date_time_legacy_vs_utc() {
        // 4.4 without the utc patch: legacy tag, local seconds
        let legacy = ConnectionContext::new(ProtocolVersion::V4_4);
        let value = when(decode(&legacy, &run_with_date_time(b'F')).unwrap());
        assert_eq!(
            value,
            AnyValue::Struct(BoltStruct::DateTime(DateTime {
                epoch_second_utc: 3600,
                nano: 0,
                offset_seconds: 3600,
            }))
        );
        assert!(decode(&legacy, &run_with_date_time(b'I')).is_err());

        // 4.4 with the utc patch behaves like 5.x
        let patched = ConnectionContext::new(ProtocolVersion::V4_4).with_feature(Feature::UtcDateTime);
        let value = when(decode(&patched, &run_with_date_time(b'I')).unwrap());
        assert_eq!(
            value,
            AnyValue::Struct(BoltStruct::DateTime(DateTime {
                epoch_second_utc: 7200,
                nano: 0,
                offset_seconds: 3600,
            }))
        );

        let modern = ConnectionContext::new(ProtocolVersion::V5_0);
        assert!(decode(&modern, &run_with_date_time(b'F')).is_err());
    }

    #[test]
    fn test_structs_never_reach_hello() {
        let mut buf = PackstreamBuf::new();
        buf.write_struct_header(StructHeader::new(1, tag::HELLO)).unwrap();
        buf.write_map_header(2).unwrap();
        buf.write_string("user_agent").unwrap();
        buf.write_string("integration/1.0").unwrap();
        buf.write_string("point").unwrap();
        buf.write_struct_header(StructHeader::new(3, b'X')).unwrap();
        buf.write_int(7203).write_float(1.0).write_float(2.0);

        let ctx = ConnectionContext::new(ProtocolVersion::V5_1);
        let err = decode(&ctx, buf.as_slice()).unwrap_err();
        assert_eq!(err.field(), Some("extra"));
    }

    // =============================================================================
    // LIMITS AND RANDOMISED INPUT
    // =============================================================================

    #[test]
    fn test_declared_length_limits() {
        // a list header announcing 2^32-1 elements followed by nothing
        let mut buf = PackstreamBuf::new();
        buf.write_struct_header(StructHeader::new(1, tag::BEGIN)).unwrap();
        buf.write_map_header(1).unwrap();
        buf.write_string("bookmarks").unwrap();
        buf.extend_from_slice(&[0xD6, 0xFF, 0xFF, 0xFF, 0xFF]);

        let ctx = ConnectionContext::new(ProtocolVersion::V5_4);
        let decoder = BoltMessageDecoder::new().with_config(PackstreamConfig {
            max_list_length: 1000,
            ..PackstreamConfig::default()
        });
        let err = decoder.decode_bytes(&ctx, buf.as_slice()).unwrap_err();
        assert_eq!(err.field(), Some("metadata"));
    }

    #[test]
    fn test_random_parameters_survive_decoding() {
        let mut rng = rand::thread_rng();
        let ctx = ConnectionContext::new(ProtocolVersion::V5_4);

        for _ in 0..50 {
            let mut params = OrderedMap::new();
            for i in 0..rng.gen_range(0..20) {
                let value = match rng.gen_range(0..5) {
                    0 => Value::from(rng.gen::<i64>()),
                    1 => Value::from(rng.gen::<f64>()),
                    2 => Value::from(rng.gen::<bool>()),
                    3 => Value::from(format!("s{}", rng.gen::<u32>())),
                    _ => Value::from(vec![Value::from(rng.gen::<i32>()), Value::Null]),
                };
                params.insert(format!("p{i}"), value);
            }
            let bytes = request(
                tag::RUN,
                &[Value::from("RETURN 1"), Value::Map(params.clone()), map(&[])],
            );

            let RequestMessage::Run(run) = decode(&ctx, &bytes).unwrap() else {
                panic!("expected RUN");
            };
            assert_eq!(run.parameters.len(), params.len());
            for (key, value) in params.iter() {
                let decoded = run.parameters.get(key).unwrap();
                match value {
                    Value::Int(i) => assert_eq!(decoded.as_int(), Some(*i)),
                    Value::Float(f) => assert_eq!(decoded.as_float().map(f64::to_bits), Some(f.to_bits())),
                    Value::Boolean(b) => assert_eq!(decoded.as_bool(), Some(*b)),
                    Value::String(s) => assert_eq!(decoded.as_str(), Some(s.as_str())),
                    Value::List(items) => assert_eq!(decoded.as_list().map(<[_]>::len), Some(items.len())),
                    other => panic!("unexpected generated value {other:?}"),
                }
            }
        }
    }
}
