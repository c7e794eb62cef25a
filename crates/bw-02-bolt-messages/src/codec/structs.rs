//! Temporal and spatial structs accepted as parameter values.
//!
//! Two registries exist. They share every reader except those for
//! date-times: the legacy registry (4.4 without the `utc` patch) reads
//! `F`/`f` structs whose seconds are local wall-clock time, the UTC
//! registry reads `I`/`i` structs whose seconds are UTC based. Graph
//! entities (nodes, relationships, paths) are never accepted from clients
//! and have no entry in either registry.

use super::{ensure_struct_size, ValueStructRegistry};
use crate::domain::{
    BoltStruct, ConnectionContext, Date, DateTime, DateTimeZoneId, DecodeError, DecodeResult,
    Duration, LocalDateTime, LocalTime, Point2D, Point3D, SecondsBasis, Time,
};
use bw_01_packstream::{PackstreamBuf, StructHeader, StructRegistryBuilder};
use lazy_static::lazy_static;

/// Struct tags of the value types.
pub mod struct_tag {
    pub const DATE: u8 = b'D';
    pub const TIME: u8 = b'T';
    pub const LOCAL_TIME: u8 = b't';
    pub const LOCAL_DATE_TIME: u8 = b'd';
    pub const DURATION: u8 = b'E';
    pub const POINT_2D: u8 = b'X';
    pub const POINT_3D: u8 = b'Y';
    pub const DATE_TIME_LEGACY: u8 = b'F';
    pub const DATE_TIME_ZONE_ID_LEGACY: u8 = b'f';
    pub const DATE_TIME: u8 = b'I';
    pub const DATE_TIME_ZONE_ID: u8 = b'i';
}

const NANOS_PER_SECOND: i64 = 1_000_000_000;
const NANOS_PER_DAY: i64 = 86_400 * NANOS_PER_SECOND;
const MAX_OFFSET_SECONDS: i64 = 18 * 3600; // +/-18:00

lazy_static! {
    static ref LEGACY_STRUCTS: ValueStructRegistry = common_structs()
        .register(struct_tag::DATE_TIME_LEGACY, read_legacy_date_time)
        .register(struct_tag::DATE_TIME_ZONE_ID_LEGACY, read_legacy_date_time_zone_id)
        .build();

    static ref UTC_STRUCTS: ValueStructRegistry = LEGACY_STRUCTS
        .to_builder()
        .unregister(struct_tag::DATE_TIME_LEGACY)
        .unregister(struct_tag::DATE_TIME_ZONE_ID_LEGACY)
        .register(struct_tag::DATE_TIME, read_utc_date_time)
        .register(struct_tag::DATE_TIME_ZONE_ID, read_utc_date_time_zone_id)
        .build();
}

fn common_structs() -> StructRegistryBuilder<ConnectionContext, BoltStruct, DecodeError> {
    ValueStructRegistry::builder()
        .register(struct_tag::DATE, read_date)
        .register(struct_tag::TIME, read_time)
        .register(struct_tag::LOCAL_TIME, read_local_time)
        .register(struct_tag::LOCAL_DATE_TIME, read_local_date_time)
        .register(struct_tag::DURATION, read_duration)
        .register(struct_tag::POINT_2D, read_point_2d)
        .register(struct_tag::POINT_3D, read_point_3d)
}

/// Registry with the legacy date-time encoding.
pub fn legacy_value_structs() -> &'static ValueStructRegistry {
    &LEGACY_STRUCTS
}

/// Registry with the UTC date-time encoding.
pub fn utc_value_structs() -> &'static ValueStructRegistry {
    &UTC_STRUCTS
}

/// Registry matching the connection's negotiated date-time encoding.
pub fn value_structs(ctx: &ConnectionContext) -> &'static ValueStructRegistry {
    if ctx.utc_date_time() {
        utc_value_structs()
    } else {
        legacy_value_structs()
    }
}

// =============================================================================
// Field helpers
// =============================================================================

fn int_field(buf: &mut PackstreamBuf, field: &str) -> DecodeResult<i64> {
    buf.read_int()
        .map_err(|e| DecodeError::illegal_argument_caused_by(field, e))
}

fn float_field(buf: &mut PackstreamBuf, field: &str) -> DecodeResult<f64> {
    buf.read_float()
        .map_err(|e| DecodeError::illegal_argument_caused_by(field, e))
}

fn string_field(buf: &mut PackstreamBuf, field: &str) -> DecodeResult<String> {
    buf.read_string()
        .map_err(|e| DecodeError::illegal_argument_caused_by(field, e))
}

fn in_range(value: i64, min: i64, max: i64, field: &str) -> DecodeResult<i64> {
    if !(min..=max).contains(&value) {
        return Err(DecodeError::illegal_argument(
            field,
            format!("Expected value between {min} and {max} but got {value}"),
        ));
    }
    Ok(value)
}

fn nano_field(buf: &mut PackstreamBuf) -> DecodeResult<i64> {
    let nano = int_field(buf, "nanoseconds")?;
    in_range(nano, 0, NANOS_PER_SECOND - 1, "nanoseconds")
}

fn nano_of_day_field(buf: &mut PackstreamBuf) -> DecodeResult<i64> {
    let nano = int_field(buf, "nanoseconds")?;
    in_range(nano, 0, NANOS_PER_DAY - 1, "nanoseconds")
}

fn offset_field(buf: &mut PackstreamBuf) -> DecodeResult<i64> {
    let offset = int_field(buf, "tz_offset_seconds")?;
    in_range(offset, -MAX_OFFSET_SECONDS, MAX_OFFSET_SECONDS, "tz_offset_seconds")
}

fn zone_id_field(buf: &mut PackstreamBuf) -> DecodeResult<String> {
    let zone_id = string_field(buf, "tz_id")?;
    if zone_id.is_empty() {
        return Err(DecodeError::illegal_argument("tz_id", "Expected non-empty zone id"));
    }
    Ok(zone_id)
}

// =============================================================================
// Readers
// =============================================================================

fn read_date(
    _: &ConnectionContext,
    buf: &mut PackstreamBuf,
    header: StructHeader,
) -> DecodeResult<BoltStruct> {
    ensure_struct_size(header, 1)?;
    Ok(BoltStruct::Date(Date {
        epoch_day: int_field(buf, "days")?,
    }))
}

fn read_time(
    _: &ConnectionContext,
    buf: &mut PackstreamBuf,
    header: StructHeader,
) -> DecodeResult<BoltStruct> {
    ensure_struct_size(header, 2)?;
    Ok(BoltStruct::Time(Time {
        nano_of_day: nano_of_day_field(buf)?,
        offset_seconds: offset_field(buf)?,
    }))
}

fn read_local_time(
    _: &ConnectionContext,
    buf: &mut PackstreamBuf,
    header: StructHeader,
) -> DecodeResult<BoltStruct> {
    ensure_struct_size(header, 1)?;
    Ok(BoltStruct::LocalTime(LocalTime {
        nano_of_day: nano_of_day_field(buf)?,
    }))
}

fn read_local_date_time(
    _: &ConnectionContext,
    buf: &mut PackstreamBuf,
    header: StructHeader,
) -> DecodeResult<BoltStruct> {
    ensure_struct_size(header, 2)?;
    Ok(BoltStruct::LocalDateTime(LocalDateTime {
        epoch_second: int_field(buf, "seconds")?,
        nano: nano_field(buf)?,
    }))
}

fn read_duration(
    _: &ConnectionContext,
    buf: &mut PackstreamBuf,
    header: StructHeader,
) -> DecodeResult<BoltStruct> {
    ensure_struct_size(header, 4)?;
    Ok(BoltStruct::Duration(Duration {
        months: int_field(buf, "months")?,
        days: int_field(buf, "days")?,
        seconds: int_field(buf, "seconds")?,
        nanos: int_field(buf, "nanoseconds")?,
    }))
}

fn read_point_2d(
    _: &ConnectionContext,
    buf: &mut PackstreamBuf,
    header: StructHeader,
) -> DecodeResult<BoltStruct> {
    ensure_struct_size(header, 3)?;
    Ok(BoltStruct::Point2D(Point2D {
        srid: int_field(buf, "srid")?,
        x: float_field(buf, "x")?,
        y: float_field(buf, "y")?,
    }))
}

fn read_point_3d(
    _: &ConnectionContext,
    buf: &mut PackstreamBuf,
    header: StructHeader,
) -> DecodeResult<BoltStruct> {
    ensure_struct_size(header, 4)?;
    Ok(BoltStruct::Point3D(Point3D {
        srid: int_field(buf, "srid")?,
        x: float_field(buf, "x")?,
        y: float_field(buf, "y")?,
        z: float_field(buf, "z")?,
    }))
}

/// Legacy date-time: seconds are local to the offset.
fn read_legacy_date_time(
    _: &ConnectionContext,
    buf: &mut PackstreamBuf,
    header: StructHeader,
) -> DecodeResult<BoltStruct> {
    ensure_struct_size(header, 3)?;
    let local_seconds = int_field(buf, "seconds")?;
    let nano = nano_field(buf)?;
    let offset_seconds = offset_field(buf)?;

    let epoch_second_utc = local_seconds
        .checked_sub(offset_seconds)
        .ok_or_else(|| DecodeError::illegal_argument("seconds", "Value out of range"))?;
    Ok(BoltStruct::DateTime(DateTime {
        epoch_second_utc,
        nano,
        offset_seconds,
    }))
}

fn read_utc_date_time(
    _: &ConnectionContext,
    buf: &mut PackstreamBuf,
    header: StructHeader,
) -> DecodeResult<BoltStruct> {
    ensure_struct_size(header, 3)?;
    Ok(BoltStruct::DateTime(DateTime {
        epoch_second_utc: int_field(buf, "seconds")?,
        nano: nano_field(buf)?,
        offset_seconds: offset_field(buf)?,
    }))
}

fn read_legacy_date_time_zone_id(
    _: &ConnectionContext,
    buf: &mut PackstreamBuf,
    header: StructHeader,
) -> DecodeResult<BoltStruct> {
    read_date_time_zone_id(buf, header, SecondsBasis::Local)
}

fn read_utc_date_time_zone_id(
    _: &ConnectionContext,
    buf: &mut PackstreamBuf,
    header: StructHeader,
) -> DecodeResult<BoltStruct> {
    read_date_time_zone_id(buf, header, SecondsBasis::Utc)
}

fn read_date_time_zone_id(
    buf: &mut PackstreamBuf,
    header: StructHeader,
    basis: SecondsBasis,
) -> DecodeResult<BoltStruct> {
    ensure_struct_size(header, 3)?;
    Ok(BoltStruct::DateTimeZoneId(DateTimeZoneId {
        epoch_second: int_field(buf, "seconds")?,
        nano: nano_field(buf)?,
        zone_id: zone_id_field(buf)?,
        basis,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Feature, ProtocolVersion};
    use bw_01_packstream::ReaderError;

    fn ctx(version: ProtocolVersion) -> ConnectionContext {
        ConnectionContext::new(version)
    }

    fn read(ctx: &ConnectionContext, buf: &mut PackstreamBuf) -> DecodeResult<BoltStruct> {
        buf.read_struct(ctx, value_structs(ctx))
    }

    fn date_time(buf: &mut PackstreamBuf, tag: u8, seconds: i64, nano: i64, offset: i64) {
        buf.write_struct_header(StructHeader::new(3, tag)).unwrap();
        buf.write_int(seconds).write_int(nano).write_int(offset);
    }

    #[test]
    fn test_registry_selection() {
        let legacy = ctx(ProtocolVersion::V4_4);
        assert!(value_structs(&legacy).contains(struct_tag::DATE_TIME_LEGACY));
        assert!(!value_structs(&legacy).contains(struct_tag::DATE_TIME));

        let patched = ctx(ProtocolVersion::V4_4).with_feature(Feature::UtcDateTime);
        assert!(value_structs(&patched).contains(struct_tag::DATE_TIME));
        assert!(!value_structs(&patched).contains(struct_tag::DATE_TIME_LEGACY));

        let v5 = ctx(ProtocolVersion::V5_0);
        assert!(value_structs(&v5).contains(struct_tag::DATE_TIME_ZONE_ID));
        assert!(!value_structs(&v5).contains(struct_tag::DATE_TIME_ZONE_ID_LEGACY));
    }

    #[test]
    fn test_legacy_date_time_is_normalised_to_utc() {
        let ctx = ctx(ProtocolVersion::V4_4);
        let mut buf = PackstreamBuf::new();
        date_time(&mut buf, struct_tag::DATE_TIME_LEGACY, 7_200, 5, 3_600);

        assert_eq!(
            read(&ctx, &mut buf).unwrap(),
            BoltStruct::DateTime(DateTime {
                epoch_second_utc: 3_600,
                nano: 5,
                offset_seconds: 3_600
            })
        );
    }

    #[test]
    fn test_utc_date_time_kept_verbatim() {
        let ctx = ctx(ProtocolVersion::V5_0);
        let mut buf = PackstreamBuf::new();
        date_time(&mut buf, struct_tag::DATE_TIME, 7_200, 5, 3_600);

        assert_eq!(
            read(&ctx, &mut buf).unwrap(),
            BoltStruct::DateTime(DateTime {
                epoch_second_utc: 7_200,
                nano: 5,
                offset_seconds: 3_600
            })
        );
    }

    #[test]
    fn test_legacy_tag_rejected_on_utc_connection() {
        let ctx = ctx(ProtocolVersion::V5_2);
        let mut buf = PackstreamBuf::new();
        date_time(&mut buf, struct_tag::DATE_TIME_LEGACY, 0, 0, 0);

        assert_eq!(
            read(&ctx, &mut buf).unwrap_err(),
            DecodeError::Reader(ReaderError::UnexpectedStruct {
                tag: struct_tag::DATE_TIME_LEGACY,
                length: 3
            })
        );
    }

    #[test]
    fn test_zone_id_basis() {
        for (version, tag, basis) in [
            (ProtocolVersion::V4_4, struct_tag::DATE_TIME_ZONE_ID_LEGACY, SecondsBasis::Local),
            (ProtocolVersion::V5_0, struct_tag::DATE_TIME_ZONE_ID, SecondsBasis::Utc),
        ] {
            let ctx = ctx(version);
            let mut buf = PackstreamBuf::new();
            buf.write_struct_header(StructHeader::new(3, tag)).unwrap();
            buf.write_int(1_000).write_int(0);
            buf.write_string("Europe/Stockholm").unwrap();

            assert_eq!(
                read(&ctx, &mut buf).unwrap(),
                BoltStruct::DateTimeZoneId(DateTimeZoneId {
                    epoch_second: 1_000,
                    nano: 0,
                    zone_id: "Europe/Stockholm".to_string(),
                    basis,
                })
            );
        }
    }

    #[test]
    fn test_points() {
        let ctx = ctx(ProtocolVersion::V5_4);
        let mut buf = PackstreamBuf::new();
        buf.write_struct_header(StructHeader::new(4, struct_tag::POINT_3D)).unwrap();
        buf.write_int(9157).write_float(1.0).write_float(2.0).write_float(3.0);

        assert_eq!(
            read(&ctx, &mut buf).unwrap(),
            BoltStruct::Point3D(Point3D {
                srid: 9157,
                x: 1.0,
                y: 2.0,
                z: 3.0
            })
        );
    }

    #[test]
    fn test_wrong_arity() {
        let ctx = ctx(ProtocolVersion::V5_4);
        let mut buf = PackstreamBuf::new();
        buf.write_struct_header(StructHeader::new(2, struct_tag::DATE)).unwrap();
        buf.write_int(1).write_int(2);

        assert_eq!(
            read(&ctx, &mut buf).unwrap_err(),
            DecodeError::IllegalStructSize {
                expected: 1,
                actual: 2
            }
        );
    }

    #[test]
    fn test_field_validation() {
        let ctx = ctx(ProtocolVersion::V5_4);

        let mut buf = PackstreamBuf::new();
        buf.write_struct_header(StructHeader::new(2, struct_tag::LOCAL_DATE_TIME)).unwrap();
        buf.write_int(0).write_int(NANOS_PER_SECOND);
        assert_eq!(read(&ctx, &mut buf).unwrap_err().field(), Some("nanoseconds"));

        let mut buf = PackstreamBuf::new();
        buf.write_struct_header(StructHeader::new(2, struct_tag::TIME)).unwrap();
        buf.write_int(0).write_int(MAX_OFFSET_SECONDS + 1);
        assert_eq!(read(&ctx, &mut buf).unwrap_err().field(), Some("tz_offset_seconds"));

        let mut buf = PackstreamBuf::new();
        buf.write_struct_header(StructHeader::new(1, struct_tag::DATE)).unwrap();
        buf.write_string("monday").unwrap();
        assert_eq!(read(&ctx, &mut buf).unwrap_err().field(), Some("days"));
    }

    #[test]
    fn test_graph_entities_not_accepted() {
        let ctx = ctx(ProtocolVersion::V5_4);
        for tag in [b'N', b'R', b'r', b'P'] {
            assert!(!value_structs(&ctx).contains(tag));
        }
    }
}
