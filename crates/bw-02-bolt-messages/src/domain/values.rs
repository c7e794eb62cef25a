//! Typed structs allowed inside query parameters.

use bw_01_packstream::{OrderedMap, Value};

/// Parameter value with typed temporal and spatial structs.
pub type AnyValue = Value<BoltStruct>;

/// String keyed map of [`AnyValue`]s.
pub type AnyMap = OrderedMap<AnyValue>;

/// Days since the Unix epoch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Date {
    pub epoch_day: i64,
}

/// Time of day with a fixed UTC offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Time {
    pub nano_of_day: i64,
    pub offset_seconds: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LocalTime {
    pub nano_of_day: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LocalDateTime {
    pub epoch_second: i64,
    pub nano: i64,
}

/// Instant with a fixed UTC offset. `epoch_second_utc` is always UTC based,
/// whichever wire encoding it was read from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateTime {
    pub epoch_second_utc: i64,
    pub nano: i64,
    pub offset_seconds: i64,
}

/// What the seconds of a [`DateTimeZoneId`] are counted in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SecondsBasis {
    /// Wall-clock seconds in the named zone (legacy encoding)
    Local,
    /// Seconds since the epoch in UTC
    Utc,
}

/// Date-time in a named time zone.
///
/// Resolving local wall-clock seconds into an instant needs a zone
/// database, so the legacy encoding is kept as-is and tagged with its
/// basis.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DateTimeZoneId {
    pub epoch_second: i64,
    pub nano: i64,
    pub zone_id: String,
    pub basis: SecondsBasis,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Duration {
    pub months: i64,
    pub days: i64,
    pub seconds: i64,
    pub nanos: i64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point2D {
    pub srid: i64,
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point3D {
    pub srid: i64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Any struct a client may send as a parameter value.
#[derive(Clone, Debug, PartialEq)]
pub enum BoltStruct {
    Date(Date),
    Time(Time),
    LocalTime(LocalTime),
    LocalDateTime(LocalDateTime),
    DateTime(DateTime),
    DateTimeZoneId(DateTimeZoneId),
    Duration(Duration),
    Point2D(Point2D),
    Point3D(Point3D),
}

impl BoltStruct {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Date(_) => "Date",
            Self::Time(_) => "Time",
            Self::LocalTime(_) => "LocalTime",
            Self::LocalDateTime(_) => "LocalDateTime",
            Self::DateTime(_) => "DateTime",
            Self::DateTimeZoneId(_) => "DateTimeZoneId",
            Self::Duration(_) => "Duration",
            Self::Point2D(_) => "Point2D",
            Self::Point3D(_) => "Point3D",
        }
    }
}
