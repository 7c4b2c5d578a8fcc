//! Timestamped track points

use crate::{DataError, Result};
use geo::Coord;
use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Milliseconds since the Unix epoch
pub type Timestamp = i64;

/// Elapsed time in milliseconds, the difference of two [`Timestamp`]s
pub type Millis = i64;

/// A single recorded GPS fix
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    /// Longitude in degrees
    pub lon: f64,
    /// Latitude in degrees
    pub lat: f64,
    /// Elevation in meters (carried through, never used for measurements)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ele: Option<f64>,
    /// Recording time, accepted as integer milliseconds or an RFC 3339 string
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub time: Timestamp,
}

impl TrackPoint {
    /// Create a point without elevation
    pub fn new(lon: f64, lat: f64, time: Timestamp) -> Self {
        Self {
            lon,
            lat,
            ele: None,
            time,
        }
    }

    /// Planar coordinate (x = longitude, y = latitude)
    #[inline]
    pub fn coord(&self) -> Coord<f64> {
        Coord {
            x: self.lon,
            y: self.lat,
        }
    }

    /// Whether both coordinates are finite numbers
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.lon.is_finite() && self.lat.is_finite()
    }
}

/// Parse an RFC 3339 date-time into milliseconds since the Unix epoch
pub fn parse_timestamp(text: &str) -> Result<Timestamp> {
    let datetime = OffsetDateTime::parse(text.trim(), &Rfc3339)
        .map_err(|e| DataError::InvalidTimestamp(format!("{text:?}: {e}")))?;
    Ok(datetime_to_millis(datetime))
}

/// Format milliseconds since the Unix epoch as an RFC 3339 date-time
pub fn format_timestamp(millis: Timestamp) -> Result<String> {
    let datetime = OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000)
        .map_err(|e| DataError::InvalidTimestamp(format!("{millis}: {e}")))?;
    datetime
        .format(&Rfc3339)
        .map_err(|e| DataError::InvalidTimestamp(format!("{millis}: {e}")))
}

/// Whether the timestamp lies within the date range a GPX time can hold
pub fn is_representable(millis: Timestamp) -> bool {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000).is_ok()
}

#[inline]
pub(crate) fn datetime_to_millis(datetime: OffsetDateTime) -> Timestamp {
    (datetime.unix_timestamp_nanos() / 1_000_000) as Timestamp
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Millis(i64),
    Fractional(f64),
    Text(String),
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> std::result::Result<Timestamp, D::Error>
where
    D: Deserializer<'de>,
{
    match RawTimestamp::deserialize(deserializer)? {
        RawTimestamp::Millis(millis) => Ok(millis),
        RawTimestamp::Fractional(millis) if millis.is_finite() => Ok(millis.round() as Timestamp),
        RawTimestamp::Fractional(millis) => Err(serde::de::Error::custom(format!(
            "non-finite timestamp {millis}"
        ))),
        RawTimestamp::Text(text) => parse_timestamp(&text).map_err(serde::de::Error::custom),
    }
}
