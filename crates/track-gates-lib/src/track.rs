//! Track loading and validation
//!
//! This module provides the `Track` struct, an ordered list of timestamped points that has
//! been checked for the properties the segmentation engine relies on: finite coordinates and
//! non-decreasing timestamps.

use crate::point::datetime_to_millis;
use crate::{DataError, Millis, Result, TrackPoint, is_representable};
use geo::Rect;
use std::io::Read;
use std::path::Path;
use time::OffsetDateTime;

/// A validated GPS track
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Track {
    points: Vec<TrackPoint>,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl Track {
    /// Create a track from points, checking coordinates and timestamp order
    pub fn new(points: Vec<TrackPoint>) -> Result<Self> {
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(DataError::InvalidGeometry(format!(
                "Point {index} has a non-finite coordinate"
            )));
        }

        if let Some(index) = points.iter().position(|p| !is_representable(p.time)) {
            return Err(DataError::InvalidTimestamp(format!(
                "Point {index} time {} ms is out of range",
                points[index].time
            )));
        }

        if let Some(edge) = points.windows(2).position(|pair| pair[1].time < pair[0].time) {
            return Err(DataError::UnorderedTimestamps { index: edge + 1 });
        }

        Ok(Self { points })
    }

    /// Build a track from the first GPX track, joining its segments in order
    ///
    /// Every point must carry a timestamp.
    pub fn from_gpx(gpx_data: gpx::Gpx) -> Result<Self> {
        #[cfg(feature = "profiling")]
        profiling::scope!("track::from_gpx");

        let track_count = gpx_data.tracks.len();
        let first = gpx_data.tracks.into_iter().next().ok_or(DataError::NoTrack)?;
        if track_count > 1 {
            tracing::info!("GPX has {} tracks, using only the first one", track_count);
        }

        let points = first
            .segments
            .into_iter()
            .flat_map(|segment| segment.points)
            .enumerate()
            .map(|(index, waypoint)| {
                let point = waypoint.point();
                let time = waypoint
                    .time
                    .map(|time| datetime_to_millis(OffsetDateTime::from(time)))
                    .ok_or(DataError::MissingTimestamp { index })?;
                Ok(TrackPoint {
                    lon: point.x(),
                    lat: point.y(),
                    ele: waypoint.elevation,
                    time,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Self::new(points)
    }

    /// Parse GPX data from a reader
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_gpx(gpx::read(reader)?)
    }

    /// Load a GPX file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        let reader = std::io::BufReader::new(file);
        Self::from_reader(reader)
    }

    #[inline]
    pub fn points(&self) -> &[TrackPoint] {
        &self.points
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Smallest rectangle containing every point (x = longitude, y = latitude)
    pub fn bounds(&self) -> Option<Rect<f64>> {
        let first = self.points.first()?.coord();
        let (min, max) = self
            .points
            .iter()
            .fold((first, first), |(mut min, mut max), point| {
                min.x = min.x.min(point.lon);
                min.y = min.y.min(point.lat);
                max.x = max.x.max(point.lon);
                max.y = max.y.max(point.lat);
                (min, max)
            });
        Some(Rect::new(min, max))
    }

    /// `[lon, lat]` pairs for drawing the track
    pub fn coordinates(&self) -> Vec<[f64; 2]> {
        self.points.iter().map(|p| [p.lon, p.lat]).collect()
    }

    /// Time between the first and last point in milliseconds
    pub fn duration(&self) -> Millis {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => last.time.saturating_sub(first.time),
            _ => 0,
        }
    }

    pub fn into_points(self) -> Vec<TrackPoint> {
        self.points
    }
}
