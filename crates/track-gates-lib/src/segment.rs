//! Segment building: splitting a track at its crossings and measuring each piece

use crate::{Crossing, Millis, Palette, TrackPoint, utils};
use serde::Serialize;

/// A contiguous piece of the track between two crossings (or the track ends)
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Segment {
    /// Ordinal of the segment in the output, starting at 0
    pub id: usize,
    /// Traveled distance in meters
    pub distance: f64,
    /// Elapsed time in milliseconds
    pub time: Millis,
    /// Minutes per kilometer, absent when the segment covers no distance
    pub pace: Option<f64>,
    /// Display color, `palette[id % palette.len()]`
    pub color: String,
    /// Points of the segment, the crossing point opens the next segment
    pub points: Vec<TrackPoint>,
}

/// Result of splitting one track
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Segmentation {
    pub segments: Vec<Segment>,
    /// Sum of every edge distance in meters, independent of the segmentation
    pub total_distance: f64,
    /// Time between the first and last point in milliseconds
    pub total_time: Millis,
    /// Minutes per kilometer over the whole track, absent when nothing was traveled
    pub average_pace: Option<f64>,
}

/// Walk state: where the open segment starts and how far it has traveled
struct SegmentWalk<'a> {
    points: &'a [TrackPoint],
    palette: &'a Palette,
    start: usize,
    distance: f64,
    segments: Vec<Segment>,
}

impl<'a> SegmentWalk<'a> {
    fn new(points: &'a [TrackPoint], palette: &'a Palette) -> Self {
        Self {
            points,
            palette,
            start: 0,
            distance: 0.0,
            segments: Vec::new(),
        }
    }

    /// Account for the edge ending at `points[index]`
    #[inline]
    fn advance(&mut self, edge_distance: f64) {
        self.distance += edge_distance;
    }

    /// Close the open segment before `end` (exclusive) and open the next one there
    fn close(&mut self, end: usize) {
        let (points, time) = if self.start < end {
            let points = &self.points[self.start..end];
            let time = points[points.len() - 1].time.saturating_sub(points[0].time);
            (points.to_vec(), time)
        } else {
            // A repeated crossing at the same point closes an empty segment
            (Vec::new(), 0)
        };

        let id = self.segments.len();
        self.segments.push(Segment {
            id,
            distance: self.distance,
            time,
            pace: utils::pace_min_per_km(self.distance, time),
            color: self.palette.color(id).to_string(),
            points,
        });
        self.distance = 0.0;
        self.start = end;
    }

    /// Close the trailing segment, which always ends at the last point
    fn finish(mut self) -> Vec<Segment> {
        let end = self.points.len();
        self.close(end);
        self.segments
    }
}

/// Split the track at the given crossings and measure every segment
///
/// The walk visits each edge `points[i-1] -> points[i]` once. Its distance is added to the
/// open segment and to the track total; then every crossing located at `points[i]` closes a
/// segment, in crossing-list order. The closed segment ends at `points[i-1]` but includes the
/// crossing edge's distance, and the next segment starts at `points[i]`. Segment points
/// therefore partition the track and the segment distances add up to the total.
///
/// A crossing at the first point closes an empty leading segment. Crossings past the last
/// point never match and are ignored.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn build_segments(
    points: &[TrackPoint],
    crossings: &[Crossing],
    palette: &Palette,
) -> Segmentation {
    let mut ordered: Vec<&Crossing> = crossings.iter().collect();
    // Stable: crossings at the same point keep their list order
    ordered.sort_by_key(|crossing| crossing.index);
    let mut pending = ordered.into_iter().peekable();
    let mut walk = SegmentWalk::new(points, palette);
    while pending.next_if(|crossing| crossing.index == 0).is_some() {
        walk.close(0);
    }
    let mut total_distance = 0.0;

    for (index, pair) in points.windows(2).enumerate().map(|(edge, pair)| (edge + 1, pair)) {
        let edge_distance = utils::equirectangular_distance(pair[0].coord(), pair[1].coord());
        total_distance += edge_distance;
        walk.advance(edge_distance);

        while pending.next_if(|crossing| crossing.index == index).is_some() {
            walk.close(index);
        }
    }

    let unmatched = pending.count();
    if unmatched > 0 {
        tracing::debug!("Ignoring {} crossings outside the track", unmatched);
    }

    let total_time = match (points.first(), points.last()) {
        (Some(first), Some(last)) => last.time.saturating_sub(first.time),
        _ => 0,
    };

    Segmentation {
        segments: walk.finish(),
        total_distance,
        total_time,
        average_pace: utils::pace_min_per_km(total_distance, total_time),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Timestamp;
    use smallvec::smallvec;

    fn line_track(lons: &[f64]) -> Vec<TrackPoint> {
        lons.iter()
            .enumerate()
            .map(|(i, &lon)| TrackPoint::new(lon, 0.0, i as Timestamp * 1000))
            .collect()
    }

    fn crossing_at(points: &[TrackPoint], index: usize) -> Crossing {
        Crossing {
            index,
            time: points[index].time,
            gates: smallvec![0],
        }
    }

    fn edge(points: &[TrackPoint], index: usize) -> f64 {
        utils::equirectangular_distance(points[index - 1].coord(), points[index].coord())
    }

    fn concatenated(result: &Segmentation) -> Vec<TrackPoint> {
        result
            .segments
            .iter()
            .flat_map(|segment| segment.points.iter().copied())
            .collect()
    }

    #[test]
    fn test_no_crossings_single_segment() {
        let points = line_track(&[0.0, 0.001, 0.002, 0.003, 0.004]);
        let result = build_segments(&points, &[], &Palette::default());

        assert_eq!(result.segments.len(), 1);
        let segment = &result.segments[0];
        assert_eq!(segment.id, 0);
        assert_eq!(segment.points, points);
        assert_eq!(segment.time, 4000);
        assert_eq!(segment.color, Palette::default().color(0));
        assert!((segment.distance - result.total_distance).abs() < 1e-9);
    }

    #[test]
    fn test_close_at_crossing() {
        let points = line_track(&[0.0, 0.001, 0.002, 0.003, 0.004]);
        let crossings = [crossing_at(&points, 2)];
        let result = build_segments(&points, &crossings, &Palette::default());

        assert_eq!(result.segments.len(), 2);
        let (first, second) = (&result.segments[0], &result.segments[1]);
        assert_eq!(first.points, points[0..2]);
        assert_eq!(first.time, 1000);
        assert!((first.distance - (edge(&points, 1) + edge(&points, 2))).abs() < 1e-9);
        assert_eq!(second.points, points[2..]);
        assert_eq!(second.time, 2000);
        assert!((second.distance - (edge(&points, 3) + edge(&points, 4))).abs() < 1e-9);
        assert_eq!(concatenated(&result), points);
    }

    #[test]
    fn test_ids_and_colors_are_sequential() {
        let points = line_track(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        let crossings: Vec<Crossing> = (1..5).map(|i| crossing_at(&points, i)).collect();
        let palette = Palette::new(["a", "b", "c"]).unwrap();
        let result = build_segments(&points, &crossings, &palette);

        let ids: Vec<usize> = result.segments.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
        let colors: Vec<&str> = result.segments.iter().map(|s| s.color.as_str()).collect();
        assert_eq!(colors, vec!["a", "b", "c", "a", "b"]);
    }

    #[test]
    fn test_crossing_at_last_point_gives_zero_trailing_segment() {
        let points = line_track(&[0.0, 0.001, 0.002]);
        let crossings = [crossing_at(&points, 2)];
        let result = build_segments(&points, &crossings, &Palette::default());

        let trailing = &result.segments[1];
        assert_eq!(trailing.points, points[2..]);
        assert_eq!(trailing.distance, 0.0);
        assert_eq!(trailing.time, 0);
    }

    #[test]
    fn test_crossing_at_first_edge_gives_zero_time_leading_segment() {
        let points = line_track(&[0.0, 0.001, 0.002]);
        let crossings = [crossing_at(&points, 1)];
        let result = build_segments(&points, &crossings, &Palette::default());

        let leading = &result.segments[0];
        assert_eq!(leading.points, points[0..1]);
        assert_eq!(leading.time, 0);
        assert!((leading.distance - edge(&points, 1)).abs() < 1e-9);
    }

    #[test]
    fn test_repeated_crossing_closes_empty_segment() {
        let points = line_track(&[0.0, 0.001, 0.002]);
        let crossings = [crossing_at(&points, 1), crossing_at(&points, 1)];
        let result = build_segments(&points, &crossings, &Palette::default());

        assert_eq!(result.segments.len(), 3);
        let empty = &result.segments[1];
        assert!(empty.points.is_empty());
        assert_eq!(empty.distance, 0.0);
        assert_eq!(empty.time, 0);
        assert_eq!(concatenated(&result), points);
    }

    #[test]
    fn test_crossing_at_first_point_closes_empty_segment() {
        let points = line_track(&[0.0, 0.001, 0.002]);
        let crossings = [Crossing {
            index: 0,
            time: 0,
            gates: smallvec![0],
        }];
        let result = build_segments(&points, &crossings, &Palette::default());

        assert_eq!(result.segments.len(), 2);
        let leading = &result.segments[0];
        assert!(leading.points.is_empty());
        assert_eq!(leading.distance, 0.0);
        assert_eq!(leading.time, 0);
        assert_eq!(leading.pace, None);
        assert_eq!(result.segments[1].id, 1);
        assert_eq!(result.segments[1].points, points);
        assert_eq!(concatenated(&result), points);
    }

    #[test]
    fn test_crossings_past_last_point_are_ignored() {
        let points = line_track(&[0.0, 0.001, 0.002]);
        let crossings = [Crossing {
            index: 10,
            time: 10_000,
            gates: smallvec![0],
        }];
        let result = build_segments(&points, &crossings, &Palette::default());
        assert_eq!(result.segments.len(), 1);
        assert_eq!(result.segments[0].points, points);
    }

    #[test]
    fn test_extreme_times_saturate() {
        let points = vec![
            TrackPoint::new(0.0, 0.0, -9_000_000_000_000_000_000),
            TrackPoint::new(0.001, 0.0, 9_000_000_000_000_000_000),
        ];
        let result = build_segments(&points, &[], &Palette::default());
        assert_eq!(result.total_time, Millis::MAX);
        assert_eq!(result.segments[0].time, Millis::MAX);
    }

    #[test]
    fn test_pace() {
        // 0.009 degrees of longitude on the equator is about 1 km
        let points = vec![
            TrackPoint::new(0.0, 0.0, 0),
            TrackPoint::new(0.009, 0.0, 300_000),
            TrackPoint::new(0.009, 0.0, 360_000),
        ];
        let crossings = [crossing_at(&points, 2)];
        let result = build_segments(&points, &crossings, &Palette::default());

        let first = &result.segments[0];
        let expected = (300_000.0 / 60_000.0) / (first.distance / 1000.0);
        assert!((first.pace.unwrap() - expected).abs() < 1e-9);
        assert!((first.pace.unwrap() - 5.0).abs() < 0.01);

        // Standing still at the last point
        assert_eq!(result.segments[1].distance, 0.0);
        assert_eq!(result.segments[1].pace, None);

        let average = (360_000.0 / 60_000.0) / (result.total_distance / 1000.0);
        assert!((result.average_pace.unwrap() - average).abs() < 1e-9);
    }

    #[test]
    fn test_segment_distances_sum_to_total() {
        let points: Vec<TrackPoint> = (0..50)
            .map(|i| {
                let t = i as f64;
                TrackPoint::new(
                    -0.1278 + t * 0.0003,
                    51.5074 + (t * 0.7).sin() * 0.0002,
                    i * 5000,
                )
            })
            .collect();
        let crossings: Vec<Crossing> = [7, 19, 20, 33]
            .into_iter()
            .map(|i| crossing_at(&points, i))
            .collect();
        let result = build_segments(&points, &crossings, &Palette::default());

        let sum: f64 = result.segments.iter().map(|s| s.distance).sum();
        assert!((sum - result.total_distance).abs() < 1e-6);
        assert!(result.segments.iter().all(|s| s.distance >= 0.0));
        assert_eq!(result.total_time, 49 * 5000);
        assert_eq!(concatenated(&result), points);
    }

    #[test]
    fn test_single_point_track() {
        let points = line_track(&[1.0]);
        let result = build_segments(&points, &[], &Palette::default());
        assert_eq!(result.segments.len(), 1);
        assert_eq!(result.segments[0].points, points);
        assert_eq!(result.segments[0].distance, 0.0);
        assert_eq!(result.total_distance, 0.0);
        assert_eq!(result.total_time, 0);
    }

    #[test]
    fn test_empty_track() {
        let result = build_segments(&[], &[], &Palette::default());
        assert_eq!(result.segments.len(), 1);
        assert!(result.segments[0].points.is_empty());
        assert_eq!(result.total_time, 0);
    }

    #[test]
    fn test_serialized_field_names() {
        let points = line_track(&[0.0, 0.001]);
        let result = build_segments(&points, &[], &Palette::new(["#abcdef"]).unwrap());
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("totalDistance").is_some());
        assert_eq!(json["totalTime"], 1000);
        assert_eq!(json["segments"][0]["color"], "#abcdef");
        assert_eq!(json["segments"][0]["id"], 0);
        assert!(json["segments"][0]["pace"].is_f64());
        assert!(json["averagePace"].is_f64());
        assert_eq!(json["segments"][0]["points"][1]["time"], 1000);
    }
}
