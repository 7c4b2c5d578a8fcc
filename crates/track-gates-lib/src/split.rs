//! Top-level segmentation API
//!
//! This module ties crossing detection and segment building together and provides the
//! batch entry point used when several tracks are split against the same gates.

use crate::{Gate, Palette, Result, Segmentation, Track, TrackPoint};
use crate::{build_segments, detect_crossings};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Engine configuration
///
/// Everything the engine reads besides the track and gates is passed in through this struct,
/// so a split never depends on global state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Colors assigned to segments by ordinal, cycling when exhausted.
    /// Default: a 10 color qualitative palette
    #[serde(default)]
    pub palette: Palette,
}

impl Config {
    /// Load a configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}

/// Split a track at every gate crossing and measure the resulting segments
///
/// Tracks with fewer than two points cannot cross anything; they produce a single segment
/// with zero distance and time instead of an error.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn split_track(points: &[TrackPoint], gates: &[Gate], palette: &Palette) -> Segmentation {
    if points.len() < 2 {
        tracing::debug!("Track has {} points, nothing to split", points.len());
    }

    let crossings = detect_crossings(points, gates);
    let result = build_segments(points, &crossings, palette);

    tracing::debug!(
        "Split {} points into {} segments: {:.1} m in {} ms",
        points.len(),
        result.segments.len(),
        result.total_distance,
        result.total_time
    );
    result
}

/// Split several tracks against the same gates in parallel
///
/// Results are returned in input order.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn split_many(tracks: &[Track], gates: &[Gate], palette: &Palette) -> Vec<Segmentation> {
    tracks
        .par_iter()
        .map(|track| split_track(track.points(), gates, palette))
        .collect()
}
