//! Track Gates Library - Gate Crossing Segmentation for GPS Tracks
//!
//! This library splits a recorded GPS track into consecutive segments at the points where
//! the track crosses user-defined gate lines, and measures the distance and elapsed time of
//! every segment.
//!
//! # Architecture
//!
//! - **[`TrackPoint`]** / **[`Track`]**: Timestamped points, validated and loaded from GPX
//! - **[`Gate`]**: A straight crossing boundary between two coordinates
//! - **[`detect_crossings`]**: Finds the track points that end an edge crossing any gate
//! - **[`build_segments`]**: Walks the track and closes a segment at every crossing
//! - **[`split_track`]**: Both stages in one pure call, plus [`split_many`] for batches
//!
//! # Performance Characteristics
//!
//! - **Crossing detection**: O(N×M) for N points and M gates, no spatial index
//! - **Segment building**: O(N + C log C) for C crossings
//! - **Memory**: O(N) for the copied segment points

mod crossing;
mod gate;
mod palette;
mod point;
mod request;
mod segment;
mod split;
mod track;
pub mod utils;

// Public API exports
pub use crossing::{Crossing, detect_crossings};
pub use gate::Gate;
pub use palette::Palette;
pub use point::{
    Millis, Timestamp, TrackPoint, format_timestamp, is_representable, parse_timestamp,
};
pub use request::SplitRequest;
pub use segment::{Segment, Segmentation, build_segments};
pub use split::{Config, split_many, split_track};
pub use track::Track;

/// Error types for loading and validating engine inputs
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("GPX parsing error: {0}")]
    GpxParse(#[from] gpx::errors::GpxError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Invalid gate: {0}")]
    InvalidGate(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Point {index} has no timestamp")]
    MissingTimestamp { index: usize },

    #[error("Timestamps go backwards at point {index}")]
    UnorderedTimestamps { index: usize },

    #[error("GPX file contains no track")]
    NoTrack,

    #[error("Empty palette")]
    EmptyPalette,
}

pub type Result<T> = std::result::Result<T, DataError>;
