//! JSON split requests: a list of points plus the gates to split them at

use crate::{DataError, Gate, Palette, Result, Segmentation, Track, TrackPoint, split_track};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

/// Body of a split request
///
/// ```json
/// { "points": [{"lon": 0.0, "lat": 0.0, "time": "2023-05-01T08:00:00Z"}],
///   "checkPoints": [[0.5, -1.0, 0.5, 1.0]] }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SplitRequest {
    pub points: Vec<TrackPoint>,
    #[serde(rename = "checkPoints", alias = "gates", default)]
    pub gates: Vec<Gate>,
}

impl SplitRequest {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Check the request and split it into a validated track and its gates
    pub fn validate(self) -> Result<(Track, Vec<Gate>)> {
        if let Some(index) = self.gates.iter().position(|gate| !gate.is_finite()) {
            return Err(DataError::InvalidGate(format!(
                "Gate {index} has a non-finite coordinate"
            )));
        }
        Ok((Track::new(self.points)?, self.gates))
    }

    /// Validate and split the request's track at its gates
    pub fn run(self, palette: &Palette) -> Result<Segmentation> {
        let (track, gates) = self.validate()?;
        Ok(split_track(track.points(), &gates, palette))
    }
}

impl std::str::FromStr for SplitRequest {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}
