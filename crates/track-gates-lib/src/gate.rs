//! Gate lines that split a track when crossed

use crate::{DataError, Result, utils};
use geo::{Coord, Line};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A straight crossing boundary between two `(lon, lat)` endpoints
///
/// Serialized as the 4-tuple `[lonA, latA, lonB, latB]`. Gates carry no identity other than
/// their position in the gate list.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct Gate {
    line: Line<f64>,
}

impl Gate {
    /// Create a gate between `(lon_a, lat_a)` and `(lon_b, lat_b)`
    pub fn new(lon_a: f64, lat_a: f64, lon_b: f64, lat_b: f64) -> Self {
        Self {
            line: Line::new(Coord { x: lon_a, y: lat_a }, Coord { x: lon_b, y: lat_b }),
        }
    }

    /// The gate as a line (x = longitude, y = latitude)
    #[inline]
    pub fn line(&self) -> Line<f64> {
        self.line
    }

    /// Whether both endpoints coincide, in which case the gate can never be crossed
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.line.start == self.line.end
    }

    /// Whether all four coordinates are finite numbers
    pub fn is_finite(&self) -> bool {
        self.to_array().iter().all(|v| v.is_finite())
    }

    /// Whether the track edge `from-to` crosses this gate
    #[inline]
    pub fn is_crossed_by(&self, from: Coord<f64>, to: Coord<f64>) -> bool {
        utils::segments_intersect(from, to, self.line.start, self.line.end)
    }

    /// `[lonA, latA, lonB, latB]`
    pub fn to_array(&self) -> [f64; 4] {
        [
            self.line.start.x,
            self.line.start.y,
            self.line.end.x,
            self.line.end.y,
        ]
    }
}

impl From<[f64; 4]> for Gate {
    fn from([lon_a, lat_a, lon_b, lat_b]: [f64; 4]) -> Self {
        Self::new(lon_a, lat_a, lon_b, lat_b)
    }
}

impl From<Gate> for [f64; 4] {
    fn from(gate: Gate) -> Self {
        gate.to_array()
    }
}

impl From<Line<f64>> for Gate {
    fn from(line: Line<f64>) -> Self {
        Self { line }
    }
}

/// Parses `lonA,latA,lonB,latB`
impl FromStr for Gate {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self> {
        let values = s
            .split(',')
            .map(|part| {
                part.trim()
                    .parse::<f64>()
                    .map_err(|e| DataError::InvalidGate(format!("{s:?}: {e}")))
            })
            .collect::<Result<Vec<f64>>>()?;

        let values: [f64; 4] = values.try_into().map_err(|v: Vec<f64>| {
            DataError::InvalidGate(format!("{s:?}: expected 4 values, got {}", v.len()))
        })?;

        let gate = Gate::from(values);
        if !gate.is_finite() {
            return Err(DataError::InvalidGate(format!("{s:?}: non-finite coordinate")));
        }
        Ok(gate)
    }
}
