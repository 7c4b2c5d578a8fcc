//! Crossing detection between track edges and gates

use crate::{Gate, Timestamp, TrackPoint};
use serde::Serialize;
use smallvec::SmallVec;

/// A track point that ends an edge crossing at least one gate
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Crossing {
    /// Index of the crossing point in the track
    pub index: usize,
    /// Timestamp of the crossing point
    pub time: Timestamp,
    /// Indices of every gate crossed by the edge ending at this point
    pub gates: SmallVec<[usize; 2]>,
}

/// Find all track points at which the track crosses a gate
///
/// For every edge `points[i-1] -> points[i]` the later point is recorded once, however many
/// gates the edge crosses. The result is sorted by timestamp; points sharing a timestamp are
/// collapsed into the earliest one, which collects the gate indices of all of them.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn detect_crossings(points: &[TrackPoint], gates: &[Gate]) -> Vec<Crossing> {
    if gates.is_empty() || points.len() < 2 {
        return Vec::new();
    }

    let degenerate = gates.iter().filter(|gate| gate.is_degenerate()).count();
    if degenerate > 0 {
        tracing::warn!(
            "{} of {} gates have coincident endpoints and will never be crossed",
            degenerate,
            gates.len()
        );
    }

    let mut crossings: Vec<Crossing> = points
        .windows(2)
        .enumerate()
        .filter_map(|(edge, pair)| {
            let (from, to) = (pair[0].coord(), pair[1].coord());
            let crossed: SmallVec<[usize; 2]> = gates
                .iter()
                .enumerate()
                .filter(|(_, gate)| gate.is_crossed_by(from, to))
                .map(|(gate_index, _)| gate_index)
                .collect();

            (!crossed.is_empty()).then(|| Crossing {
                index: edge + 1,
                time: pair[1].time,
                gates: crossed,
            })
        })
        .collect();

    // Stable: ties keep track order
    crossings.sort_by_key(|crossing| crossing.time);
    crossings.dedup_by(|later, kept| {
        if later.time != kept.time {
            return false;
        }
        for gate_index in later.gates.drain(..) {
            if !kept.gates.contains(&gate_index) {
                kept.gates.push(gate_index);
            }
        }
        true
    });

    tracing::debug!(
        "Detected {} crossings over {} edges and {} gates",
        crossings.len(),
        points.len() - 1,
        gates.len()
    );
    crossings
}
