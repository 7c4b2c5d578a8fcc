//! Planar geometry primitives shared by crossing detection and segment measurement
//!
//! Coordinates are `geo::Coord<f64>` with `x` = longitude and `y` = latitude, both in degrees.

use geo::Coord;

/// Earth's mean radius in meters, used by the equirectangular approximation
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Turning direction of three points
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    Clockwise,
    Collinear,
    CounterClockwise,
}

impl Orientation {
    /// The orientation seen when the last two points are swapped
    #[inline]
    pub fn reversed(self) -> Self {
        match self {
            Orientation::Clockwise => Orientation::CounterClockwise,
            Orientation::Collinear => Orientation::Collinear,
            Orientation::CounterClockwise => Orientation::Clockwise,
        }
    }

    /// Sign as an integer (-1, 0 or 1)
    #[inline]
    pub fn signum(self) -> i8 {
        match self {
            Orientation::Clockwise => -1,
            Orientation::Collinear => 0,
            Orientation::CounterClockwise => 1,
        }
    }
}

/// Orientation of the triple `(p, q, r)` from the sign of the cross product
///
/// Products closer than `f64::EPSILON` to each other are treated as collinear, so values
/// that only differ by rounding noise do not flip the sign.
#[inline]
pub fn orientation(p: Coord<f64>, q: Coord<f64>, r: Coord<f64>) -> Orientation {
    let a = (r.y - p.y) * (q.x - p.x);
    let b = (q.y - p.y) * (r.x - p.x);
    if a > b + f64::EPSILON {
        Orientation::CounterClockwise
    } else if a + f64::EPSILON < b {
        Orientation::Clockwise
    } else {
        Orientation::Collinear
    }
}

/// General-position segment crossing test between `p1-p2` and `p3-p4`
///
/// Collinear overlaps report no crossing. Touching at an endpoint may report a crossing,
/// so gates should not be placed exactly on track points.
#[inline]
pub fn segments_intersect(p1: Coord<f64>, p2: Coord<f64>, p3: Coord<f64>, p4: Coord<f64>) -> bool {
    orientation(p1, p3, p4) != orientation(p2, p3, p4)
        && orientation(p1, p2, p3) != orientation(p1, p2, p4)
}

/// Equirectangular distance in meters between two coordinates
///
/// Cheap closed form that is accurate for consecutive GPS fixes a few meters to a few
/// kilometers apart. Not a great-circle distance.
#[inline]
pub fn equirectangular_distance(from: Coord<f64>, to: Coord<f64>) -> f64 {
    let lambda1 = from.x.to_radians();
    let lambda2 = to.x.to_radians();
    let phi1 = from.y.to_radians();
    let phi2 = to.y.to_radians();

    let x = (lambda2 - lambda1) * ((phi1 + phi2) / 2.0).cos();
    let y = phi2 - phi1;
    (x * x + y * y).sqrt() * EARTH_RADIUS_METERS
}

/// Pace in minutes per kilometer, `None` when nothing was traveled
#[inline]
pub fn pace_min_per_km(distance_meters: f64, elapsed_millis: i64) -> Option<f64> {
    if distance_meters > 0.0 {
        Some((elapsed_millis as f64 / 60_000.0) / (distance_meters / 1000.0))
    } else {
        None
    }
}
