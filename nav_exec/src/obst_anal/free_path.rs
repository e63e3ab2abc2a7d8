//! Free path length along a constant curvature arc

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::Point2;
use serde::Serialize;

use super::Params;
use util::maths::wrap_2pi;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Result of a free path query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum FreePath {
    /// No obstacle lies in the swept corridor.
    Clear,

    /// The padded front of the vehicle reaches an obstacle after travelling
    /// this far along the arc. Never negative.
    ///
    /// Units: meters
    Blocked(f64),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl FreePath {
    /// The distance as a number, with `Clear` being infinitely far.
    pub fn distance_m(&self) -> f64 {
        match self {
            FreePath::Clear => f64::INFINITY,
            FreePath::Blocked(d) => *d,
        }
    }

    /// The blocked distance, or `None` if clear.
    pub fn blocked_m(&self) -> Option<f64> {
        match self {
            FreePath::Clear => None,
            FreePath::Blocked(d) => Some(*d),
        }
    }

    /// Limit this free path to at most `limit_m`.
    pub fn cap(self, limit_m: f64) -> FreePath {
        if limit_m < self.distance_m() {
            FreePath::Blocked(limit_m.max(0.0))
        }
        else {
            self
        }
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Calculate how far the vehicle can drive along an arc of curvature `curv_m`
/// before the front of its padded body reaches the first obstacle point.
///
/// Points must be in the current vehicle frame. A point is an obstacle if it
/// lies inside the corridor swept by the padded body, i.e. within the corridor
/// half width of the arc traced by the base link. The distance to an obstacle
/// is the arc length to the point's projection onto the arc, less the front
/// overhang, floored at zero.
///
/// Non-finite points, and points beyond the maximum range, are ignored.
pub fn free_path_distance(points_m: &[Point2<f64>], curv_m: f64, params: &Params) -> FreePath {
    let half_width_m = params.corridor_half_width_m();
    let straight = !(curv_m.abs() >= params.min_curvature_m);

    let mut nearest_m: Option<f64> = None;

    for p in points_m {
        if !p.x.is_finite() || !p.y.is_finite() {
            continue;
        }
        if p.coords.norm() > params.max_range_m {
            continue;
        }

        let arc_m = if straight {
            straight_arc_length(p, half_width_m)
        }
        else {
            curved_arc_length(p, curv_m, half_width_m)
        };

        if let Some(s) = arc_m {
            nearest_m = Some(match nearest_m {
                Some(n) => n.min(s),
                None => s,
            });
        }
    }

    match nearest_m {
        Some(s) => FreePath::Blocked((s - params.front_offset_m()).max(0.0)),
        None => FreePath::Clear,
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Distance along a straight line to a point in the corridor ahead.
fn straight_arc_length(p: &Point2<f64>, half_width_m: f64) -> Option<f64> {
    if p.y.abs() < half_width_m && p.x > 0.0 {
        Some(p.x)
    }
    else {
        None
    }
}

/// Arc length around the turn centre to a point in the annular corridor.
fn curved_arc_length(p: &Point2<f64>, curv_m: f64, half_width_m: f64) -> Option<f64> {
    let radius_m = 1.0 / curv_m;
    let centre = Point2::new(0.0, radius_m);

    let dist_m = nalgebra::distance(p, &centre);
    if (dist_m - radius_m.abs()).abs() >= half_width_m {
        return None;
    }

    // Angle swept from the base link to the point, in the direction of travel
    let angle_rad = wrap_2pi(p.x.atan2(radius_m.signum() * (radius_m - p.y)));

    Some(radius_m.abs() * angle_rad)
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
