//! # Localisation types
//!
//! Planar poses of the vehicle, and the rigid transforms between the frames
//! they define.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use comms_if::eqpt::{loc::LocFix, odom::OdomSample};
use nalgebra::{Isometry2, Point2, Vector2};
use serde::Serialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The planar pose (location and heading) of the vehicle base link in some
/// parent frame (odometry or map).
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Pose2D {
    /// Location of the base link in the parent frame.
    pub loc_m: Point2<f64>,

    /// Heading of the vehicle, anticlockwise from the parent X axis.
    pub heading_rad: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Pose2D {
    fn default() -> Self {
        Self {
            loc_m: Point2::origin(),
            heading_rad: 0.0,
        }
    }
}

impl Pose2D {
    pub fn new(x_m: f64, y_m: f64, heading_rad: f64) -> Self {
        Self {
            loc_m: Point2::new(x_m, y_m),
            heading_rad,
        }
    }

    /// The transform which takes points in the vehicle frame at this pose into
    /// the parent frame.
    pub fn to_isometry(&self) -> Isometry2<f64> {
        Isometry2::new(self.loc_m.coords, self.heading_rad)
    }

    /// Returns true if every component of the pose is finite.
    pub fn is_finite(&self) -> bool {
        self.loc_m.x.is_finite() && self.loc_m.y.is_finite() && self.heading_rad.is_finite()
    }

    /// Express this pose relative to `origin`, i.e. in the vehicle frame at
    /// `origin`.
    pub fn relative_to(&self, origin: &Pose2D) -> Pose2D {
        let rel = origin.to_isometry().inverse() * self.to_isometry();

        Pose2D {
            loc_m: Point2::from(rel.translation.vector),
            heading_rad: rel.rotation.angle(),
        }
    }

    /// Apply `rel`, a pose in the vehicle frame at this pose, giving a pose in
    /// this pose's parent frame. The inverse of `relative_to`.
    pub fn compose(&self, rel: &Pose2D) -> Pose2D {
        let abs = self.to_isometry() * rel.to_isometry();

        Pose2D {
            loc_m: Point2::from(abs.translation.vector),
            heading_rad: abs.rotation.angle(),
        }
    }

    /// Straight line distance between the locations of two poses.
    pub fn distance_to(&self, other: &Pose2D) -> f64 {
        nalgebra::distance(&self.loc_m, &other.loc_m)
    }
}

impl From<&OdomSample> for Pose2D {
    fn from(sample: &OdomSample) -> Self {
        Pose2D::new(sample.loc_m[0], sample.loc_m[1], sample.heading_rad)
    }
}

impl From<&LocFix> for Pose2D {
    fn from(fix: &LocFix) -> Self {
        Pose2D::new(fix.loc_m[0], fix.loc_m[1], fix.heading_rad)
    }
}

/// Convert a transport array into a vector.
pub fn vec2(v: [f64; 2]) -> Vector2<f64> {
    Vector2::new(v[0], v[1])
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
