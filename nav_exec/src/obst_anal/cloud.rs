//! Obstacle point clouds and frame transforms

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use chrono::{DateTime, Utc};
use nalgebra::Point2;

use crate::loc::Pose2D;
use comms_if::eqpt::lidar::CloudSample;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A set of obstacle points together with the frame they are expressed in.
#[derive(Debug, Clone, PartialEq)]
pub struct PointCloud {
    /// Obstacle points in the vehicle frame at `frame`.
    pub points_m: Vec<Point2<f64>>,

    /// The odometry pose of the vehicle whose frame the points are expressed
    /// in.
    pub frame: Pose2D,

    /// Capture time of the underlying scan.
    pub timestamp: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PointCloud {
    /// Build a cloud from a transport sample captured while the vehicle was
    /// at `frame`.
    pub fn from_sample(sample: &CloudSample, frame: Pose2D) -> Self {
        Self {
            points_m: sample
                .points_m
                .iter()
                .map(|p| Point2::new(p[0], p[1]))
                .collect(),
            frame,
            timestamp: Some(sample.timestamp),
        }
    }

    /// Return a new cloud holding the same obstacles expressed in the vehicle
    /// frame at `to`.
    pub fn in_frame(&self, to: &Pose2D) -> PointCloud {
        PointCloud {
            points_m: transform_to_frame(&self.points_m, &self.frame, to),
            frame: *to,
            timestamp: self.timestamp,
        }
    }

    pub fn len(&self) -> usize {
        self.points_m.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points_m.is_empty()
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Re-express points given in the vehicle frame at `from` in the vehicle frame
/// at `to`.
///
/// Both poses must be in the same parent frame. Applying the transform with
/// `from` and `to` swapped undoes it.
pub fn transform_to_frame(
    points_m: &[Point2<f64>],
    from: &Pose2D,
    to: &Pose2D,
) -> Vec<Point2<f64>> {
    let tf = to.to_isometry().inverse() * from.to_isometry();

    points_m.iter().map(|p| tf * p).collect()
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
