//! Implementations for the ObstAnal state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use chrono::{DateTime, Utc};
use log::trace;

use super::{free_path_distance, FreePath, Params, PointCloud};
use crate::loc::Pose2D;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Obstacle analyser, holding the most recent point cloud.
#[derive(Debug, Clone)]
pub struct ObstAnal {
    params: Params,

    cloud: Option<PointCloud>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ObstAnal {
    pub fn new(params: Params) -> Self {
        Self {
            params,
            cloud: None,
        }
    }

    /// Replace the held cloud with a new one. Any previous cloud is discarded.
    pub fn set_point_cloud(&mut self, cloud: PointCloud) {
        trace!("New point cloud with {} points", cloud.len());
        self.cloud = Some(cloud);
    }

    pub fn cloud(&self) -> Option<&PointCloud> {
        self.cloud.as_ref()
    }

    /// Capture time of the held cloud.
    pub fn cloud_time(&self) -> Option<DateTime<Utc>> {
        self.cloud.as_ref().and_then(|c| c.timestamp)
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Free path along `curv_m` for a vehicle at `pose`, using the held cloud.
    ///
    /// Returns `None` if no cloud has been received yet.
    pub fn free_path(&self, pose: &Pose2D, curv_m: f64) -> Option<FreePath> {
        let cloud = self.cloud.as_ref()?;

        let local = cloud.in_frame(pose);

        Some(free_path_distance(&local.points_m, curv_m, &self.params))
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point2;

    fn params() -> Params {
        Params {
            width_m: 0.4,
            length_m: 0.5,
            wheelbase_m: 0.3,
            margin_m: 0.05,
            min_curvature_m: 1e-3,
            max_range_m: 10.0,
        }
    }

    #[test]
    fn test_no_cloud() {
        let oa = ObstAnal::new(params());
        assert_eq!(oa.free_path(&Pose2D::default(), 0.0), None);
        assert_eq!(oa.cloud_time(), None);
    }

    #[test]
    fn test_free_path_from_moved_pose() {
        let mut oa = ObstAnal::new(params());

        // Wall point 3 m ahead, seen from the origin
        oa.set_point_cloud(PointCloud {
            points_m: vec![Point2::new(3.0, 0.0)],
            frame: Pose2D::new(0.0, 0.0, 0.0),
            timestamp: None,
        });

        let fp = oa.free_path(&Pose2D::new(0.0, 0.0, 0.0), 0.0).unwrap();
        assert_relative_eq!(fp.distance_m(), 2.55, epsilon = 1e-12);

        // After driving 1 m forwards the wall is 1 m nearer
        let fp = oa.free_path(&Pose2D::new(1.0, 0.0, 0.0), 0.0).unwrap();
        assert_relative_eq!(fp.distance_m(), 1.55, epsilon = 1e-12);

        // The held cloud is unchanged by queries
        assert_eq!(oa.cloud().unwrap().points_m, vec![Point2::new(3.0, 0.0)]);

        // Replacing with an empty cloud clears the path
        oa.set_point_cloud(PointCloud {
            points_m: vec![],
            frame: Pose2D::default(),
            timestamp: None,
        });
        assert_eq!(oa.free_path(&Pose2D::default(), 0.0), Some(FreePath::Clear));
    }
}
