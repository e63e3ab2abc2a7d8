//! Parameters structure for NavCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

use super::NavCtrlError;
use crate::{lat_comp, obst_anal, state_est, toc_ctrl};
use crate::obst_anal::FreePath;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for navigation control, including those of every submodule.
#[derive(Debug, Clone, Deserialize)]
pub struct Params {

    // ---- STALENESS ----

    /// Odometry older than this is stale, and the vehicle halts until fresh
    /// odometry arrives.
    ///
    /// Units: seconds
    pub max_odom_age_s: f64,

    /// Point clouds older than this are stale.
    ///
    /// Units: seconds
    pub max_cloud_age_s: f64,

    /// Localisation fixes older than this are stale.
    ///
    /// Units: seconds
    pub max_loc_age_s: f64,

    /// What to assume about obstacles when the cloud is stale or missing.
    pub stale_cloud_policy: StaleCloudPolicy,

    // ---- GOAL ----

    /// The goal is reached once the vehicle is this close to it.
    ///
    /// Units: meters
    pub goal_tolerance_m: f64,

    /// Curvature driven along until a curvature telecommand is received.
    ///
    /// Units: 1/meters
    pub initial_curv_m: f64,

    // ---- SUBMODULES ----

    pub state_est: state_est::Params,

    pub obst_anal: obst_anal::Params,

    pub lat_comp: lat_comp::Params,

    pub toc_ctrl: toc_ctrl::Params,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Free path assumed when no fresh point cloud is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum StaleCloudPolicy {
    /// Assume an obstacle right in front of the vehicle, so it brakes to a
    /// stop.
    Conservative,

    /// Assume the path is clear, so the vehicle drives on.
    Optimistic,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for StaleCloudPolicy {
    fn default() -> Self {
        StaleCloudPolicy::Conservative
    }
}

impl StaleCloudPolicy {
    pub fn free_path(&self) -> FreePath {
        match self {
            StaleCloudPolicy::Conservative => FreePath::Blocked(0.0),
            StaleCloudPolicy::Optimistic => FreePath::Clear,
        }
    }
}

impl Params {
    /// Check the parameters which are not checked by the submodules
    /// themselves.
    pub fn validate(&self) -> Result<(), NavCtrlError> {
        let non_negative = [
            ("max_odom_age_s", self.max_odom_age_s),
            ("max_cloud_age_s", self.max_cloud_age_s),
            ("max_loc_age_s", self.max_loc_age_s),
            ("goal_tolerance_m", self.goal_tolerance_m),
            ("obst_anal.min_curvature_m", self.obst_anal.min_curvature_m),
            ("obst_anal.max_range_m", self.obst_anal.max_range_m),
            ("lat_comp.latency_s", self.lat_comp.latency_s),
        ];

        for (name, value) in non_negative.iter() {
            if value.is_nan() || *value < 0.0 {
                return Err(NavCtrlError::InvalidParams(format!(
                    "{} must be non-negative, got {}",
                    name, value
                )));
            }
        }

        if !self.initial_curv_m.is_finite() {
            return Err(NavCtrlError::InvalidParams(format!(
                "initial_curv_m must be finite, got {}",
                self.initial_curv_m
            )));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_params_file() {
        let params: Params = util::params::from_str(
            include_str!("../../../params/nav_ctrl.toml")
        ).unwrap();

        assert!(params.validate().is_ok());
        assert_eq!(params.stale_cloud_policy, StaleCloudPolicy::Conservative);
        assert!(params.toc_ctrl.validate().is_ok());
        assert!(params.state_est.history_len >= 1);
    }

    #[test]
    fn test_policy() {
        assert_eq!(StaleCloudPolicy::default().free_path(), FreePath::Blocked(0.0));
        assert_eq!(StaleCloudPolicy::Optimistic.free_path(), FreePath::Clear);
    }
}
