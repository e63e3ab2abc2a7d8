//! Implementations for the StateEst state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use chrono::{DateTime, Utc};
use log::{info, trace, warn};
use nalgebra::{Point2, Vector2};
use serde::Serialize;

// Internal
use super::{HistoryBuffer, HistoryError, Params};
use crate::loc::{vec2, Pose2D};
use comms_if::eqpt::{loc::LocFix, odom::OdomSample};
use util::maths::finite_or;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The live kinematic state of the vehicle in the odometry frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VehicleState {
    pub pose: Pose2D,

    /// Units: meters/second,
    /// Frame: Odometry
    pub vel_ms: Vector2<f64>,

    /// Units: radians/second
    pub ang_vel_rads: f64,

    /// Magnitude of `vel_ms`.
    ///
    /// Units: meters/second
    pub speed_ms: f64,
}

/// A snapshot of the vehicle state at one past odometry update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistorySample {
    pub loc_m: Point2<f64>,
    pub vel_ms: Vector2<f64>,
    pub ang_vel_rads: f64,
    pub speed_ms: f64,
}

/// State estimator.
///
/// Owns the only live [`VehicleState`] and the history buffer. Other modules
/// only ever get shared references to either.
#[derive(Debug, Clone)]
pub struct StateEst {
    state: VehicleState,

    history: HistoryBuffer<HistorySample>,

    /// Pose given by the first odometry update. `Some` once ready.
    odom_origin: Option<Pose2D>,

    /// Latest global pose from localisation, in the map frame.
    global_pose: Option<Pose2D>,

    last_odom_time: Option<DateTime<Utc>>,
    last_loc_time: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for VehicleState {
    fn default() -> Self {
        Self {
            pose: Pose2D::default(),
            vel_ms: Vector2::zeros(),
            ang_vel_rads: 0.0,
            speed_ms: 0.0,
        }
    }
}

impl From<&VehicleState> for HistorySample {
    fn from(state: &VehicleState) -> Self {
        Self {
            loc_m: state.pose.loc_m,
            vel_ms: state.vel_ms,
            ang_vel_rads: state.ang_vel_rads,
            speed_ms: state.speed_ms,
        }
    }
}

impl StateEst {
    /// Create a new estimator, which will not be ready until the first
    /// odometry update.
    pub fn new(params: &Params) -> Result<Self, HistoryError> {
        Ok(Self {
            state: VehicleState::default(),
            history: HistoryBuffer::new(params.history_len)?,
            odom_origin: None,
            global_pose: None,
            last_odom_time: None,
            last_loc_time: None,
        })
    }

    /// Apply a new odometry update.
    ///
    /// The first update also becomes the odometry origin and makes the
    /// estimator ready. Every update appends one sample to the history.
    ///
    /// Non-finite components are replaced rather than propagated: the pose
    /// keeps its last finite value and rates fall back to zero.
    pub fn update_odometry(
        &mut self,
        loc_m: Point2<f64>,
        heading_rad: f64,
        vel_ms: Vector2<f64>,
        ang_vel_rads: f64,
    ) {
        if !loc_m.x.is_finite()
            || !loc_m.y.is_finite()
            || !heading_rad.is_finite()
            || !vel_ms.iter().all(|v| v.is_finite())
            || !ang_vel_rads.is_finite()
        {
            warn!("Non-finite odometry update replaced with last known values");
        }

        let prev = self.state.pose;

        let pose = Pose2D {
            loc_m: Point2::new(
                finite_or(loc_m.x, prev.loc_m.x),
                finite_or(loc_m.y, prev.loc_m.y),
            ),
            heading_rad: finite_or(heading_rad, prev.heading_rad),
        };
        let vel_ms = Vector2::new(finite_or(vel_ms.x, 0.0), finite_or(vel_ms.y, 0.0));
        let ang_vel_rads = finite_or(ang_vel_rads, 0.0);

        self.state = VehicleState {
            pose,
            vel_ms,
            ang_vel_rads,
            speed_ms: vel_ms.norm(),
        };

        if self.odom_origin.is_none() {
            info!(
                "Odometry initialised at ({:.3}, {:.3}) m, {:.3} rad",
                pose.loc_m.x, pose.loc_m.y, pose.heading_rad
            );
            self.odom_origin = Some(pose);
        }

        self.history.push(HistorySample::from(&self.state));

        trace!(
            "Odometry: loc {:?}, heading {:.3}, speed {:.3}",
            self.state.pose.loc_m,
            self.state.pose.heading_rad,
            self.state.speed_ms
        );
    }

    /// Apply an odometry sample from the transport.
    pub fn update_odometry_sample(&mut self, sample: &OdomSample) {
        self.last_odom_time = Some(sample.timestamp);

        self.update_odometry(
            Point2::new(sample.loc_m[0], sample.loc_m[1]),
            sample.heading_rad,
            vec2(sample.vel_ms),
            sample.ang_vel_rads,
        );
    }

    /// Apply a new global localisation fix.
    ///
    /// Only the global pose changes, readiness is not affected. Non-finite
    /// fixes are dropped.
    pub fn update_localisation(&mut self, loc_m: Point2<f64>, heading_rad: f64) {
        let pose = Pose2D { loc_m, heading_rad };

        if !pose.is_finite() {
            warn!("Non-finite localisation fix ignored");
            return;
        }

        if self.global_pose.is_none() {
            info!("Localisation initialised");
        }

        self.global_pose = Some(pose);
    }

    /// Apply a localisation fix from the transport.
    pub fn update_loc_fix(&mut self, fix: &LocFix) {
        let pose = Pose2D::from(fix);

        if pose.is_finite() {
            self.last_loc_time = Some(fix.timestamp);
        }

        self.update_localisation(pose.loc_m, pose.heading_rad);
    }

    /// True once the first odometry update has been received.
    pub fn is_ready(&self) -> bool {
        self.odom_origin.is_some()
    }

    pub fn state(&self) -> &VehicleState {
        &self.state
    }

    pub fn history(&self) -> &HistoryBuffer<HistorySample> {
        &self.history
    }

    pub fn odom_origin(&self) -> Option<&Pose2D> {
        self.odom_origin.as_ref()
    }

    pub fn global_pose(&self) -> Option<&Pose2D> {
        self.global_pose.as_ref()
    }

    pub fn last_odom_time(&self) -> Option<DateTime<Utc>> {
        self.last_odom_time
    }

    pub fn last_loc_time(&self) -> Option<DateTime<Utc>> {
        self.last_loc_time
    }

    /// The current pose relative to the odometry origin, or `None` before the
    /// estimator is ready.
    pub fn odom_displacement(&self) -> Option<Pose2D> {
        self.odom_origin
            .as_ref()
            .map(|origin| self.state.pose.relative_to(origin))
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    fn est(k: usize) -> StateEst {
        StateEst::new(&Params { history_len: k }).unwrap()
    }

    #[test]
    fn test_readiness() {
        let mut se = est(3);
        assert!(!se.is_ready());

        // Localisation alone does not make the estimator ready
        se.update_localisation(Point2::new(4.0, 5.0), 1.0);
        assert!(!se.is_ready());
        assert_eq!(se.global_pose(), Some(&Pose2D::new(4.0, 5.0, 1.0)));
        assert!(se.history().is_empty());

        se.update_odometry(Point2::new(1.0, 2.0), 0.5, Vector2::new(3.0, 4.0), 0.1);
        assert!(se.is_ready());
        assert_eq!(se.odom_origin(), Some(&Pose2D::new(1.0, 2.0, 0.5)));
        assert_relative_eq!(se.state().speed_ms, 5.0);
        assert_eq!(se.history().len(), 1);

        // The origin is fixed by the first update only
        se.update_odometry(Point2::new(2.0, 2.0), 0.5, Vector2::new(1.0, 0.0), 0.0);
        assert_eq!(se.odom_origin(), Some(&Pose2D::new(1.0, 2.0, 0.5)));
        assert_eq!(se.state().pose, Pose2D::new(2.0, 2.0, 0.5));
    }

    #[test]
    fn test_history_bounded() {
        const K: usize = 3;
        let mut se = est(K);

        for i in 0..(K + 1) {
            se.update_odometry(Point2::new(i as f64, 0.0), 0.0, Vector2::new(1.0, 0.0), 0.0);
            assert!(se.history().len() <= K);
        }

        let xs: Vec<f64> = se.history().iter().map(|s| s.loc_m.x).collect();
        assert_eq!(xs, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_non_finite_inputs() {
        let mut se = est(2);
        se.update_odometry(Point2::new(1.0, 1.0), 0.2, Vector2::new(1.0, 0.0), 0.0);

        se.update_odometry(
            Point2::new(f64::NAN, 2.0),
            f64::INFINITY,
            Vector2::new(f64::NAN, 1.0),
            f64::NAN,
        );

        let s = se.state();
        assert_eq!(s.pose, Pose2D::new(1.0, 2.0, 0.2));
        assert_eq!(s.vel_ms, Vector2::new(0.0, 1.0));
        assert_eq!(s.ang_vel_rads, 0.0);
        assert_relative_eq!(s.speed_ms, 1.0);

        se.update_localisation(Point2::new(f64::NAN, 0.0), 0.0);
        assert_eq!(se.global_pose(), None);
    }

    #[test]
    fn test_odom_displacement() {
        let mut se = est(2);
        assert_eq!(se.odom_displacement(), None);

        se.update_odometry(Point2::new(1.0, 0.0), std::f64::consts::FRAC_PI_2, Vector2::zeros(), 0.0);
        se.update_odometry(Point2::new(1.0, 2.0), std::f64::consts::FRAC_PI_2, Vector2::zeros(), 0.0);

        let d = se.odom_displacement().unwrap();
        assert_relative_eq!(d.loc_m.x, 2.0, epsilon = 1e-12);
        assert_relative_eq!(d.loc_m.y, 0.0, epsilon = 1e-12);
    }
}
