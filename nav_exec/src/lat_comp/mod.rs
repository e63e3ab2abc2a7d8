//! # Latency compensation module
//!
//! A drive command takes effect some time after it is computed. To make the
//! free path check reflect where the vehicle will actually be at that point,
//! the pose is predicted forwards by replaying the most recent velocities held
//! in the state history.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::trace;
use nalgebra::Point2;

use crate::loc::Pose2D;
use crate::state_est::{HistoryBuffer, HistorySample};
use util::maths::wrap_pi;

pub use params::Params;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Latency compensator for a fixed tick interval.
#[derive(Debug, Clone)]
pub struct LatComp {
    params: Params,

    /// Interval between history samples.
    ///
    /// Units: seconds
    dt_s: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl LatComp {
    pub fn new(params: Params, dt_s: f64) -> Self {
        Self { params, dt_s }
    }

    /// Number of history samples replayed for each prediction.
    pub fn iterations(&self) -> usize {
        num_iterations(self.params.latency_s, self.dt_s)
    }

    /// Predict the pose of the vehicle once the configured latency has passed.
    pub fn predict(&self, history: &HistoryBuffer<HistorySample>, current: &Pose2D) -> Pose2D {
        predict_pose(history, current, self.params.latency_s, self.dt_s)
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Number of `dt_s` steps which make up `latency_s`, rounded to the nearest
/// step. Non-finite or non-positive inputs give zero.
pub fn num_iterations(latency_s: f64, dt_s: f64) -> usize {
    if !(dt_s > 0.0) || !(latency_s > 0.0) {
        return 0;
    }

    let n = (latency_s / dt_s).round();

    if n.is_finite() {
        n as usize
    }
    else {
        0
    }
}

/// Predict the pose of the vehicle `latency_s` from now.
///
/// Starting from `current`, the velocity and angular velocity of each of the
/// most recent `round(latency_s / dt_s)` history samples are integrated over
/// `dt_s`, oldest first. If the history holds fewer samples than that, the
/// current pose is returned unchanged.
pub fn predict_pose(
    history: &HistoryBuffer<HistorySample>,
    current: &Pose2D,
    latency_s: f64,
    dt_s: f64,
) -> Pose2D {
    let iterations = num_iterations(latency_s, dt_s);

    if iterations == 0 || history.len() < iterations {
        return *current;
    }

    let mut loc_m: Point2<f64> = current.loc_m;
    let mut heading_rad = current.heading_rad;

    for sample in history.recent(iterations) {
        loc_m += sample.vel_ms * dt_s;
        heading_rad += sample.ang_vel_rads * dt_s;
    }

    let predicted = Pose2D {
        loc_m,
        heading_rad: wrap_pi(heading_rad),
    };

    trace!(
        "Predicted pose after {} steps: {:?}, {:.3} rad",
        iterations,
        predicted.loc_m,
        predicted.heading_rad
    );

    predicted
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
