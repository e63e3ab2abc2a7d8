//! Implementations for the TocCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::debug;
use serde::Serialize;
use std::convert::Infallible;

// Internal
use super::{stopping_distance_m, Params, TocCtrlError, TocState};
use crate::obst_anal::FreePath;
use comms_if::eqpt::drive::DriveCmd;
use util::{maths::clamp, module::State};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Time optimal controller state.
#[derive(Debug, Clone)]
pub struct TocCtrl {
    params: Params,

    /// Control period.
    ///
    /// Units: seconds
    dt_s: f64,

    state: TocState,
}

/// Data required to initialise TocCtrl.
#[derive(Debug, Clone)]
pub struct InitData {
    pub params: Params,

    /// Units: seconds
    pub dt_s: f64,
}

/// Input data to TocCtrl.
#[derive(Debug, Clone, Copy)]
pub struct InputData {
    /// True once the state estimator has received odometry.
    pub ready: bool,

    /// Current speed of the vehicle.
    ///
    /// Units: meters/second
    pub speed_ms: f64,

    pub free_path: FreePath,

    /// The curvature of the currently requested path, passed through to the
    /// drive command.
    ///
    /// Units: 1/meters
    pub curv_m: f64,
}

/// Status report for TocCtrl processing.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct StatusReport {
    pub state: TocState,

    /// Stopping distance at the current speed.
    ///
    /// Units: meters
    pub stopping_dist_m: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for TocCtrl {
    type InitData = InitData;
    type InitError = TocCtrlError;

    type InputData = InputData;
    type OutputData = DriveCmd;
    type StatusReport = StatusReport;
    type ProcError = Infallible;

    /// Initialise the controller, validating the limits and control period.
    fn init(init_data: Self::InitData) -> Result<Self, Self::InitError> {
        init_data.params.validate()?;

        if !init_data.dt_s.is_finite() || init_data.dt_s <= 0.0 {
            return Err(TocCtrlError::InvalidPeriod(init_data.dt_s));
        }

        Ok(Self {
            params: init_data.params,
            dt_s: init_data.dt_s,
            state: TocState::Halted,
        })
    }

    /// Choose the velocity to command on this cycle.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        let (state, vel_ms) = decide(input_data, &self.params, self.dt_s);

        if state != self.state {
            debug!("TocCtrl {:?} -> {:?}", self.state, state);
            self.state = state;
        }

        let report = StatusReport {
            state,
            stopping_dist_m: stopping_distance_m(input_data.speed_ms, self.params.max_decel_mss),
        };

        Ok((
            DriveCmd {
                curv_m: input_data.curv_m,
                vel_ms,
            },
            report,
        ))
    }
}

impl TocCtrl {
    /// The state chosen on the most recent cycle.
    pub fn state(&self) -> TocState {
        self.state
    }

    pub fn params(&self) -> &Params {
        &self.params
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Choose the next state and commanded velocity.
///
/// The first matching rule applies:
/// 1. Not ready: `Halted` at zero.
/// 2. Unknown (non-finite) speed: `Decelerate` to zero.
/// 3. Stopping distance reaches the free path: `Decelerate` by one period of
///    maximum deceleration.
/// 4. Below the speed limit: `Accelerate` by one period of maximum
///    acceleration.
/// 5. Otherwise `Cruise` at the speed limit.
///
/// A `Clear` free path never triggers rule 3. The result is always within
/// `[0, max_speed_ms]`.
pub fn decide(input: &InputData, params: &Params, dt_s: f64) -> (TocState, f64) {
    let v = input.speed_ms;

    let (state, vel_ms) = if !input.ready {
        (TocState::Halted, 0.0)
    }
    else if !v.is_finite() {
        (TocState::Decelerate, 0.0)
    }
    else if must_brake(v, input.free_path, params) {
        (TocState::Decelerate, (v - params.max_decel_mss * dt_s).max(0.0))
    }
    else if v < params.max_speed_ms {
        (
            TocState::Accelerate,
            params.max_speed_ms.min(v + params.max_accel_mss * dt_s),
        )
    }
    else {
        (TocState::Cruise, params.max_speed_ms)
    };

    (state, clamp(vel_ms, 0.0, params.max_speed_ms))
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn must_brake(speed_ms: f64, free_path: FreePath, params: &Params) -> bool {
    match free_path {
        FreePath::Clear => false,
        FreePath::Blocked(dist_m) => stopping_distance_m(speed_ms, params.max_decel_mss) >= dist_m,
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
