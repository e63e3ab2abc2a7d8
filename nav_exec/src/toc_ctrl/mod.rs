//! # Time optimal control module
//!
//! One dimensional time optimal (bang-bang) speed control along the demanded
//! arc. Each cycle the controller either accelerates as hard as it can,
//! cruises at the speed limit, or brakes as hard as it can, so that the
//! vehicle always stops before the end of the free path.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod state;

// ---------------------------------------------------------------------------
// EXPORTS
// ---------------------------------------------------------------------------

pub use params::Params;
pub use state::*;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Serialize;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Decelerations below this are treated as no deceleration at all.
///
/// Units: meters/second^2
pub const EPSILON: f64 = 1e-5;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during TocCtrl operation.
#[derive(Debug, thiserror::Error)]
pub enum TocCtrlError {
    #[error("Invalid kinodynamic limits: {0}")]
    InvalidLimits(String),

    #[error("The control period must be positive and finite, got {0} s")]
    InvalidPeriod(f64),
}

/// The phase of the speed profile chosen on a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TocState {
    /// Not ready to drive, the vehicle is held still.
    Halted,

    Accelerate,

    Cruise,

    Decelerate,
}

impl Default for TocState {
    fn default() -> Self {
        TocState::Halted
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Distance needed to stop from `speed_ms` when braking at `max_decel_mss`.
///
/// Decelerations below [`EPSILON`] cannot stop the vehicle, so the distance is
/// infinite.
pub fn stopping_distance_m(speed_ms: f64, max_decel_mss: f64) -> f64 {
    if !(max_decel_mss >= EPSILON) {
        return f64::INFINITY;
    }

    speed_ms * speed_ms / (2.0 * max_decel_mss)
}
