//! # Navigation control module
//!
//! Navigation control is the per-cycle driver of the navigation core. It owns
//! the state estimator, obstacle analyser, latency compensator and time
//! optimal controller, and once per cycle:
//!
//! 1. Applies the latest odometry, localisation and point cloud samples, and
//!    any telecommands, received since the last cycle.
//! 2. Predicts the pose of the vehicle when the next command takes effect.
//! 3. Finds the free path along the current curvature from that pose, falling
//!    back on the stale cloud policy if the cloud is missing or old.
//! 4. Limits the free path by the distance to the goal, if there is one.
//! 5. Chooses the drive command with the time optimal controller.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod state;

// ---------------------------------------------------------------------------
// EXPORTS
// ---------------------------------------------------------------------------

pub use params::*;
pub use state::*;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use crate::{state_est::HistoryError, toc_ctrl::TocCtrlError};

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur while initialising NavCtrl.
#[derive(Debug, thiserror::Error)]
pub enum NavCtrlError {
    #[error("Invalid navigation parameters: {0}")]
    InvalidParams(String),

    #[error("Could not create the state history: {0}")]
    HistoryError(#[from] HistoryError),

    #[error("Could not initialise TocCtrl: {0}")]
    TocCtrlError(#[from] TocCtrlError),
}
