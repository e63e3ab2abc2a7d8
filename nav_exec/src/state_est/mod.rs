//! # State estimation module
//!
//! Tracks the vehicle's current pose and velocity from odometry, its global
//! pose from localisation, and keeps a bounded history of recent states which
//! latency compensation uses to predict where the vehicle will be when the
//! next command takes effect.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod history;
mod params;
mod state;

// ---------------------------------------------------------------------------
// EXPORTS
// ---------------------------------------------------------------------------

pub use history::*;
pub use params::Params;
pub use state::*;
