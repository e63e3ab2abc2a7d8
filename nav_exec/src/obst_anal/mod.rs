//! # Obstacle analysis module
//!
//! Obstacle analysis answers one question each cycle: how far can the vehicle
//! travel along the demanded arc before its footprint touches an obstacle?
//!
//! The latest point cloud is held in the vehicle frame it was captured in.
//! Before a query it is re-expressed in the frame of the pose the vehicle is
//! predicted to have when the next command takes effect, and then every point
//! is tested against the corridor swept by the padded footprint along the arc.
//!
//! The vehicle frame has X forwards and Y to the left, with the origin at the
//! base link (centre of the rear axle). Positive curvature turns left.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod cloud;
mod free_path;
mod params;
mod state;

// ---------------------------------------------------------------------------
// EXPORTS
// ---------------------------------------------------------------------------

pub use cloud::*;
pub use free_path::*;
pub use params::Params;
pub use state::*;
