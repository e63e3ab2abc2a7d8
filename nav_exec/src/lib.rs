//! # Navigation library.
//!
//! The local motion control core of the vehicle, and the pieces the
//! navigation executable needs to run it. Other crates in the workspace can
//! use the core through this library without the executable.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Data store - global state of the navigation executable
pub mod data_store;

/// Latency compensation - predicts where the vehicle will be when the next command takes effect
pub mod lat_comp;

/// Localisation types - planar poses and the transforms between vehicle frames
pub mod loc;

/// Navigation control - runs the whole navigation core once per cycle
pub mod nav_ctrl;

/// Obstacle analysis - finds the free path along an arc through the obstacle point cloud
pub mod obst_anal;

/// Executable parameters
pub mod params;

/// State estimation - tracks the vehicle's pose, velocity and recent history
pub mod state_est;

/// Time optimal control - chooses whether to accelerate, cruise or brake
pub mod toc_ctrl;
