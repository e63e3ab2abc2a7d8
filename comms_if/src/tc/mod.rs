//! # Telecommand module
//!
//! Telecommands are instructions given to the navigation core by its operator
//! rather than by a sensor.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Serialize, Deserialize};
use structopt::{clap::AppSettings, StructOpt};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A navigation telecommand.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, StructOpt, PartialEq)]
pub enum NavTc {
    /// Set the navigation goal. The vehicle will stop once it reaches it.
    #[structopt(name = "goal", setting = AppSettings::AllowNegativeNumbers)]
    Goal {
        /// X coordinate of the goal in meters, map frame.
        x_m: f64,

        /// Y coordinate of the goal in meters, map frame.
        y_m: f64,

        /// Heading at the goal in radians, anticlockwise from the map X axis.
        heading_rad: f64,
    },

    /// Remove the current navigation goal, driving on without a termination point.
    #[structopt(name = "clear-goal")]
    ClearGoal,

    /// Set the curvature of the arc to drive along.
    ///
    /// Follows the right hand rule about the vehicle's Z+ (upwards) axis, so that positive
    /// curvature is a turn to the left, and negative curvature a turn to the right.
    #[structopt(name = "curv", setting = AppSettings::AllowNegativeNumbers)]
    Curv {
        /// Curvature in 1/meters.
        curv_m: f64,
    },
}
