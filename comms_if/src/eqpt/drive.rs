//! # Drive Equipment Module

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Ackermann curvature drive demand sent to the vehicle's drive system.
///
/// A new command is produced every cycle, the default is a stationary
/// straight-ahead command.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct DriveCmd {
    /// Curvature of the demanded arc, positive to the left.
    ///
    /// Units: 1/meters
    pub curv_m: f64,

    /// Forward velocity of the base link along the arc.
    ///
    /// Units: meters/second
    pub vel_ms: f64,
}
