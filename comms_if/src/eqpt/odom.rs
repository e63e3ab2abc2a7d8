//! # Odometry Equipment Module

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use chrono::{serde::ts_milliseconds, DateTime, Utc};
use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A single odometry sample, expressed in the odometry frame.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct OdomSample {
    /// UTC timestamp at which the sample was measured
    #[serde(with = "ts_milliseconds")]
    pub timestamp: DateTime<Utc>,

    /// Location of the vehicle base link.
    ///
    /// Units: meters,
    /// Frame: Odometry
    pub loc_m: [f64; 2],

    /// Heading of the vehicle, anticlockwise from the odometry X axis.
    ///
    /// Units: radians
    pub heading_rad: f64,

    /// Linear velocity of the vehicle base link.
    ///
    /// Units: meters/second,
    /// Frame: Odometry
    pub vel_ms: [f64; 2],

    /// Angular velocity about the vertical axis, positive anticlockwise.
    ///
    /// Units: radians/second
    pub ang_vel_rads: f64,
}
