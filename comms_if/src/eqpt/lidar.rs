//! # Lidar Equipment Module

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use chrono::{serde::ts_milliseconds, DateTime, Utc};
use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A point cloud of obstacle returns.
///
/// Each new sample replaces the previous one entirely.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CloudSample {
    /// UTC timestamp at which the scan was captured
    #[serde(with = "ts_milliseconds")]
    pub timestamp: DateTime<Utc>,

    /// Obstacle points.
    ///
    /// Units: meters,
    /// Frame: Vehicle base link at capture time (X forwards, Y left)
    pub points_m: Vec<[f64; 2]>,
}
