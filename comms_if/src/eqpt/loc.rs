//! # Localisation Equipment Module

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use chrono::{serde::ts_milliseconds, DateTime, Utc};
use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A global localisation fix of the vehicle in the map frame.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LocFix {
    /// UTC timestamp at which the fix was computed
    #[serde(with = "ts_milliseconds")]
    pub timestamp: DateTime<Utc>,

    /// Location of the vehicle base link.
    ///
    /// Units: meters,
    /// Frame: Map
    pub loc_m: [f64; 2],

    /// Heading of the vehicle, anticlockwise from the map X axis.
    ///
    /// Units: radians
    pub heading_rad: f64,
}
