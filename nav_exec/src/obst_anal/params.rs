//! Parameters structure for ObstAnal

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for obstacle analysis.
#[derive(Debug, Clone, Deserialize)]
pub struct Params {

    // ---- GEOMETRY ----

    /// Overall width of the vehicle body.
    ///
    /// Units: meters
    pub width_m: f64,

    /// Overall length of the vehicle body.
    ///
    /// Units: meters
    pub length_m: f64,

    /// Distance between the rear and front axles.
    ///
    /// Units: meters
    pub wheelbase_m: f64,

    /// Safety margin added around the whole body.
    ///
    /// Units: meters
    pub margin_m: f64,

    // ---- ANALYSIS ----

    /// Curvatures with a magnitude below this are treated as straight lines.
    ///
    /// Units: 1/meters
    pub min_curvature_m: f64,

    /// Points further than this from the base link are ignored.
    ///
    /// Units: meters
    pub max_range_m: f64,
}

impl Params {
    /// Half width of the corridor swept by the padded body.
    pub fn corridor_half_width_m(&self) -> f64 {
        self.width_m / 2.0 + self.margin_m
    }

    /// Distance from the base link forwards to the front of the padded body.
    ///
    /// The body overhangs both axles equally.
    pub fn front_offset_m(&self) -> f64 {
        self.wheelbase_m + (self.length_m - self.wheelbase_m) / 2.0 + self.margin_m
    }
}
