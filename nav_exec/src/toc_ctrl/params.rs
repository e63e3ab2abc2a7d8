//! Parameters structure for TocCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

use super::TocCtrlError;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Kinodynamic limits of the vehicle.
#[derive(Debug, Clone, Deserialize)]
pub struct Params {
    /// Maximum forward speed.
    ///
    /// Units: meters/second
    pub max_speed_ms: f64,

    /// Maximum acceleration.
    ///
    /// Units: meters/second^2
    pub max_accel_mss: f64,

    /// Maximum deceleration, as a positive number.
    ///
    /// Units: meters/second^2
    pub max_decel_mss: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Params {
    /// Check that every limit is finite and non-negative.
    pub fn validate(&self) -> Result<(), TocCtrlError> {
        let limits = [
            ("max_speed_ms", self.max_speed_ms),
            ("max_accel_mss", self.max_accel_mss),
            ("max_decel_mss", self.max_decel_mss),
        ];

        for (name, value) in limits.iter() {
            if !value.is_finite() || *value < 0.0 {
                return Err(TocCtrlError::InvalidLimits(format!(
                    "{} must be finite and non-negative, got {}",
                    name, value
                )));
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
