//! # Navigation Executable Parameters
//!
//! This module provides parameters for the navigation executable, and the
//! map file which can seed its goal.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use comms_if::tc::NavTc;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavExecParams {
    /// Target period of one cycle.
    ///
    /// Units: seconds
    pub cycle_period_s: f64,

    /// Minimum level of log messages to record, for example `"debug"`.
    pub log_level: String,

    /// Number of consecutive cycle overruns after which they are reported as
    /// errors rather than warnings.
    pub max_consec_overruns: u64,
}

/// A map file.
///
/// Maps are not used for planning, only to provide the initial navigation
/// goal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapFile {
    pub goal: Option<MapGoal>,
}

/// A goal given in a map file, in the map frame.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MapGoal {
    pub x_m: f64,
    pub y_m: f64,

    #[serde(default)]
    pub heading_rad: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl NavExecParams {
    /// Number of cycles per second
    pub fn cycle_frequency_hz(&self) -> f64 {
        1.0 / self.cycle_period_s
    }
}

impl From<MapGoal> for NavTc {
    fn from(goal: MapGoal) -> Self {
        NavTc::Goal {
            x_m: goal.x_m,
            y_m: goal.y_m,
            heading_rad: goal.heading_rad,
        }
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_params_file() {
        let params: NavExecParams =
            util::params::from_str(include_str!("../../params/nav_exec.toml")).unwrap();

        assert_eq!(params.cycle_period_s, 0.05);
        assert!((params.cycle_frequency_hz() - 20.0).abs() < 1e-9);
        assert!(util::logger::parse_level(&params.log_level).is_ok());
    }

    #[test]
    fn test_map_file() {
        let map: MapFile = util::params::from_str(include_str!("../../maps/corridor.toml")).unwrap();
        let tc = NavTc::from(map.goal.unwrap());

        assert_eq!(
            tc,
            NavTc::Goal {
                x_m: 2.0,
                y_m: 0.0,
                heading_rad: 0.0
            }
        );

        let empty: MapFile = util::params::from_str("").unwrap();
        assert!(empty.goal.is_none());
    }
}
