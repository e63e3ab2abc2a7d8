//! # Navigation inputs
//!
//! Every piece of data which can arrive at the navigation core from outside,
//! wrapped in a single tagged enum so it can be queued, replayed and parsed in
//! one place.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    eqpt::{lidar::CloudSample, loc::LocFix, odom::OdomSample},
    tc::NavTc,
};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// An input to the navigation core.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum NavInput {
    /// A new odometry sample
    Odom(OdomSample),

    /// A new global localisation fix
    Loc(LocFix),

    /// A new obstacle point cloud
    Cloud(CloudSample),

    /// An operator telecommand
    Tc(NavTc),
}

/// Possible parsing errors.
#[derive(Debug, Error)]
pub enum InputParseError {
    #[error("Input contains invalid JSON: {0}")]
    InvalidJson(serde_json::Error),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl NavInput {
    /// Parse a new input from a JSON packet
    pub fn from_json(json_str: &str) -> Result<Self, InputParseError> {
        serde_json::from_str(json_str).map_err(InputParseError::InvalidJson)
    }

    /// A short name for the kind of input, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            NavInput::Odom(_) => "Odom",
            NavInput::Loc(_) => "Loc",
            NavInput::Cloud(_) => "Cloud",
            NavInput::Tc(_) => "Tc",
        }
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
