//! Parameters structure for StateEst

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for state estimation.
#[derive(Debug, Clone, Deserialize)]
pub struct Params {
    /// Number of most recent odometry states held for latency compensation
    /// (the history horizon). Must be at least one.
    pub history_len: usize,
}
