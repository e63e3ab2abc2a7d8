//! Parameters structure for LatComp

use serde::Deserialize;

/// Parameters for latency compensation.
#[derive(Debug, Clone, Deserialize)]
pub struct Params {
    /// Delay between computing a drive command and the vehicle acting on it.
    ///
    /// Units: seconds
    pub latency_s: f64,
}
