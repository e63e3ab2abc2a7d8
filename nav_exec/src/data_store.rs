//! # Data Store

use chrono::{DateTime, TimeZone, Utc};
use log::warn;

use comms_if::eqpt::drive::DriveCmd;

use crate::nav_ctrl;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Global data store for the executable.
pub struct DataStore {
    // Cycle management
    /// Number of cycles already executed
    pub num_cycles: u128,

    /// True if this cycle falls on a 1Hz boundary
    pub is_1_hz_cycle: bool,

    /// Session elapsed time at the start of the cycle
    pub sim_time_s: f64,

    // NavCtrl
    pub nav_ctrl: nav_ctrl::NavCtrl,
    pub nav_ctrl_output: DriveCmd,
    pub nav_ctrl_status_rpt: nav_ctrl::StatusReport,

    // Monitoring Counters
    /// Number of consecutive cycle overruns
    pub num_consec_cycle_overruns: u64,

    /// Total number of cycle overruns
    pub num_cycle_overruns: u64,
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl DataStore {
    pub fn new(nav_ctrl: nav_ctrl::NavCtrl) -> Self {
        Self {
            num_cycles: 0,
            is_1_hz_cycle: false,
            sim_time_s: 0.0,
            nav_ctrl,
            nav_ctrl_output: DriveCmd::default(),
            nav_ctrl_status_rpt: nav_ctrl::StatusReport::default(),
            num_consec_cycle_overruns: 0,
            num_cycle_overruns: 0,
        }
    }

    /// Perform actions required at the start of a cycle.
    ///
    /// Clears those items that need clearing at the start of a cycle, sets the 1Hz cycle flag
    /// and records the elapsed time.
    pub fn cycle_start(&mut self, cycle_frequency_hz: f64, sim_time_s: f64) {
        let cycles_per_s = (cycle_frequency_hz.round() as u128).max(1);

        self.is_1_hz_cycle = self.num_cycles % cycles_per_s == 0;

        self.nav_ctrl_output = DriveCmd::default();
        self.nav_ctrl_status_rpt = nav_ctrl::StatusReport::default();

        self.sim_time_s = sim_time_s;
    }

    /// Perform actions required at the end of a cycle.
    pub fn cycle_end(&mut self) {
        self.num_cycles += 1;
    }

    /// Record the outcome of cycle timing.
    ///
    /// Returns the number of consecutive overruns, including this one.
    pub fn cycle_overrun(&mut self, overrun_s: f64) -> u64 {
        self.num_consec_cycle_overruns += 1;
        self.num_cycle_overruns += 1;

        warn!("Cycle overran by {:.06} s", overrun_s);

        self.num_consec_cycle_overruns
    }

    /// Clear the consecutive overrun count after a cycle that met its deadline.
    pub fn cycle_on_time(&mut self) {
        self.num_consec_cycle_overruns = 0;
    }

    /// The time of this cycle on the replay clock, which starts at the Unix
    /// epoch when the session starts. Replayed sample timestamps are on the
    /// same clock.
    pub fn replay_time(&self) -> DateTime<Utc> {
        Utc.timestamp_millis((self.sim_time_s * 1000.0).round() as i64)
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
