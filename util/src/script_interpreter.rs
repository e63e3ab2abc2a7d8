//! # Replay script interpreter module
//!
//! This module provides an interpreter for navigation replay scripts, allowing
//! recorded sensor samples and telecommands to be fed to the navigation core
//! at the times they originally arrived.
//!
//! A script is a sequence of entries of the form `<time_s>: <json>;`, where the
//! JSON payload is a [`NavInput`]. Entries must appear in time order.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::fs;
use regex::RegexBuilder;
use thiserror::Error;

// Internal
use comms_if::{NavInput, InputParseError};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Matches one `<time_s>: <payload>;` entry.
const ENTRY_PATTERN: &str = r"^\s*(\d+(\.\d+)?)\s*:\s*([^;]*);";

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// An input which is scripted to arrive at a specific time.
#[derive(Debug)]
pub struct Entry {
    /// The time the input is supposed to arrive at
    arrival_time_s: f64,

    /// The input itself
    input: NavInput
}

/// A script interpreter.
///
/// After initialising with the path to the script to run use
/// `.get_pending_inputs` to acquire a list of inputs that have arrived.
#[derive(Debug)]
pub struct ScriptInterpreter {
    _script_path: PathBuf,
    entries: VecDeque<Entry>
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Could not find the script at {0:?}")]
    ScriptNotFound(PathBuf),

    #[error("Could not load the script: {0}")]
    ScriptLoadError(std::io::Error),

    #[error("The script is empty (or is so bad it can't be read)")]
    ScriptEmpty,

    #[error(
        "Script contains an invalid timestamp: {0}. \
        Should be a float (like 1.0)")]
    InvalidTimestamp(String),

    #[error("Script entry at {0} s is earlier than the entry before it")]
    OutOfOrder(f64),

    #[error("Script contains an invalid input at {0} s: {1}")]
    InvalidInput(f64, InputParseError),

    #[error("Could not build the script pattern: {0}")]
    PatternError(regex::Error)
}

pub enum PendingInputs {
    None,
    Some(Vec<NavInput>),
    EndOfScript
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ScriptInterpreter {

    /// Create a new interpreter from the given script path.
    pub fn new<P: AsRef<Path>>(script_path: P) -> Result<Self, ScriptError> {

        // Get the path in a buffer
        let path = PathBuf::from(script_path.as_ref());

        // Check that the script file exists.
        if !path.exists() {
            return Err(ScriptError::ScriptNotFound(path));
        }

        // Load the script into a string
        let script = fs::read_to_string(&path)
            .map_err(ScriptError::ScriptLoadError)?;

        Self::from_script(path, &script)
    }

    /// Create a new interpreter from the contents of a script.
    pub fn from_script(
        script_path: PathBuf,
        script: &str
    ) -> Result<Self, ScriptError> {

        // Empty queue of inputs
        let mut queue: VecDeque<Entry> = VecDeque::new();

        let re = RegexBuilder::new(ENTRY_PATTERN)
            .multi_line(true)
            .build()
            .map_err(ScriptError::PatternError)?;

        for cap in re.captures_iter(script) {
            let (time_str, payload) = match (cap.get(1), cap.get(3)) {
                (Some(t), Some(p)) => (t.as_str(), p.as_str()),
                _ => continue
            };

            // Parse the arrival time
            let arrival_time_s: f64 = time_str.parse()
                .map_err(|e| ScriptError::InvalidTimestamp(format!("{}", e)))?;

            if let Some(prev) = queue.back() {
                if arrival_time_s < prev.arrival_time_s {
                    return Err(ScriptError::OutOfOrder(arrival_time_s));
                }
            }

            // Parse the input from the payload. The scripts contain JSON only.
            let input = NavInput::from_json(payload)
                .map_err(|e| ScriptError::InvalidInput(arrival_time_s, e))?;

            queue.push_back(Entry {
                arrival_time_s,
                input
            });
        }

        if queue.is_empty() {
            return Err(ScriptError::ScriptEmpty)
        }

        Ok(ScriptInterpreter {
            _script_path: script_path,
            entries: queue
        })
    }

    /// Return the inputs which have arrived by `current_time_s`, in arrival
    /// order.
    pub fn get_pending_inputs(&mut self, current_time_s: f64) -> PendingInputs {

        // If the queue is empty the script is over and we return the end of
        // script variant
        if self.entries.is_empty() {
            return PendingInputs::EndOfScript
        }

        let mut inputs: Vec<NavInput> = vec![];

        // Pop entries while the head has arrived.
        while let Some(entry) = self.entries.front() {
            if entry.arrival_time_s > current_time_s {
                break;
            }

            if let Some(entry) = self.entries.pop_front() {
                inputs.push(entry.input);
            }
        }

        if inputs.is_empty() {
            PendingInputs::None
        }
        else {
            PendingInputs::Some(inputs)
        }
    }

    /// Get the number of inputs remaining in the script
    pub fn get_num_inputs(&self) -> usize {
        self.entries.len()
    }

    /// Get the length of the script in seconds
    pub fn get_duration(&self) -> f64 {
        match self.entries.back() {
            Some(e) => e.arrival_time_s,
            None => 0f64
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use comms_if::tc::NavTc;

    const SCRIPT: &str = r#"
        0.0: {"Tc": {"Curv": {"curv_m": 0.0}}};
        0.1: {"Odom": {"timestamp": 100, "loc_m": [0.0, 0.0], "heading_rad": 0.0,
                       "vel_ms": [0.0, 0.0], "ang_vel_rads": 0.0}};
        0.1: {"Cloud": {"timestamp": 100, "points_m": [[2.0, 0.0]]}};
        1.5: {"Tc": "ClearGoal"};
    "#;

    #[test]
    fn test_script_replay() {
        let mut si = ScriptInterpreter::from_script(PathBuf::from("test"), SCRIPT).unwrap();

        assert_eq!(si.get_num_inputs(), 4);
        assert_eq!(si.get_duration(), 1.5);

        match si.get_pending_inputs(0.05) {
            PendingInputs::Some(inputs) => {
                assert_eq!(inputs, vec![NavInput::Tc(NavTc::Curv { curv_m: 0.0 })])
            },
            _ => panic!("Expected the curvature TC to be pending")
        }

        assert!(matches!(si.get_pending_inputs(0.08), PendingInputs::None));

        match si.get_pending_inputs(0.1) {
            PendingInputs::Some(inputs) => {
                assert_eq!(inputs.len(), 2);
                assert_eq!(inputs[0].kind(), "Odom");
                assert_eq!(inputs[1].kind(), "Cloud");
            },
            _ => panic!("Expected two inputs to be pending")
        }

        assert!(matches!(si.get_pending_inputs(2.0), PendingInputs::Some(_)));
        assert!(matches!(si.get_pending_inputs(2.0), PendingInputs::EndOfScript));
    }

    #[test]
    fn test_bad_scripts() {
        assert!(matches!(
            ScriptInterpreter::from_script(PathBuf::from("empty"), "\n\n"),
            Err(ScriptError::ScriptEmpty)
        ));
        assert!(matches!(
            ScriptInterpreter::from_script(
                PathBuf::from("order"),
                "1.0: {\"Tc\": \"ClearGoal\"};\n0.5: {\"Tc\": \"ClearGoal\"};"
            ),
            Err(ScriptError::OutOfOrder(_))
        ));
        assert!(matches!(
            ScriptInterpreter::from_script(PathBuf::from("bad"), "1.0: {\"Sonar\": 1};"),
            Err(ScriptError::InvalidInput(_, _))
        ));
    }
}
