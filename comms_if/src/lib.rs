//! # Communications interface crate.
//!
//! Provides all common interfaces between the navigation core and the systems
//! around it. Only the data structures live here, the transport which carries
//! them is provided by the enclosing system.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Navigation telecommands
pub mod tc;

/// Sensor samples consumed by, and demands produced by, the navigation core
pub mod eqpt;

/// Tagged union of every input the navigation core accepts
pub mod input;

// ------------------------------------------------------------------------------------------------
// EXPORTS
// ------------------------------------------------------------------------------------------------

pub use input::{NavInput, InputParseError};
