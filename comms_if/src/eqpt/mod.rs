//! # Equipment Interface
//!
//! This module defines the interface structures which are exchanged with the
//! vehicle's sensors and drive system.

// -----------------------------------------------------------------------------------------------
// MODULES
// -----------------------------------------------------------------------------------------------

pub mod drive;
pub mod lidar;
pub mod loc;
pub mod odom;
