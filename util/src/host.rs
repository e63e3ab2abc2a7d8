//! Host platform (linux for example) utility functions

use std::env;
use std::path::PathBuf;

use uname;

/// Environment variable pointing at the root of the navigation software tree.
///
/// The `params` and `sessions` directories are resolved relative to this.
pub const NAV_SW_ROOT_VAR: &str = "NAV_SW_ROOT";

/// Retrieve uname information.
pub fn get_uname() -> std::io::Result<uname::Info> {
    uname::uname()
}

/// Get the root directory of the navigation software from the environment.
pub fn get_nav_sw_root() -> Result<PathBuf, env::VarError> {
    env::var(NAV_SW_ROOT_VAR).map(PathBuf::from)
}
