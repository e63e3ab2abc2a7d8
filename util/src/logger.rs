//! Generic logger utility functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use log::{self, info};
use colored::{ColoredString, Colorize};
use thiserror::Error;

// Internal imports
use crate::session;

// Re-exports
pub use log::LevelFilter;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors associated with initialising the logger.
#[derive(Debug, Error)]
pub enum LoggerInitError {
    #[error("`{0}` is not a recognised log level")]
    UnknownLogLevel(String),

    #[error("Error initialising the log file: {0}")]
    LogFileInitError(std::io::Error),

    #[error("An error occured while setting up the logger: {0}")]
    FernInitError(log::SetLoggerError)
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Initialise the logger for this execution.
///
/// `stdout_level` filters what is printed. The session log file records at
/// `file_level(stdout_level)`, so it never drops below `INFO` even when the
/// terminal is quieter.
///
/// # Safety
///
/// - This function must only be called once to prevent corrupting logs.
pub fn logger_init(
    stdout_level: LevelFilter,
    session: &session::Session
) -> Result<(), LoggerInitError> {
    let file_level = file_level(stdout_level);

    let log_file = fern::log_file(&session.log_file_path)
        .map_err(LoggerInitError::LogFileInitError)?;

    fern::Dispatch::new()
        .format(|out, message, record| {
            // Debug and trace messages also show where they came from
            if record.level() > log::Level::Info {
                out.finish(format_args!(
                    "[{:10.6} {}] {}: {}",
                    session::get_elapsed_seconds(),
                    level_to_str(record.level()),
                    record.target(),
                    message
                ))
            }
            else {
                out.finish(format_args!(
                    "[{:10.6} {}] {}",
                    session::get_elapsed_seconds(),
                    level_to_str(record.level()),
                    message
                ))
            }
        })
        .level(file_level)
        .chain(fern::Dispatch::new().level(stdout_level).chain(std::io::stdout()))
        .chain(fern::Dispatch::new().level(file_level).chain(log_file))
        .apply()
        .map_err(LoggerInitError::FernInitError)?;

    info!("Logging initialised");
    info!("    Session epoch: {:?}", session::get_epoch());
    info!("    Stdout log level: {:?}", stdout_level);
    info!("    Log file level: {:?}", file_level);
    info!("    Log file path: {:?}", session.log_file_path);

    Ok(())
}

/// Parse a log level from a parameter string, such as `"debug"` or `"TRACE"`.
///
/// Every `LevelFilter`, `"off"` included, is accepted by `logger_init`.
pub fn parse_level(level: &str) -> Result<LevelFilter, LoggerInitError> {
    level
        .parse::<LevelFilter>()
        .map_err(|_| LoggerInitError::UnknownLogLevel(level.to_string()))
}

/// Level recorded in the session log file for a given stdout level.
pub fn file_level(stdout_level: LevelFilter) -> LevelFilter {
    stdout_level.max(LevelFilter::Info)
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Get the string representation of a log level
fn level_to_str(level: log::Level) -> ColoredString {
    match level {
        log::Level::Trace => "TRC".dimmed().italic(),
        log::Level::Debug => "DBG".dimmed(),
        log::Level::Info  => "INF".normal(),
        log::Level::Warn  => "WRN".yellow(),
        log::Level::Error => "ERR".red().bold()
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug").unwrap(), LevelFilter::Debug);
        assert_eq!(parse_level("TRACE").unwrap(), LevelFilter::Trace);
        assert!(matches!(
            parse_level("loud"),
            Err(LoggerInitError::UnknownLogLevel(_))
        ));
    }

    #[test]
    fn test_file_level() {
        assert_eq!(file_level(LevelFilter::Off), LevelFilter::Info);
        assert_eq!(file_level(LevelFilter::Warn), LevelFilter::Info);
        assert_eq!(file_level(LevelFilter::Info), LevelFilter::Info);
        assert_eq!(file_level(LevelFilter::Trace), LevelFilter::Trace);
    }

    #[test]
    fn test_quiet_levels_start() {
        // The only test in this crate which installs the global logger
        let root = std::env::temp_dir().join(format!("util_logger_{}", std::process::id()));
        let session = session::Session::new_in(root.clone(), "logger_test").unwrap();

        let level = parse_level("warn").unwrap();
        assert!(logger_init(level, &session).is_ok());
        assert!(session.log_file_path.exists());

        std::fs::remove_dir_all(root).ok();
    }
}
