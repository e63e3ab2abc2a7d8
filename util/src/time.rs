//! General time utility functions

use chrono::{self, DateTime, Utc};

/// Number of nanoseconds in a second
pub const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// Convert a duration into a number of seconds, or `None` if overflow
pub fn duration_to_seconds(duration: chrono::Duration) -> Option<f64> {
    duration
        .num_nanoseconds()
        .map(|ns| ns as f64 / NANOS_PER_SECOND as f64)
}

/// Age in seconds of something stamped at `stamp`, as seen at `now`.
///
/// Stamps from the future give a negative age. If the difference overflows the age is infinite,
/// so that any staleness check on it fails safe.
pub fn age_s(stamp: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    duration_to_seconds(now.signed_duration_since(stamp)).unwrap_or(std::f64::INFINITY)
}
