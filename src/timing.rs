//! Conversion of measured round trips into the integer millisecond values
//! written to result files.
//!
//! Only the minute, second and millisecond components of a duration are
//! combined. Hours are dropped, so a round trip of one hour or more yields a
//! wrapped total (65 minutes reads as 5 minutes). Result files produced by
//! earlier harness runs carry the same limitation and stay comparable.

use std::time::Duration;

const MILLIS_PER_SECOND: u64 = 1_000;
const MILLIS_PER_MINUTE: u64 = 60_000;
const SECONDS_PER_MINUTE: u64 = 60;
const MINUTES_PER_HOUR: u64 = 60;

/// Clock components of an elapsed duration, hours excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeParts {
    pub minutes: u64,
    pub seconds: u64,
    pub millis: u64,
}

impl TimeParts {
    #[must_use]
    pub const fn new(minutes: u64, seconds: u64, millis: u64) -> Self {
        Self {
            minutes,
            seconds,
            millis,
        }
    }

    #[must_use]
    pub const fn from_duration(elapsed: Duration) -> Self {
        let total_seconds = elapsed.as_secs();
        Self {
            minutes: (total_seconds / SECONDS_PER_MINUTE) % MINUTES_PER_HOUR,
            seconds: total_seconds % SECONDS_PER_MINUTE,
            millis: elapsed.subsec_millis() as u64,
        }
    }

    /// `millis + minutes * 60000 + seconds * 1000`.
    #[must_use]
    pub const fn total_millis(self) -> u64 {
        self.millis
            .saturating_add(self.minutes.saturating_mul(MILLIS_PER_MINUTE))
            .saturating_add(self.seconds.saturating_mul(MILLIS_PER_SECOND))
    }
}

#[must_use]
pub const fn elapsed_millis(elapsed: Duration) -> u64 {
    TimeParts::from_duration(elapsed).total_millis()
}
