//! Wall-clock abstraction for the handlers
//!
//! Timestamps on stored readings and session completion come from a
//! `Clock` implementation rather than ambient time, so tests pin them
//! exactly:
//! - `SystemClock` for production
//! - `FixedClock` for tests

use chrono::{DateTime, Duration, Utc};

/// Source of wall-clock time for the handlers.
pub trait Clock {
    /// Current instant in UTC.
    fn now(&self) -> DateTime<Utc>;
}

/// Operating-system wall clock.
#[derive(Debug, Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Fixed clock for testing
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: DateTime<Utc>,
}

impl FixedClock {
    /// Clock pinned to the given instant.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    /// Re-pin the clock.
    pub fn set(&mut self, now: DateTime<Utc>) {
        self.now = now;
    }

    /// Move the clock forward.
    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn fixed_clock_is_pinned() {
        let instant = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let mut clock = FixedClock::new(instant);
        assert_eq!(clock.now(), instant);

        clock.advance(Duration::seconds(5));
        assert_eq!(clock.now(), instant + Duration::seconds(5));
    }
}
