//! Clock and calendar capability.
//!
//! "Today" is a calendar day in the device's current time zone, not a
//! 24-hour rolling window. The ledger never reads the wall clock directly;
//! it goes through this trait so tests can pin specific instants and zones.

use chrono::{DateTime, FixedOffset, Local, NaiveDate, Utc};
use habitkit_core::Time;

/// Source of the current instant and the current local calendar day.
pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> Time;

    /// Current calendar day in the device's time zone.
    fn today(&self) -> NaiveDate;
}

/// Clock backed by the system wall clock and local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Time {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock pinned to an explicit zoned instant, settable at any time.
///
/// Deterministic stand-in for tests: the local calendar day is derived from
/// the instant in its fixed offset, so midnight crossings and zone effects
/// can be simulated exactly.
pub struct FixedClock {
    at: std::sync::Mutex<DateTime<FixedOffset>>,
}

impl FixedClock {
    /// Create a clock pinned to `at`.
    pub fn new(at: DateTime<FixedOffset>) -> Self {
        Self {
            at: std::sync::Mutex::new(at),
        }
    }

    /// Move the clock to `at`.
    pub fn set(&self, at: DateTime<FixedOffset>) {
        *self.at.lock().unwrap() = at;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Time {
        self.at.lock().unwrap().with_timezone(&Utc)
    }

    fn today(&self) -> NaiveDate {
        self.at.lock().unwrap().date_naive()
    }
}
