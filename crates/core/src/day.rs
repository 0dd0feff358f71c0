//! Canonical calendar-day keys.
//!
//! A `DayKey` identifies one calendar day in the zone the log was made in,
//! rendered as zero-padded `YYYY-MM-DD`. Two instants within the same local
//! calendar day always map to the same key; instants on opposite sides of
//! local midnight never do.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A single calendar day, keyed at day granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DayKey(NaiveDate);

impl DayKey {
    /// Create a key for the given calendar date.
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// The calendar date this key stands for.
    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for DayKey {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl std::fmt::Display for DayKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}",
            self.0.year(),
            self.0.month(),
            self.0.day()
        )
    }
}

impl std::str::FromStr for DayKey {
    type Err = ParseDayKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Self)
            .map_err(|_| ParseDayKeyError(s.to_string()))
    }
}

/// Error for a string that is not a canonical `YYYY-MM-DD` day key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid day key: {0}")]
pub struct ParseDayKeyError(pub String);
