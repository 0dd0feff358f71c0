//! Progress tracking.
//!
//! Daily completion ledger, cross-goal aggregates, and the clock
//! capability that pins "today" down for both.

#![warn(missing_docs)]

pub mod clock;
pub mod ledger;
pub mod analytics;

pub use clock::{Clock, FixedClock, SystemClock};
pub use ledger::{ProgressLedger, DEFAULT_TARGET_DAYS};
pub use analytics::{AnalyticsSnapshot, ProgressAnalytics};
