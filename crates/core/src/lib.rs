//! Habitkit core data models.
//!
//! This crate defines the fundamental data structures shared by the
//! habit tracking components: goal identity, the goal model itself,
//! canonical day keys, and change-notification payloads.

#![warn(missing_docs)]

// Core identities
mod id;

// Goal model
mod goal;

// Day-key canonicalization
mod day;

// Change notification
mod event;

// Re-exports
pub use id::GoalId;

pub use goal::Goal;

pub use day::{DayKey, ParseDayKeyError};

pub use event::ProgressUpdate;

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;
