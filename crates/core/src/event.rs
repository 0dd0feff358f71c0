//! Change-notification payloads.

use crate::day::DayKey;
use crate::id::GoalId;
use serde::{Deserialize, Serialize};

/// Published whenever a goal gains a newly logged day.
///
/// Subscribers holding derived aggregates should treat this as a
/// cache-invalidation signal and recompute on next read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    /// The goal whose record changed
    pub goal_id: GoalId,

    /// The day that was logged
    pub day: DayKey,
}
