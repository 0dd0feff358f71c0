//! Goal model - a habit the user wants to build.

use crate::id::GoalId;
use crate::Time;
use serde::{Deserialize, Serialize};

/// A goal is a habit the user commits to logging daily.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    /// Unique identifier, assigned at creation
    pub id: GoalId,

    /// Goal title
    pub title: String,

    /// Optional detailed description
    pub detail: Option<String>,

    /// When created
    pub created_at: Time,
}

impl Goal {
    /// Create a new goal with a fresh id, created now.
    pub fn new(title: impl Into<String>, detail: Option<String>) -> Self {
        Self {
            id: GoalId::new(),
            title: title.into(),
            detail,
            created_at: chrono::Utc::now(),
        }
    }

    /// One-based day number of the goal's life at the given instant.
    ///
    /// A goal created earlier today is on day 1.
    pub fn current_day(&self, now: Time) -> i64 {
        now.signed_duration_since(self.created_at).num_days() + 1
    }
}
