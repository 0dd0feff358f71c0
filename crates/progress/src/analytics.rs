//! Cross-goal aggregates derived from the ledger.

use std::sync::Arc;

use habitkit_core::{Goal, Time};
use tracing::warn;

use crate::ledger::{ProgressLedger, DEFAULT_TARGET_DAYS};

/// Read-side derivation of display-ready aggregates.
///
/// Every method is a pure function of the goal slice and the ledger's
/// current state; nothing here mutates. Storage failures degrade to zero
/// progress for the affected goal (with a warning) so aggregates are
/// always total.
pub struct ProgressAnalytics {
    ledger: Arc<ProgressLedger>,
}

impl ProgressAnalytics {
    /// Create analytics over the given ledger.
    pub fn new(ledger: Arc<ProgressLedger>) -> Self {
        Self { ledger }
    }

    async fn count_or_zero(&self, goal: &Goal) -> usize {
        match self.ledger.logged_count(goal.id).await {
            Ok(count) => count,
            Err(e) => {
                warn!(goal = %goal.id, error = %e, "progress read failed, treating as zero");
                0
            }
        }
    }

    /// Goals still short of `target_days` logged days.
    pub async fn active_goals_count(&self, goals: &[Goal], target_days: u32) -> usize {
        let mut active = 0;
        for goal in goals {
            if self.count_or_zero(goal).await < target_days as usize {
                active += 1;
            }
        }
        active
    }

    /// Goals at or past `target_days` logged days.
    ///
    /// A goal at exactly the target is completed, not active; for any fixed
    /// target, active + completed equals the number of goals.
    pub async fn completed_goals_count(&self, goals: &[Goal], target_days: u32) -> usize {
        let mut completed = 0;
        for goal in goals {
            if self.count_or_zero(goal).await >= target_days as usize {
                completed += 1;
            }
        }
        completed
    }

    /// Mean completion fraction across the goals; 0.0 for an empty slice.
    pub async fn average_progress(&self, goals: &[Goal]) -> f64 {
        if goals.is_empty() {
            return 0.0;
        }
        let mut total = 0.0;
        for goal in goals {
            total += match self.ledger.progress(goal.id, DEFAULT_TARGET_DAYS).await {
                Ok(fraction) => fraction,
                Err(e) => {
                    warn!(goal = %goal.id, error = %e, "progress read failed, treating as zero");
                    0.0
                }
            };
        }
        total / goals.len() as f64
    }

    /// Sum of logged days across the goals.
    ///
    /// Not deduplicated: a day logged on two goals counts twice.
    pub async fn total_days_logged(&self, goals: &[Goal]) -> usize {
        let mut total = 0;
        for goal in goals {
            total += self.count_or_zero(goal).await;
        }
        total
    }

    /// Goals created fewer than 7 whole days before `reference`.
    ///
    /// A recency signal, not a measure of logging activity in the week.
    pub fn weekly_active_count(&self, goals: &[Goal], reference: Time) -> usize {
        goals
            .iter()
            .filter(|goal| reference.signed_duration_since(goal.created_at).num_days() < 7)
            .count()
    }

    /// Take an immutable aggregate snapshot at the ledger clock's now.
    pub async fn snapshot(&self, goals: &[Goal]) -> AnalyticsSnapshot {
        let now = self.ledger.clock().now();
        AnalyticsSnapshot {
            timestamp: now,
            active_goals: self.active_goals_count(goals, DEFAULT_TARGET_DAYS).await,
            completed_goals: self.completed_goals_count(goals, DEFAULT_TARGET_DAYS).await,
            average_progress: self.average_progress(goals).await,
            total_days_logged: self.total_days_logged(goals).await,
            weekly_active: self.weekly_active_count(goals, now),
        }
    }
}

/// A snapshot of cross-goal aggregates at a point in time.
#[derive(Debug, Clone)]
pub struct AnalyticsSnapshot {
    /// When snapshot was taken
    pub timestamp: Time,

    /// Goals short of the default target
    pub active_goals: usize,

    /// Goals at or past the default target
    pub completed_goals: usize,

    /// Mean completion fraction in [0, 1]
    pub average_progress: f64,

    /// Total logged days across goals
    pub total_days_logged: usize,

    /// Goals created within the last week
    pub weekly_active: usize,
}
