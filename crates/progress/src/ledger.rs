//! Per-goal daily completion ledger.

use std::sync::Arc;

use habitkit_core::{DayKey, GoalId, ProgressUpdate};
use habitkit_storage::{KvStore, Result};
use tokio::sync::broadcast;
use tracing::debug;

/// Default number of distinct logged days that completes a goal.
pub const DEFAULT_TARGET_DAYS: u32 = 30;

/// Storage key namespace for per-goal day sets.
const KEY_PREFIX: &str = "goal_progress_";

/// Capacity of the change-notification channel.
const EVENT_CAPACITY: usize = 64;

/// Durable, idempotent record of which calendar days each goal was logged.
///
/// Each goal owns a set of canonical day keys in the backing [`KvStore`];
/// the record is created implicitly on first log and removed by
/// [`clear_logs`](Self::clear_logs). Logging the same local calendar day
/// twice changes nothing after the first success.
///
/// All read-modify-write paths are serialized through one internal mutex,
/// so two concurrent [`log_today`](Self::log_today) calls for the same goal
/// can never both observe "not yet logged".
pub struct ProgressLedger {
    store: Arc<dyn KvStore>,
    clock: Arc<dyn crate::Clock>,
    events: broadcast::Sender<ProgressUpdate>,
    write_lock: tokio::sync::Mutex<()>,
}

impl ProgressLedger {
    /// Create a ledger over the given store and clock.
    pub fn new(store: Arc<dyn KvStore>, clock: Arc<dyn crate::Clock>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            store,
            clock,
            events,
            write_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Subscribe to change notifications.
    ///
    /// One [`ProgressUpdate`] is published per newly logged day, in the
    /// order the underlying mutations committed. Best-effort in-process
    /// dispatch only; missed events are not replayed.
    pub fn subscribe(&self) -> broadcast::Receiver<ProgressUpdate> {
        self.events.subscribe()
    }

    /// The instant and calendar source this ledger runs on.
    pub fn clock(&self) -> &dyn crate::Clock {
        self.clock.as_ref()
    }

    fn key(&self, goal_id: GoalId) -> String {
        format!("{}{}", KEY_PREFIX, goal_id)
    }

    fn today(&self) -> DayKey {
        DayKey::new(self.clock.today())
    }

    /// Number of distinct days ever logged for the goal; 0 for an unknown id.
    pub async fn logged_count(&self, goal_id: GoalId) -> Result<usize> {
        let set = self.store.get_string_set(&self.key(goal_id)).await?;
        Ok(set.len())
    }

    /// Whether the goal has already been logged today.
    pub async fn is_logged_today(&self, goal_id: GoalId) -> Result<bool> {
        let set = self.store.get_string_set(&self.key(goal_id)).await?;
        Ok(set.contains(&self.today().to_string()))
    }

    /// Log today's completion for the goal.
    ///
    /// Returns `true` if today's key was newly added, `false` if the goal
    /// was already logged today (no mutation, no event). Within one local
    /// calendar day this returns `true` exactly once per goal, no matter
    /// how often it is called.
    pub async fn log_today(&self, goal_id: GoalId) -> Result<bool> {
        let _guard = self.write_lock.lock().await;

        let key = self.key(goal_id);
        let mut set = self.store.get_string_set(&key).await?;
        let day = self.today();
        let inserted = set.insert(day.to_string());
        if inserted {
            self.store.set_string_set(&key, &set).await?;
            debug!(goal = %goal_id, day = %day, "logged day");
            // Sent under the lock, so per-goal events arrive in commit order.
            let _ = self.events.send(ProgressUpdate { goal_id, day });
        }
        Ok(inserted)
    }

    /// Completion fraction against `target_days`, clamped to `[0.0, 1.0]`.
    ///
    /// A zero target yields 0.0 rather than dividing by zero.
    pub async fn progress(&self, goal_id: GoalId, target_days: u32) -> Result<f64> {
        if target_days == 0 {
            return Ok(0.0);
        }
        let count = self.logged_count(goal_id).await?;
        Ok((count as f64 / f64::from(target_days)).min(1.0))
    }

    /// Remove the goal's entire record.
    ///
    /// The ledger has no visibility into goal lifecycle, so whoever deletes
    /// a goal must call this alongside.
    pub async fn clear_logs(&self, goal_id: GoalId) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.store.remove_key(&self.key(goal_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FixedClock;
    use chrono::{DateTime, FixedOffset, TimeZone};
    use habitkit_storage::MemoryKvStore;
    use tokio::sync::broadcast::error::TryRecvError;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(y, mo, d, h, mi, s)
            .unwrap()
    }

    fn ledger_at(start: DateTime<FixedOffset>) -> (ProgressLedger, Arc<FixedClock>) {
        let clock = Arc::new(FixedClock::new(start));
        let ledger = ProgressLedger::new(Arc::new(MemoryKvStore::new()), clock.clone());
        (ledger, clock)
    }

    #[tokio::test]
    async fn test_log_today_is_idempotent() {
        let (ledger, _clock) = ledger_at(at(2025, 7, 1, 9, 0, 0));
        let goal = GoalId::new();

        assert!(ledger.log_today(goal).await.unwrap());
        assert!(!ledger.log_today(goal).await.unwrap());
        assert_eq!(ledger.logged_count(goal).await.unwrap(), 1);
        assert!(ledger.is_logged_today(goal).await.unwrap());
    }

    #[tokio::test]
    async fn test_midnight_splits_day_keys() {
        let (ledger, clock) = ledger_at(at(2025, 7, 1, 23, 59, 59));
        let goal = GoalId::new();

        assert!(ledger.log_today(goal).await.unwrap());

        // Two seconds later, but on the other side of local midnight.
        clock.set(at(2025, 7, 2, 0, 0, 1));
        assert!(ledger.log_today(goal).await.unwrap());
        assert_eq!(ledger.logged_count(goal).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_same_day_hours_apart_is_one_key() {
        let (ledger, clock) = ledger_at(at(2025, 7, 1, 0, 0, 5));
        let goal = GoalId::new();

        assert!(ledger.log_today(goal).await.unwrap());
        clock.set(at(2025, 7, 1, 22, 0, 0));
        assert!(!ledger.log_today(goal).await.unwrap());
        assert_eq!(ledger.logged_count(goal).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_progress_is_monotonic_and_clamped() {
        let (ledger, clock) = ledger_at(at(2025, 6, 1, 12, 0, 0));
        let goal = GoalId::new();

        let mut last = 0.0;
        let mut day = at(2025, 6, 1, 12, 0, 0);
        for _ in 0..35 {
            clock.set(day);
            assert!(ledger.log_today(goal).await.unwrap());
            let p = ledger.progress(goal, 30).await.unwrap();
            assert!(p >= last);
            assert!(p <= 1.0);
            last = p;
            day += chrono::Duration::days(1);
        }

        assert_eq!(ledger.logged_count(goal).await.unwrap(), 35);
        assert_eq!(ledger.progress(goal, 30).await.unwrap(), 1.0);
    }

    #[tokio::test]
    async fn test_progress_zero_target_is_zero() {
        let (ledger, _clock) = ledger_at(at(2025, 7, 1, 9, 0, 0));
        let goal = GoalId::new();
        ledger.log_today(goal).await.unwrap();

        assert_eq!(ledger.progress(goal, 0).await.unwrap(), 0.0);
    }

    #[tokio::test]
    async fn test_clear_resets() {
        let (ledger, _clock) = ledger_at(at(2025, 7, 1, 9, 0, 0));
        let goal = GoalId::new();
        ledger.log_today(goal).await.unwrap();

        ledger.clear_logs(goal).await.unwrap();
        assert_eq!(ledger.logged_count(goal).await.unwrap(), 0);
        assert!(!ledger.is_logged_today(goal).await.unwrap());
    }

    #[tokio::test]
    async fn test_unknown_goal_reads_zero() {
        let (ledger, _clock) = ledger_at(at(2025, 7, 1, 9, 0, 0));
        let goal = GoalId::new();

        assert_eq!(ledger.logged_count(goal).await.unwrap(), 0);
        assert_eq!(ledger.progress(goal, 30).await.unwrap(), 0.0);
        assert!(!ledger.is_logged_today(goal).await.unwrap());
    }

    #[tokio::test]
    async fn test_event_published_once_per_new_day() {
        let (ledger, _clock) = ledger_at(at(2025, 7, 1, 9, 0, 0));
        let goal = GoalId::new();
        let mut events = ledger.subscribe();

        ledger.log_today(goal).await.unwrap();
        ledger.log_today(goal).await.unwrap();

        let update = events.try_recv().unwrap();
        assert_eq!(update.goal_id, goal);
        assert_eq!(update.day.to_string(), "2025-07-01");
        assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn test_concurrent_log_same_goal_inserts_once() {
        let (ledger, _clock) = ledger_at(at(2025, 7, 1, 9, 0, 0));
        let ledger = Arc::new(ledger);
        let goal = GoalId::new();

        let a = tokio::spawn({
            let ledger = ledger.clone();
            async move { ledger.log_today(goal).await.unwrap() }
        });
        let b = tokio::spawn({
            let ledger = ledger.clone();
            async move { ledger.log_today(goal).await.unwrap() }
        });

        let (a, b) = (a.await.unwrap(), b.await.unwrap());
        assert!(a != b, "exactly one call may report the insert");
        assert_eq!(ledger.logged_count(goal).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_goals_do_not_share_records() {
        let (ledger, _clock) = ledger_at(at(2025, 7, 1, 9, 0, 0));
        let first = GoalId::new();
        let second = GoalId::new();

        ledger.log_today(first).await.unwrap();
        assert_eq!(ledger.logged_count(first).await.unwrap(), 1);
        assert_eq!(ledger.logged_count(second).await.unwrap(), 0);
    }
}
