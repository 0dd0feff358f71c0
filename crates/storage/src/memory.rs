//! In-memory storage implementation.
//!
//! Backed by plain maps behind a mutex. Used as the swap-in fake for tests
//! and for ephemeral runs where nothing should touch the filesystem.

use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;
use habitkit_core::{Goal, GoalId};

use super::{GoalStore, KvStore, Result};

/// In-memory string-set store.
#[derive(Default)]
pub struct MemoryKvStore {
    sets: Mutex<HashMap<String, BTreeSet<String>>>,
}

impl MemoryKvStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvStore for MemoryKvStore {
    async fn get_string_set(&self, key: &str) -> Result<BTreeSet<String>> {
        let sets = self.sets.lock().unwrap();
        Ok(sets.get(key).cloned().unwrap_or_default())
    }

    async fn set_string_set(&self, key: &str, set: &BTreeSet<String>) -> Result<()> {
        let mut sets = self.sets.lock().unwrap();
        sets.insert(key.to_string(), set.clone());
        Ok(())
    }

    async fn remove_key(&self, key: &str) -> Result<()> {
        let mut sets = self.sets.lock().unwrap();
        sets.remove(key);
        Ok(())
    }
}

/// In-memory goal store.
#[derive(Default)]
pub struct MemoryGoalStore {
    goals: Mutex<HashMap<GoalId, Goal>>,
}

impl MemoryGoalStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GoalStore for MemoryGoalStore {
    async fn save_goal(&self, goal: &Goal) -> Result<()> {
        let mut goals = self.goals.lock().unwrap();
        goals.insert(goal.id, goal.clone());
        Ok(())
    }

    async fn load_goal(&self, id: GoalId) -> Result<Option<Goal>> {
        let goals = self.goals.lock().unwrap();
        Ok(goals.get(&id).cloned())
    }

    async fn list_goals(&self) -> Result<Vec<Goal>> {
        let goals = self.goals.lock().unwrap();
        let mut all: Vec<Goal> = goals.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn delete_goal(&self, id: GoalId) -> Result<()> {
        let mut goals = self.goals.lock().unwrap();
        goals.remove(&id);
        Ok(())
    }
}
