//! JSON file storage implementation.
//!
//! Stores each key (or goal) as its own JSON file under a root directory.
//! Keys are used as file stems directly, so they must be filesystem-safe;
//! the progress ledger's namespaced ULID keys are.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use habitkit_core::{Goal, GoalId};
use tokio::fs;

use super::{GoalStore, KvStore, Result};

/// File-based string-set store, one JSON array per key.
pub struct JsonKvStore {
    root: PathBuf,
}

impl JsonKvStore {
    /// Create the store, ensuring its root directory exists.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }
}

#[async_trait]
impl KvStore for JsonKvStore {
    async fn get_string_set(&self, key: &str) -> Result<BTreeSet<String>> {
        match fs::read_to_string(self.key_path(key)).await {
            Ok(s) => Ok(serde_json::from_str(&s)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeSet::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn set_string_set(&self, key: &str, set: &BTreeSet<String>) -> Result<()> {
        let json = serde_json::to_string_pretty(set)?;
        fs::write(self.key_path(key), json.as_bytes()).await?;
        Ok(())
    }

    async fn remove_key(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.key_path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// File-based goal store, one JSON file per goal.
pub struct JsonGoalStore {
    root: PathBuf,
}

impl JsonGoalStore {
    /// Create the store, ensuring its root directory exists.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    fn goal_path(&self, id: GoalId) -> PathBuf {
        self.root.join(format!("{}.json", id))
    }
}

#[async_trait]
impl GoalStore for JsonGoalStore {
    async fn save_goal(&self, goal: &Goal) -> Result<()> {
        let json = serde_json::to_string_pretty(goal)?;
        fs::write(self.goal_path(goal.id), json.as_bytes()).await?;
        Ok(())
    }

    async fn load_goal(&self, id: GoalId) -> Result<Option<Goal>> {
        match fs::read_to_string(self.goal_path(id)).await {
            Ok(s) => Ok(Some(serde_json::from_str(&s)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn list_goals(&self) -> Result<Vec<Goal>> {
        let mut goals = Vec::new();
        let mut entries = fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let s = fs::read_to_string(&path).await?;
            goals.push(serde_json::from_str::<Goal>(&s)?);
        }
        goals.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(goals)
    }

    async fn delete_goal(&self, id: GoalId) -> Result<()> {
        match fs::remove_file(self.goal_path(id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_key_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonKvStore::new(dir.path()).await.unwrap();

        let set = store.get_string_set("never_written").await.unwrap();
        assert!(set.is_empty());
    }

    #[tokio::test]
    async fn test_string_set_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonKvStore::new(dir.path()).await.unwrap();

        let mut set = BTreeSet::new();
        set.insert("2025-07-01".to_string());
        set.insert("2025-07-02".to_string());
        store.set_string_set("goal_progress_x", &set).await.unwrap();

        let back = store.get_string_set("goal_progress_x").await.unwrap();
        assert_eq!(back, set);
    }

    #[tokio::test]
    async fn test_remove_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonKvStore::new(dir.path()).await.unwrap();

        let mut set = BTreeSet::new();
        set.insert("2025-07-01".to_string());
        store.set_string_set("k", &set).await.unwrap();
        store.remove_key("k").await.unwrap();

        assert!(store.get_string_set("k").await.unwrap().is_empty());
        // Removing again is a no-op
        store.remove_key("k").await.unwrap();
    }

    #[tokio::test]
    async fn test_goal_roundtrip_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonGoalStore::new(dir.path()).await.unwrap();

        let goal = Goal::new("Meditate", Some("10 minutes".to_string()));
        store.save_goal(&goal).await.unwrap();

        let loaded = store.load_goal(goal.id).await.unwrap().unwrap();
        assert_eq!(loaded.id, goal.id);
        assert_eq!(loaded.title, "Meditate");

        store.delete_goal(goal.id).await.unwrap();
        assert!(store.load_goal(goal.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_goals_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonGoalStore::new(dir.path()).await.unwrap();

        let mut older = Goal::new("Older", None);
        older.created_at -= chrono::Duration::days(3);
        let newer = Goal::new("Newer", None);
        store.save_goal(&older).await.unwrap();
        store.save_goal(&newer).await.unwrap();

        let goals = store.list_goals().await.unwrap();
        assert_eq!(goals.len(), 2);
        assert_eq!(goals[0].title, "Newer");
        assert_eq!(goals[1].title, "Older");
    }
}
