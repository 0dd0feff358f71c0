//! Storage trait abstractions.

use std::collections::BTreeSet;

use async_trait::async_trait;
use habitkit_core::{Goal, GoalId};

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Item not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// String-set key-value persistence.
///
/// This is the only capability the progress ledger needs from its backing
/// store: read a set of strings for a key (empty if the key was never
/// written), replace it, or drop the key entirely. Implementations use
/// interior mutability so a store can be shared as `Arc<dyn KvStore>`.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Load the string set stored under `key`; empty set for a missing key.
    async fn get_string_set(&self, key: &str) -> Result<BTreeSet<String>>;

    /// Replace the string set stored under `key`.
    async fn set_string_set(&self, key: &str, set: &BTreeSet<String>) -> Result<()>;

    /// Remove `key` and its set. Removing a missing key is a no-op.
    async fn remove_key(&self, key: &str) -> Result<()>;
}

/// Goal persistence.
#[async_trait]
pub trait GoalStore: Send + Sync {
    /// Save a goal (create or update).
    async fn save_goal(&self, goal: &Goal) -> Result<()>;

    /// Load a goal by ID.
    async fn load_goal(&self, id: GoalId) -> Result<Option<Goal>>;

    /// List all goals, newest first.
    async fn list_goals(&self) -> Result<Vec<Goal>>;

    /// Delete a goal. Deleting a missing goal is a no-op.
    async fn delete_goal(&self, id: GoalId) -> Result<()>;
}
