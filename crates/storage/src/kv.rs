use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Well-known keys used by the game's stores.
pub mod keys {
    /// Serialized map of per-word scheduling records.
    pub const WORD_PROGRESS: &str = "word_progress";
    /// Capped list of recent session summaries, newest first.
    pub const SESSION_HISTORY: &str = "session_history";
    /// Lifetime star counter.
    pub const TOTAL_STARS: &str = "total_stars";
    /// Wrapping star counter feeding the candy tracker.
    pub const CANDY_STARS: &str = "candy_stars";
}

/// Minimal key-value persistence contract.
///
/// Values are opaque strings; callers own serialization. A `set` must
/// replace the whole value for a key atomically so a reader never sees
/// a partial write.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Fetch the value for a key, `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store the value for a key, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a key. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-memory store for tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct InMemoryKv {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemoryKv {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StorageError> {
        self.entries
            .lock()
            .map_err(|_| StorageError::Connection("kv mutex poisoned".into()))
    }
}

#[async_trait]
impl KvStore for InMemoryKv {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock()?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.lock()?.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.lock()?.remove(key);
        Ok(())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
