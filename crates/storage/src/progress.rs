use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use shabda_core::model::{DeckId, LastResult, ProgressKey, WordProgress};
use shabda_core::scheduler;

use crate::kv::{KvStore, StorageError, keys};

//
// ─── PERSISTED SHAPE ───────────────────────────────────────────────────────────
//

/// Persisted shape for one word's scheduling record.
///
/// Mirrors the domain `WordProgress` plus its composite key so the
/// store can serialize without leaking storage concerns into the
/// domain layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProgressRecord {
    deck: String,
    word: String,
    interval_days: u32,
    ease_factor: f64,
    repetitions: u32,
    next_review: NaiveDate,
    last_result: LastResult,
}

impl ProgressRecord {
    fn from_entry(key: &ProgressKey, progress: &WordProgress) -> Self {
        Self {
            deck: key.deck.as_str().to_owned(),
            word: key.word.clone(),
            interval_days: progress.interval_days(),
            ease_factor: progress.ease_factor(),
            repetitions: progress.repetitions(),
            next_review: progress.next_review(),
            last_result: progress.last_result(),
        }
    }

    fn into_entry(self) -> (ProgressKey, WordProgress) {
        let key = ProgressKey::new(DeckId::new(self.deck), self.word);
        // Out-of-range persisted values are normalized, not rejected.
        let progress = WordProgress::from_persisted(
            self.interval_days,
            self.ease_factor,
            self.repetitions,
            self.next_review,
            self.last_result,
        );
        (key, progress)
    }
}

//
// ─── PROGRESS STORE ────────────────────────────────────────────────────────────
//

/// Per-word scheduling records, keyed by `(deck, word)`.
///
/// Loaded once from the key-value store; every grade persists the whole
/// serialized map back in one write.
pub struct ProgressStore {
    kv: Arc<dyn KvStore>,
    entries: HashMap<ProgressKey, WordProgress>,
}

impl ProgressStore {
    /// Load the store from persistence.
    ///
    /// Missing or malformed data falls back to an empty store; it is
    /// never a fatal error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` only for backend failures.
    pub async fn load(kv: Arc<dyn KvStore>) -> Result<Self, StorageError> {
        let entries = match kv.get(keys::WORD_PROGRESS).await? {
            Some(raw) => match serde_json::from_str::<Vec<ProgressRecord>>(&raw) {
                Ok(records) => records.into_iter().map(ProgressRecord::into_entry).collect(),
                Err(err) => {
                    tracing::warn!(%err, "discarding malformed word progress data");
                    HashMap::new()
                }
            },
            None => HashMap::new(),
        };

        Ok(Self { kv, entries })
    }

    /// Returns the record for a word, creating the default lazily.
    ///
    /// Idempotent: repeated calls for the same key return the same
    /// record. Creation is in-memory only; nothing is persisted until
    /// the word is graded.
    pub fn get_or_create(&mut self, key: ProgressKey, today: NaiveDate) -> &WordProgress {
        self.entries
            .entry(key)
            .or_insert_with(|| WordProgress::new_on(today))
    }

    #[must_use]
    pub fn get(&self, key: &ProgressKey) -> Option<&WordProgress> {
        self.entries.get(key)
    }

    /// Applies one graded answer to a word and persists the store.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write fails. The in-memory record
    /// is updated regardless, so a retry persists the same state.
    pub async fn grade(
        &mut self,
        key: ProgressKey,
        correct: bool,
        today: NaiveDate,
    ) -> Result<WordProgress, StorageError> {
        let current = self
            .entries
            .entry(key)
            .or_insert_with(|| WordProgress::new_on(today));
        let updated = scheduler::apply_answer(current, correct, today);
        *current = updated.clone();

        self.save().await?;
        Ok(updated)
    }

    /// Number of words with a mastered repetition streak.
    #[must_use]
    pub fn mastered_count(&self) -> usize {
        self.entries.values().filter(|p| p.is_mastered()).count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every record and persists the empty store.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write fails.
    pub async fn clear(&mut self) -> Result<(), StorageError> {
        self.entries.clear();
        self.kv.remove(keys::WORD_PROGRESS).await
    }

    async fn save(&self) -> Result<(), StorageError> {
        let records: Vec<ProgressRecord> = self
            .entries
            .iter()
            .map(|(key, progress)| ProgressRecord::from_entry(key, progress))
            .collect();
        let raw = serde_json::to_string(&records)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.kv.set(keys::WORD_PROGRESS, &raw).await
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
