use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use shabda_core::model::{DeckId, SessionSummary};

use crate::kv::{KvStore, StorageError, keys};

/// Cap on the recent-session log.
pub const MAX_SESSION_HISTORY: usize = 30;

//
// ─── PERSISTED SHAPE ───────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SessionRecord {
    date: DateTime<Utc>,
    deck: String,
    stars: u8,
    accuracy: u8,
    correct: u32,
    incorrect: u32,
    best_streak: u32,
}

impl SessionRecord {
    fn from_summary(summary: &SessionSummary) -> Self {
        Self {
            date: summary.completed_at(),
            deck: summary.deck_id().as_str().to_owned(),
            stars: summary.stars(),
            accuracy: summary.accuracy(),
            correct: summary.correct(),
            incorrect: summary.incorrect(),
            best_streak: summary.best_streak(),
        }
    }

    fn into_summary(self) -> Option<SessionSummary> {
        SessionSummary::from_persisted(
            self.date,
            DeckId::new(self.deck),
            self.stars,
            self.accuracy,
            self.correct,
            self.incorrect,
            self.best_streak,
        )
        .ok()
    }
}

//
// ─── STAR TOTALS ───────────────────────────────────────────────────────────────
//

/// Current values of the two star counters.
///
/// `total` only ever grows; `candy` grows with it but can be reset
/// independently, and wraps modulo the candy threshold when displayed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StarTotals {
    pub total: u32,
    pub candy: u32,
}

//
// ─── HISTORY STORE ─────────────────────────────────────────────────────────────
//

/// Capped session log plus the lifetime and candy star counters.
#[derive(Clone)]
pub struct HistoryStore {
    kv: Arc<dyn KvStore>,
}

impl HistoryStore {
    #[must_use]
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    /// Append a completed session, newest first, and credit its stars
    /// to both counters.
    ///
    /// The log is truncated to [`MAX_SESSION_HISTORY`] entries.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    pub async fn append(&self, summary: &SessionSummary) -> Result<StarTotals, StorageError> {
        let mut records = self.load_records().await?;
        records.insert(0, SessionRecord::from_summary(summary));
        records.truncate(MAX_SESSION_HISTORY);

        let raw = serde_json::to_string(&records)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.kv.set(keys::SESSION_HISTORY, &raw).await?;

        self.add_stars(u32::from(summary.stars())).await
    }

    /// Recent session summaries, newest first, at most `limit`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    pub async fn recent(&self, limit: usize) -> Result<Vec<SessionSummary>, StorageError> {
        let records = self.load_records().await?;
        Ok(records
            .into_iter()
            .take(limit)
            .filter_map(SessionRecord::into_summary)
            .collect())
    }

    /// Number of valid sessions currently in the log.
    ///
    /// Records that fail summary validation are skipped, matching
    /// [`HistoryStore::recent`].
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    pub async fn count(&self) -> Result<usize, StorageError> {
        Ok(self
            .load_records()
            .await?
            .into_iter()
            .filter_map(SessionRecord::into_summary)
            .count())
    }

    /// Current counter values.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    pub async fn totals(&self) -> Result<StarTotals, StorageError> {
        Ok(StarTotals {
            total: self.load_counter(keys::TOTAL_STARS).await?,
            candy: self.load_counter(keys::CANDY_STARS).await?,
        })
    }

    /// Reset the candy counter; the lifetime counter is untouched.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    pub async fn reset_candy(&self) -> Result<(), StorageError> {
        self.kv.set(keys::CANDY_STARS, "0").await
    }

    /// Drop the log and both counters.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    pub async fn clear(&self) -> Result<(), StorageError> {
        self.kv.remove(keys::SESSION_HISTORY).await?;
        self.kv.remove(keys::TOTAL_STARS).await?;
        self.kv.remove(keys::CANDY_STARS).await
    }

    async fn add_stars(&self, stars: u32) -> Result<StarTotals, StorageError> {
        let totals = StarTotals {
            total: self.load_counter(keys::TOTAL_STARS).await?.saturating_add(stars),
            candy: self.load_counter(keys::CANDY_STARS).await?.saturating_add(stars),
        };
        self.kv
            .set(keys::TOTAL_STARS, &totals.total.to_string())
            .await?;
        self.kv
            .set(keys::CANDY_STARS, &totals.candy.to_string())
            .await?;
        Ok(totals)
    }

    async fn load_records(&self) -> Result<Vec<SessionRecord>, StorageError> {
        match self.kv.get(keys::SESSION_HISTORY).await? {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(records) => Ok(records),
                Err(err) => {
                    tracing::warn!(%err, "discarding malformed session history");
                    Ok(Vec::new())
                }
            },
            None => Ok(Vec::new()),
        }
    }

    async fn load_counter(&self, key: &str) -> Result<u32, StorageError> {
        Ok(self
            .kv
            .get(key)
            .await?
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(0))
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::InMemoryKv;
    use shabda_core::model::SessionStats;
    use shabda_core::time::fixed_now;

    fn summary(correct: u32, incorrect: u32) -> SessionSummary {
        let mut stats = SessionStats::new();
        for _ in 0..correct {
            stats.record(true);
        }
        for _ in 0..incorrect {
            stats.record(false);
        }
        SessionSummary::from_stats(DeckId::new("म"), &stats, fixed_now())
    }

    fn store() -> HistoryStore {
        HistoryStore::new(Arc::new(InMemoryKv::new()))
    }

    #[tokio::test]
    async fn append_keeps_newest_first() {
        let history = store();
        history.append(&summary(1, 0)).await.unwrap();
        history.append(&summary(0, 1)).await.unwrap();

        let recent = history.recent(10).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].correct(), 0);
        assert_eq!(recent[1].correct(), 1);
    }

    #[tokio::test]
    async fn log_is_capped() {
        let history = store();
        for _ in 0..(MAX_SESSION_HISTORY + 5) {
            history.append(&summary(1, 0)).await.unwrap();
        }
        assert_eq!(history.count().await.unwrap(), MAX_SESSION_HISTORY);
    }

    #[tokio::test]
    async fn append_credits_both_counters() {
        let history = store();
        // 1/0 -> 100% -> 5 stars.
        let totals = history.append(&summary(1, 0)).await.unwrap();
        assert_eq!(totals, StarTotals { total: 5, candy: 5 });

        let totals = history.append(&summary(1, 0)).await.unwrap();
        assert_eq!(totals, StarTotals { total: 10, candy: 10 });
    }

    #[tokio::test]
    async fn reset_candy_preserves_lifetime_total() {
        let history = store();
        history.append(&summary(1, 0)).await.unwrap();
        history.reset_candy().await.unwrap();

        let totals = history.totals().await.unwrap();
        assert_eq!(totals.total, 5);
        assert_eq!(totals.candy, 0);
    }

    #[tokio::test]
    async fn malformed_history_is_discarded() {
        let kv = Arc::new(InMemoryKv::new());
        kv.set(keys::SESSION_HISTORY, "[broken").await.unwrap();
        kv.set(keys::TOTAL_STARS, "not-a-number").await.unwrap();

        let history = HistoryStore::new(kv);
        assert_eq!(history.count().await.unwrap(), 0);
        assert_eq!(history.totals().await.unwrap().total, 0);
    }

    #[tokio::test]
    async fn count_skips_records_that_fail_validation() {
        let kv = Arc::new(InMemoryKv::new());
        // One valid record and one with out-of-range stars.
        let raw = serde_json::json!([
            {
                "date": "2023-11-14T22:13:20Z",
                "deck": "म",
                "stars": 5,
                "accuracy": 100,
                "correct": 3,
                "incorrect": 0,
                "best_streak": 3,
            },
            {
                "date": "2023-11-14T22:13:20Z",
                "deck": "म",
                "stars": 0,
                "accuracy": 100,
                "correct": 3,
                "incorrect": 0,
                "best_streak": 3,
            },
        ]);
        kv.set(keys::SESSION_HISTORY, &raw.to_string()).await.unwrap();

        let history = HistoryStore::new(kv);
        assert_eq!(history.count().await.unwrap(), 1);
        assert_eq!(history.recent(10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn clear_drops_everything() {
        let history = store();
        history.append(&summary(2, 1)).await.unwrap();
        history.clear().await.unwrap();

        assert_eq!(history.count().await.unwrap(), 0);
        assert_eq!(history.totals().await.unwrap(), StarTotals::default());
    }
}
