use tracing::info;

use shabda_core::model::{GameSettings, SessionSummary};
use storage::history::HistoryStore;
use storage::kv::StorageError;
use storage::progress::ProgressStore;

//
// ─── OVERVIEW TYPES ────────────────────────────────────────────────────────────
//

/// Progress toward the next candy.
///
/// The candy counter wraps at the threshold: earned candies are whole
/// multiples, the remainder counts toward the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandyProgress {
    pub candies_earned: u32,
    pub stars_into_current: u32,
    pub stars_needed: u32,
    pub stars_per_candy: u32,
}

impl CandyProgress {
    fn from_counter(candy_stars: u32, stars_per_candy: u32) -> Self {
        let stars_into_current = candy_stars % stars_per_candy;
        Self {
            candies_earned: candy_stars / stars_per_candy,
            stars_into_current,
            stars_needed: stars_per_candy - stars_into_current,
            stars_per_candy,
        }
    }

    /// How full the current candy cycle is, in `[0, 1)`.
    #[must_use]
    pub fn fraction(&self) -> f64 {
        f64::from(self.stars_into_current) / f64::from(self.stars_per_candy)
    }
}

/// One-screen snapshot of lifetime progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsOverview {
    pub total_stars: u32,
    pub candy: CandyProgress,
    pub sessions_recorded: usize,
    pub tracked_words: usize,
    pub mastered_words: usize,
}

//
// ─── STATS SERVICE ─────────────────────────────────────────────────────────────
//

/// Read-mostly service over the history and progress stores.
pub struct StatsService {
    settings: GameSettings,
}

impl StatsService {
    #[must_use]
    pub fn new(settings: GameSettings) -> Self {
        Self { settings }
    }

    /// Assemble the stats overview.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    pub async fn overview(
        &self,
        progress: &ProgressStore,
        history: &HistoryStore,
    ) -> Result<StatsOverview, StorageError> {
        let totals = history.totals().await?;
        Ok(StatsOverview {
            total_stars: totals.total,
            candy: CandyProgress::from_counter(totals.candy, self.settings.stars_per_candy()),
            sessions_recorded: history.count().await?,
            tracked_words: progress.len(),
            mastered_words: progress.mastered_count(),
        })
    }

    /// Recent session summaries, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    pub async fn recent_sessions(
        &self,
        history: &HistoryStore,
        limit: usize,
    ) -> Result<Vec<SessionSummary>, StorageError> {
        history.recent(limit).await
    }

    /// Cash in the candy counter: reset it to zero, keeping the
    /// lifetime star total.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    pub async fn reset_candy(&self, history: &HistoryStore) -> Result<(), StorageError> {
        history.reset_candy().await?;
        info!("candy counter reset");
        Ok(())
    }

    /// Wipe all persisted game state: scheduling records, session log,
    /// and both star counters.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    pub async fn clear_all_data(
        &self,
        progress: &mut ProgressStore,
        history: &HistoryStore,
    ) -> Result<(), StorageError> {
        progress.clear().await?;
        history.clear().await?;
        info!("all game data cleared");
        Ok(())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use shabda_core::model::{DeckId, ProgressKey, SessionStats, SessionSummary};
    use shabda_core::time::{fixed_now, fixed_today};
    use std::sync::Arc;
    use storage::kv::{InMemoryKv, KvStore};

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

    async fn fixture() -> (StatsService, ProgressStore, HistoryStore) {
        let kv: Arc<dyn KvStore> = Arc::new(InMemoryKv::new());
        let progress = ProgressStore::load(Arc::clone(&kv)).await.unwrap();
        let history = HistoryStore::new(kv);
        (StatsService::new(GameSettings::default()), progress, history)
    }

    #[test]
    fn candy_progress_wraps_at_threshold() {
        let candy = CandyProgress::from_counter(0, 15);
        assert_eq!(candy.candies_earned, 0);
        assert_eq!(candy.stars_needed, 15);

        let candy = CandyProgress::from_counter(14, 15);
        assert_eq!(candy.candies_earned, 0);
        assert_eq!(candy.stars_into_current, 14);
        assert_eq!(candy.stars_needed, 1);

        let candy = CandyProgress::from_counter(37, 15);
        assert_eq!(candy.candies_earned, 2);
        assert_eq!(candy.stars_into_current, 7);
        assert_eq!(candy.stars_needed, 8);
    }

    #[tokio::test]
    async fn overview_reflects_stores() {
        let (stats, mut progress, history) = fixture().await;

        // Three perfect sessions: 15 stars, exactly one candy.
        for _ in 0..3 {
            history.append(&summary(1, 0)).await.unwrap();
        }
        for _ in 0..5 {
            progress
                .grade(ProgressKey::new(DeckId::new("म"), "मासा"), true, fixed_today())
                .await
                .unwrap();
        }

        let overview = stats.overview(&progress, &history).await.unwrap();
        assert_eq!(overview.total_stars, 15);
        assert_eq!(overview.candy.candies_earned, 1);
        assert_eq!(overview.candy.stars_into_current, 0);
        assert_eq!(overview.sessions_recorded, 3);
        assert_eq!(overview.tracked_words, 1);
        assert_eq!(overview.mastered_words, 1);
    }

    #[tokio::test]
    async fn reset_candy_keeps_lifetime_total() {
        let (stats, progress, history) = fixture().await;
        history.append(&summary(1, 0)).await.unwrap();

        stats.reset_candy(&history).await.unwrap();
        let overview = stats.overview(&progress, &history).await.unwrap();
        assert_eq!(overview.total_stars, 5);
        assert_eq!(overview.candy.candies_earned, 0);
        assert_eq!(overview.candy.stars_into_current, 0);
    }

    #[tokio::test]
    async fn clear_all_data_wipes_everything() {
        let (stats, mut progress, history) = fixture().await;
        history.append(&summary(1, 0)).await.unwrap();
        progress
            .grade(ProgressKey::new(DeckId::new("म"), "मासा"), true, fixed_today())
            .await
            .unwrap();

        stats.clear_all_data(&mut progress, &history).await.unwrap();
        let overview = stats.overview(&progress, &history).await.unwrap();
        assert_eq!(overview.total_stars, 0);
        assert_eq!(overview.sessions_recorded, 0);
        assert_eq!(overview.tracked_words, 0);
    }
}
