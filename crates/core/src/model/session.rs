use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::DeckId;

//
// ─── SESSION STATS ─────────────────────────────────────────────────────────────
//

/// Running counters for one practice session.
///
/// Reset at session start, bumped once per graded answer, read-only
/// after the session ends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStats {
    correct: u32,
    incorrect: u32,
    streak: u32,
    best_streak: u32,
}

impl SessionStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one graded answer.
    pub fn record(&mut self, correct: bool) {
        if correct {
            self.correct += 1;
            self.streak += 1;
            self.best_streak = self.best_streak.max(self.streak);
        } else {
            self.incorrect += 1;
            self.streak = 0;
        }
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn incorrect(&self) -> u32 {
        self.incorrect
    }

    #[must_use]
    pub fn streak(&self) -> u32 {
        self.streak
    }

    #[must_use]
    pub fn best_streak(&self) -> u32 {
        self.best_streak
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.correct + self.incorrect
    }

    /// Percentage of correct answers, 100 when nothing has been answered.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            100.0
        } else {
            f64::from(self.correct) / f64::from(total) * 100.0
        }
    }

    /// Star rating for the current accuracy.
    #[must_use]
    pub fn stars(&self) -> u8 {
        stars_for_accuracy(self.accuracy())
    }
}

/// Maps an accuracy percentage to a 1-5 star rating.
#[must_use]
pub fn stars_for_accuracy(accuracy: f64) -> u8 {
    if accuracy >= 95.0 {
        5
    } else if accuracy >= 85.0 {
        4
    } else if accuracy >= 70.0 {
        3
    } else if accuracy >= 50.0 {
        2
    } else {
        1
    }
}

//
// ─── SESSION SUMMARY ───────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionSummaryError {
    #[error("stars must be between 1 and 5, got {provided}")]
    InvalidStars { provided: u8 },

    #[error("accuracy must be at most 100, got {provided}")]
    InvalidAccuracy { provided: u8 },
}

/// Aggregate summary for a completed practice session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    completed_at: DateTime<Utc>,
    deck_id: DeckId,
    stars: u8,
    accuracy: u8,
    correct: u32,
    incorrect: u32,
    best_streak: u32,
}

impl SessionSummary {
    /// Build a summary from final session stats.
    ///
    /// The accuracy is rounded to a whole percentage for persistence;
    /// star rating uses the exact value.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_stats(
        deck_id: DeckId,
        stats: &SessionStats,
        completed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            completed_at,
            deck_id,
            stars: stats.stars(),
            accuracy: stats.accuracy().round() as u8,
            correct: stats.correct(),
            incorrect: stats.incorrect(),
            best_streak: stats.best_streak(),
        }
    }

    /// Rehydrate a session summary from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `SessionSummaryError` if stars or accuracy are out of range.
    pub fn from_persisted(
        completed_at: DateTime<Utc>,
        deck_id: DeckId,
        stars: u8,
        accuracy: u8,
        correct: u32,
        incorrect: u32,
        best_streak: u32,
    ) -> Result<Self, SessionSummaryError> {
        if !(1..=5).contains(&stars) {
            return Err(SessionSummaryError::InvalidStars { provided: stars });
        }
        if accuracy > 100 {
            return Err(SessionSummaryError::InvalidAccuracy { provided: accuracy });
        }

        Ok(Self {
            completed_at,
            deck_id,
            stars,
            accuracy,
            correct,
            incorrect,
            best_streak,
        })
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    #[must_use]
    pub fn deck_id(&self) -> &DeckId {
        &self.deck_id
    }

    #[must_use]
    pub fn stars(&self) -> u8 {
        self.stars
    }

    #[must_use]
    pub fn accuracy(&self) -> u8 {
        self.accuracy
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn incorrect(&self) -> u32 {
        self.incorrect
    }

    #[must_use]
    pub fn best_streak(&self) -> u32 {
        self.best_streak
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn stats_track_streaks() {
        let mut stats = SessionStats::new();
        stats.record(true);
        stats.record(true);
        stats.record(false);
        stats.record(true);

        assert_eq!(stats.correct(), 3);
        assert_eq!(stats.incorrect(), 1);
        assert_eq!(stats.streak(), 1);
        assert_eq!(stats.best_streak(), 2);
    }

    #[test]
    fn accuracy_is_full_before_any_answer() {
        let stats = SessionStats::new();
        assert_eq!(stats.accuracy(), 100.0);
        assert_eq!(stats.stars(), 5);
    }

    #[test]
    fn star_thresholds_are_inclusive() {
        assert_eq!(stars_for_accuracy(95.0), 5);
        assert_eq!(stars_for_accuracy(85.0), 4);
        assert_eq!(stars_for_accuracy(70.0), 3);
        assert_eq!(stars_for_accuracy(50.0), 2);
        assert_eq!(stars_for_accuracy(49.9), 1);
        assert_eq!(stars_for_accuracy(0.0), 1);
        assert_eq!(stars_for_accuracy(100.0), 5);
    }

    #[test]
    fn summary_rounds_accuracy() {
        let mut stats = SessionStats::new();
        stats.record(true);
        stats.record(true);
        stats.record(false);
        // 2/3 = 66.66..% -> rounds to 67, three stars would need 70.
        let summary = SessionSummary::from_stats(DeckId::new("म"), &stats, fixed_now());
        assert_eq!(summary.accuracy(), 67);
        assert_eq!(summary.stars(), 2);
        assert_eq!(summary.correct(), 2);
        assert_eq!(summary.incorrect(), 1);
    }

    #[test]
    fn from_persisted_rejects_bad_ranges() {
        let err =
            SessionSummary::from_persisted(fixed_now(), DeckId::new("म"), 0, 50, 1, 1, 1)
                .unwrap_err();
        assert!(matches!(err, SessionSummaryError::InvalidStars { .. }));

        let err =
            SessionSummary::from_persisted(fixed_now(), DeckId::new("म"), 3, 101, 1, 1, 1)
                .unwrap_err();
        assert!(matches!(err, SessionSummaryError::InvalidAccuracy { .. }));
    }
}
