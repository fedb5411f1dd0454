use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Ease factor floor; lapses never push a word below this.
pub const EASE_MIN: f64 = 1.3;

/// Ease factor ceiling; correct answers never push a word above this.
pub const EASE_MAX: f64 = 2.5;

/// Repetition count at which a word counts as mastered.
pub const MASTERED_REPETITIONS: u32 = 5;

//
// ─── LAST RESULT ───────────────────────────────────────────────────────────────
//

/// Outcome of the most recent attempt at a word.
///
/// `None` is only ever seen before the first attempt; together with
/// `repetitions == 0` it identifies a never-attempted word, while
/// `Incorrect` with `repetitions == 0` identifies a lapsed one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LastResult {
    #[default]
    None,
    Correct,
    Incorrect,
}

//
// ─── WORD PROGRESS ─────────────────────────────────────────────────────────────
//

/// Per-word scheduling record.
///
/// Created lazily on first access with defaults and mutated only by the
/// grading transition in [`crate::scheduler`]. Records are never deleted
/// individually; a bulk reset clears the whole store at once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordProgress {
    interval_days: u32,
    ease_factor: f64,
    repetitions: u32,
    next_review: NaiveDate,
    last_result: LastResult,
}

impl WordProgress {
    /// Default record for a word first seen on `today`:
    /// interval 1, ease 2.5, no repetitions, due immediately.
    #[must_use]
    pub fn new_on(today: NaiveDate) -> Self {
        Self {
            interval_days: 1,
            ease_factor: EASE_MAX,
            repetitions: 0,
            next_review: today,
            last_result: LastResult::None,
        }
    }

    /// Rehydrate a record from persisted storage.
    ///
    /// Out-of-range values are normalized rather than rejected: the
    /// ease factor is clamped into `[EASE_MIN, EASE_MAX]` and the
    /// interval floored at one day.
    #[must_use]
    pub fn from_persisted(
        interval_days: u32,
        ease_factor: f64,
        repetitions: u32,
        next_review: NaiveDate,
        last_result: LastResult,
    ) -> Self {
        let ease_factor = if ease_factor.is_finite() {
            ease_factor.clamp(EASE_MIN, EASE_MAX)
        } else {
            EASE_MAX
        };
        Self {
            interval_days: interval_days.max(1),
            ease_factor,
            repetitions,
            next_review,
            last_result,
        }
    }

    #[must_use]
    pub fn interval_days(&self) -> u32 {
        self.interval_days
    }

    #[must_use]
    pub fn ease_factor(&self) -> f64 {
        self.ease_factor
    }

    #[must_use]
    pub fn repetitions(&self) -> u32 {
        self.repetitions
    }

    #[must_use]
    pub fn next_review(&self) -> NaiveDate {
        self.next_review
    }

    #[must_use]
    pub fn last_result(&self) -> LastResult {
        self.last_result
    }

    /// A word never attempted at all.
    #[must_use]
    pub fn is_new(&self) -> bool {
        self.repetitions == 0 && self.last_result == LastResult::None
    }

    /// A word that was attempted but reset by a wrong answer.
    #[must_use]
    pub fn is_lapsed(&self) -> bool {
        self.repetitions == 0 && self.last_result == LastResult::Incorrect
    }

    /// Whether the word's review date has arrived.
    #[must_use]
    pub fn is_due(&self, today: NaiveDate) -> bool {
        self.next_review <= today
    }

    /// Mastered after a run of successful repetitions.
    #[must_use]
    pub fn is_mastered(&self) -> bool {
        self.repetitions >= MASTERED_REPETITIONS
    }

    pub(crate) fn set_state(
        &mut self,
        interval_days: u32,
        ease_factor: f64,
        repetitions: u32,
        next_review: NaiveDate,
        last_result: LastResult,
    ) {
        self.interval_days = interval_days;
        self.ease_factor = ease_factor;
        self.repetitions = repetitions;
        self.next_review = next_review;
        self.last_result = last_result;
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
