use chrono::{Days, NaiveDate};

use crate::model::{EASE_MAX, EASE_MIN, LastResult, WordProgress};

//
// ─── TRANSITION CONSTANTS ──────────────────────────────────────────────────────
//

/// Interval after the first correct answer, in days.
pub const FIRST_INTERVAL_DAYS: u32 = 1;

/// Interval after the second consecutive correct answer, in days.
pub const SECOND_INTERVAL_DAYS: u32 = 3;

/// Ease gained per correct answer.
pub const EASE_GAIN: f64 = 0.1;

/// Ease lost per wrong answer.
pub const EASE_PENALTY: f64 = 0.2;

//
// ─── GRADING TRANSITION ────────────────────────────────────────────────────────
//

/// Applies one graded answer to a word's scheduling record.
///
/// SM-2-like policy: the first two correct answers fix the interval at
/// 1 and 3 days, after which it grows multiplicatively by the ease
/// factor. A wrong answer resets the repetition streak and interval and
/// lowers the ease. Ease stays clamped to `[1.3, 2.5]` so intervals can
/// neither run away nor collapse toward zero.
///
/// The returned record carries `next_review = today + interval`. The
/// input is not modified.
#[must_use]
pub fn apply_answer(progress: &WordProgress, correct: bool, today: NaiveDate) -> WordProgress {
    let mut next = progress.clone();

    let (interval_days, ease_factor, repetitions, last_result) = if correct {
        let interval_days = match progress.repetitions() {
            0 => FIRST_INTERVAL_DAYS,
            1 => SECOND_INTERVAL_DAYS,
            _ => round_interval(f64::from(progress.interval_days()) * progress.ease_factor()),
        };
        (
            interval_days,
            (progress.ease_factor() + EASE_GAIN).min(EASE_MAX),
            progress.repetitions() + 1,
            LastResult::Correct,
        )
    } else {
        (
            FIRST_INTERVAL_DAYS,
            (progress.ease_factor() - EASE_PENALTY).max(EASE_MIN),
            0,
            LastResult::Incorrect,
        )
    };

    let next_review = today
        .checked_add_days(Days::new(u64::from(interval_days)))
        .unwrap_or(NaiveDate::MAX);

    next.set_state(
        interval_days,
        ease_factor,
        repetitions,
        next_review,
        last_result,
    );
    next
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn round_interval(days: f64) -> u32 {
    // Ease is clamped well below anything that could overflow u32 from
    // realistic intervals, but saturate anyway.
    let rounded = days.round();
    if rounded >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        (rounded as u32).max(1)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
