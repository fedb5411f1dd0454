use chrono::{DateTime, Utc};
use rand::Rng;
use std::fmt;

use shabda_core::model::{DeckId, GameSettings, SessionStats, SessionSummary, WordEntry};

use super::progress::SessionProgress;
use super::rewards::{Reward, RewardCatalog, RewardPicker};
use crate::error::SessionError;

//
// ─── PHASES ────────────────────────────────────────────────────────────────────
//

/// Where the session state machine currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Waiting for the current word to be graded.
    AwaitingAnswer,
    /// A reward is on screen and must be acknowledged before the
    /// session moves on.
    RewardPending,
    Completed,
}

/// Result of grading one answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub correct: bool,
    /// Set when this answer crossed the reward threshold; the session
    /// stays parked until [`SessionRunner::acknowledge_reward`].
    pub reward: Option<Reward>,
    pub is_complete: bool,
}

//
// ─── SESSION RUNNER ────────────────────────────────────────────────────────────
//

/// In-memory state machine for one practice session.
///
/// Owns the queue, counters, and reward state; knows nothing about
/// persistence. Wrong answers re-insert the word a few positions later
/// so it resurfaces in the same session, never immediately.
pub struct SessionRunner {
    deck_id: DeckId,
    settings: GameSettings,
    queue: Vec<WordEntry>,
    current: usize,
    stats: SessionStats,
    correct_since_reward: u32,
    next_reward_at: u32,
    picker: RewardPicker,
    phase: SessionPhase,
}

impl SessionRunner {
    /// Start a session over a prepared queue.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if the queue has no words.
    pub fn new<R: Rng + ?Sized>(
        deck_id: DeckId,
        queue: Vec<WordEntry>,
        settings: GameSettings,
        rng: &mut R,
    ) -> Result<Self, SessionError> {
        if queue.is_empty() {
            return Err(SessionError::Empty);
        }

        let next_reward_at = draw_reward_threshold(&settings, rng);
        Ok(Self {
            deck_id,
            settings,
            queue,
            current: 0,
            stats: SessionStats::new(),
            correct_since_reward: 0,
            next_reward_at,
            picker: RewardPicker::new(),
            phase: SessionPhase::AwaitingAnswer,
        })
    }

    #[must_use]
    pub fn deck_id(&self) -> &DeckId {
        &self.deck_id
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phase == SessionPhase::Completed
    }

    #[must_use]
    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Current queue length, including any re-inserted words.
    #[must_use]
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn queue(&self) -> &[WordEntry] {
        &self.queue
    }

    #[must_use]
    pub fn current_word(&self) -> Option<&WordEntry> {
        if self.phase == SessionPhase::Completed {
            None
        } else {
            self.queue.get(self.current)
        }
    }

    /// Returns a summary of the current session progress.
    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            position: (self.current + 1).min(self.queue.len()),
            total: self.queue.len(),
            answered: self.stats.total() as usize,
            is_complete: self.is_complete(),
        }
    }

    /// Grade the current word.
    ///
    /// On a wrong answer the word is re-inserted at
    /// `min(current + repeat_delay + 1, queue_len)`. On a correct
    /// answer that crosses the reward threshold the session parks in
    /// `RewardPending` and the drawn reward is returned; the index
    /// advances only once the reward is acknowledged.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` after the session has ended
    /// and `SessionError::RewardPending` while a reward is unclaimed.
    pub fn record_answer<R: Rng + ?Sized>(
        &mut self,
        correct: bool,
        catalog: &RewardCatalog,
        rng: &mut R,
    ) -> Result<AnswerOutcome, SessionError> {
        match self.phase {
            SessionPhase::Completed => return Err(SessionError::Completed),
            SessionPhase::RewardPending => return Err(SessionError::RewardPending),
            SessionPhase::AwaitingAnswer => {}
        }

        self.stats.record(correct);

        if correct {
            self.correct_since_reward += 1;
            if self.correct_since_reward >= self.next_reward_at {
                let reward = self.picker.pick(catalog, rng);
                self.correct_since_reward = 0;
                self.next_reward_at = draw_reward_threshold(&self.settings, rng);
                self.phase = SessionPhase::RewardPending;
                return Ok(AnswerOutcome {
                    correct,
                    reward: Some(reward),
                    is_complete: false,
                });
            }
        } else if let Some(item) = self.queue.get(self.current).cloned() {
            let insert_at = (self.current + self.settings.repeat_queue_delay() + 1)
                .min(self.queue.len());
            self.queue.insert(insert_at, item);
        }

        self.advance();
        Ok(AnswerOutcome {
            correct,
            reward: None,
            is_complete: self.is_complete(),
        })
    }

    /// Dismiss a pending reward and move to the next word.
    ///
    /// Returns whether the session completed.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoRewardPending` outside `RewardPending`
    /// and `SessionError::Completed` after the session has ended.
    pub fn acknowledge_reward(&mut self) -> Result<bool, SessionError> {
        match self.phase {
            SessionPhase::Completed => Err(SessionError::Completed),
            SessionPhase::AwaitingAnswer => Err(SessionError::NoRewardPending),
            SessionPhase::RewardPending => {
                self.phase = SessionPhase::AwaitingAnswer;
                self.advance();
                Ok(self.is_complete())
            }
        }
    }

    pub(crate) fn build_summary(&self, completed_at: DateTime<Utc>) -> SessionSummary {
        SessionSummary::from_stats(self.deck_id.clone(), &self.stats, completed_at)
    }

    fn advance(&mut self) {
        self.current += 1;
        if self.current >= self.queue.len() {
            self.phase = SessionPhase::Completed;
        }
    }
}

impl fmt::Debug for SessionRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionRunner")
            .field("deck_id", &self.deck_id)
            .field("queue_len", &self.queue.len())
            .field("current", &self.current)
            .field("phase", &self.phase)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

fn draw_reward_threshold<R: Rng + ?Sized>(settings: &GameSettings, rng: &mut R) -> u32 {
    rng.random_range(settings.reward_interval_min()..=settings.reward_interval_max())
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn entry(word: &str) -> WordEntry {
        WordEntry::new(word, "", format!("meaning of {word}")).unwrap()
    }

    fn queue(words: &[&str]) -> Vec<WordEntry> {
        words.iter().map(|w| entry(w)).collect()
    }

    /// Reward threshold out of reach so tests can ignore rewards.
    fn quiet_settings() -> GameSettings {
        GameSettings::new(10, 3, 100, 100, 15, 3).unwrap()
    }

    /// Reward after every correct answer.
    fn eager_settings() -> GameSettings {
        GameSettings::new(10, 3, 1, 1, 15, 3).unwrap()
    }

    fn runner(words: &[&str], settings: GameSettings, rng: &mut StdRng) -> SessionRunner {
        SessionRunner::new(DeckId::new("म"), queue(words), settings, rng).unwrap()
    }

    #[test]
    fn empty_queue_is_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = SessionRunner::new(
            DeckId::new("म"),
            Vec::new(),
            GameSettings::default(),
            &mut rng,
        )
        .unwrap_err();
        assert!(matches!(err, SessionError::Empty));
    }

    #[test]
    fn wrong_answer_reinserts_after_delay() {
        let catalog = RewardCatalog::builtin();
        let mut rng = StdRng::seed_from_u64(1);
        let mut session = runner(
            &["एक", "दोन", "तीन", "चार", "पाच", "सहा"],
            quiet_settings(),
            &mut rng,
        );

        let missed = session.current_word().unwrap().clone();
        session.record_answer(false, &catalog, &mut rng).unwrap();

        // Missed at index 0, delay 3: next occurrence at index 4.
        assert_eq!(session.queue_len(), 7);
        assert_eq!(session.queue()[4], missed);
    }

    #[test]
    fn reinsertion_clamps_to_queue_end() {
        let catalog = RewardCatalog::builtin();
        let mut rng = StdRng::seed_from_u64(1);
        let mut session = runner(&["एक", "दोन"], quiet_settings(), &mut rng);

        session.record_answer(true, &catalog, &mut rng).unwrap();
        let missed = session.current_word().unwrap().clone();
        session.record_answer(false, &catalog, &mut rng).unwrap();

        // Missed at index 1 in a queue of 2: lands at the end, index 2.
        assert_eq!(session.queue_len(), 3);
        assert_eq!(session.queue()[2], missed);
        assert!(!session.is_complete());
    }

    #[test]
    fn three_word_session_with_one_miss() {
        let catalog = RewardCatalog::builtin();
        let mut rng = StdRng::seed_from_u64(1);
        let mut session = runner(&["एक", "दोन", "तीन"], quiet_settings(), &mut rng);

        session.record_answer(true, &catalog, &mut rng).unwrap();
        session.record_answer(false, &catalog, &mut rng).unwrap();
        let outcome = session.record_answer(true, &catalog, &mut rng).unwrap();

        // The miss grew the queue by one, so the session is not done.
        assert!(!outcome.is_complete);
        assert_eq!(session.queue_len(), 4);
        assert_eq!(session.stats().correct(), 2);
        assert_eq!(session.stats().incorrect(), 1);
        assert_eq!(session.stats().streak(), 1);
        assert!(session.stats().best_streak() >= 1);

        // The re-inserted word finishes the session.
        let outcome = session.record_answer(true, &catalog, &mut rng).unwrap();
        assert!(outcome.is_complete);
        assert!(session.is_complete());
        assert_eq!(session.current_word(), None);
    }

    #[test]
    fn reward_parks_the_session_until_acknowledged() {
        let catalog = RewardCatalog::builtin();
        let mut rng = StdRng::seed_from_u64(1);
        let mut session = runner(&["एक", "दोन"], eager_settings(), &mut rng);

        let outcome = session.record_answer(true, &catalog, &mut rng).unwrap();
        assert!(outcome.reward.is_some());
        assert_eq!(session.phase(), SessionPhase::RewardPending);

        // Grading while parked is a precondition violation.
        let err = session.record_answer(true, &catalog, &mut rng).unwrap_err();
        assert!(matches!(err, SessionError::RewardPending));

        let complete = session.acknowledge_reward().unwrap();
        assert!(!complete);
        assert_eq!(session.phase(), SessionPhase::AwaitingAnswer);
    }

    #[test]
    fn reward_on_last_word_still_completes() {
        let catalog = RewardCatalog::builtin();
        let mut rng = StdRng::seed_from_u64(1);
        let mut session = runner(&["एक"], eager_settings(), &mut rng);

        let outcome = session.record_answer(true, &catalog, &mut rng).unwrap();
        assert!(outcome.reward.is_some());
        assert!(!outcome.is_complete);

        let complete = session.acknowledge_reward().unwrap();
        assert!(complete);
        assert!(session.is_complete());
    }

    #[test]
    fn wrong_answer_never_triggers_a_reward() {
        let catalog = RewardCatalog::builtin();
        let mut rng = StdRng::seed_from_u64(1);
        let mut session = runner(&["एक", "दोन", "तीन"], eager_settings(), &mut rng);

        let outcome = session.record_answer(false, &catalog, &mut rng).unwrap();
        assert!(outcome.reward.is_none());
        assert_eq!(session.phase(), SessionPhase::AwaitingAnswer);
    }

    #[test]
    fn acknowledge_without_pending_reward_is_an_error() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut session = runner(&["एक"], quiet_settings(), &mut rng);
        let err = session.acknowledge_reward().unwrap_err();
        assert!(matches!(err, SessionError::NoRewardPending));
    }

    #[test]
    fn grading_after_completion_is_an_error() {
        let catalog = RewardCatalog::builtin();
        let mut rng = StdRng::seed_from_u64(1);
        let mut session = runner(&["एक"], quiet_settings(), &mut rng);

        session.record_answer(true, &catalog, &mut rng).unwrap();
        assert!(session.is_complete());

        let err = session.record_answer(true, &catalog, &mut rng).unwrap_err();
        assert!(matches!(err, SessionError::Completed));
        let err = session.acknowledge_reward().unwrap_err();
        assert!(matches!(err, SessionError::Completed));
    }

    #[test]
    fn summary_reflects_final_stats() {
        let catalog = RewardCatalog::builtin();
        let mut rng = StdRng::seed_from_u64(1);
        let mut session = runner(&["एक", "दोन"], quiet_settings(), &mut rng);

        session.record_answer(true, &catalog, &mut rng).unwrap();
        session.record_answer(true, &catalog, &mut rng).unwrap();
        assert!(session.is_complete());

        let summary = session.build_summary(shabda_core::time::fixed_now());
        assert_eq!(summary.correct(), 2);
        assert_eq!(summary.incorrect(), 0);
        assert_eq!(summary.accuracy(), 100);
        assert_eq!(summary.stars(), 5);
        assert_eq!(summary.best_streak(), 2);
    }
}
