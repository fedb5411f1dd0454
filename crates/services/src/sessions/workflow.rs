use rand::Rng;
use tracing::{debug, info};

use shabda_core::Clock;
use shabda_core::model::{Deck, GameSettings, ProgressKey, SessionSummary};
use storage::history::{HistoryStore, StarTotals};
use storage::progress::ProgressStore;

use super::plan::QueueBuilder;
use super::rewards::{Reward, RewardCatalog};
use super::runner::{SessionPhase, SessionRunner};
use crate::error::SessionError;

//
// ─── OUTCOME TYPES ─────────────────────────────────────────────────────────────
//

/// Result of asking for a new session.
#[derive(Debug)]
pub enum SessionStart {
    Ready(SessionRunner),
    /// Nothing is due and no new words remain.
    NothingToPractice,
}

/// Summary and credited stars for a finished session.
#[derive(Debug, Clone)]
pub struct SessionCompletion {
    pub summary: SessionSummary,
    pub totals: StarTotals,
}

/// Result of grading one answer through the service.
#[derive(Debug)]
pub struct AnswerReport {
    pub correct: bool,
    pub reward: Option<Reward>,
    /// Present once the session has ended and its summary was recorded.
    pub completion: Option<SessionCompletion>,
}

//
// ─── PRACTICE SERVICE ──────────────────────────────────────────────────────────
//

/// Orchestrates a practice session end to end.
///
/// Builds the queue, grades answers against the scheduler, and records
/// the summary plus star credit when the session ends. The runner holds
/// the in-session state; this service owns everything that touches
/// storage.
pub struct PracticeService {
    clock: Clock,
    settings: GameSettings,
    catalog: RewardCatalog,
}

impl PracticeService {
    #[must_use]
    pub fn new(clock: Clock, settings: GameSettings, catalog: RewardCatalog) -> Self {
        Self {
            clock,
            settings,
            catalog,
        }
    }

    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(
            Clock::default_clock(),
            GameSettings::default(),
            RewardCatalog::builtin(),
        )
    }

    #[must_use]
    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    /// Build today's queue for a deck and start a session over it.
    ///
    /// Returns `SessionStart::NothingToPractice` when no word is due
    /// and no new word is left; an empty deck is not an error.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` on storage failures.
    pub fn start_session<R: Rng + ?Sized>(
        &self,
        deck: &Deck,
        progress: &ProgressStore,
        rng: &mut R,
    ) -> Result<SessionStart, SessionError> {
        let today = self.clock.today();
        let plan = QueueBuilder::new(deck, &self.settings).build(progress, today, rng);
        if plan.is_empty() {
            info!(deck = %deck.id(), "nothing to practice today");
            return Ok(SessionStart::NothingToPractice);
        }

        debug!(
            deck = %deck.id(),
            due = plan.due_selected,
            new = plan.new_selected,
            total = plan.total(),
            "session queue built"
        );
        let runner = SessionRunner::new(deck.id().clone(), plan.items, self.settings.clone(), rng)?;
        Ok(SessionStart::Ready(runner))
    }

    /// Grade the current word: update its scheduling record, advance
    /// the session, and finalize it if this was the last word.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` on precondition violations (see
    /// [`SessionRunner::record_answer`]) or storage failures.
    pub async fn answer_current<R: Rng + ?Sized>(
        &self,
        runner: &mut SessionRunner,
        progress: &mut ProgressStore,
        history: &HistoryStore,
        correct: bool,
        rng: &mut R,
    ) -> Result<AnswerReport, SessionError> {
        // Reject invalid transitions before touching storage, so a
        // rejected call never leaves a persisted side effect.
        match runner.phase() {
            SessionPhase::Completed => return Err(SessionError::Completed),
            SessionPhase::RewardPending => return Err(SessionError::RewardPending),
            SessionPhase::AwaitingAnswer => {}
        }
        let word = runner
            .current_word()
            .ok_or(SessionError::Completed)?
            .word()
            .to_owned();
        let key = ProgressKey::new(runner.deck_id().clone(), word);
        progress.grade(key, correct, self.clock.today()).await?;

        let outcome = runner.record_answer(correct, &self.catalog, rng)?;
        let completion = if outcome.is_complete {
            Some(self.finalize(runner, history).await?)
        } else {
            None
        };

        Ok(AnswerReport {
            correct: outcome.correct,
            reward: outcome.reward,
            completion,
        })
    }

    /// Dismiss a pending reward; finalizes the session if the reward
    /// landed on the last word.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` on precondition violations or storage
    /// failures.
    pub async fn acknowledge_reward(
        &self,
        runner: &mut SessionRunner,
        history: &HistoryStore,
    ) -> Result<Option<SessionCompletion>, SessionError> {
        if runner.acknowledge_reward()? {
            Ok(Some(self.finalize(runner, history).await?))
        } else {
            Ok(None)
        }
    }

    async fn finalize(
        &self,
        runner: &SessionRunner,
        history: &HistoryStore,
    ) -> Result<SessionCompletion, SessionError> {
        let summary = runner.build_summary(self.clock.now());
        let totals = history.append(&summary).await?;
        info!(
            deck = %summary.deck_id(),
            stars = summary.stars(),
            accuracy = summary.accuracy(),
            total_stars = totals.total,
            "session completed"
        );
        Ok(SessionCompletion { summary, totals })
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
