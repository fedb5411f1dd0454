use chrono::NaiveDate;
use rand::Rng;
use rand::seq::SliceRandom;

use shabda_core::model::{Deck, GameSettings, ProgressKey, WordEntry, WordProgress};
use storage::progress::ProgressStore;

/// Selection result for a session build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuePlan {
    pub items: Vec<WordEntry>,
    pub due_selected: usize,
    pub new_selected: usize,
}

impl QueuePlan {
    /// Total number of words in this plan.
    #[must_use]
    pub fn total(&self) -> usize {
        self.items.len()
    }

    /// Returns true when there is nothing to practice.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Builds a session queue by picking due and new words for a deck.
pub struct QueueBuilder<'a> {
    deck: &'a Deck,
    settings: &'a GameSettings,
}

impl<'a> QueueBuilder<'a> {
    #[must_use]
    pub fn new(deck: &'a Deck, settings: &'a GameSettings) -> Self {
        Self { deck, settings }
    }

    /// Build a queue plan from the deck and the current progress store.
    ///
    /// Each word lands in exactly one bucket: never-attempted words are
    /// new, previously attempted words are due iff their review date
    /// has arrived. All due words and up to `max_new_words` new words
    /// are combined, shuffled, and truncated to `session_size` -- so a
    /// due word can still be cut when the pool exceeds the cap.
    ///
    /// The store is only read. Words without a record are classified
    /// against an ephemeral default; records are created when the word
    /// is first graded, not here.
    pub fn build<R: Rng + ?Sized>(
        self,
        progress: &ProgressStore,
        today: NaiveDate,
        rng: &mut R,
    ) -> QueuePlan {
        let mut due: Vec<WordEntry> = Vec::new();
        let mut new: Vec<WordEntry> = Vec::new();

        let fresh = WordProgress::new_on(today);
        for entry in self.deck.words() {
            let key = ProgressKey::new(self.deck.id().clone(), entry.word());
            let record = progress.get(&key).unwrap_or(&fresh);
            if record.is_new() {
                new.push(entry.clone());
            } else if record.is_due(today) {
                due.push(entry.clone());
            }
        }

        due.shuffle(rng);
        new.shuffle(rng);

        let due_selected = due.len();
        let new_selected = new.len().min(self.settings.max_new_words());

        let mut items = due;
        items.extend(new.into_iter().take(new_selected));
        items.shuffle(rng);
        items.truncate(self.settings.session_size());

        QueuePlan {
            items,
            due_selected,
            new_selected,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
