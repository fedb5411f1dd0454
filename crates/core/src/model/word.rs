use thiserror::Error;

use crate::model::ids::DeckId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum WordError {
    #[error("word text cannot be empty")]
    EmptyWord,

    #[error("meaning cannot be empty")]
    EmptyMeaning,
}

//
// ─── WORD ENTRY ────────────────────────────────────────────────────────────────
//

/// One vocabulary entry in a deck: the Marathi word, an optional
/// romanized spelling, and its English meaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordEntry {
    word: String,
    spelling: String,
    meaning: String,
}

impl WordEntry {
    /// Creates a validated entry. Leading/trailing whitespace is trimmed.
    ///
    /// The spelling column is optional in the source data, so an empty
    /// spelling is accepted.
    ///
    /// # Errors
    ///
    /// Returns `WordError` if the word or meaning is blank.
    pub fn new(
        word: impl Into<String>,
        spelling: impl Into<String>,
        meaning: impl Into<String>,
    ) -> Result<Self, WordError> {
        let word = word.into().trim().to_owned();
        let spelling = spelling.into().trim().to_owned();
        let meaning = meaning.into().trim().to_owned();

        if word.is_empty() {
            return Err(WordError::EmptyWord);
        }
        if meaning.is_empty() {
            return Err(WordError::EmptyMeaning);
        }

        Ok(Self {
            word,
            spelling,
            meaning,
        })
    }

    #[must_use]
    pub fn word(&self) -> &str {
        &self.word
    }

    /// Romanized spelling, or `None` when the deck has no spelling column.
    #[must_use]
    pub fn spelling(&self) -> Option<&str> {
        if self.spelling.is_empty() {
            None
        } else {
            Some(&self.spelling)
        }
    }

    #[must_use]
    pub fn meaning(&self) -> &str {
        &self.meaning
    }
}

//
// ─── DECK ──────────────────────────────────────────────────────────────────────
//

/// All words associated with one letter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    id: DeckId,
    words: Vec<WordEntry>,
}

impl Deck {
    #[must_use]
    pub fn new(id: DeckId, words: Vec<WordEntry>) -> Self {
        Self { id, words }
    }

    #[must_use]
    pub fn id(&self) -> &DeckId {
        &self.id
    }

    #[must_use]
    pub fn words(&self) -> &[WordEntry] {
        &self.words
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
