use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for a deck: the Marathi letter (or letter + matra
/// grapheme) the deck's words start with.
///
/// Deck identifiers may contain combining characters, so they are kept
/// as opaque strings and never spliced into composite key strings.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DeckId(String);

impl DeckId {
    /// Creates a new `DeckId`
    #[must_use]
    pub fn new(letter: impl Into<String>) -> Self {
        Self(letter.into())
    }

    /// Returns the underlying letter
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for DeckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeckId({})", self.0)
    }
}

impl fmt::Display for DeckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DeckId {
    fn from(letter: &str) -> Self {
        Self::new(letter)
    }
}

/// Composite key identifying one word's scheduling record.
///
/// Both parts can contain arbitrary Devanagari, so the pair stays
/// structured all the way down to serialization instead of being
/// spliced into a single delimited string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProgressKey {
    pub deck: DeckId,
    pub word: String,
}

impl ProgressKey {
    #[must_use]
    pub fn new(deck: DeckId, word: impl Into<String>) -> Self {
        Self {
            deck,
            word: word.into(),
        }
    }
}

impl fmt::Display for ProgressKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.deck, self.word)
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────
