use std::path::{Path, PathBuf};
use thiserror::Error;

use shabda_core::model::{Deck, DeckId, WordEntry};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DeckSourceError {
    #[error("no deck file for letter {letter}")]
    NotFound { letter: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

//
// ─── CSV DECK SOURCE ───────────────────────────────────────────────────────────
//

/// Loads decks from a directory of `<letter>.csv` files.
///
/// Two header formats are supported:
/// `Word,Spelling,Meaning` and `Word,Meaning` (no spelling column).
/// Rows that fail validation are skipped, not fatal.
pub struct CsvDeckSource {
    dir: PathBuf,
}

impl CsvDeckSource {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Letters with a deck file present, sorted.
    ///
    /// # Errors
    ///
    /// Returns `DeckSourceError::Io` if the directory cannot be read.
    pub fn available_decks(&self) -> Result<Vec<DeckId>, DeckSourceError> {
        let mut letters = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("csv") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                letters.push(DeckId::new(stem));
            }
        }
        letters.sort();
        Ok(letters)
    }

    /// Load the deck for one letter.
    ///
    /// # Errors
    ///
    /// Returns `DeckSourceError::NotFound` if no file exists for the
    /// letter, or an I/O / CSV error if the file cannot be parsed.
    pub fn load_deck(&self, id: &DeckId) -> Result<Deck, DeckSourceError> {
        let path = self.dir.join(format!("{}.csv", id.as_str()));
        if !path.exists() {
            return Err(DeckSourceError::NotFound {
                letter: id.as_str().to_owned(),
            });
        }

        let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(&path)?;

        let has_spelling = reader
            .headers()?
            .iter()
            .any(|h| h.to_ascii_lowercase().contains("spelling"));

        let mut words = Vec::new();
        for record in reader.records() {
            let record = record?;
            let entry = if has_spelling && record.len() >= 3 {
                WordEntry::new(&record[0], &record[1], &record[2])
            } else if record.len() >= 2 {
                WordEntry::new(&record[0], "", &record[1])
            } else {
                continue;
            };

            match entry {
                Ok(entry) => words.push(entry),
                Err(err) => {
                    tracing::warn!(%err, letter = %id, "skipping invalid deck row");
                }
            }
        }

        tracing::debug!(letter = %id, words = words.len(), "loaded deck");
        Ok(Deck::new(id.clone(), words))
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_deck(dir: &Path, name: &str, contents: &str) {
        let mut file = std::fs::File::create(dir.join(name)).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
    }

    #[test]
    fn loads_three_column_format() {
        let tmp = tempfile::tempdir().unwrap();
        write_deck(
            tmp.path(),
            "म.csv",
            "Word,Spelling,Meaning\nमासा,masa,fish\nमका,maka,corn\n",
        );

        let source = CsvDeckSource::new(tmp.path());
        let deck = source.load_deck(&DeckId::new("म")).unwrap();
        assert_eq!(deck.len(), 2);
        assert_eq!(deck.words()[0].word(), "मासा");
        assert_eq!(deck.words()[0].spelling(), Some("masa"));
        assert_eq!(deck.words()[1].meaning(), "corn");
    }

    #[test]
    fn loads_two_column_format_without_spelling() {
        let tmp = tempfile::tempdir().unwrap();
        write_deck(tmp.path(), "क.csv", "Word,Meaning\nकमळ,lotus\n");

        let source = CsvDeckSource::new(tmp.path());
        let deck = source.load_deck(&DeckId::new("क")).unwrap();
        assert_eq!(deck.len(), 1);
        assert_eq!(deck.words()[0].spelling(), None);
        assert_eq!(deck.words()[0].meaning(), "lotus");
    }

    #[test]
    fn invalid_rows_are_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        write_deck(
            tmp.path(),
            "म.csv",
            "Word,Meaning\nमासा,fish\n   ,blank word\nमोर,peacock\n",
        );

        let source = CsvDeckSource::new(tmp.path());
        let deck = source.load_deck(&DeckId::new("म")).unwrap();
        assert_eq!(deck.len(), 2);
    }

    #[test]
    fn missing_deck_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let source = CsvDeckSource::new(tmp.path());
        let err = source.load_deck(&DeckId::new("ह")).unwrap_err();
        assert!(matches!(err, DeckSourceError::NotFound { .. }));
    }

    #[test]
    fn lists_available_letters() {
        let tmp = tempfile::tempdir().unwrap();
        write_deck(tmp.path(), "म.csv", "Word,Meaning\nमासा,fish\n");
        write_deck(tmp.path(), "क.csv", "Word,Meaning\nकमळ,lotus\n");
        write_deck(tmp.path(), "notes.txt", "ignored");

        let source = CsvDeckSource::new(tmp.path());
        let decks = source.available_decks().unwrap();
        assert_eq!(decks, vec![DeckId::new("क"), DeckId::new("म")]);
    }
}
