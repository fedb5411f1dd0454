#![forbid(unsafe_code)]

pub mod decks;
pub mod history;
pub mod kv;
pub mod progress;
pub mod sqlite;

pub use decks::{CsvDeckSource, DeckSourceError};
pub use history::{HistoryStore, MAX_SESSION_HISTORY, StarTotals};
pub use kv::{InMemoryKv, KvStore, StorageError, keys};
pub use progress::ProgressStore;
pub use sqlite::{SqliteInitError, SqliteKv};
