mod config;
mod ids;
mod progress;
mod session;
mod word;

pub use config::{GameSettings, SettingsError};
pub use ids::{DeckId, ProgressKey};
pub use progress::{
    EASE_MAX, EASE_MIN, LastResult, MASTERED_REPETITIONS, WordProgress,
};
pub use session::{
    SessionStats, SessionSummary, SessionSummaryError, stars_for_accuracy,
};
pub use word::{Deck, WordEntry, WordError};
