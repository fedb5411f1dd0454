use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("session size must be > 0")]
    InvalidSessionSize,

    #[error("reward interval bounds must satisfy 1 <= min <= max")]
    InvalidRewardInterval,

    #[error("stars per candy must be > 0")]
    InvalidStarsPerCandy,
}

//
// ─── GAME SETTINGS ─────────────────────────────────────────────────────────────
//

/// Tunable knobs for session building, rewards, and candy progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSettings {
    session_size: usize,
    max_new_words: usize,
    reward_interval_min: u32,
    reward_interval_max: u32,
    stars_per_candy: u32,
    repeat_queue_delay: usize,
}

impl GameSettings {
    /// Creates custom settings.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if the session size is zero, the reward
    /// interval bounds are inverted or start below one, or the candy
    /// threshold is zero.
    pub fn new(
        session_size: usize,
        max_new_words: usize,
        reward_interval_min: u32,
        reward_interval_max: u32,
        stars_per_candy: u32,
        repeat_queue_delay: usize,
    ) -> Result<Self, SettingsError> {
        if session_size == 0 {
            return Err(SettingsError::InvalidSessionSize);
        }
        if reward_interval_min == 0 || reward_interval_min > reward_interval_max {
            return Err(SettingsError::InvalidRewardInterval);
        }
        if stars_per_candy == 0 {
            return Err(SettingsError::InvalidStarsPerCandy);
        }

        Ok(Self {
            session_size,
            max_new_words,
            reward_interval_min,
            reward_interval_max,
            stars_per_candy,
            repeat_queue_delay,
        })
    }

    /// Number of words in one session.
    #[must_use]
    pub fn session_size(&self) -> usize {
        self.session_size
    }

    /// Cap on never-attempted words mixed into one session.
    #[must_use]
    pub fn max_new_words(&self) -> usize {
        self.max_new_words
    }

    /// Smallest number of correct answers between rewards.
    #[must_use]
    pub fn reward_interval_min(&self) -> u32 {
        self.reward_interval_min
    }

    /// Largest number of correct answers between rewards.
    #[must_use]
    pub fn reward_interval_max(&self) -> u32 {
        self.reward_interval_max
    }

    /// Stars needed to earn one candy.
    #[must_use]
    pub fn stars_per_candy(&self) -> u32 {
        self.stars_per_candy
    }

    /// How many other words appear before a missed word resurfaces.
    #[must_use]
    pub fn repeat_queue_delay(&self) -> usize {
        self.repeat_queue_delay
    }
}

impl Default for GameSettings {
    /// Defaults: 10 words per session, up to 3 new, a reward every
    /// 3-5 correct answers, 15 stars per candy, missed words return
    /// after 3 other words.
    fn default() -> Self {
        Self {
            session_size: 10,
            max_new_words: 3,
            reward_interval_min: 3,
            reward_interval_max: 5,
            stars_per_candy: 15,
            repeat_queue_delay: 3,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_game_tuning() {
        let s = GameSettings::default();
        assert_eq!(s.session_size(), 10);
        assert_eq!(s.max_new_words(), 3);
        assert_eq!(s.reward_interval_min(), 3);
        assert_eq!(s.reward_interval_max(), 5);
        assert_eq!(s.stars_per_candy(), 15);
        assert_eq!(s.repeat_queue_delay(), 3);
    }

    #[test]
    fn zero_session_size_is_rejected() {
        let err = GameSettings::new(0, 3, 3, 5, 15, 3).unwrap_err();
        assert_eq!(err, SettingsError::InvalidSessionSize);
    }

    #[test]
    fn inverted_reward_interval_is_rejected() {
        let err = GameSettings::new(10, 3, 5, 3, 15, 3).unwrap_err();
        assert_eq!(err, SettingsError::InvalidRewardInterval);
        let err = GameSettings::new(10, 3, 0, 3, 15, 3).unwrap_err();
        assert_eq!(err, SettingsError::InvalidRewardInterval);
    }

    #[test]
    fn zero_candy_threshold_is_rejected() {
        let err = GameSettings::new(10, 3, 3, 5, 0, 3).unwrap_err();
        assert_eq!(err, SettingsError::InvalidStarsPerCandy);
    }
}
