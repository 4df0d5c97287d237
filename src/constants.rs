//! Configuration constants for the imposter game engine
//!
//! This module contains the limits and fixed values used throughout
//! the engine: player-count bounds, countdown timing, the recency
//! window of the word picker, and the preference storage keys.

/// Round configuration constants
pub mod game {
    /// Minimum number of players required to start a round
    pub const MIN_PLAYER_COUNT: usize = 3;
    /// Maximum number of players allowed in a round
    pub const MAX_PLAYER_COUNT: usize = 24;
    /// Starting value of the pre-reveal countdown
    pub const COUNTDOWN_START: u8 = 3;
    /// Seconds between countdown ticks
    pub const COUNTDOWN_TICK_SECONDS: u64 = 1;
}

/// Word picker constants
pub mod picker {
    /// Number of recently used main words excluded from selection
    pub const RECENT_WINDOW: usize = 20;
}

/// Preference storage keys
pub mod storage {
    /// Key under which the last successfully started player count is stored
    pub const LAST_COUNT_KEY: &str = "imposter_last_count";
    /// Key under which the recent-word history is stored
    pub const RECENT_WORDS_KEY: &str = "imposter_recent_words";
}
