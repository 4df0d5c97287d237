//! Round engine and screen state machine
//!
//! This module owns the whole lifecycle of a round: the setup inputs
//! (player count and mode), the word and imposter selection at round
//! start, the pre-reveal countdown, and the linear handoff/reveal flow
//! until every player has seen their word. The presentation layer drives
//! it by forwarding [`IncomingMessage`] actions and scheduled
//! [`AlarmMessage`] ticks, and renders whatever [`Game::state_message`]
//! returns for the current screen.

use garde::Validate;
use serde::{Deserialize, Serialize};

use crate::{
    constants,
    picker::{self, RecentHistory},
    storage::{self, KeyValueStore},
    words::WordSource,
};

/// How the imposter experiences the reveal
///
/// The display labels are the ones offered in the setup screen's mode
/// selector.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, derive_more::Display,
)]
pub enum Mode {
    /// The imposter sees a reveal prompt instead of any word
    #[default]
    #[display("Select Imposter")]
    SelectImposter,
    /// The imposter sees a related-but-different word
    #[display("Different word to imposter")]
    DifferentWord,
}

/// Validated configuration a round is started with
///
/// Created from the setup inputs once they pass validation; the player
/// count must lie within the configured bounds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate)]
pub struct GameConfig {
    /// Number of players passing the device around
    #[garde(range(
        min = crate::constants::game::MIN_PLAYER_COUNT,
        max = crate::constants::game::MAX_PLAYER_COUNT
    ))]
    player_count: usize,
    /// How the imposter experiences the reveal
    #[garde(skip)]
    mode: Mode,
}

impl GameConfig {
    /// Creates a configuration from the setup inputs
    pub fn new(player_count: usize, mode: Mode) -> Self {
        Self { player_count, mode }
    }

    /// Returns the player count
    pub fn player_count(&self) -> usize {
        self.player_count
    }

    /// Returns the mode
    pub fn mode(&self) -> Mode {
        self.mode
    }
}

/// Per-round secret state, fixed at round start
///
/// The imposter index is drawn uniformly exactly once per round and the
/// words never change until the round is discarded. Only
/// `current_player` moves, monotonically from 0 to `player_count - 1`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Round {
    /// Number of players in this round
    player_count: usize,
    /// Mode the round was started with
    mode: Mode,
    /// Index of the player currently holding the device
    current_player: usize,
    /// Index of the player who is the imposter
    imposter_index: usize,
    /// The shared secret word
    main_word: String,
    /// The imposter's word in [`Mode::DifferentWord`], unused otherwise
    imposter_word: Option<String>,
}

impl Round {
    /// Returns the number of players in this round
    pub fn player_count(&self) -> usize {
        self.player_count
    }

    /// Returns the mode the round was started with
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns the index of the player currently holding the device
    pub fn current_player(&self) -> usize {
        self.current_player
    }

    /// Returns the index of the imposter
    pub fn imposter_index(&self) -> usize {
        self.imposter_index
    }

    /// Returns the shared secret word
    pub fn main_word(&self) -> &str {
        &self.main_word
    }

    /// Returns the imposter's word, if the mode uses one
    pub fn imposter_word(&self) -> Option<&str> {
        self.imposter_word.as_deref()
    }

    /// Computes the reveal payload for an arbitrary player index
    ///
    /// Pure function of the round's fixed state; showing it to the wrong
    /// player has no side effect on the round.
    pub fn reveal_for(&self, player: usize) -> RevealPayload {
        let is_imposter = player == self.imposter_index;
        match (self.mode, is_imposter) {
            (Mode::SelectImposter, true) => RevealPayload {
                title: "YOU ARE THE IMPOSTER".to_owned(),
                detail: "Blend in. Say a hint word without giving yourself away.".to_owned(),
            },
            (Mode::SelectImposter, false) => RevealPayload {
                title: format!("Secret word: {}", self.main_word),
                detail: "Everyone else has the same word.".to_owned(),
            },
            (Mode::DifferentWord, true) => RevealPayload {
                title: format!(
                    "Secret word: {}",
                    self.imposter_word.as_deref().unwrap_or(&self.main_word)
                ),
                detail: "One player has a related word.".to_owned(),
            },
            (Mode::DifferentWord, false) => RevealPayload {
                title: format!("Secret word: {}", self.main_word),
                detail: "One player has a related word.".to_owned(),
            },
        }
    }

    /// Computes the reveal payload for the player currently holding the device
    pub fn reveal_payload(&self) -> RevealPayload {
        self.reveal_for(self.current_player)
    }
}

/// What the current player is shown on the reveal screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevealPayload {
    /// Headline: the secret word or the imposter prompt
    pub title: String,
    /// Supporting line under the headline
    pub detail: String,
}

/// Represents the current screen of the game
///
/// The flow is strictly linear: Setup → Countdown → (Handoff → Reveal)
/// per player → Done, with an explicit reset as the only way back. The
/// round data lives inside the variants, so every screen after setup
/// structurally has its words and imposter fixed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub enum State {
    /// Editable configuration; no round exists yet
    #[default]
    Setup,
    /// Time-driven countdown before the first handoff
    Countdown {
        /// The freshly started round
        round: Round,
        /// Remaining countdown value, shown to the players
        value: u8,
    },
    /// Asking for the device to be passed to the current player
    Handoff {
        /// The round in progress
        round: Round,
    },
    /// Showing the current player their word (or imposter prompt)
    Reveal {
        /// The round in progress
        round: Round,
    },
    /// Every player has seen their word; terminal until a new game
    Done,
}

/// Actions forwarded from the presentation layer
///
/// Actions that do not apply to the current screen are ignored, so a
/// stray tap on a stale button can never corrupt the state machine.
#[derive(Debug, Clone, Deserialize)]
pub enum IncomingMessage {
    /// Raw contents of the player-count field (may be empty or junk)
    SetPlayerCount(String),
    /// Mode selector changed
    SetMode(Mode),
    /// Start button pressed on the setup screen
    Start,
    /// "I'm ready" pressed on the handoff screen
    Ready,
    /// "Confirmed" pressed on the reveal screen
    Confirm,
    /// Reset button pressed during a round
    Reset,
    /// "New game" pressed on the done screen
    NewGame,
}

/// Scheduled messages for timed transitions
///
/// Ticks carry the round sequence number they were scheduled under;
/// ticks from an abandoned round are dropped on arrival, which makes
/// countdown cancellation race-free without a cancellable timer handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlarmMessage {
    /// One-second countdown tick
    CountdownTick {
        /// Sequence number of the round the tick belongs to
        round_seq: u64,
    },
}

/// Per-screen view for the presentation layer
#[derive(Debug, Clone, Serialize)]
pub enum SyncMessage {
    /// Setup screen
    Setup {
        /// Remembered default player count, shown as the field placeholder
        remembered_count: Option<usize>,
        /// Currently selected mode
        mode: Mode,
        /// Whether the word list finished loading with at least one entry;
        /// while false the start affordance should show a loading label
        words_ready: bool,
        /// Whether the start action is currently allowed
        can_start: bool,
    },
    /// Countdown screen
    Countdown {
        /// Remaining countdown value
        value: u8,
    },
    /// Handoff screen
    Handoff {
        /// One-based number of the player to hand the device to
        player: usize,
        /// Total number of players
        of: usize,
    },
    /// Reveal screen
    Reveal {
        /// One-based number of the player looking at the screen
        player: usize,
        /// Total number of players
        of: usize,
        /// What to show them
        payload: RevealPayload,
    },
    /// Terminal screen after the last reveal
    Done,
}

impl SyncMessage {
    /// Converts the view to a JSON string for the presentation layer
    ///
    /// # Panics
    ///
    /// This method panics if serialization fails, which should never happen
    /// with the default JSON serializer for well-formed data.
    pub fn to_message(&self) -> String {
        serde_json::to_string(self).expect("default serializer cannot fail")
    }
}

/// The round engine
///
/// Owns the setup inputs, the word source, the recent-word history, the
/// random generator, and the current screen. All transitions go through
/// [`Game::receive_message`] and [`Game::receive_alarm`]; there is no
/// other way to mutate a round.
#[derive(Debug)]
pub struct Game<K: KeyValueStore> {
    /// Preference store for the two persisted values
    store: K,
    /// The word list and its load state
    words: WordSource,
    /// Recently used main words, excluded from selection
    recent: RecentHistory,
    /// Injected random generator, seedable for deterministic tests
    rng: fastrand::Rng,
    /// Raw contents of the player-count field; empty means "use default"
    player_input: String,
    /// Last successfully started player count, if any
    remembered_count: Option<usize>,
    /// Currently selected mode, retained across rounds
    mode: Mode,
    /// Current screen and round data
    state: State,
    /// Bumped on every round start and reset to invalidate stale ticks
    round_seq: u64,
}

impl<K: KeyValueStore> Game<K> {
    /// Creates an engine reading its remembered preferences from `store`
    ///
    /// The word source starts unloaded; feed it the fetch outcome through
    /// [`Game::resolve_words`].
    pub fn new(store: K) -> Self {
        Self::with_rng(store, fastrand::Rng::new())
    }

    /// Creates an engine with an explicit random generator
    ///
    /// Seeding the generator makes word and imposter selection
    /// deterministic, which the tests rely on.
    pub fn with_rng(store: K, rng: fastrand::Rng) -> Self {
        let remembered_count = storage::load_last_count(&store);
        let recent = storage::load_recent_words(&store);
        Self {
            store,
            words: WordSource::new(),
            recent,
            rng,
            player_input: String::new(),
            remembered_count,
            mode: Mode::default(),
            state: State::Setup,
            round_seq: 0,
        }
    }

    /// Applies the outcome of the one-shot word list fetch
    ///
    /// See [`WordSource::resolve`] for the degradation rules.
    pub fn resolve_words(&mut self, payload: Option<&str>) {
        self.words.resolve(payload);
    }

    /// Returns the current screen and round data
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Returns the currently selected mode
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns the remembered default player count, if any
    pub fn remembered_count(&self) -> Option<usize> {
        self.remembered_count
    }

    /// Returns the recent-word history
    pub fn recent_words(&self) -> &RecentHistory {
        &self.recent
    }

    /// Consumes the engine and returns the preference store
    pub fn into_store(self) -> K {
        self.store
    }

    /// Returns whether the word list is loaded and non-empty
    pub fn words_available(&self) -> bool {
        self.words.is_ready() && !self.words.entries().is_empty()
    }

    /// Player count a start would use right now
    ///
    /// A non-empty field must parse on its own; the remembered default
    /// only applies when the field is empty. Returns `None` when neither
    /// yields a number.
    fn effective_count(&self) -> Option<usize> {
        if self.player_input.is_empty() {
            self.remembered_count
        } else {
            self.player_input.trim().parse().ok()
        }
    }

    /// Returns whether the start action is currently allowed
    ///
    /// Requires a loaded non-empty word list and an effective player
    /// count within bounds. Anything else keeps the start affordance
    /// disabled without surfacing an error.
    pub fn can_start(&self) -> bool {
        let Some(player_count) = self.effective_count() else {
            return false;
        };
        self.words_available() && GameConfig::new(player_count, self.mode).validate().is_ok()
    }

    /// Handles an action forwarded from the presentation layer
    ///
    /// Routes the action against the current screen; out-of-place
    /// actions are ignored. `schedule_alarm` is called with any tick
    /// that must be delivered back through [`Game::receive_alarm`] after
    /// the given delay.
    pub fn receive_message<S: FnMut(AlarmMessage, web_time::Duration)>(
        &mut self,
        message: IncomingMessage,
        mut schedule_alarm: S,
    ) {
        match message {
            IncomingMessage::SetPlayerCount(input) => {
                if matches!(self.state, State::Setup) {
                    self.player_input = input;
                }
            }
            IncomingMessage::SetMode(mode) => {
                if matches!(self.state, State::Setup) {
                    self.mode = mode;
                }
            }
            IncomingMessage::Start => {
                if matches!(self.state, State::Setup) {
                    self.start(&mut schedule_alarm);
                }
            }
            IncomingMessage::Ready => {
                self.state = match std::mem::take(&mut self.state) {
                    State::Handoff { round } => State::Reveal { round },
                    other => other,
                };
            }
            IncomingMessage::Confirm => {
                self.state = match std::mem::take(&mut self.state) {
                    State::Reveal { mut round } => {
                        if round.current_player + 1 < round.player_count {
                            round.current_player += 1;
                            State::Handoff { round }
                        } else {
                            State::Done
                        }
                    }
                    other => other,
                };
            }
            IncomingMessage::Reset => {
                if matches!(
                    self.state,
                    State::Countdown { .. } | State::Handoff { .. } | State::Reveal { .. }
                ) {
                    self.reset();
                }
            }
            IncomingMessage::NewGame => {
                if matches!(self.state, State::Done) {
                    self.state = State::Setup;
                }
            }
        }
    }

    /// Handles a scheduled countdown tick
    ///
    /// A tick only applies while the countdown screen that scheduled it
    /// is still current; anything else (a reset, a newer round) makes it
    /// a no-op.
    pub fn receive_alarm<S: FnMut(AlarmMessage, web_time::Duration)>(
        &mut self,
        message: AlarmMessage,
        mut schedule_alarm: S,
    ) {
        match message {
            AlarmMessage::CountdownTick { round_seq } => {
                if round_seq != self.round_seq {
                    return;
                }
                self.state = match std::mem::take(&mut self.state) {
                    State::Countdown { round, value } => {
                        let value = value.saturating_sub(1);
                        if value == 0 {
                            State::Handoff { round }
                        } else {
                            schedule_alarm(
                                AlarmMessage::CountdownTick { round_seq },
                                countdown_tick(),
                            );
                            State::Countdown { round, value }
                        }
                    }
                    other => other,
                };
            }
        }
    }

    /// Returns the view to render for the current screen
    pub fn state_message(&self) -> SyncMessage {
        match &self.state {
            State::Setup => SyncMessage::Setup {
                remembered_count: self.remembered_count,
                mode: self.mode,
                words_ready: self.words_available(),
                can_start: self.can_start(),
            },
            State::Countdown { value, .. } => SyncMessage::Countdown { value: *value },
            State::Handoff { round } => SyncMessage::Handoff {
                player: round.current_player + 1,
                of: round.player_count,
            },
            State::Reveal { round } => SyncMessage::Reveal {
                player: round.current_player + 1,
                of: round.player_count,
                payload: round.reveal_payload(),
            },
            State::Done => SyncMessage::Done,
        }
    }

    /// Starts a round from the setup screen
    ///
    /// Validation gates the transition: nothing is persisted or mutated
    /// until the configuration is valid and a word has been picked. The
    /// typed count becomes the new remembered default only when the
    /// field is non-empty this session.
    fn start<S: FnMut(AlarmMessage, web_time::Duration)>(&mut self, schedule_alarm: &mut S) {
        if !self.words_available() {
            return;
        }
        let Some(player_count) = self.effective_count() else {
            return;
        };
        if GameConfig::new(player_count, self.mode).validate().is_err() {
            return;
        }
        let Some(entry) = picker::pick(self.words.entries(), &self.recent, &mut self.rng) else {
            return;
        };
        let main_word = entry.main().to_owned();
        let related = entry.related().map(str::to_owned);

        if !self.player_input.is_empty() {
            self.remembered_count = Some(player_count);
            storage::save_last_count(&mut self.store, player_count);
        }
        self.recent.push(&main_word);
        storage::save_recent_words(&mut self.store, &self.recent);

        let imposter_index = self.rng.usize(..player_count);
        let imposter_word = match self.mode {
            Mode::SelectImposter => None,
            // entries without a related word fall back to the main word
            Mode::DifferentWord => Some(related.unwrap_or_else(|| main_word.clone())),
        };

        tracing::debug!(player_count, imposter_index, "starting round");

        self.round_seq += 1;
        self.state = State::Countdown {
            round: Round {
                player_count,
                mode: self.mode,
                current_player: 0,
                imposter_index,
                main_word,
                imposter_word,
            },
            value: constants::game::COUNTDOWN_START,
        };
        // keep the field empty for the next round
        self.player_input.clear();
        schedule_alarm(
            AlarmMessage::CountdownTick {
                round_seq: self.round_seq,
            },
            countdown_tick(),
        );
    }

    /// Abandons the round in progress and returns to setup
    ///
    /// Bumping the sequence number turns any tick still in flight into
    /// a no-op.
    fn reset(&mut self) {
        tracing::debug!("round abandoned, returning to setup");
        self.round_seq += 1;
        self.state = State::Setup;
    }
}

/// Delay between countdown ticks
fn countdown_tick() -> web_time::Duration {
    web_time::Duration::from_secs(constants::game::COUNTDOWN_TICK_SECONDS)
}
