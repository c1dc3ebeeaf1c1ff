//! Match configuration and the phase vocabulary.
//!
//! ## Phases
//!
//! `Draw → Set → Reveal → Discard → Draw …`, with `GameOver` terminal.
//! Reveal walks through the `BeforeReveal`, `AfterReveal` and `AfterEffect`
//! instant windows; Set opens `BeforeSet`.
//!
//! ## MatchConfig
//!
//! Starting stats, hand limit, log redaction mode, seed and the tuning of
//! played marks. Built with chained setters:
//!
//! ```
//! use duel_engine::core::{MatchConfig, MatchMode};
//!
//! let config = MatchConfig::default()
//!     .starting_hp(30)
//!     .max_hand_size(4)
//!     .mode(MatchMode::Online)
//!     .seed(7);
//!
//! assert_eq!(config.starting_hp, 30);
//! assert_eq!(config.starting_atk, 2);
//! ```

use serde::{Deserialize, Serialize};

/// Top-level turn phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    Draw,
    Set,
    Reveal,
    Discard,
    GameOver,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Draw => "DRAW",
            Phase::Set => "SET",
            Phase::Reveal => "REVEAL",
            Phase::Discard => "DISCARD",
            Phase::GameOver => "GAME_OVER",
        };
        f.write_str(name)
    }
}

/// Named point where `on_instant` hooks may be played out of turn order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstantWindow {
    BeforeSet,
    BeforeReveal,
    AfterReveal,
    AfterEffect,
}

/// Whether the match is mirrored to a remote opponent.
///
/// `Online` redacts hidden card names from the log feed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchMode {
    #[default]
    Local,
    Online,
}

/// Strength of the side effects of played marks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkTuning {
    pub heal: i32,
    pub damage: i32,
    pub draw: usize,
    /// Amount healed or dealt by a `Choice` mark.
    pub choice: i32,
}

impl Default for MarkTuning {
    fn default() -> Self {
        Self {
            heal: 3,
            damage: 2,
            draw: 1,
            choice: 2,
        }
    }
}

/// Static settings of a match.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    pub player_names: [String; 2],
    pub starting_hp: i32,
    pub starting_atk: i32,
    /// Non-treasure hand limit enforced before Discard can finish.
    pub max_hand_size: usize,
    /// Cards drawn before the first Draw phase. The first Draw phase
    /// fills hands to the limit anyway.
    pub opening_hand: usize,
    pub mode: MatchMode,
    pub seed: u64,
    pub marks: MarkTuning,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            player_names: ["Player 1".to_string(), "Player 2".to_string()],
            starting_hp: 40,
            starting_atk: 2,
            max_hand_size: 5,
            opening_hand: 0,
            mode: MatchMode::Local,
            seed: 0,
            marks: MarkTuning::default(),
        }
    }
}

impl MatchConfig {
    #[must_use]
    pub fn player_names(mut self, first: impl Into<String>, second: impl Into<String>) -> Self {
        self.player_names = [first.into(), second.into()];
        self
    }

    #[must_use]
    pub fn starting_hp(mut self, hp: i32) -> Self {
        self.starting_hp = hp;
        self
    }

    #[must_use]
    pub fn starting_atk(mut self, atk: i32) -> Self {
        self.starting_atk = atk;
        self
    }

    #[must_use]
    pub fn max_hand_size(mut self, size: usize) -> Self {
        self.max_hand_size = size;
        self
    }

    #[must_use]
    pub fn opening_hand(mut self, size: usize) -> Self {
        self.opening_hand = size;
        self
    }

    #[must_use]
    pub fn mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn marks(mut self, marks: MarkTuning) -> Self {
        self.marks = marks;
        self
    }
}
