//! Core engine types: players, RNG, configuration, match state and the store.
//!
//! Everything here is plain data plus the versioned store that owns it.
//! Rules live in `effects`, `field`, `quests`, `stack` and `rules`.

pub mod config;
pub mod player;
pub mod rng;
pub mod state;
pub mod store;

pub use config::{InstantWindow, MarkTuning, MatchConfig, MatchMode, Phase};
pub use player::{InvalidPlayerId, PlayerId, PlayerMap};
pub use rng::{GameRng, GameRngState};
pub use state::{
    DelayedEffect, DelayedKind, LogEntry, Match, MatchResult, PlayerState, StatusFlags,
    VisualEvent, Zone,
};
pub use store::MatchStore;
