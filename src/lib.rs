//! # duel-engine
//!
//! Turn engine for a two-player card duel with simultaneous commits.
//!
//! Each turn runs `DRAW → SET → REVEAL → DISCARD`. Both players commit one
//! card face down, the cards flip together, and their effects resolve in
//! rank order (lower first). A player below 0 hp loses; both at once is a
//! draw.
//!
//! ## Design Principles
//!
//! 1. **Whole-state commits**: every operation builds the next [`Match`] from
//!    a draft of the latest one and replaces it in the [`MatchStore`]. Zones
//!    are `im` persistent vectors, so the draft is cheap.
//!
//! 2. **Behavior by id**: cards carry data only. What a card *does* lives in
//!    an injected [`CardCatalog`] of hooks looked up by [`CardId`], which
//!    keeps snapshots serializable.
//!
//! 3. **Suspend, don't block**: effects that need a decision install an
//!    interaction request and the engine makes no automatic progress until it
//!    is answered. Reveal resolution resumes where it stopped.
//!
//! 4. **Deterministic**: all randomness comes from a seeded [`GameRng`]
//!    carried inside the match.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use duel_engine::{demo, Engine, PlayerId, Step};
//!
//! let catalog = Arc::new(demo::catalog());
//! let state = demo::started_match(&catalog, 7);
//! let mut engine = Engine::new(catalog, state);
//!
//! // Draw, promote draw triggers, open the Set phase.
//! let mut step = engine.run();
//! while step == Step::Blocked(duel_engine::BlockReason::ActiveEffect) {
//!     engine.dismiss_active_effect().unwrap();
//!     step = engine.run();
//! }
//! assert_eq!(step, Step::AwaitingCommits);
//! assert!(!engine.state().player(PlayerId::ONE).has_committed);
//! ```
//!
//! ## Modules
//!
//! - `core`: players, RNG, configuration, match state and the store
//! - `cards`: definitions, instances, marks, hooks and the catalog
//! - `effects`: the primitives card hooks call through [`EffectContext`]
//! - `field`: the shared field slot and its passive effects
//! - `quests`: per-player quests and their rewards
//! - `stack`: the pending-effect queue and the interaction protocol
//! - `rules`: the phase controller and the [`Engine`]
//! - `net`: snapshot encoding for the network boundary
//! - `demo`: a small catalog for docs and tests

pub mod cards;
pub mod core;
pub mod demo;
pub mod effects;
pub mod error;
pub mod field;
pub mod net;
pub mod quests;
pub mod rules;
pub mod stack;

// Re-export commonly used types
pub use crate::core::{
    GameRng, GameRngState, InstantWindow, Match, MatchConfig, MatchMode, MatchResult, MatchStore,
    Phase, PlayerId, PlayerMap, PlayerState,
};

pub use crate::cards::{Card, CardCatalog, CardDefinition, CardId, HookSet, InstanceId, Mark, Suit};

pub use crate::effects::{EffectContext, resolve_target};

pub use crate::error::{BuildError, Rejection, StoreError, WireError};

pub use crate::quests::{Quest, QuestReward, QuestTrigger};

pub use crate::rules::{BlockReason, Engine, MatchBuilder, Step};

pub use crate::stack::{InteractionId, InteractionRequest, InteractionResponse};
