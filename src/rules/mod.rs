//! The phase controller.
//!
//! `DRAW → SET → REVEAL → DISCARD → DRAW`, with `GAME_OVER` reachable from
//! any commit that leaves a player below 0 hp. The controller makes no
//! automatic progress while an interaction or an active effect is pending.
//!
//! - `engine`: the [`Engine`] that owns the store and applies every change
//! - `phases`: the automatic transitions
//! - `reveal`: resumable reveal resolution
//! - `order`: execution order of the flipped cards
//! - `builder`: [`MatchBuilder`] for fresh matches

mod builder;
mod engine;
mod order;
mod phases;
mod reveal;

pub use builder::MatchBuilder;
pub use engine::{BlockReason, Engine, Step};
pub use order::execution_order;
pub use reveal::{CardStep, RevealProgress, RevealStage};
