//! Effect primitives.
//!
//! Card hooks never touch the match directly. They receive an
//! [`EffectContext`] and call its primitives:
//!
//! - Stats: `modify`, `heal`, `add_atk`, `damage`
//! - Zones: `draw`, `discard`, `seize`, `blind_seize`, `transform`, `lock`,
//!   `destroy`, `return_from_discard`, `shuffle`, `peek_deck`
//! - Misc: `clash`, `mark_card`, `set_temp_rank`, `schedule`
//! - Decisions: `ask`, `ask_card`
//!
//! The field and quest lifecycles add `set_field`, `discard_field`,
//! `add_quest` and `update_quest_progress`.
//!
//! ## Reversal
//!
//! A context carries a reversal flag taken from the source player's status.
//! Every primitive that names a player passes it through
//! [`resolve_target`] first, so a reversed heal lands on the opponent and a
//! reversed hit lands on the source.

mod context;
mod damage;
mod targeting;
mod zones;

pub use context::EffectContext;
pub use targeting::resolve_target;
pub use zones::ClashOutcome;
