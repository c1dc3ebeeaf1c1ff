//! Pending-effect queue and active-effect presenter.
//!
//! "On draw" and "on discard" triggers are never run inline. They queue here
//! in FIFO order and are promoted one at a time into `active_effect` once the
//! match is idle (no active effect, no open interaction). Dismissing the
//! active effect runs its hook; see `Engine::dismiss_active_effect`.

use serde::{Deserialize, Serialize};

use crate::cards::{Card, HookKind};
use crate::core::{Match, PlayerId};

/// Which hook a pending effect will run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PendingKind {
    Draw,
    Discard,
}

impl PendingKind {
    #[must_use]
    pub const fn hook(self) -> HookKind {
        match self {
            PendingKind::Draw => HookKind::Draw,
            PendingKind::Discard => HookKind::Discard,
        }
    }
}

/// A queued trigger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingEffect {
    pub kind: PendingKind,
    pub card: Card,
    /// Whose effect it is.
    pub player_id: PlayerId,
    pub description: Option<String>,
}

impl PendingEffect {
    #[must_use]
    pub fn new(kind: PendingKind, card: Card, player_id: PlayerId) -> Self {
        Self {
            kind,
            card,
            player_id,
            description: None,
        }
    }
}

/// Append a trigger to the back of the queue.
pub fn enqueue(state: &mut Match, effect: PendingEffect) {
    tracing::trace!(card = %effect.card.name(), kind = ?effect.kind, "queued pending effect");
    state.pending_effects.push_back(effect);
}

/// Promote the queue head into `active_effect` if the match is idle.
///
/// Returns `true` when an effect was promoted.
pub fn promote(state: &mut Match) -> bool {
    if state.active_effect.is_some() || state.interaction.is_some() {
        return false;
    }
    match state.pending_effects.pop_front() {
        Some(next) => {
            state.active_effect = Some(next);
            true
        }
        None => false,
    }
}

/// Nothing queued, nothing shown, nothing asked.
#[must_use]
pub fn is_idle(state: &Match) -> bool {
    state.pending_effects.is_empty() && !state.is_suspended()
}
