//! Automatic phase transitions.
//!
//! Each function here is one transition the engine performs on its own when
//! the match is not suspended. They all operate on the draft of a single
//! commit.

use tracing::debug;

use crate::cards::CardCatalog;
use crate::core::{DelayedKind, InstantWindow, Match, MatchResult, Phase, PlayerId, VisualEvent};
use crate::effects::EffectContext;
use crate::field;
use crate::quests::QuestTrigger;

use super::reveal::RevealProgress;

pub(crate) fn enter(state: &mut Match, phase: Phase, window: Option<InstantWindow>) {
    debug!(turn = state.turn_count, from = %state.phase, to = %phase, "phase transition");
    state.phase = phase;
    state.instant_window = window;
}

/// Fill both hands up to the hand limit.
pub(crate) fn draw_phase(state: &mut Match, catalog: &CardCatalog) {
    for player in PlayerId::both() {
        let p = state.player(player);
        let missing = p.max_hand_size.saturating_sub(p.non_treasure_hand_count());
        if missing == 0 {
            continue;
        }
        let mut ctx = EffectContext::new(state, catalog, player, None).with_reversed(false);
        ctx.draw(player, missing, true);
    }
    state.draw_done = true;
}

pub(crate) fn open_set(state: &mut Match) {
    for player in PlayerId::both() {
        state.player_mut(player).has_committed = false;
    }
    state.draw_done = false;
    enter(state, Phase::Set, Some(InstantWindow::BeforeSet));
}

pub(crate) fn open_reveal(state: &mut Match) {
    state.slots_revealed = false;
    state.reveal = None;
    enter(state, Phase::Reveal, Some(InstantWindow::BeforeReveal));
}

/// Turn both committed cards face up.
pub(crate) fn flip(state: &mut Match) {
    state.slots_revealed = true;
    state.reveal = Some(RevealProgress::default());
    for player in PlayerId::both() {
        let p = state.player(player);
        let line = match &p.field_slot {
            Some(card) => format!("{} reveals {} (rank {})", p.name, card.name(), card.effective_rank()),
            None => format!("{} reveals nothing", p.name),
        };
        state.log(line);
    }
    state.emit(VisualEvent::Flip);
    state.instant_window = Some(InstantWindow::AfterReveal);
}

/// Leave Reveal: treasure slots go back to the vault.
pub(crate) fn close_reveal(state: &mut Match) {
    for player in PlayerId::both() {
        let p = state.player_mut(player);
        if p.field_slot.as_ref().is_some_and(|c| c.is_treasure()) {
            if let Some(card) = p.field_slot.take() {
                p.vault.push_back(card);
            }
        }
    }
    enter(state, Phase::Discard, None);
}

/// Discard-phase cleanup, then the next turn.
pub(crate) fn cleanup(state: &mut Match, catalog: &CardCatalog) {
    {
        let mut ctx = EffectContext::new(state, catalog, PlayerId::ONE, None).with_reversed(false);
        field::pulse(&mut ctx);
    }

    // Both players' delayed effects land before either turn's flags roll over.
    for player in PlayerId::both() {
        let taken = state.player(player).status.damage_taken;
        if taken > 0 {
            let mut ctx = EffectContext::new(state, catalog, player, None).with_reversed(false);
            ctx.advance_quests(player, QuestTrigger::DamageTaken, taken.unsigned_abs());
        }
        mature_delayed(state, catalog, player);
    }

    for player in PlayerId::both() {
        let p = state.player_mut(player);
        for card in p.hand.iter_mut() {
            if card.is_locked() {
                card.tick_lock();
            }
        }
        if let Some(card) = p.field_slot.take() {
            p.bury(card);
        }
        p.has_committed = false;
        p.status.end_turn();
    }

    state.slots_revealed = false;
    state.reveal = None;
    if check_game_over(state) {
        return;
    }
    state.turn_count += 1;
    let turn = state.turn_count;
    state.log(format!("Turn {turn} begins"));
    enter(state, Phase::Draw, None);
}

fn mature_delayed(state: &mut Match, catalog: &CardCatalog, player: PlayerId) {
    let delayed = std::mem::take(&mut state.player_mut(player).delayed_effects);
    let mut ripe = Vec::new();
    for mut effect in delayed {
        effect.turns = effect.turns.saturating_sub(1);
        if effect.turns == 0 {
            ripe.push(effect);
        } else {
            state.player_mut(player).delayed_effects.push_back(effect);
        }
    }

    for effect in ripe {
        let mut ctx = EffectContext::new(state, catalog, player, None).with_reversed(false);
        ctx.log(format!("{} takes effect", effect.label));
        match effect.kind {
            DelayedKind::Damage(n) => {
                ctx.damage(effect.target, n, false);
            }
            DelayedKind::Heal(n) => ctx.heal(effect.target, n),
            DelayedKind::Draw(n) => {
                ctx.draw(effect.target, n, false);
            }
            DelayedKind::AtkChange(n) => ctx.add_atk(effect.target, n),
        }
    }
}

/// Record a result if either player is below 0 hp.
///
/// Returns `true` when the match is over.
pub(crate) fn check_game_over(state: &mut Match) -> bool {
    if state.result.is_some() {
        return true;
    }
    let down = |p: PlayerId| state.player(p).hp < 0;
    let result = match (down(PlayerId::ONE), down(PlayerId::TWO)) {
        (false, false) => return false,
        (true, true) => MatchResult::Draw,
        (true, false) => MatchResult::Winner(PlayerId::TWO),
        (false, true) => MatchResult::Winner(PlayerId::ONE),
    };
    state.log(match result {
        MatchResult::Draw => "Both players fall. The match is a draw".to_string(),
        MatchResult::Winner(winner) => format!("{} wins the match", state.player(winner).name),
    });
    state.result = Some(result);
    enter(state, Phase::GameOver, None);
    true
}
