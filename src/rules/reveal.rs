//! Reveal resolution.
//!
//! Resolving the flipped cards is a sequence of stages that may be cut short
//! by an interaction or a promoted pending effect at any point. The current
//! stage is stored on the match as [`RevealProgress`], so resolution resumes
//! exactly where it stopped once the suspension clears.
//!
//! ## Stages
//!
//! 1. Symmetric rule damage.
//! 2. `on_resolve_status` for player 1, then player 2.
//! 3. Execution order from effective ranks.
//! 4. Per card in order: quest triggers, invalidation, one-shot flags,
//!    played mark, then `on_reveal` once or twice.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::cards::{Card, CardCatalog, HookKind, Mark};
use crate::core::{Match, PlayerId};
use crate::effects::EffectContext;
use crate::field;
use crate::quests::QuestTrigger;
use crate::stack::{promote, Continuation, InputKind, InteractionOption, Prompt};

use super::order::execution_order;
use super::phases::check_game_over;

/// Where one card's resolution stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardStep {
    /// Quest triggers pending.
    Begin,
    /// Invalidation and one-shot flags pending.
    Checks,
    /// Played mark pending; the hook then runs `runs` times.
    Marks { runs: u8 },
    Hook { remaining: u8 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevealStage {
    RuleDamage,
    /// Index into `[ONE, TWO]`.
    Status(usize),
    Ordering,
    /// Index into the execution order.
    Card { slot: usize, step: CardStep },
    Finished,
}

/// Resume point of the reveal resolution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealProgress {
    pub stage: RevealStage,
    pub order: [PlayerId; 2],
}

impl Default for RevealProgress {
    fn default() -> Self {
        Self {
            stage: RevealStage::RuleDamage,
            order: [PlayerId::ONE, PlayerId::TWO],
        }
    }
}

impl RevealProgress {
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.stage == RevealStage::Finished
    }
}

fn set_stage(state: &mut Match, stage: RevealStage) {
    if let Some(progress) = state.reveal.as_mut() {
        progress.stage = stage;
    }
}

fn next_card(slot: usize) -> RevealStage {
    RevealStage::Card {
        slot: slot + 1,
        step: CardStep::Begin,
    }
}

/// Whether effects of `player`'s played card are suppressed right now.
fn is_invalidated(state: &Match, player: PlayerId, card: &Card) -> bool {
    let status = &state.player(player).status;
    !card.is_treasure() && (status.invalidated || status.invalidate_next_played)
}

/// Drive the resolution until it finishes or the match suspends.
///
/// Every stage is followed by a game-over check, so a player who falls below
/// 0 hp ends the match before any later stage can heal them.
///
/// Returns `true` when resolution is finished or the match is over.
pub fn advance(state: &mut Match, catalog: &CardCatalog) -> bool {
    loop {
        if check_game_over(state) {
            return true;
        }
        promote(state);
        if state.is_suspended() {
            return false;
        }
        let Some(progress) = state.reveal.clone() else {
            return true;
        };
        trace!(stage = ?progress.stage, "reveal stage");
        match progress.stage {
            RevealStage::Finished => return true,
            RevealStage::RuleDamage => {
                set_stage(state, RevealStage::Status(0));
                rule_damage(state, catalog);
            }
            RevealStage::Status(index) => {
                let Some(player) = PlayerId::both().nth(index) else {
                    set_stage(state, RevealStage::Ordering);
                    continue;
                };
                set_stage(state, RevealStage::Status(index + 1));
                resolve_status(state, catalog, player);
            }
            RevealStage::Ordering => {
                let rank = |p: PlayerId| state.player(p).field_slot.as_ref().map(Card::effective_rank);
                let order = execution_order(rank(PlayerId::ONE), rank(PlayerId::TWO));
                debug!(?order, "execution order");
                if let Some(progress) = state.reveal.as_mut() {
                    progress.order = order;
                    progress.stage = RevealStage::Card {
                        slot: 0,
                        step: CardStep::Begin,
                    };
                }
            }
            RevealStage::Card { slot, step } => {
                let Some(&player) = progress.order.get(slot) else {
                    set_stage(state, RevealStage::Finished);
                    continue;
                };
                resolve_card(state, catalog, player, slot, step);
            }
        }
    }
}

fn rule_damage(state: &mut Match, catalog: &CardCatalog) {
    let multiplier = field::active_profile(state).map_or(1, |p| p.rule_damage_multiplier);
    for target in PlayerId::both() {
        let attacker = target.opponent();
        let amount = state.player(attacker).atk * multiplier;
        let mut ctx = EffectContext::new(state, catalog, attacker, None).with_reversed(false);
        ctx.damage(target, amount, false);
    }
}

fn resolve_status(state: &mut Match, catalog: &CardCatalog, player: PlayerId) {
    let Some(card) = state.player(player).field_slot.clone() else {
        return;
    };
    let Some(hook) = catalog.hooks(card.card_id()).and_then(|h| h.get(HookKind::ResolveStatus)) else {
        return;
    };
    if is_invalidated(state, player, &card) {
        return;
    }
    let mut ctx = EffectContext::new(state, catalog, player, Some(card));
    hook(&mut ctx);
}

fn resolve_card(state: &mut Match, catalog: &CardCatalog, player: PlayerId, slot: usize, step: CardStep) {
    let Some(card) = state.player(player).field_slot.clone() else {
        set_stage(state, next_card(slot));
        return;
    };
    let name = state.player(player).name.clone();

    match step {
        CardStep::Begin => {
            set_stage(state, RevealStage::Card {
                slot,
                step: CardStep::Checks,
            });
            let mut ctx = EffectContext::new(state, catalog, player, Some(card.clone())).with_reversed(false);
            ctx.advance_quests(player, QuestTrigger::PlaySuit(card.definition.suit), 1);
        }
        CardStep::Checks => {
            if is_invalidated(state, player, &card) {
                state.player_mut(player).status.invalidate_next_played = false;
                state.log(format!("{name}'s {} is invalidated", card.name()));
                set_stage(state, next_card(slot));
                return;
            }
            let status = &mut state.player_mut(player).status;
            let doubled = std::mem::take(&mut status.double_next_effect) || card.has_mark(Mark::DoubleEffect);
            let runs = if doubled { 2 } else { 1 };
            set_stage(state, RevealStage::Card {
                slot,
                step: CardStep::Marks { runs },
            });
        }
        CardStep::Marks { runs } => {
            set_stage(state, RevealStage::Card {
                slot,
                step: CardStep::Hook { remaining: runs },
            });
            if let Some(mark) = card.mark.filter(|m| m.fires_on_play()) {
                play_mark(state, catalog, player, &card, mark);
            }
        }
        CardStep::Hook { remaining } => {
            let hook = catalog.hooks(card.card_id()).and_then(|h| h.get(HookKind::Reveal));
            let Some(hook) = hook.filter(|_| remaining > 0) else {
                set_stage(state, next_card(slot));
                return;
            };
            set_stage(state, RevealStage::Card {
                slot,
                step: CardStep::Hook {
                    remaining: remaining - 1,
                },
            });
            trace!(card = %card.name(), %player, "on_reveal");
            let mut ctx = EffectContext::new(state, catalog, player, Some(card));
            hook(&mut ctx);
        }
    }
}

fn play_mark(state: &mut Match, catalog: &CardCatalog, player: PlayerId, card: &Card, mark: Mark) {
    let tuning = state.marks;
    let mut ctx = EffectContext::new(state, catalog, player, Some(card.clone()));
    ctx.log(format!("the {mark} mark on {} fires", card.name()));
    match mark {
        Mark::Heal => ctx.heal(player, tuning.heal),
        Mark::Damage => {
            ctx.damage(player.opponent(), tuning.damage, false);
        }
        Mark::Draw => {
            ctx.draw(player, tuning.draw, false);
        }
        Mark::Choice => {
            let prompt = Prompt::new(
                player,
                "Mark choice",
                InputKind::Options(vec![
                    InteractionOption::new(format!("Heal {}", tuning.choice), 0),
                    InteractionOption::new(format!("Deal {}", tuning.choice), 1),
                ]),
                Continuation::MarkChoice { amount: tuning.choice },
            );
            // With a decision already pending, the mark takes its first option.
            if ctx.ask(prompt).is_err() {
                ctx.heal(player, tuning.choice);
            }
        }
        Mark::DoubleEffect | Mark::Amplify | Mark::DrawReduction | Mark::SelfHarm => {}
    }
}
