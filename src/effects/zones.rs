//! Zone primitives: draw, discard, seize, transform, lock, destroy and
//! friends.
//!
//! Malformed references (an instance that is gone, or not where the effect
//! expects it) are logged no-ops. Treasure cards refuse every primitive that
//! would move them out of play.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::cards::{Card, HookKind, InstanceId, Mark};
use crate::core::{DelayedEffect, PlayerId, VisualEvent, Zone};
use crate::field;
use crate::quests::QuestTrigger;
use crate::stack::{enqueue, PendingEffect, PendingKind};

use super::context::EffectContext;

/// Result of a clash, from the source player's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClashOutcome {
    Win,
    Lose,
    Tie,
}

impl EffectContext<'_> {
    fn has_hook(&self, card: &Card, kind: HookKind) -> bool {
        self.catalog()
            .hooks(card.card_id())
            .is_some_and(|hooks| hooks.has(kind))
    }

    // === Draw ===

    /// Draw up to `count` cards from the top of `target`'s deck.
    ///
    /// Phase draws are reduced by draw-reduction marks in hand. Returns the
    /// drawn instance ids; an empty deck simply draws fewer.
    pub fn draw(&mut self, target: PlayerId, count: usize, phase_draw: bool) -> Vec<InstanceId> {
        let target = self.resolve(target);
        let name = self.name_of(target);

        if field::active_profile(self.snapshot()).is_some_and(|p| p.shuffle_before_draw) {
            self.shuffle_deck(target);
        }

        let mut count = count;
        if phase_draw {
            let reduction = self.snapshot().player(target).hand_marks(Mark::DrawReduction);
            if reduction > 0 {
                count = count.saturating_sub(reduction);
                self.log(format!("{name}'s draw is reduced by {reduction}"));
            }
        }

        let catalog = self.catalog();
        let mut drawn = Vec::with_capacity(count);
        let mut names = Vec::with_capacity(count);
        for _ in 0..count {
            let state = self.state_mut();
            let Some(mut card) = state.player_mut(target).deck.pop_front() else {
                state.log(format!("{name}'s deck is empty"));
                break;
            };

            let substitute = drawn.is_empty() && state.field.as_ref().is_some_and(|f| f.substitute_pending);
            if substitute {
                if let Some(f) = state.field.as_mut() {
                    f.substitute_pending = false;
                }
                let old = card.card_id();
                if let Some(def) = catalog.random_definition(&mut state.rng, |d| d.id != old && !d.is_treasure()) {
                    card.transform_into(def);
                }
            }

            if self.has_hook(&card, HookKind::Draw) {
                enqueue(
                    self.state_mut(),
                    PendingEffect::new(PendingKind::Draw, card.clone(), target),
                );
            }
            drawn.push(card.instance_id);
            names.push(card.name().to_string());
            self.state_mut().player_mut(target).hand.push_back(card);
        }

        if !drawn.is_empty() {
            let n = drawn.len();
            self.log_hidden(
                format!("{name} draws {n}"),
                format!("{name} draws {}", names.join(", ")),
            );
            self.state_mut().emit(VisualEvent::Draw { player: target, count: n });
        }
        drawn
    }

    // === Discard ===

    /// Discard the given hand cards of `target`.
    ///
    /// Treasures are pulled out of the request into the vault. Returns the
    /// number of cards that reached the discard pile.
    pub fn discard(&mut self, target: PlayerId, ids: &[InstanceId]) -> usize {
        let target = self.resolve(target);
        let name = self.name_of(target);
        let mut discarded = 0;

        for &id in ids {
            let Some(card) = self.state_mut().player_mut(target).take_from_hand(id) else {
                self.log(format!("{id} is not in {name}'s hand"));
                continue;
            };
            if card.is_treasure() {
                self.log(format!("{} cannot be discarded and is vaulted", card.name()));
                self.state_mut().player_mut(target).vault.push_back(card);
                continue;
            }
            self.log(format!("{name} discards {}", card.name()));
            if self.has_hook(&card, HookKind::Discard) {
                enqueue(
                    self.state_mut(),
                    PendingEffect::new(PendingKind::Discard, card.clone(), target),
                );
            }
            self.state_mut().player_mut(target).discard_pile.push_back(card);
            discarded += 1;
        }

        if discarded == 0 {
            return 0;
        }
        self.state_mut().emit(VisualEvent::Discard {
            player: target,
            count: discarded,
        });
        self.advance_quests(target, QuestTrigger::Discard, discarded as u32);
        self.feed_discard_counter(discarded as u32);
        discarded
    }

    fn feed_discard_counter(&mut self, amount: u32) {
        let Some(threshold) = field::active_profile(self.snapshot()).and_then(|p| p.discard_threshold) else {
            return;
        };
        let state = self.state_mut();
        let Some(f) = state.field.as_mut() else {
            return;
        };
        f.counter += amount;
        if f.counter < threshold {
            return;
        }
        let field_name = f.card.name().to_string();
        state.log(format!("{field_name} overflows and sweeps both hands"));
        for player in PlayerId::both() {
            let hand = std::mem::take(&mut self.state_mut().player_mut(player).hand);
            let mut count = 0;
            for card in hand {
                if card.is_treasure() {
                    self.state_mut().player_mut(player).hand.push_back(card);
                    continue;
                }
                if self.has_hook(&card, HookKind::Discard) {
                    enqueue(
                        self.state_mut(),
                        PendingEffect::new(PendingKind::Discard, card.clone(), player),
                    );
                }
                self.state_mut().player_mut(player).discard_pile.push_back(card);
                count += 1;
            }
            if count > 0 {
                self.state_mut().emit(VisualEvent::Discard { player, count });
            }
        }
        field::discard_field(self.state_mut());
    }

    // === Seize ===

    /// Move a card from the other player's hand or field slot into the
    /// source player's hand.
    pub fn seize(&mut self, id: InstanceId) -> bool {
        let taker = self.resolve(self.source());
        let Some((holder, zone)) = self.snapshot().locate(id) else {
            self.log(format!("{id} is no longer in play"));
            return false;
        };
        if !matches!(zone, Zone::Hand | Zone::FieldSlot) || holder == taker {
            self.log(format!("{id} cannot be seized from there"));
            return false;
        }
        let Some(card) = self.snapshot().card(id).cloned() else {
            return false;
        };
        let keywords = card.definition.keywords;
        if keywords.treasure || keywords.seize_proof {
            self.log(format!("{} resists being seized", card.name()));
            return false;
        }

        let state = self.state_mut();
        let _ = state.detach(id);
        if keywords.exile_on_seize {
            state.log(format!("{} exiles itself rather than be seized", card.name()));
            state.player_mut(holder).bury(card);
            return false;
        }
        let taker_name = state.player(taker).name.clone();
        state.log(format!("{taker_name} seizes {}", card.name()));
        state.player_mut(taker).hand.push_back(card);
        true
    }

    /// Take `count` random eligible cards from the other player's hand,
    /// optionally stamping `mark` on each.
    pub fn blind_seize(&mut self, count: usize, mark: Option<Mark>) -> Vec<InstanceId> {
        let taker = self.resolve(self.source());
        let victim = taker.opponent();
        let eligible: Vec<InstanceId> = self
            .snapshot()
            .player(victim)
            .hand
            .iter()
            .filter(|c| {
                let k = c.definition.keywords;
                !(k.treasure || k.seize_proof || k.exile_on_seize)
            })
            .map(|c| c.instance_id)
            .collect();

        let state = self.state_mut();
        let picks = state.rng.choose_many(&eligible, count);
        let mut names = Vec::with_capacity(picks.len());
        for &id in &picks {
            if let Some(mut card) = state.player_mut(victim).take_from_hand(id) {
                if let Some(mark) = mark {
                    card.mark = Some(mark);
                }
                names.push(card.name().to_string());
                state.player_mut(taker).hand.push_back(card);
            }
        }

        let taker_name = self.name_of(taker);
        let victim_name = self.name_of(victim);
        if picks.is_empty() {
            self.log(format!("{taker_name} finds nothing to seize"));
        } else {
            self.log_hidden(
                format!("{taker_name} seizes {} cards from {victim_name}", picks.len()),
                format!("{taker_name} seizes {} from {victim_name}", names.join(", ")),
            );
        }
        picks
    }

    // === Transform ===

    /// Replace a card's definition with a random non-treasure one.
    ///
    /// The card must be in `target`'s hand, field slot or deck.
    pub fn transform(&mut self, target: PlayerId, id: InstanceId) -> bool {
        let target = self.resolve(target);
        let name = self.name_of(target);
        let located = self.snapshot().locate(id);
        let Some(card) = located
            .filter(|(owner, zone)| *owner == target && matches!(zone, Zone::Hand | Zone::FieldSlot | Zone::Deck))
            .and_then(|_| self.snapshot().card(id).cloned())
        else {
            self.log(format!("{id} is not among {name}'s cards"));
            return false;
        };

        if card.is_treasure() {
            self.log(format!("{} cannot be transformed", card.name()));
            return false;
        }
        if self.snapshot().player(target).status.prevent_transform > 0 {
            self.state_mut().player_mut(target).status.prevent_transform -= 1;
            self.log(format!("{name}'s ward stops a transformation"));
            return false;
        }

        let catalog = self.catalog();
        let Some(def) = catalog.random_definition(&mut self.state_mut().rng, |d| !d.is_treasure()) else {
            self.log("nothing to transform into");
            return false;
        };
        let new_name = def.name.clone();
        self.state_mut().update_card(id, |c| c.transform_into(def));
        self.log_hidden(
            format!("one of {name}'s cards transforms"),
            format!("{} transforms into {new_name}", card.name()),
        );
        true
    }

    // === Lock ===

    /// Lock `count` random unlocked non-treasure hand cards of `target` for
    /// `turns` cleanups.
    pub fn lock(&mut self, target: PlayerId, count: usize, turns: u32) -> Vec<InstanceId> {
        let target = self.resolve(target);
        let candidates: Vec<InstanceId> = self
            .snapshot()
            .player(target)
            .hand
            .iter()
            .filter(|c| !c.is_locked() && !c.is_treasure())
            .map(|c| c.instance_id)
            .collect();

        let state = self.state_mut();
        let picks = state.rng.choose_many(&candidates, count);
        let turns = turns.max(1);
        let mut names = Vec::with_capacity(picks.len());
        for card in state.player_mut(target).hand.iter_mut() {
            if picks.contains(&card.instance_id) {
                card.locked_turns = Some(turns);
                names.push(card.name().to_string());
            }
        }

        let name = self.name_of(target);
        if !picks.is_empty() {
            self.log_hidden(
                format!("{} of {name}'s cards are locked", picks.len()),
                format!("{name}'s {} locked for {turns} turns", names.join(", ")),
            );
        }
        picks
    }

    // === Destroy / recover ===

    /// Remove a card from the game entirely.
    pub fn destroy(&mut self, id: InstanceId) -> bool {
        let Some((_, zone)) = self.snapshot().locate(id) else {
            self.log(format!("{id} is no longer in play"));
            return false;
        };
        let Some(card) = self.snapshot().card(id).cloned() else {
            return false;
        };
        if card.is_treasure() {
            self.log(format!("{} cannot be destroyed", card.name()));
            return false;
        }
        let state = self.state_mut();
        if zone == Zone::Field {
            let _ = field::destroy_field(state);
        } else {
            let _ = state.detach(id);
        }
        state.log(format!("{} is destroyed", card.name()));
        true
    }

    /// Move a card from `target`'s discard pile back to their hand.
    pub fn return_from_discard(&mut self, target: PlayerId, id: InstanceId) -> bool {
        let target = self.resolve(target);
        let name = self.name_of(target);
        let p = self.state_mut().player_mut(target);
        let Some(pos) = p.discard_pile.iter().position(|c| c.instance_id == id) else {
            self.log(format!("{id} is not in {name}'s discard pile"));
            return false;
        };
        let card = p.discard_pile.remove(pos);
        let card_name = card.name().to_string();
        p.hand.push_back(card);
        self.log(format!("{name} recovers {card_name}"));
        true
    }

    // === Deck ===

    pub fn shuffle(&mut self, target: PlayerId) {
        let target = self.resolve(target);
        self.shuffle_deck(target);
        let name = self.name_of(target);
        self.log(format!("{name} shuffles their deck"));
    }

    fn shuffle_deck(&mut self, target: PlayerId) {
        let state = self.state_mut();
        let mut cards: Vec<Card> = state.player(target).deck.iter().cloned().collect();
        state.rng.shuffle(&mut cards);
        state.player_mut(target).deck = cards.into_iter().collect::<Vector<_>>();
    }

    /// Look at up to `n` cards from the top of `target`'s deck.
    pub fn peek_deck(&mut self, target: PlayerId, n: usize) -> Vec<Card> {
        let target = self.resolve(target);
        let cards: Vec<Card> = self.snapshot().player(target).deck.iter().take(n).cloned().collect();
        let name = self.name_of(target);
        self.log(format!("{} cards of {name}'s deck are revealed", cards.len()));
        cards
    }

    /// Compare the top cards of both decks without moving them.
    ///
    /// The lower effective rank wins. An empty deck loses; two empty decks tie.
    pub fn clash(&mut self) -> ClashOutcome {
        let me = self.source();
        let mine = self.snapshot().player(me).deck.front().cloned();
        let theirs = self.snapshot().player(me.opponent()).deck.front().cloned();
        let outcome = match (&mine, &theirs) {
            (None, None) => ClashOutcome::Tie,
            (None, Some(_)) => ClashOutcome::Lose,
            (Some(_), None) => ClashOutcome::Win,
            (Some(a), Some(b)) => match a.effective_rank().cmp(&b.effective_rank()) {
                std::cmp::Ordering::Less => ClashOutcome::Win,
                std::cmp::Ordering::Greater => ClashOutcome::Lose,
                std::cmp::Ordering::Equal => ClashOutcome::Tie,
            },
        };
        let shown = |c: &Option<Card>| c.as_ref().map_or_else(|| "nothing".to_string(), |c| c.name().to_string());
        let name = self.name_of(me);
        self.log(format!(
            "Clash: {} against {}, {name} {}",
            shown(&mine),
            shown(&theirs),
            match outcome {
                ClashOutcome::Win => "wins",
                ClashOutcome::Lose => "loses",
                ClashOutcome::Tie => "ties",
            }
        ));
        outcome
    }

    // === Card decorations ===

    /// Stamp a mark on a card wherever it is, replacing any previous mark.
    pub fn mark_card(&mut self, id: InstanceId, mark: Mark) -> bool {
        let marked = self.state_mut().update_card(id, |c| c.mark = Some(mark));
        if !marked {
            self.log(format!("{id} is no longer in play"));
        }
        marked
    }

    /// Override a card's rank for ordering until it is transformed.
    pub fn set_temp_rank(&mut self, id: InstanceId, rank: i32) -> bool {
        self.state_mut().update_card(id, |c| c.temp_rank = Some(rank))
    }

    /// Schedule an effect to mature after `effect.turns` cleanups.
    ///
    /// The target is resolved now; the effect matures in the source player's
    /// cleanup.
    pub fn schedule(&mut self, mut effect: DelayedEffect) {
        effect.target = self.resolve(effect.target);
        let source = self.source();
        self.log(format!("{} will take effect in {} turns", effect.label, effect.turns));
        self.state_mut().player_mut(source).delayed_effects.push_back(effect);
    }
}
