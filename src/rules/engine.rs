//! The turn engine.
//!
//! `Engine` owns the [`MatchStore`] and the injected card catalog. Every
//! public operation builds a draft from the latest committed state, applies
//! its change, settles the draft (queue promotion, game-over check) and
//! commits it as one whole-state replacement keyed off the version it was
//! built from.
//!
//! ## Driving a match
//!
//! - `step()` performs one automatic transition and reports why it stopped.
//! - `run()` steps until the match needs outside input.
//! - Player input enters through `set_card`, `play_instant`, `discard`,
//!   `respond` and `dismiss_active_effect`.
//!
//! Instant windows are open states: a driver may call `play_instant` while
//! `instant_window` is set, and the next `step()` closes the window.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::cards::{CardCatalog, HookKind, InstanceId};
use crate::core::{InstantWindow, Match, MatchStore, Phase, PlayerId, VisualEvent};
use crate::effects::EffectContext;
use crate::error::Rejection;
use crate::stack::{promote, Continuation, InteractionId, InteractionResponse};

use super::phases;
use super::reveal;

/// Why `step()` could not advance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockReason {
    /// An interaction request awaits its owner's answer.
    Interaction,
    /// An effect awaits dismissal.
    ActiveEffect,
    /// A player must discard down to the hand limit.
    HandOverLimit,
}

/// Outcome of one `step()`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Step {
    Advanced,
    Blocked(BlockReason),
    /// Set phase: at least one player has not committed.
    AwaitingCommits,
    Finished,
}

/// Owns the match and applies every change to it.
#[derive(Clone, Debug)]
pub struct Engine {
    catalog: Arc<CardCatalog>,
    store: MatchStore,
}

impl Engine {
    #[must_use]
    pub fn new(catalog: Arc<CardCatalog>, state: Match) -> Self {
        Self {
            catalog,
            store: MatchStore::new(state),
        }
    }

    /// The latest committed state.
    #[must_use]
    pub fn state(&self) -> &Match {
        self.store.get_state()
    }

    #[must_use]
    pub fn store(&self) -> &MatchStore {
        &self.store
    }

    #[must_use]
    pub fn catalog(&self) -> &CardCatalog {
        &self.catalog
    }

    // === Commits ===

    /// Apply `f` to a draft of the latest state and commit it.
    ///
    /// A rejection commits nothing but its log line.
    fn transact<R>(&mut self, f: impl FnOnce(&mut Match, &CardCatalog) -> Result<R, Rejection>) -> Result<R, Rejection> {
        let base = self.store.version();
        let mut draft = self.store.get_state().clone();
        let outcome = f(&mut draft, &self.catalog);
        let draft = match outcome {
            Ok(_) => {
                promote(&mut draft);
                phases::check_game_over(&mut draft);
                draft
            }
            Err(ref rejection) => {
                debug!(%rejection, "rejected");
                let mut unchanged = self.store.get_state().clone();
                unchanged.log(rejection.to_string());
                unchanged
            }
        };
        if let Err(err) = self.store.compare_and_swap(base, draft) {
            warn!(%err, "commit dropped");
        }
        outcome
    }

    fn guard_open(state: &Match) -> Result<(), Rejection> {
        if state.result.is_some() {
            return Err(Rejection::GameOver);
        }
        Ok(())
    }

    /// Run primitives on behalf of `player` outside any card hook.
    pub fn with_context<R>(&mut self, player: PlayerId, f: impl FnOnce(&mut EffectContext<'_>) -> R) -> Result<R, Rejection> {
        self.transact(|state, catalog| {
            Self::guard_open(state)?;
            let mut ctx = EffectContext::new(state, catalog, player, None);
            Ok(f(&mut ctx))
        })
    }

    // === Automatic progress ===

    /// Perform one automatic transition.
    pub fn step(&mut self) -> Step {
        let state = self.state();
        if state.result.is_some() || state.is_over() {
            return Step::Finished;
        }
        if state.interaction.is_some() {
            return Step::Blocked(BlockReason::Interaction);
        }
        if state.active_effect.is_some() {
            return Step::Blocked(BlockReason::ActiveEffect);
        }
        if state.phase == Phase::Discard && PlayerId::both().any(|p| state.player(p).over_hand_limit()) {
            return Step::Blocked(BlockReason::HandOverLimit);
        }
        if state.phase == Phase::Set && !PlayerId::both().all(|p| state.player(p).has_committed) {
            // The BeforeSet window closes once; commits are still awaited.
            if state.instant_window.is_none() {
                return Step::AwaitingCommits;
            }
        }

        let outcome = self.transact(|state, catalog| {
            Self::advance(state, catalog);
            Ok(())
        });
        match outcome {
            Ok(()) => Step::Advanced,
            Err(_) => Step::Finished,
        }
    }

    fn advance(state: &mut Match, catalog: &CardCatalog) {
        match state.phase {
            Phase::Draw => {
                if !state.draw_done {
                    phases::draw_phase(state, catalog);
                } else if !promote(state) {
                    phases::open_set(state);
                }
            }
            Phase::Set => {
                if state.instant_window.is_some() {
                    state.instant_window = None;
                } else {
                    phases::open_reveal(state);
                }
            }
            Phase::Reveal => match state.instant_window {
                Some(InstantWindow::BeforeReveal) => phases::flip(state),
                Some(InstantWindow::AfterReveal) => {
                    if reveal::advance(state, catalog) && state.result.is_none() {
                        state.instant_window = Some(InstantWindow::AfterEffect);
                    }
                }
                _ => phases::close_reveal(state),
            },
            Phase::Discard => phases::cleanup(state, catalog),
            Phase::GameOver => {}
        }
    }

    /// Step until the match needs outside input or is finished.
    pub fn run(&mut self) -> Step {
        loop {
            match self.step() {
                Step::Advanced => continue,
                other => return other,
            }
        }
    }

    // === Player input ===

    /// Commit a hand card for the Set phase.
    ///
    /// `None` is only accepted when the player has nothing they could set.
    pub fn set_card(&mut self, player: PlayerId, card: Option<InstanceId>) -> Result<(), Rejection> {
        self.transact(|state, catalog| {
            Self::guard_open(state)?;
            if state.phase != Phase::Set {
                return Err(Rejection::WrongPhase(state.phase));
            }
            if state.interaction.is_some() {
                return Err(Rejection::InteractionPending);
            }
            if state.player(player).has_committed {
                return Err(Rejection::AlreadyCommitted(player));
            }

            let settable = |id: InstanceId| -> Result<(), Rejection> {
                let c = state.player(player).hand_card(id).ok_or(Rejection::CardNotFound(id))?;
                if c.is_locked() {
                    return Err(Rejection::CardLocked(id));
                }
                if !catalog.hooks(c.card_id()).map_or(true, |h| h.can_set()) {
                    return Err(Rejection::CardCannotBeSet(id));
                }
                Ok(())
            };

            let name = state.player(player).name.clone();
            match card {
                Some(id) => {
                    settable(id)?;
                    let Some(c) = state.player_mut(player).take_from_hand(id) else {
                        return Err(Rejection::CardNotFound(id));
                    };
                    state.log_hidden(
                        format!("{name} commits a card"),
                        format!("{name} commits {}", c.name()),
                    );
                    state.player_mut(player).field_slot = Some(c);
                }
                None => {
                    let hand: Vec<InstanceId> = state.player(player).hand.iter().map(|c| c.instance_id).collect();
                    if hand.into_iter().any(|id| settable(id).is_ok()) {
                        return Err(Rejection::MustCommit(player));
                    }
                    state.log(format!("{name} has nothing to commit"));
                }
            }
            state.player_mut(player).has_committed = true;
            Ok(())
        })
    }

    /// Play an instant from hand during an open instant window.
    pub fn play_instant(&mut self, player: PlayerId, id: InstanceId) -> Result<(), Rejection> {
        self.transact(|state, catalog| {
            Self::guard_open(state)?;
            let Some(window) = state.instant_window else {
                return Err(Rejection::WrongPhase(state.phase));
            };
            if state.is_suspended() {
                return Err(Rejection::InteractionPending);
            }
            let card = state
                .player(player)
                .hand_card(id)
                .cloned()
                .ok_or(Rejection::CardNotFound(id))?;
            if card.is_locked() {
                return Err(Rejection::CardLocked(id));
            }
            let hooks = catalog.hooks(card.card_id());
            let hook = hooks
                .filter(|h| h.can_instant(window))
                .and_then(|h| h.get(HookKind::Instant))
                .ok_or(Rejection::NotInstant(id))?;

            if !card.is_treasure() {
                let p = state.player_mut(player);
                if let Some(played) = p.take_from_hand(id) {
                    p.discard_pile.push_back(played);
                }
            }
            let name = state.player(player).name.clone();
            state.log(format!("{name} plays {} as an instant", card.name()));
            let mut ctx = EffectContext::new(state, catalog, player, Some(card));
            hook(&mut ctx);
            Ok(())
        })
    }

    /// Discard hand cards, typically to get down to the hand limit.
    pub fn discard(&mut self, player: PlayerId, ids: &[InstanceId]) -> Result<usize, Rejection> {
        self.transact(|state, catalog| {
            Self::guard_open(state)?;
            if state.phase != Phase::Discard {
                return Err(Rejection::WrongPhase(state.phase));
            }
            if state.is_suspended() {
                return Err(Rejection::InteractionPending);
            }
            if let Some(&missing) = ids.iter().find(|id| state.player(player).hand_card(**id).is_none()) {
                return Err(Rejection::CardNotFound(missing));
            }
            let mut ctx = EffectContext::new(state, catalog, player, None).with_reversed(false);
            Ok(ctx.discard(player, ids))
        })
    }

    /// Answer the open interaction and resume whoever asked.
    pub fn respond(&mut self, player: PlayerId, id: InteractionId, response: InteractionResponse) -> Result<(), Rejection> {
        self.transact(|state, catalog| {
            Self::guard_open(state)?;
            let request = match &state.interaction {
                Some(request) if request.id == id => request.clone(),
                _ => return Err(Rejection::NoSuchInteraction(id)),
            };
            if request.player_id != player {
                return Err(Rejection::NotYourInteraction(request.player_id));
            }
            let answer = request.validate(&response).map_err(Rejection::InvalidResponse)?;
            state.interaction = None;
            debug!(%id, title = %request.title, "interaction answered");

            let source = request.source;
            let mut ctx =
                EffectContext::new(state, catalog, source, request.source_card.clone()).with_reversed(request.reversed);
            match &request.continuation {
                Continuation::Card { card_id, .. } => {
                    match catalog.hooks(*card_id).and_then(|h| h.interaction()) {
                        Some(resume) => resume(&mut ctx, &request.continuation, &answer),
                        None => ctx.log(format!("{card_id} has no follow-up for \"{}\"", request.title)),
                    }
                }
                Continuation::MarkChoice { amount } => {
                    if answer.value() == Some(0) {
                        ctx.heal(source, *amount);
                    } else {
                        ctx.damage(source.opponent(), *amount, false);
                    }
                }
                Continuation::QuestReward { rewards } => {
                    let index = answer.value().and_then(|v| usize::try_from(v).ok()).unwrap_or(0);
                    if let Some(reward) = rewards.get(index).cloned() {
                        ctx.grant_reward(source, reward);
                    }
                }
            }
            Ok(())
        })
    }

    /// Run the active effect's hook and clear it.
    pub fn dismiss_active_effect(&mut self) -> Result<(), Rejection> {
        self.transact(|state, catalog| {
            Self::guard_open(state)?;
            if state.interaction.is_some() {
                return Err(Rejection::InteractionPending);
            }
            let effect = state.active_effect.take().ok_or(Rejection::NoActiveEffect)?;
            if let Some(hook) = catalog.hooks(effect.card.card_id()).and_then(|h| h.get(effect.kind.hook())) {
                let mut ctx = EffectContext::new(state, catalog, effect.player_id, Some(effect.card));
                hook(&mut ctx);
            }
            Ok(())
        })
    }

    /// Drain transient presentation events.
    pub fn take_visual_events(&mut self) -> Vec<VisualEvent> {
        let events: Vec<VisualEvent> = self.state().visual_events.iter().cloned().collect();
        if events.is_empty() {
            return events;
        }
        let _ = self.transact(|state, _| {
            state.visual_events.clear();
            Ok(())
        });
        events
    }
}
