//! Effect context: the only handle hooks get on the match.
//!
//! An `EffectContext` wraps the draft of the state being built for the current
//! commit together with who is acting, with which card, and whether reversal
//! is in force. Every primitive reads the draft at call time, so an effect
//! always sees what earlier effects in the same resolution already did.
//!
//! The primitives themselves are spread over sibling modules
//! (`damage`, `zones`) and over `field` and `quests`.

use tracing::warn;

use crate::cards::{Card, CardCatalog};
use crate::core::{Match, MatchMode, PlayerId, PlayerState, VisualEvent};
use crate::error::Rejection;
use crate::field;
use crate::stack::{Continuation, InputKind, InteractionId, InteractionRequest, Prompt};

use super::targeting::resolve_target;

/// Handle passed to every hook and primitive.
pub struct EffectContext<'a> {
    state: &'a mut Match,
    catalog: &'a CardCatalog,
    source: PlayerId,
    card: Option<Card>,
    reversed: bool,
}

impl<'a> EffectContext<'a> {
    /// Create a context acting for `source`.
    ///
    /// Reversal follows the source's `reversed` flag; treasures are immune
    /// to it.
    pub fn new(state: &'a mut Match, catalog: &'a CardCatalog, source: PlayerId, card: Option<Card>) -> Self {
        let treasure = card.as_ref().is_some_and(Card::is_treasure);
        let reversed = state.player(source).status.reversed && !treasure;
        Self {
            state,
            catalog,
            source,
            card,
            reversed,
        }
    }

    /// Override the reversal flag (builder pattern).
    #[must_use]
    pub fn with_reversed(mut self, reversed: bool) -> Self {
        self.reversed = reversed;
        self
    }

    // === Accessors ===

    #[must_use]
    pub fn source(&self) -> PlayerId {
        self.source
    }

    /// The card whose effect is running.
    #[must_use]
    pub fn card(&self) -> Option<&Card> {
        self.card.as_ref()
    }

    #[must_use]
    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    #[must_use]
    pub fn mode(&self) -> MatchMode {
        self.state.mode
    }

    /// Read-only view of the match as it stands right now.
    #[must_use]
    pub fn snapshot(&self) -> &Match {
        self.state
    }

    #[must_use]
    pub fn catalog(&self) -> &'a CardCatalog {
        self.catalog
    }

    /// Where an effect aimed at `intended` actually lands.
    #[must_use]
    pub fn resolve(&self, intended: PlayerId) -> PlayerId {
        resolve_target(self.source, self.reversed, intended)
    }

    pub(crate) fn state_mut(&mut self) -> &mut Match {
        self.state
    }

    /// A context for another actor over the same draft.
    pub(crate) fn nested(&mut self, source: PlayerId, card: Option<Card>) -> EffectContext<'_> {
        EffectContext::new(self.state, self.catalog, source, card)
    }

    // === Feed ===

    pub fn log(&mut self, message: impl Into<String>) {
        self.state.log(message);
    }

    /// Log a message that would reveal hidden cards.
    ///
    /// Online matches get the redacted `public` text.
    pub fn log_hidden(&mut self, public: impl Into<String>, private: impl Into<String>) {
        self.state.log_hidden(public, private);
    }

    pub(crate) fn name_of(&self, player: PlayerId) -> String {
        self.state.player(player).name.clone()
    }

    // === Stats ===

    /// Apply an arbitrary transform to one player's state.
    ///
    /// After the transform: a heal on a player under prevent-healing is rolled
    /// back; otherwise a heal on a player holding a healing doubler is doubled
    /// and the doubler discards itself. Field activation is recomputed last.
    pub fn modify(&mut self, target: PlayerId, f: impl FnOnce(&mut PlayerState)) {
        let target = self.resolve(target);
        self.modify_resolved(target, f);
    }

    pub(crate) fn modify_resolved(&mut self, target: PlayerId, f: impl FnOnce(&mut PlayerState)) {
        let before_hp = self.state.player(target).hp;
        let blocked = self.state.player(target).status.prevent_healing;
        let mut next = self.state.player(target).clone();
        f(&mut next);

        let healed = next.hp - before_hp;
        if healed > 0 {
            if blocked {
                next.hp = before_hp;
                self.state.log(format!("{}'s healing is blocked", next.name));
            } else if let Some(pos) = next
                .hand
                .iter()
                .position(|c| c.definition.keywords.doubles_healing)
            {
                next.hp += healed;
                let doubler = next.hand.remove(pos);
                self.state.log(format!(
                    "{} doubles {}'s healing to {}",
                    doubler.name(),
                    next.name,
                    healed * 2
                ));
                next.bury(doubler);
            }
        }

        let delta = next.hp - before_hp;
        *self.state.player_mut(target) = next;
        if delta > 0 {
            self.state.emit(VisualEvent::Heal { player: target, amount: delta });
        }
        field::recompute(self.state);
    }

    /// Heal a player. Goes through [`modify`](Self::modify), so healing rules apply.
    pub fn heal(&mut self, target: PlayerId, amount: i32) {
        if amount <= 0 {
            return;
        }
        let target = self.resolve(target);
        let name = self.name_of(target);
        self.state.log(format!("{name} heals {amount}"));
        self.modify_resolved(target, |p| p.hp += amount);
    }

    /// Change a player's atk.
    pub fn add_atk(&mut self, target: PlayerId, delta: i32) {
        let target = self.resolve(target);
        self.modify_resolved(target, |p| p.atk += delta);
    }

    // === Interactions ===

    /// Install an interaction request.
    ///
    /// Fails, logs and leaves the match unchanged when one is already open.
    pub fn ask(&mut self, prompt: Prompt) -> Result<InteractionId, Rejection> {
        if let Some(open) = &self.state.interaction {
            warn!(open = %open.id, title = %prompt.title, "interaction requested while another is open");
            self.state
                .log(format!("\"{}\" cannot be asked while a decision is pending", prompt.title));
            return Err(Rejection::InteractionPending);
        }
        let id = self.state.alloc_interaction();
        self.state.interaction = Some(InteractionRequest {
            id,
            player_id: prompt.player_id,
            source: self.source,
            title: prompt.title,
            description: prompt.description,
            input: prompt.input,
            continuation: prompt.continuation,
            source_card: self.card.clone(),
            reversed: self.reversed,
        });
        Ok(id)
    }

    /// Ask `player` a question that resumes this card's `on_interaction`
    /// hook with `tag` and `data`.
    pub fn ask_card(
        &mut self,
        player: PlayerId,
        title: impl Into<String>,
        input: InputKind,
        tag: impl Into<String>,
        data: Vec<i64>,
    ) -> Result<InteractionId, Rejection> {
        let Some(card_id) = self.card.as_ref().map(Card::card_id) else {
            self.state.log("a decision was requested without a card to resume it");
            return Err(Rejection::NoSourceCard);
        };
        let continuation = Continuation::Card {
            card_id,
            tag: tag.into(),
            data,
        };
        self.ask(Prompt::new(player, title, input, continuation))
    }
}
