//! The shared field slot.
//!
//! One persistent card may occupy the field. Its passive behavior is the
//! [`FieldProfile`] on its definition and is live only while `active` holds.
//! Activation is a predicate over both players' hp and is recomputed after
//! every stat change, so a field can wake up or go dormant mid-resolution.
//!
//! ## Lifecycle
//!
//! - `set_field` discards any current occupant (treasures to the vault,
//!   entry buff reverted) and installs the new card with its entry buff.
//! - `discard_field` does the same without a replacement; it is a no-op on an
//!   empty field.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::cards::{Card, FieldActivation, FieldProfile, FieldPulse};
use crate::core::{Match, PlayerId, VisualEvent};
use crate::effects::EffectContext;

/// The card occupying the field slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldState {
    pub card: Card,
    pub owner: PlayerId,
    /// Per-card accumulator; discard-threshold fields count discards here.
    pub counter: u32,
    pub active: bool,
    /// The next drawn card is still to be substituted.
    pub substitute_pending: bool,
}

impl FieldState {
    #[must_use]
    pub fn profile(&self) -> Option<&FieldProfile> {
        self.card.definition.field.as_ref()
    }
}

/// The occupying field's profile, only while it is active.
#[must_use]
pub fn active_profile(state: &Match) -> Option<&FieldProfile> {
    state
        .field
        .as_ref()
        .filter(|f| f.active)
        .and_then(FieldState::profile)
}

/// The occupying field's profile regardless of activation.
#[must_use]
pub fn profile(state: &Match) -> Option<&FieldProfile> {
    state.field.as_ref().and_then(FieldState::profile)
}

fn predicate_holds(state: &Match, field: &FieldState) -> bool {
    let owner = state.player(field.owner).hp;
    let opponent = state.player(field.owner.opponent()).hp;
    match field.profile().map(|p| p.activation).unwrap_or_default() {
        FieldActivation::Always => true,
        FieldActivation::OwnerHpAtLeastDoubleOpponent => owner >= opponent.saturating_mul(2),
        FieldActivation::OwnerHpAtMost(limit) => owner <= limit,
    }
}

/// Re-evaluate the field's activation predicate and flip `active` if needed.
pub fn recompute(state: &mut Match) {
    let Some(field) = &state.field else {
        return;
    };
    let active = predicate_holds(state, field);
    if active == field.active {
        return;
    }
    let name = field.card.name().to_string();
    if let Some(field) = state.field.as_mut() {
        field.active = active;
    }
    trace!(field = %name, active, "field activation changed");
    state.log(if active {
        format!("{name} awakens")
    } else {
        format!("{name} falls dormant")
    });
    state.emit(VisualEvent::FieldChanged);
}

/// Take the occupant out of the field, reverting its entry buff.
fn take(state: &mut Match) -> Option<(PlayerId, Card)> {
    let field = state.field.take()?;
    let buff = field.profile().map_or(0, |p| p.entry_atk_buff);
    if buff != 0 {
        state.player_mut(field.owner).atk -= buff;
    }
    state.emit(VisualEvent::FieldChanged);
    Some((field.owner, field.card))
}

/// Discard the current field into its owner's discard pile (vault for
/// treasures). Idempotent on an empty field.
pub fn discard_field(state: &mut Match) {
    let Some((owner, card)) = take(state) else {
        return;
    };
    state.log(format!("{} leaves the field", card.name()));
    state.player_mut(owner).bury(card);
}

/// Remove the current field without burying it.
pub(crate) fn destroy_field(state: &mut Match) -> Option<Card> {
    take(state).map(|(_, card)| card)
}

/// Install `card` as the field for `owner`, replacing any occupant.
///
/// The card is detached from whatever zone holds it first. With
/// `activate_immediately` the predicate is evaluated now; otherwise the field
/// starts dormant until the next recomputation.
pub fn set_field(state: &mut Match, owner: PlayerId, card: Card, activate_immediately: bool) {
    let _ = state.detach(card.instance_id);
    discard_field(state);

    let profile = card.definition.field.clone().unwrap_or_default();
    if profile.entry_atk_buff != 0 {
        state.player_mut(owner).atk += profile.entry_atk_buff;
    }
    let owner_name = state.player(owner).name.clone();
    state.log(format!("{owner_name} sets {} as the field", card.name()));
    let mut field = FieldState {
        card,
        owner,
        counter: 0,
        active: false,
        substitute_pending: profile.substitute_next_draw,
    };
    if activate_immediately {
        field.active = predicate_holds(state, &field);
    }
    state.field = Some(field);
    state.emit(VisualEvent::FieldChanged);
}

impl EffectContext<'_> {
    /// Install `card` as the field, owned by the source player.
    pub fn set_field(&mut self, card: Card, activate_immediately: bool) {
        let owner = self.source();
        set_field(self.state_mut(), owner, card, activate_immediately);
    }

    pub fn discard_field(&mut self) {
        discard_field(self.state_mut());
    }
}

/// Fire the field's end-of-turn pulse if it is active.
pub(crate) fn pulse(ctx: &mut EffectContext<'_>) {
    let Some(field) = ctx.snapshot().field.clone() else {
        return;
    };
    if !field.active {
        return;
    }
    let Some(pulse) = field.profile().and_then(|p| p.end_of_turn) else {
        return;
    };
    let owner = field.owner;
    let mut ctx = ctx.nested(owner, Some(field.card.clone())).with_reversed(false);
    ctx.log(format!("{} pulses", field.card.name()));
    match pulse {
        FieldPulse::DamageOpponent(amount) => {
            ctx.damage(owner.opponent(), amount, false);
        }
        FieldPulse::HealOwner(amount) => ctx.heal(owner, amount),
        FieldPulse::DrawOwner(count) => {
            ctx.draw(owner, count, false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardDefinition, CardId, InstanceId, Suit};
    use crate::demo;

    fn field_card(id: u32, profile: FieldProfile) -> Card {
        Card::new(
            InstanceId(id),
            CardDefinition::new(CardId::new(id), format!("Field{id}"), Suit::Neutral, 5).with_field(profile),
        )
    }

    #[test]
    fn test_entry_buff_applied_and_reverted() {
        let mut m = demo::empty_match();
        let profile = FieldProfile {
            entry_atk_buff: 3,
            ..FieldProfile::default()
        };
        set_field(&mut m, PlayerId::ONE, field_card(90, profile), true);
        assert_eq!(m.player(PlayerId::ONE).atk, 5);
        assert!(m.field.as_ref().unwrap().active);

        discard_field(&mut m);
        assert_eq!(m.player(PlayerId::ONE).atk, 2);
        assert_eq!(m.player(PlayerId::ONE).discard_pile.len(), 1);
        assert!(m.field.is_none());
    }

    #[test]
    fn test_replacing_discards_old_field() {
        let mut m = demo::empty_match();
        set_field(&mut m, PlayerId::ONE, field_card(90, FieldProfile::default()), true);
        set_field(&mut m, PlayerId::TWO, field_card(91, FieldProfile::default()), true);

        assert_eq!(m.field.as_ref().unwrap().owner, PlayerId::TWO);
        assert_eq!(m.player(PlayerId::ONE).discard_pile[0].instance_id, InstanceId(90));
    }

    #[test]
    fn test_treasure_field_goes_to_vault() {
        let mut m = demo::empty_match();
        let mut card = field_card(92, FieldProfile::default());
        card.definition.keywords.treasure = true;
        set_field(&mut m, PlayerId::TWO, card, true);
        discard_field(&mut m);

        assert!(m.player(PlayerId::TWO).discard_pile.is_empty());
        assert_eq!(m.player(PlayerId::TWO).vault.len(), 1);
    }

    #[test]
    fn test_discard_empty_field_is_noop() {
        let mut m = demo::empty_match();
        let logs = m.logs.len();
        discard_field(&mut m);
        assert_eq!(m.logs.len(), logs);
    }

    #[test]
    fn test_recompute_flips_on_hp() {
        let mut m = demo::empty_match();
        let profile = FieldProfile {
            activation: FieldActivation::OwnerHpAtMost(10),
            ..FieldProfile::default()
        };
        set_field(&mut m, PlayerId::ONE, field_card(93, profile), true);
        assert!(!m.field.as_ref().unwrap().active);

        m.player_mut(PlayerId::ONE).hp = 10;
        recompute(&mut m);
        assert!(m.field.as_ref().unwrap().active);
        assert_eq!(m.logs[0].message, "Field93 awakens");
    }

    #[test]
    fn test_deferred_activation() {
        let mut m = demo::empty_match();
        set_field(&mut m, PlayerId::ONE, field_card(94, FieldProfile::default()), false);
        assert!(!m.field.as_ref().unwrap().active);

        recompute(&mut m);
        assert!(m.field.as_ref().unwrap().active);
    }
}
