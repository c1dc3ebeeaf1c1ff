//! Effect primitives exercised through a running match.

use std::sync::Arc;

use duel_engine::cards::{
    CardCatalog, CardDefinition, CardId, FieldActivation, FieldProfile, FieldPulse, HookSet, InstanceId,
    Suit,
};
use duel_engine::core::{DelayedEffect, DelayedKind, MatchConfig, Phase, PlayerId};
use duel_engine::effects::ClashOutcome;
use duel_engine::quests::{Quest, QuestReward, QuestTrigger};
use duel_engine::{Engine, MatchBuilder, Rejection, Step};

const STRIKE: CardId = CardId::new(1);
const MEND: CardId = CardId::new(2);
const GROVE: CardId = CardId::new(3);
const SUMMIT: CardId = CardId::new(4);

fn catalog() -> CardCatalog {
    let mut catalog = CardCatalog::new();
    catalog.register(
        CardDefinition::new(STRIKE, "Strike", Suit::Spades, 3),
        HookSet::new().on_reveal(|ctx| {
            let foe = ctx.source().opponent();
            ctx.damage(foe, 5, false);
        }),
    );
    catalog.register(
        CardDefinition::new(MEND, "Mend", Suit::Hearts, 5),
        HookSet::new().on_reveal(|ctx| ctx.heal(ctx.source(), 4)),
    );
    catalog.register(
        CardDefinition::new(GROVE, "Grove", Suit::Neutral, 6).with_field(FieldProfile {
            end_of_turn: Some(FieldPulse::DamageOpponent(3)),
            ..FieldProfile::default()
        }),
        HookSet::new().on_reveal(|ctx| {
            if let Some(card) = ctx.card().cloned() {
                ctx.set_field(card, true);
            }
        }),
    );
    catalog.register(
        CardDefinition::new(SUMMIT, "Summit", Suit::Neutral, 8).with_field(FieldProfile {
            activation: FieldActivation::OwnerHpAtLeastDoubleOpponent,
            ..FieldProfile::default()
        }),
        HookSet::new(),
    );
    catalog
}

/// An engine waiting for the first commits.
fn engine(first: CardId, second: CardId) -> Engine {
    let catalog = catalog();
    let state = MatchBuilder::new(&catalog)
        .config(MatchConfig::default().seed(3))
        .deck(PlayerId::ONE, vec![first; 12])
        .deck(PlayerId::TWO, vec![second; 12])
        .build()
        .unwrap();
    let mut engine = Engine::new(Arc::new(catalog), state);
    assert_eq!(engine.run(), Step::AwaitingCommits);
    engine
}

fn first_in_hand(engine: &Engine, player: PlayerId) -> InstanceId {
    engine.state().player(player).hand[0].instance_id
}

fn play_turn(engine: &mut Engine) -> Step {
    for player in PlayerId::both() {
        let id = first_in_hand(engine, player);
        engine.set_card(player, Some(id)).unwrap();
    }
    engine.run()
}

// =============================================================================
// Field
// =============================================================================

#[test]
fn test_field_card_stays_and_pulses() {
    let mut engine = engine(GROVE, MEND);

    assert_eq!(play_turn(&mut engine), Step::AwaitingCommits);

    let state = engine.state();
    let field = state.field.as_ref().unwrap();
    assert_eq!(field.owner, PlayerId::ONE);
    assert!(field.active);
    assert!(state.player(PlayerId::ONE).discard_pile.is_empty());
    assert_eq!(state.player(PlayerId::ONE).hp, 38);
    // Rule damage, Mend, then the end-of-turn pulse.
    assert_eq!(state.player(PlayerId::TWO).hp, 39);
}

#[test]
fn test_new_field_replaces_old() {
    let mut engine = engine(GROVE, GROVE);

    play_turn(&mut engine);

    // Both set Grove; ties resolve player 1 first, so player 2's sticks.
    let state = engine.state();
    assert_eq!(state.field.as_ref().unwrap().owner, PlayerId::TWO);
    assert_eq!(state.player(PlayerId::ONE).discard_pile.len(), 1);
}

#[test]
fn test_field_wakes_the_moment_damage_meets_its_condition() {
    let mut engine = engine(SUMMIT, MEND);
    let summit = first_in_hand(&engine, PlayerId::ONE);
    engine
        .with_context(PlayerId::ONE, |ctx| {
            let card = ctx.snapshot().player(PlayerId::ONE).hand_card(summit).cloned();
            if let Some(card) = card {
                ctx.set_field(card, false);
            }
        })
        .unwrap();
    assert!(!engine.state().field.as_ref().unwrap().active);

    // 40 against 21 does not hold yet; 40 against 20 does.
    engine.with_context(PlayerId::ONE, |ctx| ctx.damage(PlayerId::TWO, 19, false)).unwrap();
    assert!(!engine.state().field.as_ref().unwrap().active);

    engine.with_context(PlayerId::ONE, |ctx| ctx.damage(PlayerId::TWO, 1, false)).unwrap();

    let state = engine.state();
    assert_eq!(state.phase, Phase::Set);
    assert_eq!(state.player(PlayerId::TWO).hp, 20);
    assert!(state.field.as_ref().unwrap().active);
    assert_eq!(state.logs.back().unwrap().message, "Summit awakens");
}

// =============================================================================
// Targeting
// =============================================================================

#[test]
fn test_reversed_source_hits_itself() {
    let mut engine = engine(STRIKE, MEND);
    engine
        .with_context(PlayerId::ONE, |ctx| ctx.modify(PlayerId::ONE, |p| p.status.reversed = true))
        .unwrap();

    let dealt = engine
        .with_context(PlayerId::ONE, |ctx| ctx.damage(PlayerId::TWO, 5, false))
        .unwrap();

    assert_eq!(dealt, 5);
    assert_eq!(engine.state().player(PlayerId::ONE).hp, 35);
    assert_eq!(engine.state().player(PlayerId::TWO).hp, 40);
}

#[test]
fn test_clash_prefers_lower_rank() {
    let mut engine = engine(STRIKE, MEND);

    let mine = engine.with_context(PlayerId::ONE, |ctx| ctx.clash()).unwrap();
    let theirs = engine.with_context(PlayerId::TWO, |ctx| ctx.clash()).unwrap();

    assert_eq!(mine, ClashOutcome::Win);
    assert_eq!(theirs, ClashOutcome::Lose);
}

// =============================================================================
// Hand manipulation
// =============================================================================

#[test]
fn test_locked_card_cannot_be_set_until_it_thaws() {
    let mut engine = engine(STRIKE, MEND);
    let locked = engine
        .with_context(PlayerId::TWO, |ctx| ctx.lock(PlayerId::ONE, 1, 1))
        .unwrap();
    assert_eq!(locked.len(), 1);
    let id = locked[0];

    assert_eq!(engine.set_card(PlayerId::ONE, Some(id)).unwrap_err(), Rejection::CardLocked(id));

    let other = engine
        .state()
        .player(PlayerId::ONE)
        .hand
        .iter()
        .find(|c| c.instance_id != id)
        .unwrap()
        .instance_id;
    engine.set_card(PlayerId::ONE, Some(other)).unwrap();
    let mend = first_in_hand(&engine, PlayerId::TWO);
    engine.set_card(PlayerId::TWO, Some(mend)).unwrap();
    engine.run();

    let card = engine.state().player(PlayerId::ONE).hand_card(id).unwrap();
    assert!(!card.is_locked());
}

#[test]
fn test_seize_moves_card_between_hands() {
    let mut engine = engine(STRIKE, MEND);
    let target = first_in_hand(&engine, PlayerId::TWO);

    let seized = engine.with_context(PlayerId::ONE, |ctx| ctx.seize(target)).unwrap();

    assert!(seized);
    assert!(engine.state().player(PlayerId::ONE).hand_card(target).is_some());
    assert_eq!(engine.state().player(PlayerId::TWO).hand.len(), 4);

    let again = engine.with_context(PlayerId::ONE, |ctx| ctx.seize(target)).unwrap();
    assert!(!again);
}

// =============================================================================
// Delayed effects and quests
// =============================================================================

#[test]
fn test_delayed_damage_matures_at_cleanup() {
    let mut engine = engine(MEND, MEND);
    engine
        .with_context(PlayerId::ONE, |ctx| {
            ctx.schedule(DelayedEffect {
                turns: 1,
                target: PlayerId::TWO,
                kind: DelayedKind::Damage(4),
                label: "Fuse".to_string(),
            });
        })
        .unwrap();

    play_turn(&mut engine);

    // 40 - 2 rule damage + 4 Mend - 4 fuse.
    assert_eq!(engine.state().player(PlayerId::TWO).hp, 38);
    assert_eq!(engine.state().player(PlayerId::ONE).hp, 42);
    assert!(engine.state().player(PlayerId::ONE).delayed_effects.is_empty());
}

#[test]
fn test_suit_quest_completes_on_reveal() {
    let mut engine = engine(STRIKE, MEND);
    engine
        .with_context(PlayerId::ONE, |ctx| {
            ctx.add_quest(
                PlayerId::ONE,
                Quest::new("blades", QuestTrigger::PlaySuit(Suit::Spades), 1, QuestReward::AtkUp(2)),
            )
        })
        .unwrap();

    play_turn(&mut engine);

    let p1 = engine.state().player(PlayerId::ONE);
    assert!(p1.quests.is_empty());
    assert_eq!(p1.atk, 4);
}
