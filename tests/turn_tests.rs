//! Full-turn tests driven through the public `Engine` API.

use std::sync::Arc;

use duel_engine::cards::{CardCatalog, CardDefinition, CardId, HookSet, InstanceId, Suit};
use duel_engine::core::{InstantWindow, MatchConfig, MatchMode, MatchResult, Phase, PlayerId};
use duel_engine::stack::{InputKind, InteractionOption, InteractionResponse};
use duel_engine::{BlockReason, Engine, MatchBuilder, Rejection, Step};

const STRIKE: CardId = CardId::new(1);
const MEND: CardId = CardId::new(2);
const GAMBIT: CardId = CardId::new(3);
const TIDE: CardId = CardId::new(4);
const WARD: CardId = CardId::new(5);
const SURGE: CardId = CardId::new(6);

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
        CardDefinition::new(GAMBIT, "Gambit", Suit::Clubs, 4),
        HookSet::new()
            .on_reveal(|ctx| {
                let me = ctx.source();
                let options = InputKind::Options(vec![
                    InteractionOption::new("Strike", 0),
                    InteractionOption::new("Hold", 1),
                ]);
                let _ = ctx.ask_card(me, "Strike now?", options, "strike", vec![6]);
            })
            .on_interaction(|ctx, continuation, answer| {
                if answer.value() == Some(0) {
                    let amount = continuation.data().first().copied().unwrap_or(0) as i32;
                    let foe = ctx.source().opponent();
                    ctx.damage(foe, amount, false);
                }
            }),
    );
    catalog.register(
        CardDefinition::new(TIDE, "Tide", Suit::Hearts, 2),
        HookSet::new().on_draw(|ctx| ctx.heal(ctx.source(), 1)),
    );
    catalog.register(
        CardDefinition::new(WARD, "Ward", Suit::Diamonds, 1),
        HookSet::new()
            .unsettable()
            .instant_when(|w| w == InstantWindow::BeforeReveal)
            .on_instant(|ctx| {
                let me = ctx.source();
                ctx.modify(me, |p| p.status.immune = true);
            }),
    );
    catalog.register(
        CardDefinition::new(SURGE, "Surge", Suit::Clubs, 6),
        HookSet::new().on_draw(|ctx| {
            let me = ctx.source();
            ctx.modify(me, |p| {
                p.status.lifesteal = true;
                p.status.reflect = true;
            });
            ctx.draw(me, 1, false);
        }),
    );
    catalog
}

fn engine_with(config: MatchConfig, first: CardId, second: CardId) -> Engine {
    let catalog = catalog();
    let state = MatchBuilder::new(&catalog)
        .config(config)
        .deck(PlayerId::ONE, vec![first; 12])
        .deck(PlayerId::TWO, vec![second; 12])
        .build()
        .unwrap();
    Engine::new(Arc::new(catalog), state)
}

fn engine(first: CardId, second: CardId) -> Engine {
    engine_with(MatchConfig::default().seed(1), first, second)
}

fn first_in_hand(engine: &Engine, player: PlayerId) -> InstanceId {
    engine.state().player(player).hand[0].instance_id
}

fn commit_first(engine: &mut Engine, player: PlayerId) {
    let id = first_in_hand(engine, player);
    engine.set_card(player, Some(id)).unwrap();
}

// =============================================================================
// Basic turn
// =============================================================================

#[test]
fn test_first_turn_reaches_set() {
    let mut engine = engine(STRIKE, MEND);

    assert_eq!(engine.run(), Step::AwaitingCommits);

    let state = engine.state();
    assert_eq!(state.phase, Phase::Set);
    assert_eq!(state.instant_window, None);
    assert_eq!(state.player(PlayerId::ONE).hand.len(), 5);
    assert_eq!(state.player(PlayerId::TWO).hand.len(), 5);
}

#[test]
fn test_full_turn_resolves_in_rank_order() {
    let mut engine = engine(STRIKE, MEND);
    engine.run();

    commit_first(&mut engine, PlayerId::ONE);
    commit_first(&mut engine, PlayerId::TWO);
    assert_eq!(engine.run(), Step::AwaitingCommits);

    let state = engine.state();
    // Rule damage 2 each, then Strike (rank 3) before Mend (rank 5).
    assert_eq!(state.player(PlayerId::ONE).hp, 38);
    assert_eq!(state.player(PlayerId::TWO).hp, 37);
    assert_eq!(state.turn_count, 2);
    assert_eq!(state.player(PlayerId::ONE).discard_pile.len(), 1);
    assert_eq!(state.player(PlayerId::ONE).hand.len(), 5);
    assert!(state.player(PlayerId::ONE).field_slot.is_none());
    assert!(state.logs.iter().any(|l| l.message == "Turn 2 begins"));
}

#[test]
fn test_every_commit_bumps_the_version() {
    let mut engine = engine(STRIKE, MEND);
    let before = engine.store().version();

    assert_eq!(engine.step(), Step::Advanced);

    assert_eq!(engine.store().version(), before + 1);
}

// =============================================================================
// Commit rules
// =============================================================================

#[test]
fn test_commit_outside_set_is_rejected() {
    let mut engine = engine(STRIKE, MEND);
    let err = engine.set_card(PlayerId::ONE, None).unwrap_err();
    assert_eq!(err, Rejection::WrongPhase(Phase::Draw));
}

#[test]
fn test_must_commit_when_something_is_settable() {
    let mut engine = engine(STRIKE, MEND);
    engine.run();

    let err = engine.set_card(PlayerId::ONE, None).unwrap_err();
    assert_eq!(err, Rejection::MustCommit(PlayerId::ONE));

    let err = engine.set_card(PlayerId::ONE, Some(InstanceId(9999))).unwrap_err();
    assert_eq!(err, Rejection::CardNotFound(InstanceId(9999)));
}

#[test]
fn test_second_commit_is_rejected() {
    let mut engine = engine(STRIKE, MEND);
    engine.run();
    commit_first(&mut engine, PlayerId::ONE);

    let id = first_in_hand(&engine, PlayerId::ONE);
    let err = engine.set_card(PlayerId::ONE, Some(id)).unwrap_err();

    assert_eq!(err, Rejection::AlreadyCommitted(PlayerId::ONE));
    assert_eq!(engine.step(), Step::AwaitingCommits);
}

#[test]
fn test_rejection_only_adds_a_log_line() {
    let mut engine = engine(STRIKE, MEND);
    engine.run();
    let before = engine.state().clone();

    let err = engine.discard(PlayerId::ONE, &[]).unwrap_err();

    let after = engine.state();
    assert_eq!(err, Rejection::WrongPhase(Phase::Set));
    assert_eq!(after.logs.len(), before.logs.len() + 1);
    assert_eq!(after.logs[0].message, err.to_string());
    assert_eq!(after.player(PlayerId::ONE), before.player(PlayerId::ONE));
    assert_eq!(after.phase, before.phase);
}

#[test]
fn test_online_commit_is_redacted() {
    let mut engine = engine_with(MatchConfig::default().seed(1).mode(MatchMode::Online), STRIKE, MEND);
    engine.run();

    commit_first(&mut engine, PlayerId::ONE);

    assert_eq!(engine.state().logs[0].message, "Player 1 commits a card");
}

// =============================================================================
// Suspension
// =============================================================================

#[test]
fn test_draw_triggers_block_until_dismissed() {
    let mut engine = engine(TIDE, STRIKE);

    assert_eq!(engine.run(), Step::Blocked(BlockReason::ActiveEffect));
    assert_eq!(engine.state().pending_effects.len(), 4);

    let mut dismissed = 0;
    while engine.run() == Step::Blocked(BlockReason::ActiveEffect) {
        engine.dismiss_active_effect().unwrap();
        dismissed += 1;
    }

    assert_eq!(dismissed, 5);
    assert_eq!(engine.state().player(PlayerId::ONE).hp, 45);
    assert_eq!(engine.state().phase, Phase::Set);
    assert_eq!(engine.dismiss_active_effect().unwrap_err(), Rejection::NoActiveEffect);
}

#[test]
fn test_interaction_suspends_reveal_and_resumes() {
    let mut engine = engine(GAMBIT, MEND);
    engine.run();
    commit_first(&mut engine, PlayerId::ONE);
    commit_first(&mut engine, PlayerId::TWO);

    assert_eq!(engine.run(), Step::Blocked(BlockReason::Interaction));
    let request = engine.state().interaction.clone().unwrap();
    assert_eq!(request.player_id, PlayerId::ONE);
    // Mend (rank 5) has not resolved yet.
    assert_eq!(engine.state().player(PlayerId::TWO).hp, 38);

    let err = engine
        .respond(PlayerId::TWO, request.id, InteractionResponse::Option(0))
        .unwrap_err();
    assert_eq!(err, Rejection::NotYourInteraction(PlayerId::ONE));
    let err = engine
        .respond(PlayerId::ONE, request.id, InteractionResponse::Option(7))
        .unwrap_err();
    assert!(matches!(err, Rejection::InvalidResponse(_)));

    engine
        .respond(PlayerId::ONE, request.id, InteractionResponse::Option(0))
        .unwrap();
    assert_eq!(engine.state().player(PlayerId::TWO).hp, 32);

    assert_eq!(engine.run(), Step::AwaitingCommits);
    assert_eq!(engine.state().player(PlayerId::TWO).hp, 36);
    assert_eq!(engine.state().turn_count, 2);
}

// =============================================================================
// Instants and discard
// =============================================================================

#[test]
fn test_instant_in_before_reveal_window() {
    let mut engine = engine(STRIKE, WARD);
    engine.run();
    let ward = first_in_hand(&engine, PlayerId::TWO);

    assert_eq!(
        engine.play_instant(PlayerId::TWO, ward).unwrap_err(),
        Rejection::WrongPhase(Phase::Set)
    );
    assert_eq!(
        engine.set_card(PlayerId::TWO, Some(ward)).unwrap_err(),
        Rejection::CardCannotBeSet(ward)
    );
    engine.set_card(PlayerId::TWO, None).unwrap();
    commit_first(&mut engine, PlayerId::ONE);

    assert_eq!(engine.step(), Step::Advanced);
    assert_eq!(engine.state().instant_window, Some(InstantWindow::BeforeReveal));
    engine.play_instant(PlayerId::TWO, ward).unwrap();
    assert!(engine.state().player(PlayerId::TWO).status.immune);
    assert_eq!(engine.state().player(PlayerId::TWO).discard_pile.len(), 1);

    assert_eq!(engine.run(), Step::AwaitingCommits);
    assert_eq!(engine.state().player(PlayerId::TWO).hp, 40);
    assert_eq!(engine.state().player(PlayerId::ONE).hp, 38);
    assert!(!engine.state().player(PlayerId::TWO).status.immune);
}

#[test]
fn test_hand_over_limit_blocks_discard_phase() {
    let mut engine = engine(STRIKE, MEND);
    engine.run();
    let drawn = engine
        .with_context(PlayerId::ONE, |ctx| ctx.draw(PlayerId::ONE, 2, false).len())
        .unwrap();
    assert_eq!(drawn, 2);
    commit_first(&mut engine, PlayerId::ONE);
    commit_first(&mut engine, PlayerId::TWO);

    assert_eq!(engine.run(), Step::Blocked(BlockReason::HandOverLimit));
    assert_eq!(engine.state().phase, Phase::Discard);

    let extra = first_in_hand(&engine, PlayerId::ONE);
    assert_eq!(engine.discard(PlayerId::ONE, &[extra]).unwrap(), 1);

    assert_eq!(engine.run(), Step::AwaitingCommits);
    assert_eq!(engine.state().player(PlayerId::ONE).discard_pile.len(), 2);
}

#[test]
fn test_draw_chain_overflow_blocks_then_next_turn_starts_clean() {
    let mut engine = engine(SURGE, MEND);

    // Every Surge drawn pulls the next one until the deck runs dry.
    let mut dismissed = 0;
    while engine.run() == Step::Blocked(BlockReason::ActiveEffect) {
        engine.dismiss_active_effect().unwrap();
        dismissed += 1;
    }
    assert_eq!(dismissed, 12);
    let p1 = engine.state().player(PlayerId::ONE);
    assert_eq!(p1.hand.len(), 12);
    assert!(p1.deck.is_empty());
    assert!(p1.status.lifesteal);
    let turn = engine.state().turn_count;

    commit_first(&mut engine, PlayerId::ONE);
    commit_first(&mut engine, PlayerId::TWO);
    assert_eq!(engine.run(), Step::Blocked(BlockReason::HandOverLimit));
    assert_eq!(engine.state().phase, Phase::Discard);
    assert_eq!(engine.state().turn_count, turn);
    assert!(engine.state().player(PlayerId::ONE).status.lifesteal);

    let extra: Vec<InstanceId> = engine
        .state()
        .player(PlayerId::ONE)
        .hand
        .iter()
        .take(6)
        .map(|c| c.instance_id)
        .collect();
    assert_eq!(engine.discard(PlayerId::ONE, &extra).unwrap(), 6);

    assert_eq!(engine.run(), Step::AwaitingCommits);
    let state = engine.state();
    assert_eq!(state.turn_count, turn + 1);
    let p1 = state.player(PlayerId::ONE);
    assert_eq!(p1.hand.len(), 5);
    assert!(!p1.status.lifesteal);
    assert!(!p1.status.reflect);
}

// =============================================================================
// Game over
// =============================================================================

#[test]
fn test_lethal_reveal_ends_the_match() {
    let mut engine = engine(STRIKE, STRIKE);
    engine.run();
    engine
        .with_context(PlayerId::ONE, |ctx| ctx.modify(PlayerId::TWO, |p| p.hp = 3))
        .unwrap();
    commit_first(&mut engine, PlayerId::ONE);
    commit_first(&mut engine, PlayerId::TWO);

    assert_eq!(engine.run(), Step::Finished);

    let state = engine.state();
    assert_eq!(state.result, Some(MatchResult::Winner(PlayerId::ONE)));
    assert_eq!(state.phase, Phase::GameOver);
    assert_eq!(engine.set_card(PlayerId::ONE, None).unwrap_err(), Rejection::GameOver);
}

#[test]
fn test_both_falling_is_a_draw() {
    let mut engine = engine(STRIKE, STRIKE);
    engine.run();
    engine
        .with_context(PlayerId::ONE, |ctx| {
            ctx.modify(PlayerId::ONE, |p| p.hp = 1);
            ctx.modify(PlayerId::TWO, |p| p.hp = 1);
        })
        .unwrap();
    commit_first(&mut engine, PlayerId::ONE);
    commit_first(&mut engine, PlayerId::TWO);

    assert_eq!(engine.run(), Step::Finished);
    assert_eq!(engine.state().result, Some(MatchResult::Draw));
}

#[test]
fn test_fall_to_rule_damage_is_final_despite_later_heal() {
    let mut engine = engine(MEND, MEND);
    engine.run();
    engine
        .with_context(PlayerId::ONE, |ctx| ctx.modify(PlayerId::TWO, |p| p.hp = 1))
        .unwrap();
    commit_first(&mut engine, PlayerId::ONE);
    commit_first(&mut engine, PlayerId::TWO);

    assert_eq!(engine.run(), Step::Finished);

    let state = engine.state();
    assert_eq!(state.result, Some(MatchResult::Winner(PlayerId::ONE)));
    assert_eq!(state.phase, Phase::GameOver);
    assert_eq!(state.instant_window, None);
    assert_eq!(state.player(PlayerId::TWO).hp, -1);
    assert!(state.logs.iter().all(|l| !l.message.contains("heals")));
    assert_eq!(state.turn_count, 1);
}
