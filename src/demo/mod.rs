//! A small fixed catalog for docs, tests and quick experiments.
//!
//! Eight cards cover the hook points and keywords the engine knows about.
//! Nothing here is balanced.

use crate::cards::{
    CardCatalog, CardDefinition, CardId, FieldActivation, FieldProfile, FieldPulse, HookSet, Keywords, Suit,
};
use crate::core::{InstantWindow, Match, MatchConfig, MarkTuning, MatchMode, PlayerId, PlayerMap, PlayerState};
use crate::rules::MatchBuilder;
use crate::stack::{Answer, InputKind, InteractionOption};

pub const EMBER_LANCE: CardId = CardId::new(1);
pub const MENDING_DEW: CardId = CardId::new(2);
pub const MIRROR_VEIL: CardId = CardId::new(3);
pub const FORKED_PATH: CardId = CardId::new(4);
pub const TIDE_CALLER: CardId = CardId::new(5);
pub const QUIET_GROVE: CardId = CardId::new(6);
pub const CROWN_SHARD: CardId = CardId::new(7);
pub const WARDING_SIGIL: CardId = CardId::new(8);

/// The demo catalog.
#[must_use]
pub fn catalog() -> CardCatalog {
    let mut catalog = CardCatalog::new();

    catalog.register(
        CardDefinition::new(EMBER_LANCE, "Ember Lance", Suit::Spades, 4),
        HookSet::new().on_reveal(|ctx| {
            let foe = ctx.source().opponent();
            ctx.damage(foe, 3, false);
        }),
    );

    catalog.register(
        CardDefinition::new(MENDING_DEW, "Mending Dew", Suit::Hearts, 6),
        HookSet::new().on_reveal(|ctx| ctx.heal(ctx.source(), 4)),
    );

    catalog.register(
        CardDefinition::new(MIRROR_VEIL, "Mirror Veil", Suit::Diamonds, 2).with_keywords(Keywords {
            seize_proof: true,
            ..Keywords::default()
        }),
        HookSet::new().on_resolve_status(|ctx| {
            let foe = ctx.source().opponent();
            ctx.modify(foe, |p| p.status.reversed = true);
        }),
    );

    catalog.register(
        CardDefinition::new(FORKED_PATH, "Forked Path", Suit::Clubs, 5),
        HookSet::new()
            .on_reveal(|ctx| {
                let me = ctx.source();
                let options = InputKind::Options(vec![
                    InteractionOption::new("Strike for 4", 0),
                    InteractionOption::new("Draw 2", 1),
                ]);
                let _ = ctx.ask_card(me, "Choose a path", options, "path", Vec::new());
            })
            .on_interaction(|ctx, _, answer| {
                let me = ctx.source();
                match answer {
                    Answer::Option { value: 0, .. } => {
                        ctx.damage(me.opponent(), 4, false);
                    }
                    _ => {
                        ctx.draw(me, 2, false);
                    }
                }
            }),
    );

    catalog.register(
        CardDefinition::new(TIDE_CALLER, "Tide Caller", Suit::Hearts, 3),
        HookSet::new().on_draw(|ctx| ctx.heal(ctx.source(), 1)),
    );

    catalog.register(
        CardDefinition::new(QUIET_GROVE, "Quiet Grove", Suit::Neutral, 7).with_field(FieldProfile {
            activation: FieldActivation::OwnerHpAtMost(20),
            entry_atk_buff: 1,
            end_of_turn: Some(FieldPulse::HealOwner(2)),
            ..FieldProfile::default()
        }),
        HookSet::new().on_reveal(|ctx| {
            if let Some(card) = ctx.card().cloned() {
                ctx.set_field(card, true);
            }
        }),
    );

    catalog.register(
        CardDefinition::new(CROWN_SHARD, "Crown Shard", Suit::Neutral, 9).treasure(),
        HookSet::new().on_reveal(|ctx| ctx.add_atk(ctx.source(), 1)),
    );

    catalog.register(
        CardDefinition::new(WARDING_SIGIL, "Warding Sigil", Suit::Diamonds, 1),
        HookSet::new()
            .unsettable()
            .instant_when(|w| matches!(w, InstantWindow::BeforeReveal | InstantWindow::AfterReveal))
            .on_instant(|ctx| {
                let me = ctx.source();
                ctx.modify(me, |p| p.status.immune = true);
            }),
    );

    catalog
}

/// A twelve-card deck list drawing from the demo catalog.
#[must_use]
pub fn deck() -> Vec<CardId> {
    vec![
        EMBER_LANCE,
        EMBER_LANCE,
        EMBER_LANCE,
        MENDING_DEW,
        MENDING_DEW,
        MIRROR_VEIL,
        FORKED_PATH,
        TIDE_CALLER,
        TIDE_CALLER,
        QUIET_GROVE,
        CROWN_SHARD,
        WARDING_SIGIL,
    ]
}

/// Two players with default stats and empty zones.
#[must_use]
pub fn empty_match() -> Match {
    let config = MatchConfig::default();
    let players = PlayerMap::new(|id: PlayerId| {
        PlayerState::new(
            id,
            config.player_names[id.index()].clone(),
            config.starting_hp,
            config.starting_atk,
            config.max_hand_size,
        )
    });
    Match::new(players, MatchMode::Local, MarkTuning::default(), 0)
}

/// A freshly built match with demo decks for both players.
#[must_use]
pub fn started_match(catalog: &CardCatalog, seed: u64) -> Match {
    let built = MatchBuilder::new(catalog)
        .config(MatchConfig::default().seed(seed))
        .deck(PlayerId::ONE, deck())
        .deck(PlayerId::TWO, deck())
        .build();
    match built {
        Ok(state) => state,
        // Demo decks only list demo cards.
        Err(_) => empty_match(),
    }
}
