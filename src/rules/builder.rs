//! Match setup.

use tracing::debug;

use crate::cards::{Card, CardCatalog, CardId};
use crate::core::{Match, MatchConfig, PlayerId, PlayerMap, PlayerState};
use crate::effects::EffectContext;
use crate::error::BuildError;

/// Assembles a fresh [`Match`] from a config and two deck lists.
///
/// ```
/// use duel_engine::core::{MatchConfig, Phase, PlayerId};
/// use duel_engine::demo;
/// use duel_engine::rules::MatchBuilder;
///
/// let catalog = demo::catalog();
/// let state = MatchBuilder::new(&catalog)
///     .config(MatchConfig::default().seed(3))
///     .deck(PlayerId::ONE, demo::deck())
///     .deck(PlayerId::TWO, demo::deck())
///     .build()
///     .unwrap();
///
/// assert_eq!(state.phase, Phase::Draw);
/// assert_eq!(state.player(PlayerId::ONE).deck.len(), demo::deck().len());
/// ```
pub struct MatchBuilder<'a> {
    catalog: &'a CardCatalog,
    config: MatchConfig,
    decks: PlayerMap<Vec<CardId>>,
}

impl<'a> MatchBuilder<'a> {
    #[must_use]
    pub fn new(catalog: &'a CardCatalog) -> Self {
        Self {
            catalog,
            config: MatchConfig::default(),
            decks: PlayerMap::with_default(),
        }
    }

    #[must_use]
    pub fn config(mut self, config: MatchConfig) -> Self {
        self.config = config;
        self
    }

    /// Deck list for one player, top card first before shuffling.
    #[must_use]
    pub fn deck(mut self, player: PlayerId, cards: Vec<CardId>) -> Self {
        self.decks[player] = cards;
        self
    }

    /// Build the match: allocate instances, shuffle decks, deal opening hands.
    pub fn build(self) -> Result<Match, BuildError> {
        let config = self.config;
        let players = PlayerMap::new(|id| {
            PlayerState::new(
                id,
                config.player_names[id.index()].clone(),
                config.starting_hp,
                config.starting_atk,
                config.max_hand_size,
            )
        });
        let mut state = Match::new(players, config.mode, config.marks, config.seed);

        for player in PlayerId::both() {
            let mut cards = Vec::with_capacity(self.decks[player].len());
            for &card_id in &self.decks[player] {
                let definition = self.catalog.get(card_id).ok_or(BuildError::UnknownCard(card_id))?;
                cards.push(Card::new(state.alloc_instance(), definition.clone()));
            }
            state.rng.shuffle(&mut cards);
            state.player_mut(player).deck = cards.into_iter().collect();
        }
        debug!(seed = config.seed, "match built");

        if config.opening_hand > 0 {
            for player in PlayerId::both() {
                let mut ctx = EffectContext::new(&mut state, self.catalog, player, None).with_reversed(false);
                ctx.draw(player, config.opening_hand, false);
            }
        }
        state.log("Turn 1 begins");
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo;

    #[test]
    fn test_instances_are_unique() {
        let catalog = demo::catalog();
        let state = MatchBuilder::new(&catalog)
            .deck(PlayerId::ONE, demo::deck())
            .deck(PlayerId::TWO, demo::deck())
            .build()
            .unwrap();

        let mut ids: Vec<_> = PlayerId::both()
            .flat_map(|p| state.player(p).deck.iter().map(|c| c.instance_id).collect::<Vec<_>>())
            .collect();
        let total = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }

    #[test]
    fn test_same_seed_same_decks() {
        let catalog = demo::catalog();
        let build = || {
            MatchBuilder::new(&catalog)
                .config(MatchConfig::default().seed(11))
                .deck(PlayerId::ONE, demo::deck())
                .build()
                .unwrap()
        };
        assert_eq!(build().player(PlayerId::ONE).deck, build().player(PlayerId::ONE).deck);
    }

    #[test]
    fn test_opening_hand() {
        let catalog = demo::catalog();
        let state = MatchBuilder::new(&catalog)
            .config(MatchConfig::default().opening_hand(3))
            .deck(PlayerId::ONE, demo::deck())
            .deck(PlayerId::TWO, demo::deck())
            .build()
            .unwrap();

        assert_eq!(state.player(PlayerId::ONE).hand.len(), 3);
        assert_eq!(state.player(PlayerId::TWO).hand.len(), 3);
    }

    #[test]
    fn test_unknown_card_is_rejected() {
        let catalog = demo::catalog();
        let err = MatchBuilder::new(&catalog)
            .deck(PlayerId::ONE, vec![CardId::new(9999)])
            .build()
            .unwrap_err();
        assert_eq!(err, BuildError::UnknownCard(CardId::new(9999)));
    }
}
