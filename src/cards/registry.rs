//! Card catalog: definitions plus their hook sets.
//!
//! The catalog is injected into the engine rather than imported globally, so
//! tests run against a small synthetic catalog. Registration order is kept
//! so random definition picks are reproducible from the match seed.

use rustc_hash::FxHashMap;

use super::definition::{CardDefinition, CardId};
use super::hooks::HookSet;
use crate::core::GameRng;

/// Registry of card definitions and behavior.
///
/// ## Example
///
/// ```
/// use duel_engine::cards::{CardCatalog, CardDefinition, CardId, HookSet, Suit};
///
/// let mut catalog = CardCatalog::new();
/// catalog.register(
///     CardDefinition::new(CardId::new(1), "Ember Lance", Suit::Spades, 4),
///     HookSet::new(),
/// );
///
/// assert_eq!(catalog.get(CardId::new(1)).unwrap().name, "Ember Lance");
/// assert_eq!(catalog.len(), 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardCatalog {
    cards: FxHashMap<CardId, CardDefinition>,
    hooks: FxHashMap<CardId, HookSet>,
    order: Vec<CardId>,
}

impl CardCatalog {
    /// Create a new empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a card definition and its behavior.
    ///
    /// Panics if a card with the same ID already exists.
    pub fn register(&mut self, card: CardDefinition, hooks: HookSet) {
        if self.cards.contains_key(&card.id) {
            panic!("Card with ID {:?} already registered", card.id);
        }
        self.order.push(card.id);
        self.hooks.insert(card.id, hooks);
        self.cards.insert(card.id, card);
    }

    /// Get a card definition by ID.
    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&CardDefinition> {
        self.cards.get(&id)
    }

    /// Get a card's hook set. Unknown ids behave like an inert card.
    #[must_use]
    pub fn hooks(&self, id: CardId) -> Option<&HookSet> {
        self.hooks.get(&id)
    }

    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.cards.contains_key(&id)
    }

    /// Number of registered definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate definitions in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &CardDefinition> {
        self.order.iter().filter_map(|id| self.cards.get(id))
    }

    /// Pick a uniformly random definition matching `filter`.
    pub fn random_definition(
        &self,
        rng: &mut GameRng,
        filter: impl Fn(&CardDefinition) -> bool,
    ) -> Option<CardDefinition> {
        let candidates: Vec<&CardDefinition> = self.iter().filter(|d| filter(d)).collect();
        rng.choose(&candidates).map(|d| (*d).clone())
    }
}
