//! Card definitions - static card data.
//!
//! `CardDefinition` holds the immutable properties of a card type: its name,
//! suit, rank and the capability flags the engine checks by contract. Effect
//! behavior is not stored here; it lives in the catalog's [`HookSet`] keyed by
//! the same [`CardId`], so definitions stay plain serializable data.
//!
//! Instance-specific data (mark, lock, temporary rank) is stored separately
//! in [`Card`](super::Card).
//!
//! [`HookSet`]: crate::cards::HookSet

use serde::{Deserialize, Serialize};

/// Unique identifier for a card definition.
///
/// This identifies the "type" of card (e.g., "Ember Lance"),
/// not a specific instance in a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Card suit. Only quests interpret it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Suit {
    Spades,
    Hearts,
    Clubs,
    Diamonds,
    #[default]
    Neutral,
}

/// Capability flags the engine itself enforces.
///
/// Every flag defaults to `false`; catalogs switch on what a card needs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Keywords {
    /// Immune to discard, seizure, destruction, transformation, invalidation
    /// and reversal. Never enters a discard pile.
    pub treasure: bool,
    /// Refuses seizure; the attempt is a logged no-op.
    pub seize_proof: bool,
    /// Refuses seizure by exiling itself to its owner's discard pile.
    pub exile_on_seize: bool,
    /// While in hand, doubles incoming healing and then discards itself.
    pub doubles_healing: bool,
}

/// When an occupying field's passive effect is live.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldActivation {
    #[default]
    Always,
    /// Owner's hp is at least twice the opponent's hp.
    OwnerHpAtLeastDoubleOpponent,
    /// Owner's hp is at or below the threshold.
    OwnerHpAtMost(i32),
}

/// A field's end-of-turn effect, fired only while the field is active.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldPulse {
    DamageOpponent(i32),
    HealOwner(i32),
    DrawOwner(usize),
}

/// Behavior of a card while it occupies the shared field slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldProfile {
    pub activation: FieldActivation,
    /// Atk granted to the owner on entry and taken back on leave.
    pub entry_atk_buff: i32,
    /// Lethal damage leaves the target at 1 hp and discards this field.
    pub prevents_death: bool,
    /// Decks are shuffled before every draw while active.
    pub shuffle_before_draw: bool,
    /// The next card drawn after entry becomes a random different card.
    pub substitute_next_draw: bool,
    /// Discards feed the field counter; reaching this clears both hands.
    pub discard_threshold: Option<u32>,
    /// Multiplies the symmetric rule damage while active.
    pub rule_damage_multiplier: i32,
    pub end_of_turn: Option<FieldPulse>,
}

impl Default for FieldProfile {
    fn default() -> Self {
        Self {
            activation: FieldActivation::Always,
            entry_atk_buff: 0,
            prevents_death: false,
            shuffle_before_draw: false,
            substitute_next_draw: false,
            discard_threshold: None,
            rule_damage_multiplier: 1,
            end_of_turn: None,
        }
    }
}

/// Static card definition.
///
/// ## Example
///
/// ```
/// use duel_engine::cards::{CardDefinition, CardId, Suit};
///
/// let lance = CardDefinition::new(CardId::new(1), "Ember Lance", Suit::Spades, 4);
/// assert_eq!(lance.rank, 4);
/// assert!(!lance.keywords.treasure);
///
/// let relic = CardDefinition::new(CardId::new(2), "Old Relic", Suit::Neutral, 9).treasure();
/// assert!(relic.keywords.treasure);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDefinition {
    /// Unique identifier for this card definition.
    pub id: CardId,

    /// Card name (for logs).
    pub name: String,

    pub suit: Suit,

    /// Turn priority. Lower ranks resolve first.
    pub rank: i32,

    pub keywords: Keywords,

    /// Present only for cards that can occupy the field slot.
    pub field: Option<FieldProfile>,
}

impl CardDefinition {
    /// Create a new card definition.
    #[must_use]
    pub fn new(id: CardId, name: impl Into<String>, suit: Suit, rank: i32) -> Self {
        Self {
            id,
            name: name.into(),
            suit,
            rank,
            keywords: Keywords::default(),
            field: None,
        }
    }

    /// Mark as treasure (builder pattern).
    #[must_use]
    pub fn treasure(mut self) -> Self {
        self.keywords.treasure = true;
        self
    }

    /// Replace the keyword set (builder pattern).
    #[must_use]
    pub fn with_keywords(mut self, keywords: Keywords) -> Self {
        self.keywords = keywords;
        self
    }

    /// Attach a field profile (builder pattern).
    #[must_use]
    pub fn with_field(mut self, profile: FieldProfile) -> Self {
        self.field = Some(profile);
        self
    }

    #[must_use]
    pub fn is_treasure(&self) -> bool {
        self.keywords.treasure
    }
}
