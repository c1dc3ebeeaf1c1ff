//! Mark store.
//!
//! A card instance carries at most one mark. The slot is an `Option`, so
//! assigning a new mark overwrites the previous one by construction; the only
//! other way to lose a mark is a full transform.

use serde::{Deserialize, Serialize};

use super::instance::Card;

/// A named tag on a card instance.
///
/// Played marks fire when the card resolves, before its own reveal hook.
/// Hand marks act while the card sits in its holder's hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    /// Played: heal the holder.
    Heal,
    /// Played: damage the opponent.
    Damage,
    /// Played: the holder draws.
    Draw,
    /// Played: the holder chooses between healing and damage.
    Choice,
    /// Played: the card's reveal hook runs twice.
    DoubleEffect,
    /// In hand: the holder takes 1 extra damage per marked card.
    Amplify,
    /// In hand: phase draws are reduced by 1 per marked card.
    DrawReduction,
    /// In hand: the holder takes 1 damage whenever they deal damage.
    SelfHarm,
}

impl Mark {
    /// Whether this mark has an effect when its card is played.
    #[must_use]
    pub const fn fires_on_play(self) -> bool {
        matches!(
            self,
            Mark::Heal | Mark::Damage | Mark::Draw | Mark::Choice | Mark::DoubleEffect
        )
    }
}

impl std::fmt::Display for Mark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Mark::Heal => "heal",
            Mark::Damage => "damage",
            Mark::Draw => "draw",
            Mark::Choice => "choice",
            Mark::DoubleEffect => "double",
            Mark::Amplify => "amplify",
            Mark::DrawReduction => "draw-reduction",
            Mark::SelfHarm => "self-harm",
        };
        f.write_str(name)
    }
}

/// Stamp `mark` onto `card`, replacing any existing mark.
///
/// ```
/// use duel_engine::cards::{add_mark, Card, CardDefinition, CardId, InstanceId, Mark, Suit};
///
/// let def = CardDefinition::new(CardId::new(1), "Spark", Suit::Spades, 3);
/// let card = Card::new(InstanceId(7), def);
///
/// let card = add_mark(card, Mark::Heal);
/// let card = add_mark(card, Mark::Amplify);
/// assert_eq!(card.mark, Some(Mark::Amplify));
/// ```
#[must_use]
pub fn add_mark(mut card: Card, mark: Mark) -> Card {
    card.mark = Some(mark);
    card
}
