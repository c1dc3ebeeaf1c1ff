//! Card instances - runtime card state.
//!
//! A [`Card`] is a definition instantiated with a unique [`InstanceId`].
//! The instance id is stable across zone moves; the definition can be
//! replaced wholesale by a transform without changing it.

use serde::{Deserialize, Serialize};

use super::definition::{CardDefinition, CardId};
use super::mark::Mark;

/// Unique id of one card instance within a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstanceId(pub u32);

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A card instance in a match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub instance_id: InstanceId,

    /// Static data. Hooks are looked up in the catalog by `definition.id`.
    pub definition: CardDefinition,

    pub mark: Option<Mark>,

    /// Turns left until the lock expires. `None` when unlocked.
    pub locked_turns: Option<u32>,

    /// Overrides the definition's rank for ordering.
    pub temp_rank: Option<i32>,
}

impl Card {
    /// Create an unmarked, unlocked instance.
    #[must_use]
    pub fn new(instance_id: InstanceId, definition: CardDefinition) -> Self {
        Self {
            instance_id,
            definition,
            mark: None,
            locked_turns: None,
            temp_rank: None,
        }
    }

    #[must_use]
    pub fn card_id(&self) -> CardId {
        self.definition.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    #[must_use]
    pub fn is_treasure(&self) -> bool {
        self.definition.keywords.treasure
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked_turns.is_some()
    }

    #[must_use]
    pub fn has_mark(&self, mark: Mark) -> bool {
        self.mark == Some(mark)
    }

    /// Rank used for execution order.
    #[must_use]
    pub fn effective_rank(&self) -> i32 {
        self.temp_rank.unwrap_or(self.definition.rank)
    }

    /// Count down the lock by one turn, unlocking at zero.
    pub fn tick_lock(&mut self) {
        self.locked_turns = match self.locked_turns {
            Some(turns) if turns > 1 => Some(turns - 1),
            _ => None,
        };
    }

    /// Swap in a new definition, keeping the instance id.
    ///
    /// Per-instance decorations (mark, temporary rank) belong to the old
    /// card and are dropped. A lock stays with the instance.
    pub fn transform_into(&mut self, definition: CardDefinition) {
        self.definition = definition;
        self.mark = None;
        self.temp_rank = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Suit;

    fn card(rank: i32) -> Card {
        Card::new(
            InstanceId(10),
            CardDefinition::new(CardId::new(1), "Test", Suit::Clubs, rank),
        )
    }

    #[test]
    fn test_effective_rank_prefers_temp() {
        let mut c = card(5);
        assert_eq!(c.effective_rank(), 5);

        c.temp_rank = Some(1);
        assert_eq!(c.effective_rank(), 1);
    }

    #[test]
    fn test_tick_lock_unlocks_at_zero() {
        let mut c = card(5);
        c.locked_turns = Some(2);

        c.tick_lock();
        assert_eq!(c.locked_turns, Some(1));
        assert!(c.is_locked());

        c.tick_lock();
        assert!(!c.is_locked());
    }

    #[test]
    fn test_transform_keeps_identity() {
        let mut c = card(5);
        c.mark = Some(Mark::Heal);
        c.temp_rank = Some(2);

        c.transform_into(CardDefinition::new(CardId::new(9), "Other", Suit::Hearts, 8));

        assert_eq!(c.instance_id, InstanceId(10));
        assert_eq!(c.card_id(), CardId::new(9));
        assert_eq!(c.mark, None);
        assert_eq!(c.effective_rank(), 8);
    }

    #[test]
    fn test_card_serialization() {
        let mut c = card(3);
        c.mark = Some(Mark::Amplify);

        let json = serde_json::to_string(&c).unwrap();
        let deserialized: Card = serde_json::from_str(&json).unwrap();

        assert_eq!(c, deserialized);
    }
}
