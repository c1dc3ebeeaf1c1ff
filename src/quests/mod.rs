//! Quest tracker.
//!
//! A player holds at most two quests. Each quest counts progress toward a
//! target from one kind of trigger; reaching the target removes the quest
//! and pays its reward exactly once. Rewards are data, so a quest survives
//! serialization like the rest of the match.

use serde::{Deserialize, Serialize};

use crate::cards::Suit;
use crate::core::PlayerId;
use crate::effects::EffectContext;
use crate::stack::{Continuation, InputKind, InteractionOption, Prompt};

/// Most quests one player can hold.
pub const MAX_QUESTS: usize = 2;

/// What advances a quest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestTrigger {
    /// Playing a card of this suit.
    PlaySuit(Suit),
    /// Playing any card.
    PlayAny,
    /// Each card discarded.
    Discard,
    /// Each point of damage taken, counted at end of turn.
    DamageTaken,
}

impl QuestTrigger {
    /// Whether a quest with this trigger counts `event`.
    #[must_use]
    pub fn accepts(self, event: QuestTrigger) -> bool {
        match (self, event) {
            (QuestTrigger::PlayAny, QuestTrigger::PlaySuit(_)) => true,
            (a, b) => a == b,
        }
    }
}

/// What a completed quest pays.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestReward {
    Heal(i32),
    /// Damage to the holder's opponent.
    Damage(i32),
    Draw(usize),
    AtkUp(i32),
    /// Let the holder pick one.
    Choose(Vec<QuestReward>),
}

impl std::fmt::Display for QuestReward {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuestReward::Heal(n) => write!(f, "Heal {n}"),
            QuestReward::Damage(n) => write!(f, "Deal {n} damage"),
            QuestReward::Draw(n) => write!(f, "Draw {n}"),
            QuestReward::AtkUp(n) => write!(f, "Gain {n} atk"),
            QuestReward::Choose(options) => write!(f, "Choose one of {}", options.len()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quest {
    pub id: String,
    pub progress: u32,
    pub target: u32,
    pub trigger: QuestTrigger,
    pub reward: QuestReward,
}

impl Quest {
    #[must_use]
    pub fn new(id: impl Into<String>, trigger: QuestTrigger, target: u32, reward: QuestReward) -> Self {
        Self {
            id: id.into(),
            progress: 0,
            target,
            trigger,
            reward,
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.progress >= self.target
    }
}

impl EffectContext<'_> {
    /// Give `target` a quest. Refused when they already hold two or one with
    /// the same id.
    pub fn add_quest(&mut self, target: PlayerId, quest: Quest) -> bool {
        let target = self.resolve(target);
        let name = self.name_of(target);
        let quests = &self.snapshot().player(target).quests;
        let full = quests.len() >= MAX_QUESTS;
        let duplicate = quests.iter().any(|q| q.id == quest.id);
        if full {
            self.log(format!("{name} cannot take more quests"));
            return false;
        }
        if duplicate {
            self.log(format!("{name} already pursues {}", quest.id));
            return false;
        }
        self.log(format!("{name} takes the quest {}", quest.id));
        self.state_mut().player_mut(target).quests.push_back(quest);
        true
    }

    /// Add `amount` to one quest; completes it when the target is reached.
    pub fn update_quest_progress(&mut self, target: PlayerId, quest_id: &str, amount: u32) {
        let target = self.resolve(target);
        self.progress_quest(target, quest_id, amount);
    }

    /// Feed an event to every quest of `player` that counts it.
    pub(crate) fn advance_quests(&mut self, player: PlayerId, event: QuestTrigger, amount: u32) {
        if amount == 0 {
            return;
        }
        let ids: Vec<String> = self
            .snapshot()
            .player(player)
            .quests
            .iter()
            .filter(|q| q.trigger.accepts(event))
            .map(|q| q.id.clone())
            .collect();
        for id in ids {
            self.progress_quest(player, &id, amount);
        }
    }

    fn progress_quest(&mut self, player: PlayerId, quest_id: &str, amount: u32) {
        let name = self.name_of(player);
        let quests = &mut self.state_mut().player_mut(player).quests;
        let Some(pos) = quests.iter().position(|q| q.id == quest_id) else {
            self.log(format!("{name} has no quest {quest_id}"));
            return;
        };
        let quest = &mut quests[pos];
        quest.progress = quest.progress.saturating_add(amount);
        if !quest.is_complete() {
            return;
        }
        let done = quests.remove(pos);
        self.log(format!("{name} completes {}", done.id));
        self.grant_reward(player, done.reward);
    }

    /// Pay a quest reward to `player`.
    pub(crate) fn grant_reward(&mut self, player: PlayerId, reward: QuestReward) {
        let mut ctx = self.nested(player, None).with_reversed(false);
        match reward {
            QuestReward::Heal(n) => ctx.heal(player, n),
            QuestReward::Damage(n) => {
                ctx.damage(player.opponent(), n, false);
            }
            QuestReward::Draw(n) => {
                ctx.draw(player, n, false);
            }
            QuestReward::AtkUp(n) => ctx.add_atk(player, n),
            QuestReward::Choose(options) => {
                let Some(first) = options.first().cloned() else {
                    return;
                };
                let buttons = options
                    .iter()
                    .enumerate()
                    .map(|(i, r)| InteractionOption::new(r.to_string(), i as i64))
                    .collect();
                let prompt = Prompt::new(
                    player,
                    "Quest reward",
                    InputKind::Options(buttons),
                    Continuation::QuestReward { rewards: options },
                );
                if ctx.ask(prompt).is_err() {
                    ctx.grant_reward(player, first);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardCatalog;
    use crate::demo;

    #[test]
    fn test_trigger_acceptance() {
        assert!(QuestTrigger::PlayAny.accepts(QuestTrigger::PlaySuit(Suit::Hearts)));
        assert!(QuestTrigger::PlaySuit(Suit::Hearts).accepts(QuestTrigger::PlaySuit(Suit::Hearts)));
        assert!(!QuestTrigger::PlaySuit(Suit::Hearts).accepts(QuestTrigger::PlaySuit(Suit::Clubs)));
        assert!(!QuestTrigger::Discard.accepts(QuestTrigger::DamageTaken));
    }

    #[test]
    fn test_quest_capacity_and_duplicates() {
        let mut m = demo::empty_match();
        let catalog = CardCatalog::new();
        let mut ctx = EffectContext::new(&mut m, &catalog, PlayerId::ONE, None);
        let quest = |id: &str| Quest::new(id, QuestTrigger::Discard, 3, QuestReward::Heal(2));

        assert!(ctx.add_quest(PlayerId::ONE, quest("a")));
        assert!(!ctx.add_quest(PlayerId::ONE, quest("a")));
        assert!(ctx.add_quest(PlayerId::ONE, quest("b")));
        assert!(!ctx.add_quest(PlayerId::ONE, quest("c")));

        assert_eq!(m.player(PlayerId::ONE).quests.len(), 2);
    }

    #[test]
    fn test_completion_pays_once() {
        let mut m = demo::empty_match();
        m.player_mut(PlayerId::ONE).hp = 30;
        let catalog = CardCatalog::new();
        let mut ctx = EffectContext::new(&mut m, &catalog, PlayerId::ONE, None);
        ctx.add_quest(
            PlayerId::ONE,
            Quest::new("mend", QuestTrigger::Discard, 2, QuestReward::Heal(5)),
        );

        ctx.update_quest_progress(PlayerId::ONE, "mend", 1);
        assert_eq!(ctx.snapshot().player(PlayerId::ONE).quests[0].progress, 1);

        ctx.update_quest_progress(PlayerId::ONE, "mend", 3);
        ctx.update_quest_progress(PlayerId::ONE, "mend", 3);

        assert!(m.player(PlayerId::ONE).quests.is_empty());
        assert_eq!(m.player(PlayerId::ONE).hp, 35);
    }

    #[test]
    fn test_choose_reward_opens_interaction() {
        let mut m = demo::empty_match();
        let catalog = CardCatalog::new();
        let mut ctx = EffectContext::new(&mut m, &catalog, PlayerId::TWO, None);
        ctx.add_quest(
            PlayerId::TWO,
            Quest::new(
                "fork",
                QuestTrigger::PlayAny,
                1,
                QuestReward::Choose(vec![QuestReward::Heal(3), QuestReward::Damage(3)]),
            ),
        );

        ctx.advance_quests(PlayerId::TWO, QuestTrigger::PlaySuit(Suit::Spades), 1);

        let request = m.interaction.as_ref().unwrap();
        assert_eq!(request.player_id, PlayerId::TWO);
        assert!(matches!(request.continuation, Continuation::QuestReward { .. }));
    }
}
