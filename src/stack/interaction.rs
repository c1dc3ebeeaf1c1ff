//! Interaction request protocol.
//!
//! A hook or primitive that needs a decision installs an
//! [`InteractionRequest`] on the match and returns. Nothing advances until the
//! owning player answers with an [`InteractionResponse`]. The continuation is
//! data, not a closure: it names who resumes the decision tree (a card's
//! `on_interaction` hook or an engine rule) so the request survives
//! serialization and replay.

use serde::{Deserialize, Serialize};

use crate::cards::{Card, CardId, InstanceId};
use crate::core::PlayerId;
use crate::quests::QuestReward;

/// Match-unique id of an interaction request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InteractionId(pub u32);

impl std::fmt::Display for InteractionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Interaction({})", self.0)
    }
}

/// One button of an options prompt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionOption {
    pub label: String,
    /// Handed back to the continuation when picked.
    pub value: i64,
}

impl InteractionOption {
    #[must_use]
    pub fn new(label: impl Into<String>, value: i64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// What kind of answer the prompt expects.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputKind {
    Options(Vec<InteractionOption>),
    Number { min: i64, max: i64 },
    /// Pick exactly `count` of `candidates` (fewer if there are fewer).
    SelectCards { candidates: Vec<InstanceId>, count: usize },
}

/// Who resumes once the request is answered.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Continuation {
    /// The asking card's `on_interaction` hook.
    Card {
        card_id: CardId,
        /// Which question of the card's decision tree this answers.
        tag: String,
        /// Values carried between nested questions.
        data: Vec<i64>,
    },
    /// A played `Choice` mark: option 0 heals, option 1 damages.
    MarkChoice { amount: i32 },
    /// A completed quest offering a choice of rewards, by option index.
    QuestReward { rewards: Vec<QuestReward> },
}

impl Continuation {
    #[must_use]
    pub fn card(card_id: CardId, tag: impl Into<String>) -> Self {
        Continuation::Card {
            card_id,
            tag: tag.into(),
            data: Vec::new(),
        }
    }

    /// The tag of a card continuation; empty for engine continuations.
    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            Continuation::Card { tag, .. } => tag,
            _ => "",
        }
    }

    /// Carried values of a card continuation.
    #[must_use]
    pub fn data(&self) -> &[i64] {
        match self {
            Continuation::Card { data, .. } => data,
            _ => &[],
        }
    }
}

/// A question awaiting an answer. At most one exists per match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionRequest {
    pub id: InteractionId,
    /// Who must answer.
    pub player_id: PlayerId,
    /// Whose effect asked; the continuation runs as this player.
    pub source: PlayerId,
    pub title: String,
    pub description: String,
    pub input: InputKind,
    pub continuation: Continuation,
    /// The card that asked, handed back as the context card on resume.
    pub source_card: Option<Card>,
    /// Reversal in force when the question was asked.
    pub reversed: bool,
}

/// A request before the engine assigns it an id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Prompt {
    pub player_id: PlayerId,
    pub title: String,
    pub description: String,
    pub input: InputKind,
    pub continuation: Continuation,
}

impl Prompt {
    #[must_use]
    pub fn new(player_id: PlayerId, title: impl Into<String>, input: InputKind, continuation: Continuation) -> Self {
        Self {
            player_id,
            title: title.into(),
            description: String::new(),
            input,
            continuation,
        }
    }

    #[must_use]
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// What a player submits.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionResponse {
    /// Index into the options list.
    Option(usize),
    Number(i64),
    Cards(Vec<InstanceId>),
}

/// A validated response, as the continuation sees it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Answer {
    Option { index: usize, value: i64 },
    Number(i64),
    Cards(Vec<InstanceId>),
}

impl Answer {
    /// The picked option's value or the confirmed number.
    #[must_use]
    pub fn value(&self) -> Option<i64> {
        match self {
            Answer::Option { value, .. } => Some(*value),
            Answer::Number(n) => Some(*n),
            Answer::Cards(_) => None,
        }
    }

    #[must_use]
    pub fn cards(&self) -> &[InstanceId] {
        match self {
            Answer::Cards(cards) => cards,
            _ => &[],
        }
    }
}

impl InteractionRequest {
    /// Check a response against the prompt's input kind.
    pub fn validate(&self, response: &InteractionResponse) -> Result<Answer, String> {
        match (&self.input, response) {
            (InputKind::Options(options), InteractionResponse::Option(index)) => options
                .get(*index)
                .map(|o| Answer::Option {
                    index: *index,
                    value: o.value,
                })
                .ok_or_else(|| format!("option {index} out of range")),
            (InputKind::Number { min, max }, InteractionResponse::Number(n)) => {
                if (*min..=*max).contains(n) {
                    Ok(Answer::Number(*n))
                } else {
                    Err(format!("{n} outside {min}..={max}"))
                }
            }
            (InputKind::SelectCards { candidates, count }, InteractionResponse::Cards(picked)) => {
                let expected = (*count).min(candidates.len());
                if picked.len() != expected {
                    return Err(format!("expected {expected} cards, got {}", picked.len()));
                }
                let mut seen = Vec::with_capacity(picked.len());
                for id in picked {
                    if !candidates.contains(id) || seen.contains(id) {
                        return Err(format!("card {id} is not selectable"));
                    }
                    seen.push(*id);
                }
                Ok(Answer::Cards(seen))
            }
            _ => Err("response does not match the prompt".to_string()),
        }
    }
}
