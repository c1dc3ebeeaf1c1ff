//! Match state: the root aggregate every commit replaces.
//!
//! ## Match
//!
//! Phase, instant window, turn count, both players, the shared field, the
//! newest-first log feed, the pending-effect queue, the active effect, the
//! outstanding interaction and transient visual events.
//!
//! ## PlayerState
//!
//! Identity, hp/atk, the deck/hand/discard zones, the committed field slot,
//! status flags, delayed effects and quests.
//!
//! Zones use `im` persistent vectors, so cloning a `Match` to build the next
//! state is cheap.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::config::{InstantWindow, MarkTuning, MatchMode, Phase};
use super::player::{PlayerId, PlayerMap};
use super::rng::GameRng;
use crate::cards::{Card, InstanceId, Mark};
use crate::field::FieldState;
use crate::quests::Quest;
use crate::rules::RevealProgress;
use crate::stack::{InteractionId, InteractionRequest, PendingEffect};

/// Where a card instance currently sits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    Deck,
    Hand,
    Discard,
    /// The card committed this turn.
    FieldSlot,
    /// Treasures removed from play.
    Vault,
    /// The shared field slot.
    Field,
}

/// Standing status effects on a player.
///
/// "This turn" flags reset in discard-phase cleanup; "next turn" flags are
/// promoted into their this-turn counterparts at the same moment. The rest
/// persist until consumed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusFlags {
    // === This turn ===
    pub immune: bool,
    pub reversed: bool,
    pub invalidated: bool,
    pub prevent_healing: bool,
    pub lifesteal: bool,
    pub reflect: bool,
    pub counter_reflect: bool,
    pub piercing: bool,
    /// Damage taken so far this turn.
    pub damage_taken: i32,

    // === Next turn ===
    pub immune_next_turn: bool,
    pub piercing_next_turn: bool,
    pub invalidate_next_turn: bool,

    // === Until consumed ===
    pub invalidate_next_played: bool,
    pub double_next_effect: bool,
    pub double_next_damage: bool,
    /// The next hit bigger than the holder's atk heals instead.
    pub damage_to_heal: bool,
    /// Charges that each cancel one transform.
    pub prevent_transform: u32,
}

impl StatusFlags {
    /// Reset this-turn flags and promote next-turn flags.
    pub fn end_turn(&mut self) {
        self.immune = std::mem::take(&mut self.immune_next_turn);
        self.piercing = std::mem::take(&mut self.piercing_next_turn);
        if std::mem::take(&mut self.invalidate_next_turn) {
            self.invalidate_next_played = true;
        }
        self.reversed = false;
        self.invalidated = false;
        self.prevent_healing = false;
        self.lifesteal = false;
        self.reflect = false;
        self.counter_reflect = false;
        self.damage_taken = 0;
    }
}

/// What a delayed effect does when it matures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DelayedKind {
    Damage(i32),
    Heal(i32),
    Draw(usize),
    AtkChange(i32),
}

/// An effect that matures a number of turns later.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayedEffect {
    /// Discard-phase cleanups left before it fires.
    pub turns: u32,
    pub target: PlayerId,
    pub kind: DelayedKind,
    pub label: String,
}

/// One player's side of the match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub id: PlayerId,
    pub name: String,
    pub hp: i32,
    pub atk: i32,

    /// Top of the deck is the front.
    pub deck: Vector<Card>,
    pub hand: Vector<Card>,
    pub discard_pile: Vector<Card>,
    pub vault: Vector<Card>,

    /// Card committed this turn, hidden until the flip.
    pub field_slot: Option<Card>,
    pub has_committed: bool,

    pub status: StatusFlags,
    /// Delayed effects this player scheduled; they mature in this
    /// player's cleanup.
    pub delayed_effects: Vector<DelayedEffect>,
    pub max_hand_size: usize,
    /// At most two.
    pub quests: Vector<Quest>,
}

impl PlayerState {
    /// Create a player with empty zones.
    #[must_use]
    pub fn new(id: PlayerId, name: impl Into<String>, hp: i32, atk: i32, max_hand_size: usize) -> Self {
        Self {
            id,
            name: name.into(),
            hp,
            atk,
            deck: Vector::new(),
            hand: Vector::new(),
            discard_pile: Vector::new(),
            vault: Vector::new(),
            field_slot: None,
            has_committed: false,
            status: StatusFlags::default(),
            delayed_effects: Vector::new(),
            max_hand_size,
            quests: Vector::new(),
        }
    }

    /// Hand size counted against the hand limit.
    #[must_use]
    pub fn non_treasure_hand_count(&self) -> usize {
        self.hand.iter().filter(|c| !c.is_treasure()).count()
    }

    #[must_use]
    pub fn over_hand_limit(&self) -> bool {
        self.non_treasure_hand_count() > self.max_hand_size
    }

    /// Number of hand cards carrying `mark`.
    #[must_use]
    pub fn hand_marks(&self, mark: Mark) -> usize {
        self.hand.iter().filter(|c| c.has_mark(mark)).count()
    }

    #[must_use]
    pub fn hand_position(&self, id: InstanceId) -> Option<usize> {
        self.hand.iter().position(|c| c.instance_id == id)
    }

    #[must_use]
    pub fn hand_card(&self, id: InstanceId) -> Option<&Card> {
        self.hand.iter().find(|c| c.instance_id == id)
    }

    /// Take a card out of the hand.
    pub fn take_from_hand(&mut self, id: InstanceId) -> Option<Card> {
        let pos = self.hand_position(id)?;
        Some(self.hand.remove(pos))
    }

    /// Put a card where a card leaving play belongs: vault for treasures,
    /// discard pile otherwise.
    pub fn bury(&mut self, card: Card) {
        if card.is_treasure() {
            self.vault.push_back(card);
        } else {
            self.discard_pile.push_back(card);
        }
    }
}

/// Outcome of a finished match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchResult {
    Winner(PlayerId),
    Draw,
}

/// One line of the user-visible feed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub turn: u32,
    pub message: String,
}

/// Presentation cue for a renderer. Carries no rules meaning.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisualEvent {
    Damage { player: PlayerId, amount: i32 },
    Heal { player: PlayerId, amount: i32 },
    Draw { player: PlayerId, count: usize },
    Discard { player: PlayerId, count: usize },
    Flip,
    FieldChanged,
}

/// The root aggregate.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Match {
    pub phase: Phase,
    pub instant_window: Option<InstantWindow>,
    /// Starts at 1.
    pub turn_count: u32,
    pub players: PlayerMap<PlayerState>,
    pub field: Option<FieldState>,

    /// Newest first.
    pub logs: Vector<LogEntry>,
    pub is_resolving: bool,
    pub pending_effects: Vector<PendingEffect>,
    pub active_effect: Option<PendingEffect>,
    pub interaction: Option<InteractionRequest>,
    pub visual_events: Vector<VisualEvent>,

    /// Whether committed cards are face up.
    pub slots_revealed: bool,
    /// Whether this turn's phase draw already happened.
    pub draw_done: bool,
    /// Resume point of an in-progress reveal resolution.
    pub reveal: Option<RevealProgress>,
    pub result: Option<MatchResult>,

    pub mode: MatchMode,
    pub marks: MarkTuning,
    pub rng: GameRng,

    next_instance: u32,
    next_interaction: u32,
}

impl Match {
    /// Create a match with the given players and empty shared state.
    #[must_use]
    pub fn new(players: PlayerMap<PlayerState>, mode: MatchMode, marks: MarkTuning, seed: u64) -> Self {
        Self {
            phase: Phase::Draw,
            instant_window: None,
            turn_count: 1,
            players,
            field: None,
            logs: Vector::new(),
            is_resolving: false,
            pending_effects: Vector::new(),
            active_effect: None,
            interaction: None,
            visual_events: Vector::new(),
            slots_revealed: false,
            draw_done: false,
            reveal: None,
            result: None,
            mode,
            marks,
            rng: GameRng::new(seed),
            next_instance: 1,
            next_interaction: 1,
        }
    }

    // === Players ===

    #[must_use]
    pub fn player(&self, id: PlayerId) -> &PlayerState {
        &self.players[id]
    }

    pub fn player_mut(&mut self, id: PlayerId) -> &mut PlayerState {
        &mut self.players[id]
    }

    // === Ids ===

    /// Allocate a fresh card instance id.
    pub fn alloc_instance(&mut self) -> InstanceId {
        let id = InstanceId(self.next_instance);
        self.next_instance += 1;
        id
    }

    pub fn alloc_interaction(&mut self) -> InteractionId {
        let id = InteractionId(self.next_interaction);
        self.next_interaction += 1;
        id
    }

    // === Feed ===

    /// Append a log line (newest first).
    pub fn log(&mut self, message: impl Into<String>) {
        let entry = LogEntry {
            turn: self.turn_count,
            message: message.into(),
        };
        self.logs.push_front(entry);
    }

    /// Log `private` locally, or the redacted `public` text online.
    pub fn log_hidden(&mut self, public: impl Into<String>, private: impl Into<String>) {
        match self.mode {
            MatchMode::Local => self.log(private),
            MatchMode::Online => self.log(public),
        }
    }

    pub fn emit(&mut self, event: VisualEvent) {
        self.visual_events.push_back(event);
    }

    // === Card lookup ===

    /// Find a card instance in any zone of either player or in the field.
    #[must_use]
    pub fn locate(&self, id: InstanceId) -> Option<(PlayerId, Zone)> {
        if let Some(field) = &self.field {
            if field.card.instance_id == id {
                return Some((field.owner, Zone::Field));
            }
        }
        for (pid, p) in self.players.iter() {
            let zones = [
                (Zone::Hand, &p.hand),
                (Zone::Deck, &p.deck),
                (Zone::Discard, &p.discard_pile),
                (Zone::Vault, &p.vault),
            ];
            for (zone, cards) in zones {
                if cards.iter().any(|c| c.instance_id == id) {
                    return Some((pid, zone));
                }
            }
            if p.field_slot.as_ref().is_some_and(|c| c.instance_id == id) {
                return Some((pid, Zone::FieldSlot));
            }
        }
        None
    }

    /// Borrow a card instance wherever it is.
    #[must_use]
    pub fn card(&self, id: InstanceId) -> Option<&Card> {
        let (pid, zone) = self.locate(id)?;
        let p = self.player(pid);
        match zone {
            Zone::Hand => p.hand.iter().find(|c| c.instance_id == id),
            Zone::Deck => p.deck.iter().find(|c| c.instance_id == id),
            Zone::Discard => p.discard_pile.iter().find(|c| c.instance_id == id),
            Zone::Vault => p.vault.iter().find(|c| c.instance_id == id),
            Zone::FieldSlot => p.field_slot.as_ref(),
            Zone::Field => self.field.as_ref().map(|f| &f.card),
        }
    }

    /// Apply `f` to a card instance wherever it is.
    ///
    /// Returns `false` when the instance does not exist.
    pub fn update_card(&mut self, id: InstanceId, f: impl FnOnce(&mut Card)) -> bool {
        let Some((pid, zone)) = self.locate(id) else {
            return false;
        };
        let field = &mut self.field;
        let p = &mut self.players[pid];
        let card = match zone {
            Zone::Field => field.as_mut().map(|fs| &mut fs.card),
            Zone::FieldSlot => p.field_slot.as_mut(),
            Zone::Hand => p.hand.iter_mut().find(|c| c.instance_id == id),
            Zone::Deck => p.deck.iter_mut().find(|c| c.instance_id == id),
            Zone::Discard => p.discard_pile.iter_mut().find(|c| c.instance_id == id),
            Zone::Vault => p.vault.iter_mut().find(|c| c.instance_id == id),
        };
        match card {
            Some(card) => {
                f(card);
                true
            }
            None => false,
        }
    }

    /// Remove a card instance from wherever it is.
    pub fn detach(&mut self, id: InstanceId) -> Option<(PlayerId, Zone, Card)> {
        let (pid, zone) = self.locate(id)?;
        if zone == Zone::Field {
            return self.field.take().map(|f| (pid, zone, f.card));
        }
        let p = self.player_mut(pid);
        let take = |cards: &mut Vector<Card>| {
            let pos = cards.iter().position(|c| c.instance_id == id)?;
            Some(cards.remove(pos))
        };
        let card = match zone {
            Zone::Hand => take(&mut p.hand),
            Zone::Deck => take(&mut p.deck),
            Zone::Discard => take(&mut p.discard_pile),
            Zone::Vault => take(&mut p.vault),
            Zone::FieldSlot => p.field_slot.take(),
            Zone::Field => None,
        }?;
        Some((pid, zone, card))
    }

    // === Blocking conditions ===

    /// True while an interaction is outstanding or an effect awaits dismissal.
    #[must_use]
    pub fn is_suspended(&self) -> bool {
        self.interaction.is_some() || self.active_effect.is_some()
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.phase == Phase::GameOver
    }
}
