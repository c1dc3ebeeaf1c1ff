//! Player identification and per-player data storage.
//!
//! ## PlayerId
//!
//! A duel always has exactly two seats. `PlayerId::ONE` and `PlayerId::TWO`
//! are the only valid ids; `opponent()` flips between them.
//!
//! ## PlayerMap
//!
//! Per-player data storage backed by a two-element array for O(1) access.
//! Supports iteration and indexing by `PlayerId`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Player identifier.
///
/// Indices are 0-based internally: player one is `PlayerId(0)`. Deserializing
/// any other raw value fails, so a decoded snapshot never indexes past a
/// [`PlayerMap`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct PlayerId(pub u8);

/// A raw id that names neither seat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown player id {0}")]
pub struct InvalidPlayerId(pub u8);

impl TryFrom<u8> for PlayerId {
    type Error = InvalidPlayerId;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(Self::ONE),
            1 => Ok(Self::TWO),
            other => Err(InvalidPlayerId(other)),
        }
    }
}

impl From<PlayerId> for u8 {
    fn from(id: PlayerId) -> Self {
        id.0
    }
}

impl PlayerId {
    /// The first seat. Wins ties in execution order.
    pub const ONE: PlayerId = PlayerId(0);

    /// The second seat.
    pub const TWO: PlayerId = PlayerId(1);

    /// Get the raw player index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The other seat.
    ///
    /// ```
    /// use duel_engine::core::PlayerId;
    ///
    /// assert_eq!(PlayerId::ONE.opponent(), PlayerId::TWO);
    /// assert_eq!(PlayerId::TWO.opponent(), PlayerId::ONE);
    /// ```
    #[must_use]
    pub const fn opponent(self) -> Self {
        if self.0 == 0 {
            Self::TWO
        } else {
            Self::ONE
        }
    }

    /// Both seats, player one first.
    pub fn both() -> impl Iterator<Item = PlayerId> {
        [Self::ONE, Self::TWO].into_iter()
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0 + 1)
    }
}

/// Per-player data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use duel_engine::core::{PlayerId, PlayerMap};
///
/// let mut hp: PlayerMap<i32> = PlayerMap::new(|_| 40);
/// hp[PlayerId::TWO] -= 2;
///
/// assert_eq!(hp[PlayerId::ONE], 40);
/// assert_eq!(hp[PlayerId::TWO], 38);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: [T; 2],
}

impl<T> PlayerMap<T> {
    /// Create a map with values from a factory function.
    pub fn new(factory: impl Fn(PlayerId) -> T) -> Self {
        Self {
            data: [factory(PlayerId::ONE), factory(PlayerId::TWO)],
        }
    }

    /// Create a map with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(|_| value.clone())
    }

    /// Create a map with default values.
    pub fn with_default() -> Self
    where
        T: Default,
    {
        Self::new(|_| T::default())
    }

    /// Get a reference to a player's data.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> &T {
        &self.data[player.index()]
    }

    /// Get a mutable reference to a player's data.
    pub fn get_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.data[player.index()]
    }

    /// Iterate over (PlayerId, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }

    /// Iterate over (PlayerId, &mut T) pairs.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PlayerId, &mut T)> {
        self.data
            .iter_mut()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        self.get(player)
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        self.get_mut(player)
    }
}
