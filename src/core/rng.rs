//! Deterministic random number generation for match replay.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical sequence
//! - **Serializable**: O(1) state capture and restore, so a snapshot sent over
//!   the wire continues the exact same random stream on the other side
//!
//! ```
//! use duel_engine::core::GameRng;
//!
//! let mut a = GameRng::new(42);
//! let mut b = GameRng::new(42);
//! assert_eq!(a.gen_index(100), b.gen_index(100));
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Deterministic RNG owned by the match.
///
/// Uses ChaCha8 for speed while maintaining good statistical quality.
/// Serializes through [`GameRngState`].
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(from = "GameRngState", into = "GameRngState")]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Uniform index in `0..len`. Returns 0 when `len` is 0.
    pub fn gen_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.inner.gen_range(0..len)
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }

    /// Choose a random element from a slice.
    #[must_use]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.inner)
    }

    /// Choose `amount` distinct elements, preserving no particular order.
    ///
    /// Returns fewer than `amount` when the slice is shorter.
    pub fn choose_many<T: Clone>(&mut self, slice: &[T], amount: usize) -> Vec<T> {
        use rand::seq::SliceRandom;
        slice
            .choose_multiple(&mut self.inner, amount)
            .cloned()
            .collect()
    }

    /// Get the current state for serialization.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
        }
    }
}

/// Serializable RNG state.
///
/// Uses ChaCha8 word position for O(1) serialization regardless of
/// how many random numbers have been generated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    /// Original seed
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter)
    pub word_pos: u128,
}

impl From<GameRngState> for GameRng {
    fn from(state: GameRngState) -> Self {
        GameRng::from_state(&state)
    }
}

impl From<GameRng> for GameRngState {
    fn from(rng: GameRng) -> Self {
        rng.state()
    }
}
