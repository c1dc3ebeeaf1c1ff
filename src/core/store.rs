//! Match store: the single source of truth.
//!
//! The store never hands out `&mut Match`. Callers build a whole next state
//! from the current one and commit it; `compare_and_swap` additionally checks
//! that the state they built from is still current, so two near-simultaneous
//! writers cannot clobber each other.
//!
//! ```
//! use duel_engine::core::MatchStore;
//! # use duel_engine::demo;
//! let mut store = MatchStore::new(demo::empty_match());
//!
//! let v0 = store.version();
//! store.update(|m| {
//!     let mut next = m.clone();
//!     next.log("hello");
//!     next
//! });
//! assert_eq!(store.version(), v0 + 1);
//!
//! // A writer that built from v0 is rejected.
//! let stale = store.get_state().clone();
//! assert!(store.compare_and_swap(v0, stale).is_err());
//! ```

use super::state::Match;
use crate::error::StoreError;

/// Versioned holder of the current match state.
#[derive(Clone, Debug)]
pub struct MatchStore {
    state: Match,
    version: u64,
}

impl MatchStore {
    #[must_use]
    pub fn new(state: Match) -> Self {
        Self { state, version: 0 }
    }

    /// The latest committed state.
    #[must_use]
    pub fn get_state(&self) -> &Match {
        &self.state
    }

    /// Number of commits so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Replace the whole state unconditionally.
    pub fn commit(&mut self, next: Match) -> u64 {
        self.state = next;
        self.version += 1;
        self.version
    }

    /// Build the next state from the current one and commit it.
    pub fn update(&mut self, f: impl FnOnce(&Match) -> Match) -> u64 {
        let next = f(&self.state);
        self.commit(next)
    }

    /// Commit only if nothing was committed since `expected`.
    pub fn compare_and_swap(&mut self, expected: u64, next: Match) -> Result<u64, StoreError> {
        if expected != self.version {
            return Err(StoreError::StaleVersion {
                expected,
                actual: self.version,
            });
        }
        Ok(self.commit(next))
    }

    /// Take the store apart, returning the final state.
    #[must_use]
    pub fn into_state(self) -> Match {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo;

    #[test]
    fn test_update_sees_previous_commit() {
        let mut store = MatchStore::new(demo::empty_match());

        store.update(|m| {
            let mut next = m.clone();
            next.turn_count += 1;
            next
        });
        store.update(|m| {
            let mut next = m.clone();
            next.turn_count += 1;
            next
        });

        assert_eq!(store.get_state().turn_count, 3);
        assert_eq!(store.version(), 2);
    }

    #[test]
    fn test_compare_and_swap() {
        let mut store = MatchStore::new(demo::empty_match());
        let next = store.get_state().clone();

        assert_eq!(store.compare_and_swap(0, next.clone()), Ok(1));
        assert_eq!(
            store.compare_and_swap(0, next),
            Err(StoreError::StaleVersion { expected: 0, actual: 1 })
        );
    }
}
