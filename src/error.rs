//! Error types.
//!
//! Nothing inside the engine is fatal. Player-facing entry points return a
//! [`Rejection`] after logging it to the match feed; the wire boundary returns
//! a [`WireError`] instead of a broken snapshot.

use crate::cards::{CardId, InstanceId};
use crate::core::{Phase, PlayerId};
use crate::stack::InteractionId;

/// Why a player action was refused. The match state is unchanged apart from
/// the log line describing the refusal.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("the match is over")]
    GameOver,

    #[error("not allowed during {0}")]
    WrongPhase(Phase),

    #[error("waiting on an open interaction")]
    InteractionPending,

    #[error("no interaction {0} is open")]
    NoSuchInteraction(InteractionId),

    #[error("interaction belongs to {0}")]
    NotYourInteraction(PlayerId),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("card {0} is not available")]
    CardNotFound(InstanceId),

    #[error("card {0} cannot be set")]
    CardCannotBeSet(InstanceId),

    #[error("card {0} is locked")]
    CardLocked(InstanceId),

    #[error("card {0} cannot be played now")]
    NotInstant(InstanceId),

    #[error("{0} already committed a card")]
    AlreadyCommitted(PlayerId),

    #[error("no effect awaits dismissal")]
    NoActiveEffect,

    #[error("a decision needs a card to resume it")]
    NoSourceCard,

    #[error("{0} must commit a card")]
    MustCommit(PlayerId),
}

/// A match could not be assembled.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("deck lists unknown card {0}")]
    UnknownCard(CardId),
}

/// Failure on the network boundary.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    #[error("failed to encode snapshot: {0}")]
    Encode(String),

    #[error("failed to decode snapshot: {0}")]
    Decode(String),

    #[error("snapshot references unknown card {0}")]
    UnknownCard(CardId),
}

/// A commit raced another writer.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("stale commit: built from version {expected}, store is at {actual}")]
    StaleVersion { expected: u64, actual: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(Rejection::GameOver.to_string(), "the match is over");
        assert_eq!(
            Rejection::WrongPhase(Phase::Set).to_string(),
            "not allowed during SET"
        );
        assert_eq!(
            WireError::UnknownCard(CardId::new(4)).to_string(),
            "snapshot references unknown card Card(4)"
        );
    }
}
