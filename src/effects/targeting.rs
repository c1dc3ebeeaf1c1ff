//! Target resolution under reversal.
//!
//! A reversed effect hits the other seat. There are only two seats, so
//! swapping between the source and its opponent covers every id.

use crate::core::PlayerId;

/// Resolve an intended target to the actual one.
///
/// ```
/// use duel_engine::core::PlayerId;
/// use duel_engine::effects::resolve_target;
///
/// let src = PlayerId::ONE;
/// assert_eq!(resolve_target(src, false, PlayerId::TWO), PlayerId::TWO);
/// assert_eq!(resolve_target(src, true, PlayerId::TWO), PlayerId::ONE);
/// assert_eq!(resolve_target(src, true, PlayerId::ONE), PlayerId::TWO);
/// ```
#[must_use]
pub fn resolve_target(source: PlayerId, is_reversed: bool, intended: PlayerId) -> PlayerId {
    if !is_reversed {
        return intended;
    }
    if intended == source {
        source.opponent()
    } else if intended == source.opponent() {
        source
    } else {
        intended
    }
}
