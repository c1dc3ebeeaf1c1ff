//! Reveal-phase execution order.

use crate::core::PlayerId;

/// Order in which the two committed cards resolve.
///
/// The lower effective rank resolves first. Player 1 goes first unless their
/// rank is strictly greater than player 2's, so ties always give
/// `[ONE, TWO]`. A missing card compares as a tie.
///
/// ```
/// use duel_engine::core::PlayerId;
/// use duel_engine::rules::execution_order;
///
/// assert_eq!(execution_order(Some(10), Some(5)), [PlayerId::TWO, PlayerId::ONE]);
/// assert_eq!(execution_order(Some(5), Some(5)), [PlayerId::ONE, PlayerId::TWO]);
/// assert_eq!(execution_order(None, Some(1)), [PlayerId::ONE, PlayerId::TWO]);
/// ```
#[must_use]
pub fn execution_order(first: Option<i32>, second: Option<i32>) -> [PlayerId; 2] {
    match (first, second) {
        (Some(a), Some(b)) if a > b => [PlayerId::TWO, PlayerId::ONE],
        _ => [PlayerId::ONE, PlayerId::TWO],
    }
}
