//! Card effect hook contract.
//!
//! A card's behavior is a [`HookSet`] registered in the catalog against its
//! [`CardId`](super::CardId). The engine calls hooks at fixed points of the
//! turn and never looks at what they do: hooks act exclusively through the
//! primitives on [`EffectContext`] and by opening interaction requests.

use std::fmt;
use std::sync::Arc;

use crate::core::InstantWindow;
use crate::effects::EffectContext;
use crate::stack::{Answer, Continuation};

/// A hook body.
pub type HookFn = Arc<dyn Fn(&mut EffectContext<'_>) + Send + Sync>;

/// Decides whether a card may be played in an instant window.
pub type InstantCheck = Arc<dyn Fn(InstantWindow) -> bool + Send + Sync>;

/// Continues a decision tree after an interaction this card opened is answered.
pub type InteractionHook = Arc<dyn Fn(&mut EffectContext<'_>, &Continuation, &Answer) + Send + Sync>;

/// The hook points a card may implement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HookKind {
    Draw,
    ResolveStatus,
    Reveal,
    Instant,
    Discard,
}

/// All behavior of one card definition.
///
/// ```
/// use duel_engine::cards::{HookKind, HookSet};
///
/// let hooks = HookSet::new().on_reveal(|ctx| {
///     let foe = ctx.source().opponent();
///     ctx.damage(foe, 3, false);
/// });
/// assert!(hooks.has(HookKind::Reveal));
/// assert!(!hooks.has(HookKind::Draw));
/// ```
#[derive(Clone)]
pub struct HookSet {
    can_set: bool,
    can_instant: Option<InstantCheck>,
    on_draw: Option<HookFn>,
    on_resolve_status: Option<HookFn>,
    on_reveal: Option<HookFn>,
    on_instant: Option<HookFn>,
    on_discard: Option<HookFn>,
    on_interaction: Option<InteractionHook>,
}

impl Default for HookSet {
    fn default() -> Self {
        Self {
            can_set: true,
            can_instant: None,
            on_draw: None,
            on_resolve_status: None,
            on_reveal: None,
            on_instant: None,
            on_discard: None,
            on_interaction: None,
        }
    }
}

impl HookSet {
    /// A card with no behavior that can be set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // === Builders ===

    /// Forbid committing this card in the Set phase.
    #[must_use]
    pub fn unsettable(mut self) -> Self {
        self.can_set = false;
        self
    }

    #[must_use]
    pub fn instant_when(mut self, check: impl Fn(InstantWindow) -> bool + Send + Sync + 'static) -> Self {
        self.can_instant = Some(Arc::new(check));
        self
    }

    #[must_use]
    pub fn on_draw(mut self, hook: impl Fn(&mut EffectContext<'_>) + Send + Sync + 'static) -> Self {
        self.on_draw = Some(Arc::new(hook));
        self
    }

    #[must_use]
    pub fn on_resolve_status(mut self, hook: impl Fn(&mut EffectContext<'_>) + Send + Sync + 'static) -> Self {
        self.on_resolve_status = Some(Arc::new(hook));
        self
    }

    #[must_use]
    pub fn on_reveal(mut self, hook: impl Fn(&mut EffectContext<'_>) + Send + Sync + 'static) -> Self {
        self.on_reveal = Some(Arc::new(hook));
        self
    }

    #[must_use]
    pub fn on_instant(mut self, hook: impl Fn(&mut EffectContext<'_>) + Send + Sync + 'static) -> Self {
        self.on_instant = Some(Arc::new(hook));
        self
    }

    #[must_use]
    pub fn on_discard(mut self, hook: impl Fn(&mut EffectContext<'_>) + Send + Sync + 'static) -> Self {
        self.on_discard = Some(Arc::new(hook));
        self
    }

    #[must_use]
    pub fn on_interaction(
        mut self,
        hook: impl Fn(&mut EffectContext<'_>, &Continuation, &Answer) + Send + Sync + 'static,
    ) -> Self {
        self.on_interaction = Some(Arc::new(hook));
        self
    }

    // === Queries ===

    #[must_use]
    pub fn can_set(&self) -> bool {
        self.can_set
    }

    #[must_use]
    pub fn can_instant(&self, window: InstantWindow) -> bool {
        self.can_instant.as_ref().is_some_and(|check| check(window))
    }

    /// Whether the hook point is implemented.
    #[must_use]
    pub fn has(&self, kind: HookKind) -> bool {
        self.get(kind).is_some()
    }

    /// The hook body for a hook point, if implemented.
    #[must_use]
    pub fn get(&self, kind: HookKind) -> Option<HookFn> {
        match kind {
            HookKind::Draw => self.on_draw.clone(),
            HookKind::ResolveStatus => self.on_resolve_status.clone(),
            HookKind::Reveal => self.on_reveal.clone(),
            HookKind::Instant => self.on_instant.clone(),
            HookKind::Discard => self.on_discard.clone(),
        }
    }

    #[must_use]
    pub fn interaction(&self) -> Option<InteractionHook> {
        self.on_interaction.clone()
    }
}

impl fmt::Debug for HookSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookSet")
            .field("can_set", &self.can_set)
            .field("can_instant", &self.can_instant.is_some())
            .field("on_draw", &self.on_draw.is_some())
            .field("on_resolve_status", &self.on_resolve_status.is_some())
            .field("on_reveal", &self.on_reveal.is_some())
            .field("on_instant", &self.on_instant.is_some())
            .field("on_discard", &self.on_discard.is_some())
            .field("on_interaction", &self.on_interaction.is_some())
            .finish()
    }
}
