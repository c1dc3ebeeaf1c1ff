//! Card system: definitions, instances, marks, hooks and the catalog.
//!
//! ## Key Types
//!
//! - `CardId`: Identifier for card definitions
//! - `CardDefinition`: Static card data (suit, rank, keywords, field profile)
//! - `Card`: A definition instantiated with a stable `InstanceId`
//! - `Mark`: The single overwritable tag a card instance can carry
//! - `HookSet`: The behavior a card plugs into the engine
//! - `CardCatalog`: Definition and hook lookup, injected into the engine

pub mod definition;
pub mod hooks;
pub mod instance;
pub mod mark;
pub mod registry;

pub use definition::{
    CardDefinition, CardId, FieldActivation, FieldProfile, FieldPulse, Keywords, Suit,
};
pub use hooks::{HookFn, HookKind, HookSet, InstantCheck, InteractionHook};
pub use instance::{Card, InstanceId};
pub use mark::{add_mark, Mark};
pub use registry::CardCatalog;
