//! Network boundary.
//!
//! A match snapshot is plain data: card behavior lives in the catalog and is
//! looked up by [`CardId`], so nothing function-valued ever crosses the wire.
//! On the receiving side every card's definition is re-merged against the
//! local catalog, which makes the catalog authoritative and rejects
//! snapshots that mention cards the receiver does not know. Player ids are
//! checked while deserializing, so a snapshot naming a third seat is a
//! [`WireError::Decode`].
//!
//! ```
//! use duel_engine::{demo, net};
//!
//! let catalog = demo::catalog();
//! let state = demo::started_match(&catalog, 5);
//!
//! let bytes = net::encode(&state).unwrap();
//! let back = net::decode(&bytes, &catalog).unwrap();
//! assert_eq!(back.turn_count, state.turn_count);
//! ```

use crate::cards::{Card, CardCatalog, CardId};
use crate::core::Match;
use crate::error::WireError;

/// Serialize a snapshot with bincode.
pub fn encode(state: &Match) -> Result<Vec<u8>, WireError> {
    bincode::serialize(state).map_err(|e| WireError::Encode(e.to_string()))
}

/// Serialize a snapshot as JSON, for debugging and web clients.
pub fn encode_json(state: &Match) -> Result<String, WireError> {
    serde_json::to_string(state).map_err(|e| WireError::Encode(e.to_string()))
}

/// Deserialize a bincode snapshot and re-merge it against `catalog`.
pub fn decode(bytes: &[u8], catalog: &CardCatalog) -> Result<Match, WireError> {
    let state: Match = bincode::deserialize(bytes).map_err(|e| WireError::Decode(e.to_string()))?;
    hydrate(state, catalog)
}

/// Deserialize a JSON snapshot and re-merge it against `catalog`.
pub fn decode_json(text: &str, catalog: &CardCatalog) -> Result<Match, WireError> {
    let state: Match = serde_json::from_str(text).map_err(|e| WireError::Decode(e.to_string()))?;
    hydrate(state, catalog)
}

fn remerge(card: &mut Card, catalog: &CardCatalog) -> Result<(), CardId> {
    let definition = catalog.get(card.card_id()).ok_or(card.card_id())?;
    card.definition = definition.clone();
    Ok(())
}

/// Replace every card's definition with the catalog's.
pub fn hydrate(mut state: Match, catalog: &CardCatalog) -> Result<Match, WireError> {
    let mut missing = None;
    let mut visit = |card: &mut Card| {
        if let Err(id) = remerge(card, catalog) {
            missing.get_or_insert(id);
        }
    };

    for p in state.players.iter_mut().map(|(_, p)| p) {
        p.deck.iter_mut().for_each(&mut visit);
        p.hand.iter_mut().for_each(&mut visit);
        p.discard_pile.iter_mut().for_each(&mut visit);
        p.vault.iter_mut().for_each(&mut visit);
        p.field_slot.iter_mut().for_each(&mut visit);
    }
    if let Some(field) = state.field.as_mut() {
        visit(&mut field.card);
    }
    state.pending_effects.iter_mut().for_each(|e| visit(&mut e.card));
    if let Some(effect) = state.active_effect.as_mut() {
        visit(&mut effect.card);
    }
    if let Some(card) = state.interaction.as_mut().and_then(|r| r.source_card.as_mut()) {
        visit(card);
    }

    match missing {
        Some(id) => Err(WireError::UnknownCard(id)),
        None => Ok(state),
    }
}
