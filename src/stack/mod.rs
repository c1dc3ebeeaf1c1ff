//! Effect queue and interaction protocol.
//!
//! Two things can suspend the turn engine:
//!
//! - **An active effect** promoted from the FIFO of pending `on_draw` /
//!   `on_discard` triggers, waiting to be dismissed.
//! - **An interaction request**, waiting for its owner's answer.
//!
//! While either is present the phase controller makes no automatic progress
//! and no further pending effect is promoted.

mod interaction;
mod queue;

pub use interaction::{
    Answer, Continuation, InputKind, InteractionId, InteractionOption, InteractionRequest,
    InteractionResponse, Prompt,
};
pub use queue::{enqueue, is_idle, promote, PendingEffect, PendingKind};
