//! Rules: the state store, the phase sequencer, and the action processor.
//!
//! - `store`: atomic mutations of a `GameState`; nothing else writes state
//! - `sequencer`: the phase cycle and its entry actions
//! - `processor`: validates inbound actions and routes them to the store,
//!   the sequencer, or the combat resolver
//!
//! Callers normally only need `apply_action` and `legal_actions`.

pub mod processor;
pub mod sequencer;
pub mod store;

pub use processor::{apply_action, legal_actions, validate, Effect, Outcome};
pub use sequencer::{advance_phase, advanced, next_phase, Transition};
pub use store::DrawOutcome;
