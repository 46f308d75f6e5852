//! Phase sequencer: the `phase x active side` state machine.
//!
//! ```text
//! Intruder: Draw -> Resource -> Main -> Combat -> Defender Draw
//! Defender: Draw -> Resource -> Main -> Intruder Draw (turn + 1)
//! ```
//!
//! Entry actions run once for the phase being entered:
//! - Draw: the new active side draws
//! - Resource: available resource is refilled to capacity
//! - Main, Combat: nothing
//!
//! The terminal condition is re-evaluated before returning, since entering
//! Draw can end the game.

use crate::combat;
use crate::core::log::LogCategory;
use crate::core::side::Side;
use crate::core::state::{GameState, Phase};

use super::store;

/// Where the game moved on a phase advance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub from: (Side, Phase),
    pub to: (Side, Phase),
    /// Set when this advance started a new turn number.
    pub new_turn: bool,
}

/// The static transition table.
///
/// Returns the next (side, phase) and whether the turn number increments.
#[must_use]
pub const fn next_phase(side: Side, phase: Phase) -> (Side, Phase, bool) {
    match (side, phase) {
        (_, Phase::Draw) => (side, Phase::Resource, false),
        (_, Phase::Resource) => (side, Phase::Main, false),
        (Side::Intruder, Phase::Main) => (Side::Intruder, Phase::Combat, false),
        (Side::Intruder, Phase::Combat) => (Side::Defender, Phase::Draw, false),
        (Side::Defender, Phase::Main) => (Side::Intruder, Phase::Draw, true),
        // The defender never enters Combat; treat it like the end of Main.
        (Side::Defender, Phase::Combat) => (Side::Intruder, Phase::Draw, true),
    }
}

/// Advance to the next phase in place and run its entry action.
///
/// A finished game does not move; the returned transition has `from == to`.
pub fn advance_phase(state: &mut GameState) -> Transition {
    let from = (state.active_side, state.phase);
    if state.is_over {
        return Transition {
            from,
            to: from,
            new_turn: false,
        };
    }

    if state.phase == Phase::Combat {
        combat::clear_combat_effects(state);
    }

    let (side, phase, new_turn) = next_phase(state.active_side, state.phase);
    state.active_side = side;
    state.phase = phase;
    state.priority = side;
    if new_turn {
        state.turn_number += 1;
        let turn = state.turn_number;
        store::append_log(
            state,
            format!("Turn {} begins", turn),
            LogCategory::Game,
            None,
        );
    }
    store::append_log(
        state,
        format!("{} enters {} phase", side, phase),
        LogCategory::Phase,
        None,
    );
    tracing::info!(turn = state.turn_number, %side, %phase, "phase");

    run_entry_action(state);
    store::evaluate_terminal_condition(state);

    Transition {
        from,
        to: (side, phase),
        new_turn,
    }
}

/// Pure form of `advance_phase`: derive the next state from `state`.
#[must_use]
pub fn advanced(state: &GameState) -> GameState {
    let mut next = state.clone();
    advance_phase(&mut next);
    next
}

fn run_entry_action(state: &mut GameState) {
    let side = state.active_side;
    match state.phase {
        Phase::Draw => {
            let count = state.draw_per_turn;
            store::draw_cards(state, side, count);
        }
        Phase::Resource => {
            store::refresh_resources(state, side);
        }
        Phase::Main | Phase::Combat => {}
    }
}
