//! State store: the only code that mutates a `GameState`.
//!
//! Every function here is an atomic step on a state the caller owns. The
//! rule pipeline clones the authoritative state, runs one or more of these
//! steps on the clone, and swaps the clone in only if everything succeeded.
//!
//! None of these functions mutate a finished game; they return early (or
//! report the game-over condition) once `is_over` is set.

use std::collections::BTreeMap;

use crate::cards::Card;
use crate::core::action::{Action, ActionRecord};
use crate::core::entity::CardId;
use crate::core::error::ValidationError;
use crate::core::log::{metadata, LogCategory};
use crate::core::side::Side;
use crate::core::state::GameState;

/// Result of a draw request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DrawOutcome {
    /// Cards moved from deck to hand, in draw order.
    pub drawn: Vec<CardId>,
    /// Set when a draw hit an empty deck and ended the game.
    pub decked_out: bool,
}

/// Draw up to `count` cards from the front of `side`'s deck into its hand.
///
/// Attempting to draw from an empty deck is a loss for `side`: the game ends
/// in this same call with the opponent as winner.
pub fn draw_cards(state: &mut GameState, side: Side, count: usize) -> DrawOutcome {
    let mut outcome = DrawOutcome {
        drawn: Vec::with_capacity(count),
        decked_out: false,
    };
    if state.is_over {
        return outcome;
    }

    for _ in 0..count {
        match state.sides[side].zones.draw_front() {
            Some(id) => outcome.drawn.push(id),
            None => {
                outcome.decked_out = true;
                append_log(
                    state,
                    format!("{} tried to draw from an empty deck", side),
                    LogCategory::Card,
                    None,
                );
                declare_winner(state, side.opponent(), "empty deck");
                break;
            }
        }
    }

    if !outcome.drawn.is_empty() {
        let hand = state.sides[side].hand().len();
        append_log(
            state,
            format!("{} drew {} card(s)", side, outcome.drawn.len()),
            LogCategory::Card,
            metadata([("hand", hand.to_string())]),
        );
    }
    tracing::debug!(%side, drawn = outcome.drawn.len(), decked_out = outcome.decked_out, "draw");
    outcome
}

/// Install the hand card at `hand_index` onto the field tail.
///
/// Debits the card's cost; a Resource card also raises capacity by 1.
pub fn move_card_to_field(
    state: &mut GameState,
    side: Side,
    hand_index: usize,
) -> Result<CardId, ValidationError> {
    if state.is_over {
        return Err(ValidationError::GameOver);
    }

    let player = &state.sides[side];
    let len = player.hand().len();
    let card = player
        .hand()
        .get(hand_index)
        .ok_or(ValidationError::HandIndexOutOfRange { index: hand_index, len })?;
    if card.cost > player.resource_available {
        return Err(ValidationError::InsufficientResource {
            cost: card.cost,
            available: player.resource_available,
        });
    }

    let card = state.sides[side]
        .zones
        .take_from_hand(hand_index)
        .ok_or(ValidationError::HandIndexOutOfRange { index: hand_index, len })?;
    let id = card.id;
    let cost = card.cost;
    let is_resource = card.is_resource();
    let description = card.to_string();

    state.sides[side].zones.push_field(card);
    adjust_resource(state, side, -i64::from(cost));
    if is_resource {
        state.sides[side].resource_total += 1;
    }

    let (available, total) = (
        state.sides[side].resource_available,
        state.sides[side].resource_total,
    );
    append_log(
        state,
        format!("{} installed {}", side, description),
        LogCategory::Card,
        metadata([
            ("cost", cost.to_string()),
            ("available", available.to_string()),
            ("total", total.to_string()),
        ]),
    );
    tracing::debug!(%side, card = %id, cost, "install");
    Ok(id)
}

/// `available = clamp(available + delta, 0, total)`.
pub fn adjust_resource(state: &mut GameState, side: Side, delta: i64) -> u32 {
    let player = &mut state.sides[side];
    let next = (i64::from(player.resource_available) + delta).clamp(0, i64::from(player.resource_total));
    player.resource_available = next as u32;
    player.resource_available
}

/// Refill available resource to capacity.
pub fn refresh_resources(state: &mut GameState, side: Side) -> u32 {
    let player = &mut state.sides[side];
    player.resource_available = player.resource_total;
    let available = player.resource_available;
    append_log(
        state,
        format!("{} has {} resource available", side, available),
        LogCategory::Phase,
        None,
    );
    available
}

/// `health = clamp(health + delta, 0, max)`; reaching 0 ends the game.
pub fn adjust_core_health(state: &mut GameState, delta: i64) -> u32 {
    if state.is_over {
        return state.core.current_health;
    }

    let core = &mut state.core;
    let next = (i64::from(core.current_health) + delta).clamp(0, i64::from(core.max_health));
    core.current_health = next as u32;
    let (current, max) = (core.current_health, core.max_health);

    append_log(
        state,
        format!("Core health {}/{}", current, max),
        LogCategory::Combat,
        metadata([("delta", delta.to_string())]),
    );
    tracing::debug!(delta, current, "core health");

    if current == 0 {
        declare_winner(state, Side::Intruder, "core destroyed");
    }
    current
}

/// Remove the field card at `field_index`, counting it as destroyed.
pub fn remove_from_field(state: &mut GameState, side: Side, field_index: usize) -> Option<Card> {
    let card = state.sides[side].zones.remove_from_field(field_index)?;
    state.destroyed[side] += 1;
    append_log(
        state,
        format!("{} lost {}", side, card),
        LogCategory::Combat,
        None,
    );
    tracing::debug!(%side, card = %card.id, "destroyed");
    Some(card)
}

/// Append to the event log (retention trim applied by the log).
pub fn append_log(
    state: &mut GameState,
    message: impl Into<String>,
    category: LogCategory,
    metadata: Option<BTreeMap<String, String>>,
) -> u64 {
    state.log.append(message, category, metadata)
}

/// Record a successfully applied action in the replay history.
pub fn record_action(state: &mut GameState, side: Side, action: Action) {
    let sequence = state.action_sequence;
    state.action_sequence += 1;
    state
        .history
        .push_back(ActionRecord::new(side, action, state.turn_number, sequence));
}

/// Set the game over if a terminal condition holds. Idempotent.
///
/// Checked in order:
/// 1. Core health 0: Intruder wins.
/// 2. Defender has no deck, no hand, and no barrier: Intruder wins.
/// 3. Intruder has no deck, no hand, and no unit: Defender wins.
pub fn evaluate_terminal_condition(state: &mut GameState) -> Option<Side> {
    if state.is_over {
        return state.winner;
    }

    if state.core.current_health == 0 {
        declare_winner(state, Side::Intruder, "core destroyed");
    } else if exhausted(state, Side::Defender) {
        declare_winner(state, Side::Intruder, "defender exhausted");
    } else if exhausted(state, Side::Intruder) {
        declare_winner(state, Side::Defender, "intruder exhausted");
    }
    state.winner
}

/// A side with nothing left to draw, play, or fight with.
fn exhausted(state: &GameState, side: Side) -> bool {
    let player = &state.sides[side];
    let fighter = |c: &Card| match side {
        Side::Intruder => c.is_unit(),
        Side::Defender => c.is_barrier(),
    };
    player.deck().is_empty() && player.hand().is_empty() && !player.field().iter().any(fighter)
}

fn declare_winner(state: &mut GameState, winner: Side, reason: &str) {
    if state.is_over {
        return;
    }
    state.is_over = true;
    state.winner = Some(winner);
    state.combat.pending_attack = None;
    append_log(
        state,
        format!("{} wins ({})", winner, reason),
        LogCategory::Game,
        metadata([("reason", reason.to_string())]),
    );
    tracing::info!(%winner, reason, turn = state.turn_number, "game over");
}
