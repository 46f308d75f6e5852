//! Attack and block resolution.
//!
//! One attacker, at most one blocker, per declared attack:
//! 1. `declare_attack` marks a unit as attacking and hands priority to the
//!    Defender. No damage yet.
//! 2. `declare_block` answers with a barrier or with no blocker. Damage on
//!    both sides is computed from the pre-combat cards, then applied at once.
//! 3. `clear_combat_effects` runs when Combat ends.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::damage::{effective_damage, is_destroyed};
use crate::core::action::ActionKind;
use crate::core::entity::CardId;
use crate::core::error::{CombatError, EngineError, ValidationError};
use crate::core::log::{metadata, LogCategory};
use crate::core::side::Side;
use crate::core::state::{GameState, Phase};
use crate::rules::store;

/// What happened in one attack.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exchange {
    pub attacker: CardId,
    pub blocker: Option<CardId>,
    /// Damage dealt by the attacker (to the blocker, or to the core).
    pub attacker_damage: u32,
    /// Damage dealt by the blocker to the attacker.
    pub blocker_damage: u32,
    /// Cards removed from the field by this exchange.
    pub destroyed: SmallVec<[CardId; 2]>,
}

fn require_combat(state: &GameState, kind: ActionKind) -> Result<(), ValidationError> {
    if state.is_over {
        return Err(ValidationError::GameOver);
    }
    if state.phase != Phase::Combat || state.active_side != Side::Intruder {
        return Err(ValidationError::WrongPhase {
            kind,
            phase: state.phase,
        });
    }
    Ok(())
}

/// Declare an attack with the Intruder field card at `attacker_index`.
pub fn declare_attack(state: &mut GameState, attacker_index: usize) -> Result<CardId, EngineError> {
    require_combat(state, ActionKind::Attack)?;
    if state.combat.pending_attack.is_some() {
        return Err(CombatError::AttackPending.into());
    }

    let field = state.sides[Side::Intruder].field();
    let attacker = field.get(attacker_index).ok_or(CombatError::AttackerIndexOutOfRange {
        index: attacker_index,
        len: field.len(),
    })?;
    if !attacker.is_unit() {
        return Err(CombatError::NotAUnit { id: attacker.id }.into());
    }
    if state.combat.attacked.contains(&attacker.id) {
        return Err(CombatError::AlreadyAttacked { id: attacker.id }.into());
    }

    let id = attacker.id;
    let description = attacker.to_string();
    state.combat.pending_attack = Some(attacker_index);
    state.combat.attacked.push_back(id);
    state.priority = Side::Defender;

    store::append_log(
        state,
        format!("Intruder attacks with {}", description),
        LogCategory::Combat,
        metadata([("attacker_index", attacker_index.to_string())]),
    );
    tracing::debug!(attacker = %id, attacker_index, "attack declared");
    Ok(id)
}

/// Whether the Defender field card at `blocker_index` may block right now.
#[must_use]
pub fn can_block(state: &GameState, blocker_index: usize) -> bool {
    !state.is_over
        && state.phase == Phase::Combat
        && state.combat.pending_attack.is_some()
        && state.sides[Side::Defender]
            .field()
            .get(blocker_index)
            .is_some_and(|c| c.is_barrier())
}

/// Resolve the pending attack at `attacker_index`, blocked or not.
pub fn declare_block(
    state: &mut GameState,
    attacker_index: usize,
    blocker_index: Option<usize>,
) -> Result<Exchange, EngineError> {
    require_combat(state, ActionKind::Block)?;
    let pending = state.combat.pending_attack.ok_or(CombatError::NoPendingAttack)?;
    if pending != attacker_index {
        return Err(CombatError::AttackerMismatch {
            given: attacker_index,
            pending,
        }
        .into());
    }

    let intruder_field = state.sides[Side::Intruder].field();
    let attacker = intruder_field
        .get(attacker_index)
        .ok_or(CombatError::AttackerIndexOutOfRange {
            index: attacker_index,
            len: intruder_field.len(),
        })?
        .clone();

    let blocker = match blocker_index {
        None => None,
        Some(index) => {
            let defender_field = state.sides[Side::Defender].field();
            let card = defender_field
                .get(index)
                .ok_or(CombatError::BlockerIndexOutOfRange {
                    index,
                    len: defender_field.len(),
                })?;
            if !card.is_barrier() {
                return Err(CombatError::NotABarrier { id: card.id }.into());
            }
            Some((index, card.clone()))
        }
    };

    // Both sides' damage comes from the cards as they stood before combat.
    let attacker_damage = effective_damage(&attacker, blocker.as_ref().and_then(|(_, b)| b.subtype));
    let blocker_damage = blocker.as_ref().map_or(0, |(_, b)| effective_damage(b, attacker.subtype));

    let mut exchange = Exchange {
        attacker: attacker.id,
        blocker: blocker.as_ref().map(|(_, b)| b.id),
        attacker_damage,
        blocker_damage,
        destroyed: SmallVec::new(),
    };

    match &blocker {
        None => {
            store::append_log(
                state,
                format!("{} is unblocked and hits the core for {}", attacker, attacker_damage),
                LogCategory::Combat,
                metadata([("damage", attacker_damage.to_string())]),
            );
            store::adjust_core_health(state, -i64::from(attacker_damage));
        }
        Some((index, card)) => {
            store::append_log(
                state,
                format!(
                    "{} blocks {}: deals {}, takes {}",
                    card, attacker, blocker_damage, attacker_damage
                ),
                LogCategory::Combat,
                metadata([
                    ("attacker_damage", attacker_damage.to_string()),
                    ("blocker_damage", blocker_damage.to_string()),
                ]),
            );
            if is_destroyed(card, attacker_damage) {
                store::remove_from_field(state, Side::Defender, *index);
                exchange.destroyed.push(card.id);
            }
            if is_destroyed(&attacker, blocker_damage) {
                store::remove_from_field(state, Side::Intruder, attacker_index);
                state.combat.attacked.retain(|&id| id != attacker.id);
                exchange.destroyed.push(attacker.id);
            }
        }
    }

    state.combat.pending_attack = None;
    state.priority = Side::Intruder;
    store::evaluate_terminal_condition(state);

    tracing::debug!(
        attacker = %exchange.attacker,
        blocked = exchange.blocker.is_some(),
        attacker_damage,
        blocker_damage,
        destroyed = exchange.destroyed.len(),
        "attack resolved"
    );
    Ok(exchange)
}

/// End-of-combat cleanup.
///
/// There are no temporary modifiers to revert; this forgets which units
/// attacked and logs the end of combat.
pub fn clear_combat_effects(state: &mut GameState) {
    state.combat.pending_attack = None;
    state.combat.attacked.clear();
    store::append_log(state, "Combat ends", LogCategory::Phase, None);
}
