//! Action processor: the single gate between intent and mutation.
//!
//! ## Pipeline
//!
//! 1. Integrity check of the incoming state (fatal on failure)
//! 2. Finished game: everything but `Quit` is rejected
//! 3. Meta actions are handed back untouched
//! 4. Priority: only the side holding priority may act
//! 5. Static phase table, then side restrictions
//! 6. Apply to a clone through the store or the combat resolver
//!
//! A rejected action never changes the caller's state: all work happens on
//! the clone, which is dropped on error.

use crate::cards::CardCategory;
use crate::combat::{self, Exchange};
use crate::core::action::{Action, ActionKind};
use crate::core::entity::CardId;
use crate::core::error::{EngineError, ValidationError};
use crate::core::side::Side;
use crate::core::state::{GameState, Phase};

use super::sequencer::{self, Transition};
use super::store;

/// What an applied game action did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    /// A card moved from hand to field.
    Installed(CardId),
    /// An attack is waiting for its block.
    AttackDeclared(CardId),
    /// The pending attack was resolved.
    Resolved(Exchange),
    /// The phase advanced.
    Advanced(Transition),
}

/// Result of a successful `apply_action`.
#[derive(Clone, Debug)]
pub enum Outcome {
    /// A game action was applied; `state` is the new authoritative state.
    Applied { state: GameState, effect: Effect },
    /// A meta action for an outside collaborator. State is unchanged.
    Meta(ActionKind),
}

impl Outcome {
    /// The new state, if a game action was applied.
    #[must_use]
    pub fn state(&self) -> Option<&GameState> {
        match self {
            Outcome::Applied { state, .. } => Some(state),
            Outcome::Meta(_) => None,
        }
    }

    #[must_use]
    pub fn into_state(self) -> Option<GameState> {
        match self {
            Outcome::Applied { state, .. } => Some(state),
            Outcome::Meta(_) => None,
        }
    }

    #[must_use]
    pub fn effect(&self) -> Option<&Effect> {
        match self {
            Outcome::Applied { effect, .. } => Some(effect),
            Outcome::Meta(_) => None,
        }
    }
}

/// Phases in which each game action kind may be submitted.
#[must_use]
pub const fn permitted_in(kind: ActionKind, phase: Phase) -> bool {
    match kind {
        ActionKind::PlayResource | ActionKind::PlayCard => matches!(phase, Phase::Main),
        ActionKind::Attack | ActionKind::Block => matches!(phase, Phase::Combat),
        ActionKind::EndPhase => true,
        ActionKind::Help | ActionKind::Save | ActionKind::Load | ActionKind::Quit => true,
    }
}

/// Side an action kind is restricted to, if any.
#[must_use]
pub const fn restricted_to(kind: ActionKind) -> Option<Side> {
    match kind {
        ActionKind::Attack => Some(Side::Intruder),
        ActionKind::Block => Some(Side::Defender),
        _ => None,
    }
}

/// Validate `action` from `side` and apply it to a copy of `state`.
pub fn apply_action(state: &GameState, side: Side, action: Action) -> Result<Outcome, EngineError> {
    let result = process(state, side, action);
    if let Err(err) = &result {
        if err.is_recoverable() {
            tracing::warn!(%side, kind = %action.kind(), error = %err, "action rejected");
        } else {
            tracing::error!(%side, kind = %action.kind(), error = %err, "state integrity violated");
        }
    }
    result
}

/// Check whether `action` would be accepted, without keeping any result.
pub fn validate(state: &GameState, side: Side, action: Action) -> Result<(), EngineError> {
    process(state, side, action).map(|_| ())
}

/// Every game action `side` could submit right now.
///
/// Meta actions are always available and are not listed. A finished game
/// has no legal game actions.
#[must_use]
pub fn legal_actions(state: &GameState, side: Side) -> Vec<Action> {
    if state.is_over || state.priority != side {
        return Vec::new();
    }

    let player = &state.sides[side];
    let mut candidates = Vec::new();
    for hand_index in 0..player.hand().len() {
        candidates.push(Action::PlayResource { hand_index });
        candidates.push(Action::PlayCard { hand_index });
    }
    for field_index in 0..state.sides[Side::Intruder].field().len() {
        candidates.push(Action::Attack { field_index });
    }
    if let Some(attacker_index) = state.combat.pending_attack {
        candidates.push(Action::Block {
            attacker_index,
            blocker_index: None,
        });
        for blocker_index in 0..state.sides[Side::Defender].field().len() {
            candidates.push(Action::Block {
                attacker_index,
                blocker_index: Some(blocker_index),
            });
        }
    }
    candidates.push(Action::EndPhase);

    candidates
        .into_iter()
        .filter(|action| validate(state, side, *action).is_ok())
        .collect()
}

fn process(state: &GameState, side: Side, action: Action) -> Result<Outcome, EngineError> {
    state.check_integrity()?;

    let kind = action.kind();
    if state.is_over && kind != ActionKind::Quit {
        return Err(ValidationError::GameOver.into());
    }
    if kind.is_meta() {
        return Ok(Outcome::Meta(kind));
    }
    if side != state.priority {
        return Err(ValidationError::NotYourPriority {
            side,
            expected: state.priority,
        }
        .into());
    }
    if !permitted_in(kind, state.phase) {
        return Err(ValidationError::WrongPhase {
            kind,
            phase: state.phase,
        }
        .into());
    }
    if restricted_to(kind).is_some_and(|only| only != side) {
        return Err(ValidationError::WrongSide { kind, side }.into());
    }

    let mut next = state.clone();
    let effect = match action {
        Action::PlayResource { hand_index } => {
            require_category(&next, side, hand_index, CardCategory::Resource)?;
            Effect::Installed(store::move_card_to_field(&mut next, side, hand_index)?)
        }
        Action::PlayCard { hand_index } => {
            require_installable(&next, side, hand_index)?;
            Effect::Installed(store::move_card_to_field(&mut next, side, hand_index)?)
        }
        Action::Attack { field_index } => {
            Effect::AttackDeclared(combat::declare_attack(&mut next, field_index)?)
        }
        Action::Block {
            attacker_index,
            blocker_index,
        } => Effect::Resolved(combat::declare_block(&mut next, attacker_index, blocker_index)?),
        Action::EndPhase => {
            if next.combat.pending_attack.is_some() {
                return Err(ValidationError::AttackPending.into());
            }
            Effect::Advanced(sequencer::advance_phase(&mut next))
        }
        Action::Help | Action::Save | Action::Load | Action::Quit => {
            return Ok(Outcome::Meta(kind));
        }
    };

    store::record_action(&mut next, side, action);
    tracing::debug!(%side, %kind, turn = next.turn_number, "action applied");
    Ok(Outcome::Applied {
        state: next,
        effect,
    })
}

/// An out-of-range index passes through; the store reports it.
fn require_category(
    state: &GameState,
    side: Side,
    hand_index: usize,
    expected: CardCategory,
) -> Result<(), ValidationError> {
    match state.sides[side].hand().get(hand_index) {
        Some(card) if card.category != expected => Err(ValidationError::WrongCategory {
            expected,
            found: card.category,
        }),
        _ => Ok(()),
    }
}

/// `PlayCard` takes only a category restricted to the acting side.
fn require_installable(state: &GameState, side: Side, hand_index: usize) -> Result<(), ValidationError> {
    match state.sides[side].hand().get(hand_index) {
        Some(card) if card.category.restricted_to() != Some(side) => Err(ValidationError::NotInstallable {
            side,
            found: card.category,
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Card, Subtype};
    use crate::core::error::{CombatError, IntegrityError};
    use crate::core::state::fixtures::*;

    fn apply(state: &GameState, side: Side, action: Action) -> GameState {
        apply_action(state, side, action)
            .unwrap()
            .into_state()
            .unwrap()
    }

    fn to_main(state: &GameState) -> GameState {
        let state = apply(state, Side::Intruder, Action::EndPhase);
        apply(&state, Side::Intruder, Action::EndPhase)
    }

    #[test]
    fn test_phase_table() {
        assert!(permitted_in(ActionKind::PlayCard, Phase::Main));
        assert!(!permitted_in(ActionKind::PlayCard, Phase::Combat));
        assert!(permitted_in(ActionKind::Block, Phase::Combat));
        assert!(!permitted_in(ActionKind::Attack, Phase::Main));
        assert!(permitted_in(ActionKind::EndPhase, Phase::Draw));
    }

    #[test]
    fn test_play_resource_in_main() {
        let state = to_main(&new_game());

        let outcome = apply_action(&state, Side::Intruder, Action::PlayResource { hand_index: 0 }).unwrap();

        let next = outcome.state().unwrap();
        assert!(matches!(outcome.effect(), Some(Effect::Installed(_))));
        assert_eq!(next.intruder().resource_total(), 1);
        assert_eq!(next.history().len(), 3);
        // The original is untouched.
        assert_eq!(state.intruder().resource_total(), 0);
    }

    #[test]
    fn test_wrong_phase_leaves_state_unchanged() {
        let state = new_game();

        let err = apply_action(&state, Side::Intruder, Action::PlayResource { hand_index: 0 }).unwrap_err();

        assert_eq!(
            err,
            EngineError::Validation(ValidationError::WrongPhase {
                kind: ActionKind::PlayResource,
                phase: Phase::Draw,
            })
        );
        assert!(err.is_recoverable());
        assert!(state.history().is_empty());
    }

    #[test]
    fn test_non_active_side_rejected() {
        let state = new_game();

        assert_eq!(
            apply_action(&state, Side::Defender, Action::EndPhase).unwrap_err(),
            EngineError::Validation(ValidationError::NotYourPriority {
                side: Side::Defender,
                expected: Side::Intruder,
            })
        );
    }

    #[test]
    fn test_meta_actions_from_any_side() {
        let state = new_game();

        for action in [Action::Help, Action::Save, Action::Load, Action::Quit] {
            let outcome = apply_action(&state, Side::Defender, action).unwrap();
            assert!(matches!(outcome, Outcome::Meta(kind) if kind == action.kind()));
        }
    }

    #[test]
    fn test_game_over_accepts_only_quit() {
        let mut state = new_game();
        store::adjust_core_health(&mut state, -10);

        assert_eq!(
            apply_action(&state, Side::Intruder, Action::EndPhase).unwrap_err(),
            EngineError::Validation(ValidationError::GameOver)
        );
        assert_eq!(
            apply_action(&state, Side::Intruder, Action::Save).unwrap_err(),
            EngineError::Validation(ValidationError::GameOver)
        );
        assert!(matches!(
            apply_action(&state, Side::Intruder, Action::Quit),
            Ok(Outcome::Meta(ActionKind::Quit))
        ));
        assert!(legal_actions(&state, Side::Intruder).is_empty());
    }

    #[test]
    fn test_play_card_category_checks() {
        let state = to_main(&new_game());

        // Unshuffled intruder hand is all Credit Chips.
        assert_eq!(
            apply_action(&state, Side::Intruder, Action::PlayCard { hand_index: 0 }).unwrap_err(),
            EngineError::Validation(ValidationError::NotInstallable {
                side: Side::Intruder,
                found: CardCategory::Resource,
            })
        );
        assert_eq!(
            apply_action(&state, Side::Intruder, Action::PlayResource { hand_index: 42 }).unwrap_err(),
            EngineError::Validation(ValidationError::HandIndexOutOfRange { index: 42, len: 7 })
        );
    }

    #[test]
    fn test_defender_cannot_install_unit() {
        let mut state = new_game();
        state.active_side = Side::Defender;
        state.priority = Side::Defender;
        state.phase = Phase::Main;
        let id = state.ids.alloc();
        state.sides[Side::Defender].zones.push_hand(Card::unit(id, "Stray Fracter", 0, 2, 2, None));
        state.dealt[Side::Defender] += 1;
        let hand_index = state.defender().hand().len() - 1;

        assert_eq!(
            apply_action(&state, Side::Defender, Action::PlayCard { hand_index }).unwrap_err(),
            EngineError::Validation(ValidationError::NotInstallable {
                side: Side::Defender,
                found: CardCategory::Unit,
            })
        );
        assert!(!legal_actions(&state, Side::Defender).contains(&Action::PlayCard { hand_index }));
    }

    #[test]
    fn test_attack_and_block_through_priority() {
        let mut state = new_game();
        install(
            &mut state,
            Side::Intruder,
            Card::unit(CardId(0), "Corroder", 1, 2, 2, Some(Subtype::Fracter)),
        );
        enter_combat(&mut state);

        let state = apply(&state, Side::Intruder, Action::Attack { field_index: 0 });
        assert_eq!(state.priority(), Side::Defender);

        assert_eq!(
            apply_action(&state, Side::Intruder, Action::EndPhase).unwrap_err(),
            EngineError::Validation(ValidationError::NotYourPriority {
                side: Side::Intruder,
                expected: Side::Defender,
            })
        );
        assert_eq!(
            apply_action(&state, Side::Defender, Action::Attack { field_index: 0 }).unwrap_err(),
            EngineError::Validation(ValidationError::WrongSide {
                kind: ActionKind::Attack,
                side: Side::Defender,
            })
        );

        let state = apply(
            &state,
            Side::Defender,
            Action::Block {
                attacker_index: 0,
                blocker_index: None,
            },
        );
        assert_eq!(state.core().current_health(), 8);
        assert_eq!(state.priority(), Side::Intruder);
    }

    #[test]
    fn test_block_with_missing_barrier_is_combat_error() {
        let mut state = new_game();
        install(&mut state, Side::Intruder, Card::unit(CardId(0), "Corroder", 1, 2, 2, None));
        enter_combat(&mut state);
        let state = apply(&state, Side::Intruder, Action::Attack { field_index: 0 });

        let err = apply_action(
            &state,
            Side::Defender,
            Action::Block {
                attacker_index: 0,
                blocker_index: Some(0),
            },
        )
        .unwrap_err();

        assert_eq!(
            err,
            EngineError::Combat(CombatError::BlockerIndexOutOfRange { index: 0, len: 0 })
        );
        assert_eq!(state.pending_attack(), Some(0));
    }

    #[test]
    fn test_end_phase_rejected_while_attack_pending() {
        let mut state = new_game();
        install(&mut state, Side::Intruder, Card::unit(CardId(0), "Corroder", 1, 2, 2, None));
        enter_combat(&mut state);
        let state = apply(&state, Side::Intruder, Action::Attack { field_index: 0 });

        assert_eq!(
            apply_action(&state, Side::Defender, Action::EndPhase).unwrap_err(),
            EngineError::Validation(ValidationError::AttackPending)
        );
        assert!(!legal_actions(&state, Side::Defender).contains(&Action::EndPhase));
    }

    #[test]
    fn test_integrity_failure_is_fatal() {
        let mut state = new_game();
        state.sides[Side::Intruder].resource_available = 5;

        let err = apply_action(&state, Side::Intruder, Action::EndPhase).unwrap_err();

        assert!(matches!(
            err,
            EngineError::Integrity(IntegrityError::ResourceOverflow { .. })
        ));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_legal_actions_in_main() {
        let state = to_main(&new_game());

        let actions = legal_actions(&state, Side::Intruder);

        // Seven Credit Chips in hand, each playable as a resource, plus EndPhase.
        assert_eq!(actions.len(), 8);
        assert!(actions.contains(&Action::PlayResource { hand_index: 6 }));
        assert!(actions.contains(&Action::EndPhase));
        assert!(legal_actions(&state, Side::Defender).is_empty());
    }

    #[test]
    fn test_legal_actions_for_pending_block() {
        let mut state = new_game();
        install(&mut state, Side::Intruder, Card::unit(CardId(0), "Corroder", 1, 2, 2, None));
        install(
            &mut state,
            Side::Defender,
            Card::barrier(CardId(0), "Ice Wall", 1, 2, 3, Some(Subtype::Barrier)),
        );
        install(&mut state, Side::Defender, Card::resource(CardId(0), "Credit Chip", 0));
        enter_combat(&mut state);
        let state = apply(&state, Side::Intruder, Action::Attack { field_index: 0 });

        let actions = legal_actions(&state, Side::Defender);

        assert_eq!(
            actions,
            vec![
                Action::Block {
                    attacker_index: 0,
                    blocker_index: None
                },
                Action::Block {
                    attacker_index: 0,
                    blocker_index: Some(0)
                },
            ]
        );
    }
}
