//! Error taxonomy.
//!
//! - `ValidationError`: the action is illegal right now (recoverable).
//! - `CombatError`: bad attacker/blocker declaration (recoverable).
//! - `IntegrityError`: the state itself violates an invariant (fatal defect).
//!
//! Recoverable errors always leave the state unchanged.

use thiserror::Error;

use super::action::ActionKind;
use super::entity::CardId;
use super::side::Side;
use super::state::Phase;
use crate::cards::{CardCategory, Template};

/// Illegal action for the current phase, side, zone, or resource state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("the game is over")]
    GameOver,

    #[error("{side} cannot act: waiting on {expected}")]
    NotYourPriority { side: Side, expected: Side },

    #[error("{kind} is not allowed during the {phase} phase")]
    WrongPhase { kind: ActionKind, phase: Phase },

    #[error("{kind} is not available to the {side}")]
    WrongSide { kind: ActionKind, side: Side },

    #[error("no card at hand index {index} (hand has {len})")]
    HandIndexOutOfRange { index: usize, len: usize },

    #[error("card costs {cost} but only {available} resource is available")]
    InsufficientResource { cost: u32, available: u32 },

    #[error("expected a {expected} card, found {found}")]
    WrongCategory {
        expected: CardCategory,
        found: CardCategory,
    },

    #[error("the {side} cannot install a {found} card")]
    NotInstallable { side: Side, found: CardCategory },

    #[error("an attack is waiting for a block declaration")]
    AttackPending,
}

/// Illegal attacker or blocker declaration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CombatError {
    #[error("no card at intruder field index {index} (field has {len})")]
    AttackerIndexOutOfRange { index: usize, len: usize },

    #[error("{id} is not a unit and cannot attack")]
    NotAUnit { id: CardId },

    #[error("{id} has already attacked this combat")]
    AlreadyAttacked { id: CardId },

    #[error("another attack is already waiting for a block")]
    AttackPending,

    #[error("there is no attack to block")]
    NoPendingAttack,

    #[error("block names attacker index {given} but the pending attacker is at {pending}")]
    AttackerMismatch { given: usize, pending: usize },

    #[error("no card at defender field index {index} (field has {len})")]
    BlockerIndexOutOfRange { index: usize, len: usize },

    #[error("{id} is not a barrier and cannot block")]
    NotABarrier { id: CardId },
}

/// A state invariant is violated. Treated as a defect, never recovered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrityError {
    #[error("card {id} appears in more than one zone")]
    DuplicateCard { id: CardId },

    #[error("{side} has {available} resource available but capacity {total}")]
    ResourceOverflow {
        side: Side,
        available: u32,
        total: u32,
    },

    #[error("core health {current} exceeds maximum {max}")]
    HealthOutOfRange { current: u32, max: u32 },

    #[error("core maximum health must be positive")]
    NonPositiveMaxHealth,

    #[error("turn number must start at 1")]
    ZeroTurnNumber,

    #[error("combat phase during the {side} turn")]
    CombatOutsideIntruderTurn { side: Side },

    #[error("pending attack outside the combat phase")]
    PendingAttackOutsideCombat,

    #[error("units recorded as attacking outside the combat phase")]
    AttackedOutsideCombat,

    #[error("{priority} holds priority but {expected} should")]
    PriorityMismatch { priority: Side, expected: Side },

    #[error("pending attacker index {index} is past the intruder field ({len})")]
    PendingAttackerMissing { index: usize, len: usize },

    #[error("{id} is recorded as attacking but is not on the intruder field")]
    StaleAttacker { id: CardId },

    #[error("game-over flag and winner disagree")]
    WinnerMismatch,

    #[error("card {id} has stats inconsistent with its category")]
    MissingStats { id: CardId },

    #[error("card {id} is a {category} held by the {side}")]
    ForeignCategory {
        id: CardId,
        category: CardCategory,
        side: Side,
    },

    #[error("core health is 0 but the game is not over")]
    DeadCoreNotOver,

    #[error("{side} holds {held} cards plus {destroyed} destroyed, but {dealt} were dealt")]
    CardCountMismatch {
        side: Side,
        held: usize,
        destroyed: u32,
        dealt: u32,
    },
}

/// Invalid configuration at setup time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("maximum core health must be positive")]
    ZeroMaxHealth,

    #[error("log capacity must be positive")]
    ZeroLogCapacity,

    #[error("{side} opening hand of {hand} exceeds deck of {deck}")]
    OpeningHandTooLarge { side: Side, hand: usize, deck: usize },

    #[error("{side} deck holds {template:?}, a {category} card the {side} cannot install")]
    ForeignCard {
        side: Side,
        template: Template,
        category: CardCategory,
    },
}

/// Any error the engine can return from an operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Combat(#[from] CombatError),

    #[error("state integrity violated: {0}")]
    Integrity(#[from] IntegrityError),
}

impl EngineError {
    /// Validation and combat errors can be shown to the player and retried.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, EngineError::Integrity(_))
    }
}
