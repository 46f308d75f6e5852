//! Abstract actions.
//!
//! Actions arrive from the input-capture collaborator or from the opponent
//! policy. Game actions carry zone indices; meta actions (help, save, load,
//! quit) never touch state and are handed back to the caller.
//!
//! ```
//! use breach_ccg::core::{Action, ActionKind};
//!
//! let play = Action::PlayResource { hand_index: 0 };
//! assert_eq!(play.kind(), ActionKind::PlayResource);
//! assert!(!play.is_meta());
//! assert!(Action::Quit.is_meta());
//! ```

use serde::{Deserialize, Serialize};

use super::side::Side;

/// An abstract action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Install a Resource card from hand.
    PlayResource { hand_index: usize },
    /// Install a Unit or Barrier from hand.
    PlayCard { hand_index: usize },
    /// Declare an attack with an Intruder field card.
    Attack { field_index: usize },
    /// Answer the pending attack, with or without a blocker.
    Block {
        attacker_index: usize,
        blocker_index: Option<usize>,
    },
    EndPhase,
    Help,
    Save,
    Load,
    Quit,
}

/// Payload-free action discriminant, used by the phase permission table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    PlayResource,
    PlayCard,
    Attack,
    Block,
    EndPhase,
    Help,
    Save,
    Load,
    Quit,
}

impl Action {
    /// Get the action kind.
    #[must_use]
    pub const fn kind(&self) -> ActionKind {
        match self {
            Action::PlayResource { .. } => ActionKind::PlayResource,
            Action::PlayCard { .. } => ActionKind::PlayCard,
            Action::Attack { .. } => ActionKind::Attack,
            Action::Block { .. } => ActionKind::Block,
            Action::EndPhase => ActionKind::EndPhase,
            Action::Help => ActionKind::Help,
            Action::Save => ActionKind::Save,
            Action::Load => ActionKind::Load,
            Action::Quit => ActionKind::Quit,
        }
    }

    /// Meta actions are allowed from either side and never mutate state.
    #[must_use]
    pub const fn is_meta(&self) -> bool {
        self.kind().is_meta()
    }
}

impl ActionKind {
    #[must_use]
    pub const fn is_meta(self) -> bool {
        matches!(
            self,
            ActionKind::Help | ActionKind::Save | ActionKind::Load | ActionKind::Quit
        )
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ActionKind::PlayResource => "play-resource",
            ActionKind::PlayCard => "play-card",
            ActionKind::Attack => "attack",
            ActionKind::Block => "block",
            ActionKind::EndPhase => "end-phase",
            ActionKind::Help => "help",
            ActionKind::Save => "save",
            ActionKind::Load => "load",
            ActionKind::Quit => "quit",
        };
        write!(f, "{}", name)
    }
}

/// A recorded action with metadata for history tracking.
///
/// Used for:
/// - Deterministic replay
/// - Debugging
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The side that submitted the action.
    pub side: Side,

    /// The action taken.
    pub action: Action,

    /// Turn number when the action was taken.
    pub turn: u32,

    /// Global sequence number (for ordering).
    pub sequence: u32,
}

impl ActionRecord {
    /// Create a new action record.
    #[must_use]
    pub fn new(side: Side, action: Action, turn: u32, sequence: u32) -> Self {
        Self {
            side,
            action,
            turn,
            sequence,
        }
    }
}
