//! # breach-ccg
//!
//! An asymmetric two-sided card game engine. The Intruder builds resources
//! and attacks with installed units; the Defender builds resources and
//! installs barriers to protect its core.
//!
//! ## Design Principles
//!
//! 1. **Single Authoritative State**: One `GameState` value. Operations take
//!    the current state and derive the next one; a rejected action leaves it
//!    untouched.
//!
//! 2. **One Gate**: Every action, interactive or scripted, passes through
//!    `rules::apply_action`.
//!
//! 3. **Deterministic**: No clock, no hidden randomness in the rules. Decks
//!    are shuffled from a seed, and the scripted opponent is a pure function
//!    of the state.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: O(1) cloning via `im-rs`, so deriving
//!   a new state per action is cheap.
//!
//! - **Priority**: The side allowed to act. Normally the active side; after
//!   an attack it passes to the Defender until the block is declared.
//!
//! ## Modules
//!
//! - `core`: Sides, card ids, state, actions, event log, errors, configuration
//! - `zones`: Deck, hand, and field of one side
//! - `cards`: Card definitions and the fixed catalog
//! - `rules`: State store, phase sequencer, action processor
//! - `combat`: Attack and block resolution
//! - `policy`: Opponent policies
//! - `snapshot`: Save game encoding and validation
//! - `session`: Game loop alternating the interactive side and a policy

pub mod core;
pub mod zones;
pub mod cards;
pub mod rules;
pub mod combat;
pub mod policy;
pub mod snapshot;
pub mod session;

// Re-export commonly used types
pub use crate::core::{
    Side, SideMap,
    CardId, IdAllocator,
    GameRng, DeckShuffle, NoShuffle,
    GameConfig, GameConfigBuilder,
    Action, ActionKind, ActionRecord,
    GameLog, LogCategory, LogEntry,
    GameState, PlayerSide, DefenderCore, Phase,
    EngineError, ValidationError, CombatError, IntegrityError, ConfigError,
};

pub use crate::zones::{Zone, Zones};

pub use crate::cards::{Card, CardCategory, Subtype, Template, DeckComposition, build_deck};

pub use crate::rules::{apply_action, legal_actions, validate, advance_phase, Effect, Outcome, Transition};

pub use crate::combat::Exchange;

pub use crate::policy::{OpponentPolicy, HeuristicOpponent, UniformOpponent, Heuristic, Verdict};

pub use crate::snapshot::{SaveGame, SaveMetadata, SnapshotError, SAVE_VERSION};

pub use crate::session::{Session, StateObserver, Step, Response, deal, replay, play_out};
