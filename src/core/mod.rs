//! Core engine types: sides, card ids, state, actions, log, errors, configuration.
//!
//! Everything else in the crate reads these types; only `rules::store`
//! mutates a `GameState`.

pub mod action;
pub mod config;
pub mod entity;
pub mod error;
pub mod log;
pub mod rng;
pub mod side;
pub mod state;

pub use action::{Action, ActionKind, ActionRecord};
pub use config::{GameConfig, GameConfigBuilder};
pub use entity::{CardId, IdAllocator};
pub use error::{CombatError, ConfigError, EngineError, IntegrityError, ValidationError};
pub use log::{GameLog, LogCategory, LogEntry};
pub use rng::{DeckShuffle, GameRng, NoShuffle};
pub use side::{Side, SideMap};
pub use state::{CombatState, DefenderCore, GameState, Phase, PlayerSide};
