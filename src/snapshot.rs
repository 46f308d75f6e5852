//! Save games.
//!
//! A `SaveGame` is the persisted form of a game: metadata plus the full
//! `GameState`. Two encodings are provided, JSON for humans and tools,
//! bincode for compact storage. Writing the bytes somewhere is the caller's
//! business.
//!
//! Loading fails fast: a save from another format version, or one whose
//! state breaks an invariant, is rejected rather than repaired.
//!
//! ```
//! use breach_ccg::core::{GameConfig, GameState, NoShuffle};
//! use breach_ccg::snapshot::SaveGame;
//!
//! let state = GameState::new_game(&GameConfig::default(), &mut NoShuffle).unwrap();
//! let save = SaveGame::capture(&state, "before the first run", 0);
//!
//! let json = save.to_json().unwrap();
//! let loaded = SaveGame::from_json(&json).unwrap();
//! assert_eq!(loaded.game_state, state);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::error::IntegrityError;
use crate::core::state::GameState;

/// Current save format version.
pub const SAVE_VERSION: u32 = 1;

/// Failure to encode, decode, or accept a save.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("json codec: {0}")]
    Json(#[from] serde_json::Error),

    #[error("binary codec: {0}")]
    Bincode(#[from] bincode::Error),

    #[error("save format version {found} is not supported (expected {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("saved state is invalid: {0}")]
    Integrity(#[from] IntegrityError),
}

/// Descriptive header of a save.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveMetadata {
    pub version: u32,
    /// Caller-supplied wall-clock time; the engine itself has no clock.
    pub timestamp: u64,
    pub turn_number: u32,
    pub description: String,
}

/// A persisted game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveGame {
    pub metadata: SaveMetadata,
    pub game_state: GameState,
}

impl SaveGame {
    /// Capture `state` under the current format version.
    #[must_use]
    pub fn capture(state: &GameState, description: impl Into<String>, timestamp: u64) -> Self {
        Self {
            metadata: SaveMetadata {
                version: SAVE_VERSION,
                timestamp,
                turn_number: state.turn_number(),
                description: description.into(),
            },
            game_state: state.clone(),
        }
    }

    /// Check version and state invariants.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        if self.metadata.version != SAVE_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: self.metadata.version,
                supported: SAVE_VERSION,
            });
        }
        self.game_state.check_integrity()?;
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decode and validate.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let save: Self = serde_json::from_str(json)?;
        save.accept()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode and validate.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let save: Self = bincode::deserialize(bytes)?;
        save.accept()
    }

    #[must_use]
    pub fn into_state(self) -> GameState {
        self.game_state
    }

    fn accept(self) -> Result<Self, SnapshotError> {
        if let Err(err) = self.validate() {
            tracing::warn!(error = %err, "rejected save");
            return Err(err);
        }
        tracing::debug!(
            turn = self.metadata.turn_number,
            description = %self.metadata.description,
            "save loaded"
        );
        Ok(self)
    }
}
