//! Game configuration.
//!
//! `GameConfig` fixes everything a game needs at setup time: deck recipes,
//! opening hands, core health, and event-log retention. It is plain data
//! (serde-serializable) so a launcher can read it from a file; the
//! `GameConfigBuilder` mirrors the fluent style used for in-code setups.
//!
//! ```
//! use breach_ccg::core::GameConfig;
//!
//! let config = GameConfig::builder()
//!     .seed(7)
//!     .max_health(5)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.max_health, 5);
//! assert_eq!(config.opening_hand[breach_ccg::core::Side::Intruder], 7);
//! ```

use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use super::side::{Side, SideMap};
use crate::cards::DeckComposition;

/// Complete game configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Seed for the default deck shuffle.
    pub seed: u64,

    /// Starting and maximum core health.
    pub max_health: u32,

    /// Deck recipe per side.
    pub decks: SideMap<DeckComposition>,

    /// Cards dealt to each side before turn 1.
    pub opening_hand: SideMap<usize>,

    /// Cards drawn on entering the Draw phase.
    pub draw_per_turn: usize,

    /// Event-log retention cap; oldest entries are dropped beyond it.
    pub log_capacity: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            max_health: 10,
            decks: SideMap::new(|side| match side {
                Side::Intruder => DeckComposition::intruder_default(),
                Side::Defender => DeckComposition::defender_default(),
            }),
            opening_hand: SideMap::new(|side| match side {
                Side::Intruder => 7,
                Side::Defender => 4,
            }),
            draw_per_turn: 1,
            log_capacity: 100,
        }
    }
}

impl GameConfig {
    /// Start a builder from the default configuration.
    #[must_use]
    pub fn builder() -> GameConfigBuilder {
        GameConfigBuilder::default()
    }

    /// Check that a game can be set up from this configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_health == 0 {
            return Err(ConfigError::ZeroMaxHealth);
        }
        if self.log_capacity == 0 {
            return Err(ConfigError::ZeroLogCapacity);
        }
        for side in Side::ALL {
            let deck = self.decks[side].total();
            let hand = self.opening_hand[side];
            if hand > deck {
                return Err(ConfigError::OpeningHandTooLarge { side, hand, deck });
            }
            for &(template, _) in &self.decks[side].entries {
                let category = template.category();
                if category.restricted_to().is_some_and(|only| only != side) {
                    return Err(ConfigError::ForeignCard { side, template, category });
                }
            }
        }
        Ok(())
    }
}

/// Fluent builder for `GameConfig`.
#[derive(Clone, Debug, Default)]
pub struct GameConfigBuilder {
    config: GameConfig,
}

impl GameConfigBuilder {
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn max_health(mut self, health: u32) -> Self {
        self.config.max_health = health;
        self
    }

    pub fn deck(mut self, side: Side, composition: DeckComposition) -> Self {
        self.config.decks[side] = composition;
        self
    }

    pub fn opening_hand(mut self, side: Side, size: usize) -> Self {
        self.config.opening_hand[side] = size;
        self
    }

    pub fn draw_per_turn(mut self, count: usize) -> Self {
        self.config.draw_per_turn = count;
        self
    }

    pub fn log_capacity(mut self, capacity: usize) -> Self {
        self.config.log_capacity = capacity;
        self
    }

    /// Validate and return the configuration.
    pub fn build(self) -> Result<GameConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
