//! Card definitions.
//!
//! A `Card` is immutable once dealt. Its id never changes across zone
//! moves; combat damage is computed on the fly and never written back onto
//! the card.

use serde::{Deserialize, Serialize};

use crate::core::entity::CardId;
use crate::core::side::Side;

/// The three card categories the engine understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardCategory {
    /// Installing one raises the owner's resource capacity by 1.
    Resource,
    /// Intruder-only attacker with power/toughness.
    Unit,
    /// Defender-only blocker with power/toughness.
    Barrier,
}

impl CardCategory {
    /// Whether cards of this category carry power and toughness.
    #[must_use]
    pub const fn has_stats(self) -> bool {
        matches!(self, CardCategory::Unit | CardCategory::Barrier)
    }

    /// The only side allowed to install this category, if restricted.
    #[must_use]
    pub const fn restricted_to(self) -> Option<Side> {
        match self {
            CardCategory::Resource => None,
            CardCategory::Unit => Some(Side::Intruder),
            CardCategory::Barrier => Some(Side::Defender),
        }
    }
}

impl std::fmt::Display for CardCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CardCategory::Resource => write!(f, "Resource"),
            CardCategory::Unit => write!(f, "Unit"),
            CardCategory::Barrier => write!(f, "Barrier"),
        }
    }
}

/// Card subtype. Only Fracter and Barrier have rules meaning.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Subtype {
    /// Unit subtype; breaks Barrier-subtype blockers for 1.5x damage.
    Fracter,
    Decoder,
    Killer,
    /// Barrier subtype; deals +1 damage when blocking.
    Barrier,
    CodeGate,
    Sentry,
}

/// A card instance.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub name: String,
    pub category: CardCategory,
    pub cost: u32,
    /// Present for Units and Barriers only.
    pub power: Option<u32>,
    /// Present for Units and Barriers only.
    pub toughness: Option<u32>,
    pub subtype: Option<Subtype>,
    /// Opaque payload for the rendering collaborator.
    pub art: String,
    pub flavor: String,
}

impl Card {
    /// Create a Resource card.
    #[must_use]
    pub fn resource(id: CardId, name: impl Into<String>, cost: u32) -> Self {
        Self {
            id,
            name: name.into(),
            category: CardCategory::Resource,
            cost,
            power: None,
            toughness: None,
            subtype: None,
            art: String::new(),
            flavor: String::new(),
        }
    }

    /// Create a Unit card.
    #[must_use]
    pub fn unit(
        id: CardId,
        name: impl Into<String>,
        cost: u32,
        power: u32,
        toughness: u32,
        subtype: Option<Subtype>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            category: CardCategory::Unit,
            cost,
            power: Some(power),
            toughness: Some(toughness),
            subtype,
            art: String::new(),
            flavor: String::new(),
        }
    }

    /// Create a Barrier card.
    #[must_use]
    pub fn barrier(
        id: CardId,
        name: impl Into<String>,
        cost: u32,
        power: u32,
        toughness: u32,
        subtype: Option<Subtype>,
    ) -> Self {
        Self {
            category: CardCategory::Barrier,
            ..Self::unit(id, name, cost, power, toughness, subtype)
        }
    }

    /// Attach art payload and flavor text (builder pattern).
    #[must_use]
    pub fn with_text(mut self, art: impl Into<String>, flavor: impl Into<String>) -> Self {
        self.art = art.into();
        self.flavor = flavor.into();
        self
    }

    #[must_use]
    pub fn is_resource(&self) -> bool {
        self.category == CardCategory::Resource
    }

    #[must_use]
    pub fn is_unit(&self) -> bool {
        self.category == CardCategory::Unit
    }

    #[must_use]
    pub fn is_barrier(&self) -> bool {
        self.category == CardCategory::Barrier
    }

    /// Base power, 0 for cards without stats.
    #[must_use]
    pub fn base_power(&self) -> u32 {
        self.power.unwrap_or(0)
    }

    /// Base toughness, 0 for cards without stats.
    #[must_use]
    pub fn base_toughness(&self) -> u32 {
        self.toughness.unwrap_or(0)
    }

    /// Whether the stats present match the category.
    #[must_use]
    pub fn stats_consistent(&self) -> bool {
        let has_stats = self.power.is_some() && self.toughness.is_some();
        let has_none = self.power.is_none() && self.toughness.is_none();
        if self.category.has_stats() {
            has_stats
        } else {
            has_none
        }
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.power, self.toughness) {
            (Some(p), Some(t)) => write!(f, "{} {} [{}/{}]", self.name, self.id, p, t),
            _ => write!(f, "{} {}", self.name, self.id),
        }
    }
}
