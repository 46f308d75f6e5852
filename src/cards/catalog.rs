//! Card catalog and deck construction.
//!
//! The catalog is a fixed set of templates. A `DeckComposition` says how
//! many copies of each template go into a deck; `build_deck` instantiates
//! them with fresh ids and hands the result to a `DeckShuffle`.
//!
//! ```
//! use breach_ccg::cards::{build_deck, CardCategory, DeckComposition};
//! use breach_ccg::core::{IdAllocator, NoShuffle};
//!
//! let mut ids = IdAllocator::new();
//! let deck = build_deck(&DeckComposition::intruder_default(), &mut ids, &mut NoShuffle);
//!
//! assert_eq!(deck.len(), 13);
//! assert_eq!(deck.iter().filter(|c| c.category == CardCategory::Resource).count(), 10);
//! ```

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::definition::{Card, CardCategory, Subtype};
use crate::core::entity::{CardId, IdAllocator};
use crate::core::rng::DeckShuffle;

/// Catalog templates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Template {
    /// Resource, cost 0.
    CreditChip,
    /// Fracter unit, cost 1, 2/2.
    Corroder,
    /// Decoder unit, cost 2, 3/2.
    Crypsis,
    /// Barrier-subtype barrier, cost 1, 2/3.
    IceWall,
    /// Code gate barrier, cost 2, 2/4.
    Tollbooth,
}

impl Template {
    /// Every template in catalog order.
    pub const ALL: [Template; 5] = [
        Template::CreditChip,
        Template::Corroder,
        Template::Crypsis,
        Template::IceWall,
        Template::Tollbooth,
    ];

    /// Category of cards made from this template.
    #[must_use]
    pub const fn category(self) -> CardCategory {
        match self {
            Template::CreditChip => CardCategory::Resource,
            Template::Corroder | Template::Crypsis => CardCategory::Unit,
            Template::IceWall | Template::Tollbooth => CardCategory::Barrier,
        }
    }

    /// Create a card with the given id.
    #[must_use]
    pub fn instantiate(self, id: CardId) -> Card {
        match self {
            Template::CreditChip => Card::resource(id, "Credit Chip", 0)
                .with_text("[$]", "Untraceable, mostly."),
            Template::Corroder => Card::unit(id, "Corroder", 1, 2, 2, Some(Subtype::Fracter))
                .with_text("[~>]", "Rust never sleeps."),
            Template::Crypsis => Card::unit(id, "Crypsis", 2, 3, 2, Some(Subtype::Decoder))
                .with_text("[?>]", "It learns the lock while it picks it."),
            Template::IceWall => Card::barrier(id, "Ice Wall", 1, 2, 3, Some(Subtype::Barrier))
                .with_text("[##]", "Cold, thick, and patient."),
            Template::Tollbooth => Card::barrier(id, "Tollbooth", 2, 2, 4, Some(Subtype::CodeGate))
                .with_text("[|$|]", "Everyone pays on the way in."),
        }
    }
}

/// Fixed-composition deck recipe: (template, copies) in deck order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckComposition {
    pub entries: SmallVec<[(Template, u32); 4]>,
}

impl DeckComposition {
    /// Create a composition from (template, copies) pairs.
    #[must_use]
    pub fn new(entries: &[(Template, u32)]) -> Self {
        Self {
            entries: SmallVec::from_slice(entries),
        }
    }

    /// 10 Credit Chips and 3 Corroders.
    #[must_use]
    pub fn intruder_default() -> Self {
        Self::new(&[(Template::CreditChip, 10), (Template::Corroder, 3)])
    }

    /// 5 Credit Chips and 3 Ice Walls.
    #[must_use]
    pub fn defender_default() -> Self {
        Self::new(&[(Template::CreditChip, 5), (Template::IceWall, 3)])
    }

    /// Total number of cards.
    #[must_use]
    pub fn total(&self) -> usize {
        self.entries.iter().map(|&(_, n)| n as usize).sum()
    }

    /// Number of cards of a category.
    #[must_use]
    pub fn count_category(&self, category: CardCategory) -> usize {
        self.entries
            .iter()
            .filter(|(t, _)| t.category() == category)
            .map(|&(_, n)| n as usize)
            .sum()
    }
}

/// Instantiate a composition with fresh ids, then shuffle.
pub fn build_deck(
    composition: &DeckComposition,
    ids: &mut IdAllocator,
    shuffle: &mut impl DeckShuffle,
) -> Vec<Card> {
    let mut deck: Vec<Card> = composition
        .entries
        .iter()
        .flat_map(|&(template, copies)| std::iter::repeat(template).take(copies as usize))
        .map(|template| template.instantiate(ids.alloc()))
        .collect();

    shuffle.shuffle_deck(&mut deck);
    deck
}
