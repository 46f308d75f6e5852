//! Per-side zone storage and movement.
//!
//! Each side owns three ordered zones:
//! - deck: draw from the front
//! - hand: insertion order, indexed by the player
//! - field: insertion order, significant for oldest-first blocking
//!
//! Zones hold `im::Vector` so cloning a whole game state is O(1).

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::core::entity::CardId;

/// A zone a card can be in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    Deck,
    Hand,
    Field,
}

/// The deck, hand, and field of one side.
///
/// ## Usage
///
/// ```
/// use breach_ccg::cards::Card;
/// use breach_ccg::core::CardId;
/// use breach_ccg::zones::{Zone, Zones};
///
/// let mut zones = Zones::with_deck(vec![
///     Card::resource(CardId(1), "Credit Chip", 0),
///     Card::resource(CardId(2), "Credit Chip", 0),
/// ]);
///
/// let drawn = zones.draw_front().unwrap();
/// assert_eq!(drawn, CardId(1));
/// assert_eq!(zones.locate(CardId(1)), Some(Zone::Hand));
///
/// let card = zones.take_from_hand(0).unwrap();
/// zones.push_field(card);
/// assert_eq!(zones.locate(CardId(1)), Some(Zone::Field));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zones {
    deck: Vector<Card>,
    hand: Vector<Card>,
    field: Vector<Card>,
}

impl Zones {
    /// Create empty zones.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create zones with the given deck (front = next draw).
    #[must_use]
    pub fn with_deck(deck: impl IntoIterator<Item = Card>) -> Self {
        Self {
            deck: deck.into_iter().collect(),
            hand: Vector::new(),
            field: Vector::new(),
        }
    }

    #[must_use]
    pub fn deck(&self) -> &Vector<Card> {
        &self.deck
    }

    #[must_use]
    pub fn hand(&self) -> &Vector<Card> {
        &self.hand
    }

    #[must_use]
    pub fn field(&self) -> &Vector<Card> {
        &self.field
    }

    /// Cards in a zone, in order.
    #[must_use]
    pub fn cards(&self, zone: Zone) -> &Vector<Card> {
        match zone {
            Zone::Deck => &self.deck,
            Zone::Hand => &self.hand,
            Zone::Field => &self.field,
        }
    }

    /// Move the front deck card to the hand tail.
    ///
    /// Returns the drawn card's id, or `None` if the deck is empty.
    pub fn draw_front(&mut self) -> Option<CardId> {
        let card = self.deck.pop_front()?;
        let id = card.id;
        self.hand.push_back(card);
        Some(id)
    }

    /// Remove the card at `index` from the hand.
    pub fn take_from_hand(&mut self, index: usize) -> Option<Card> {
        if index < self.hand.len() {
            Some(self.hand.remove(index))
        } else {
            None
        }
    }

    /// Append a card to the field tail.
    pub fn push_field(&mut self, card: Card) {
        self.field.push_back(card);
    }

    /// Remove the field card at `index`, keeping the others in order.
    pub fn remove_from_field(&mut self, index: usize) -> Option<Card> {
        if index < self.field.len() {
            Some(self.field.remove(index))
        } else {
            None
        }
    }

    /// Put a card back at the hand tail (setup and tests).
    pub fn push_hand(&mut self, card: Card) {
        self.hand.push_back(card);
    }

    /// Find which zone holds a card.
    #[must_use]
    pub fn locate(&self, id: CardId) -> Option<Zone> {
        [Zone::Deck, Zone::Hand, Zone::Field]
            .into_iter()
            .find(|&zone| self.cards(zone).iter().any(|c| c.id == id))
    }

    /// Every card across all zones (deck, hand, field).
    pub fn all_cards(&self) -> impl Iterator<Item = &Card> {
        self.deck.iter().chain(self.hand.iter()).chain(self.field.iter())
    }

    /// Total number of cards across all zones.
    #[must_use]
    pub fn total(&self) -> usize {
        self.deck.len() + self.hand.len() + self.field.len()
    }
}
