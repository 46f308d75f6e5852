//! Card system: definitions and the fixed catalog.
//!
//! ## Key Types
//!
//! - `Card`: Immutable card instance with a unique id
//! - `CardCategory`: Resource, Unit, or Barrier
//! - `Subtype`: Fracter and Barrier carry combat rules, the rest are flavor
//! - `Template`: Catalog entries cards are instantiated from
//! - `DeckComposition`: Fixed per-template counts for a deck

pub mod catalog;
pub mod definition;

pub use catalog::{build_deck, DeckComposition, Template};
pub use definition::{Card, CardCategory, Subtype};
