//! Zone system: deck, hand, and field per side.
//!
//! A card is in exactly one zone of exactly one side at any time.
//! `Zones` owns the three ordered sequences and all movement between them.

pub mod manager;

pub use manager::{Zone, Zones};
