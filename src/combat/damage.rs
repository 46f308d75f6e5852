//! Damage rules.
//!
//! - A Fracter unit deals `floor(1.5 * power)` to a Barrier-subtype blocker.
//! - A Barrier-subtype barrier deals `power + 1` when blocking.
//! - Everything else deals its base power.
//!
//! A card is destroyed when the damage it receives reaches its toughness.
//! Bonuses saturate at `u32::MAX` rather than overflow.

use crate::cards::{Card, CardCategory, Subtype};

/// Damage `card` deals in an exchange against an opponent of subtype `opposing`.
///
/// `opposing` is `None` for an unblocked attack (damage goes to the core).
#[must_use]
pub fn effective_damage(card: &Card, opposing: Option<Subtype>) -> u32 {
    let power = card.base_power();
    match (card.category, card.subtype, opposing) {
        (CardCategory::Unit, Some(Subtype::Fracter), Some(Subtype::Barrier)) => {
            u32::try_from(u64::from(power) * 3 / 2).unwrap_or(u32::MAX)
        }
        (CardCategory::Barrier, Some(Subtype::Barrier), _) => power.saturating_add(1),
        _ => power,
    }
}

/// Whether `damage` is lethal for `card`.
#[must_use]
pub fn is_destroyed(card: &Card, damage: u32) -> bool {
    damage >= card.base_toughness()
}
