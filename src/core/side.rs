//! Side identification and per-side data storage.
//!
//! ## Side
//!
//! The game is asymmetric: exactly two sides, the Intruder (attacks with
//! installed units) and the Defender (blocks with barriers, owns the core).
//!
//! ## SideMap
//!
//! Fixed two-slot storage indexed by `Side` for O(1) access.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One of the two sides of the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    /// The attacking side. Wins by reducing the core to zero.
    Intruder,
    /// The defending side. Owns the core health pool.
    Defender,
}

impl Side {
    /// Both sides in turn order.
    pub const ALL: [Side; 2] = [Side::Intruder, Side::Defender];

    /// The other side.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Side::Intruder => Side::Defender,
            Side::Defender => Side::Intruder,
        }
    }

    /// Slot index (Intruder = 0, Defender = 1).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Side::Intruder => 0,
            Side::Defender => 1,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Intruder => write!(f, "Intruder"),
            Side::Defender => write!(f, "Defender"),
        }
    }
}

/// Per-side data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use breach_ccg::core::{Side, SideMap};
///
/// let mut hands: SideMap<u32> = SideMap::new(|side| match side {
///     Side::Intruder => 7,
///     Side::Defender => 4,
/// });
///
/// hands[Side::Defender] += 1;
/// assert_eq!(hands[Side::Intruder], 7);
/// assert_eq!(hands[Side::Defender], 5);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SideMap<T> {
    data: [T; 2],
}

impl<T> SideMap<T> {
    /// Create a new SideMap with values from a factory function.
    pub fn new(factory: impl Fn(Side) -> T) -> Self {
        Self {
            data: [factory(Side::Intruder), factory(Side::Defender)],
        }
    }

    /// Create a new SideMap with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(|_| value.clone())
    }

    /// Iterate over (Side, &T) pairs in turn order.
    pub fn iter(&self) -> impl Iterator<Item = (Side, &T)> {
        Side::ALL.into_iter().zip(self.data.iter())
    }

    /// Iterate over (Side, &mut T) pairs in turn order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Side, &mut T)> {
        Side::ALL.into_iter().zip(self.data.iter_mut())
    }
}

impl<T: Default> Default for SideMap<T> {
    fn default() -> Self {
        Self::new(|_| T::default())
    }
}

impl<T> Index<Side> for SideMap<T> {
    type Output = T;

    fn index(&self, side: Side) -> &Self::Output {
        &self.data[side.index()]
    }
}

impl<T> IndexMut<Side> for SideMap<T> {
    fn index_mut(&mut self, side: Side) -> &mut Self::Output {
        &mut self.data[side.index()]
    }
}
