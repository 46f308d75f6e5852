//! Combat: attack declaration, blocking, and damage.
//!
//! ## Key Types
//!
//! - `Exchange`: Result of resolving one attack
//!
//! Attacks are declared during the Intruder's Combat phase. Priority passes
//! to the Defender, who answers with a block (or declines to) before the
//! Intruder may act again.

pub mod damage;
pub mod resolver;

pub use damage::{effective_damage, is_destroyed};
pub use resolver::{can_block, clear_combat_effects, declare_attack, declare_block, Exchange};
