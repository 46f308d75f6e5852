//! Opponent policy for the non-interactive side.
//!
//! ## Key Types
//!
//! - `OpponentPolicy`: Chooses the next action for one side
//! - `HeuristicOpponent`: Ordered list of named rules, first decision wins
//! - `UniformOpponent`: Random legal actions, for fuzzing and self-play
//! - `Heuristic`: One named rule

pub mod heuristics;
pub mod opponent;

pub use heuristics::{default_rules, Heuristic, Verdict};
pub use opponent::{HeuristicOpponent, OpponentPolicy, UniformOpponent};
