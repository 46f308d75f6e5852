//! Opponent policies for the non-interactive side.

use crate::core::action::Action;
use crate::core::rng::GameRng;
use crate::core::side::Side;
use crate::core::state::GameState;
use crate::rules::legal_actions;

use super::heuristics::{default_rules, Heuristic, Verdict};

/// Chooses actions for one side.
///
/// Returns `None` when the side has nothing to do right now.
pub trait OpponentPolicy: Send + Sync {
    /// The side this policy plays.
    fn side(&self) -> Side;

    /// Choose the next action for `self.side()`.
    fn next_action(&mut self, state: &GameState) -> Option<Action>;
}

/// Scripted opponent: the first heuristic rule that decides wins.
///
/// Deterministic: the same state always yields the same action.
pub struct HeuristicOpponent {
    side: Side,
    rules: Vec<Box<dyn Heuristic>>,
}

impl HeuristicOpponent {
    /// Opponent playing `side` with the default rule order.
    #[must_use]
    pub fn new(side: Side) -> Self {
        Self::with_rules(side, default_rules())
    }

    /// Opponent with a custom rule list, evaluated in order.
    #[must_use]
    pub fn with_rules(side: Side, rules: Vec<Box<dyn Heuristic>>) -> Self {
        Self { side, rules }
    }

    /// Rule names in evaluation order.
    pub fn rule_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|r| r.name())
    }

    /// The deciding rule and its verdict, if any rule decided.
    #[must_use]
    pub fn decide(&self, state: &GameState) -> Option<(&'static str, Verdict)> {
        self.rules
            .iter()
            .find_map(|rule| rule.propose(state, self.side).map(|verdict| (rule.name(), verdict)))
    }

    /// Pure form of `next_action`.
    #[must_use]
    pub fn choose(&self, state: &GameState) -> Option<Action> {
        let (rule, verdict) = self.decide(state)?;
        tracing::trace!(side = %self.side, rule, ?verdict, "heuristic decided");
        match verdict {
            Verdict::Act(action) => Some(action),
            Verdict::Idle => None,
        }
    }
}

impl Default for HeuristicOpponent {
    fn default() -> Self {
        Self::new(Side::Defender)
    }
}

impl std::fmt::Debug for HeuristicOpponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeuristicOpponent")
            .field("side", &self.side)
            .field("rules", &self.rule_names().collect::<Vec<_>>())
            .finish()
    }
}

impl OpponentPolicy for HeuristicOpponent {
    fn side(&self) -> Side {
        self.side
    }

    fn next_action(&mut self, state: &GameState) -> Option<Action> {
        self.choose(state)
    }
}

/// Uniform random opponent.
///
/// Selects uniformly from legal actions. Useful as a fuzzing partner.
#[derive(Clone, Debug)]
pub struct UniformOpponent {
    side: Side,
    rng: GameRng,
}

impl UniformOpponent {
    #[must_use]
    pub fn new(side: Side, seed: u64) -> Self {
        Self {
            side,
            rng: GameRng::new(seed),
        }
    }
}

impl OpponentPolicy for UniformOpponent {
    fn side(&self) -> Side {
        self.side
    }

    fn next_action(&mut self, state: &GameState) -> Option<Action> {
        let actions = legal_actions(state, self.side);
        if actions.is_empty() {
            return None;
        }
        let idx = self.rng.gen_range_usize(0..actions.len());
        Some(actions[idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::fixtures::*;
    use crate::core::state::Phase;
    use crate::rules::apply_action;

    #[test]
    fn test_default_rule_order() {
        let opponent = HeuristicOpponent::default();

        assert_eq!(opponent.side(), Side::Defender);
        assert_eq!(
            opponent.rule_names().collect::<Vec<_>>(),
            vec![
                "block-with-oldest-barrier",
                "await-turn",
                "pass-setup-phases",
                "play-first-resource",
                "install-first-affordable",
                "attack-with-ready-unit",
                "end-phase",
            ]
        );
    }

    #[test]
    fn test_idle_outside_its_turn() {
        let state = new_game();
        let mut opponent = HeuristicOpponent::new(Side::Defender);

        assert_eq!(opponent.decide(&state).map(|(rule, _)| rule), Some("await-turn"));
        assert_eq!(opponent.next_action(&state), None);
    }

    #[test]
    fn test_deterministic() {
        let state = new_game();
        let opponent = HeuristicOpponent::new(Side::Intruder);

        assert_eq!(opponent.choose(&state), opponent.choose(&state));
        assert_eq!(opponent.choose(&state), Some(Action::EndPhase));
    }

    #[test]
    fn test_intruder_policy_plays_out_turn() {
        let mut state = new_game();
        let mut opponent = HeuristicOpponent::new(Side::Intruder);

        while state.active_side() == Side::Intruder && !state.is_over() {
            let action = opponent.next_action(&state).unwrap();
            state = apply_action(&state, Side::Intruder, action)
                .unwrap()
                .into_state()
                .unwrap();
        }

        // Every Credit Chip in hand costs 0, so all seven go down in Main.
        assert_eq!(state.phase(), Phase::Draw);
        assert_eq!(state.intruder().resource_total(), 7);
        assert!(state.intruder().hand().is_empty());
    }

    #[test]
    fn test_uniform_picks_legal_actions() {
        let state = new_game();
        let mut opponent = UniformOpponent::new(Side::Intruder, 7);

        for _ in 0..10 {
            let action = opponent.next_action(&state).unwrap();
            assert!(legal_actions(&state, Side::Intruder).contains(&action));
        }
        assert_eq!(UniformOpponent::new(Side::Defender, 7).next_action(&state), None);
    }
}
