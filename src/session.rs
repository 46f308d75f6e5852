//! Session: the game loop around one authoritative state.
//!
//! A `Session` owns the `GameState`, knows which side is interactive, and
//! drives the opponent policy for the other side. After every applied
//! action, observers (renderers, loggers) get the new state.
//!
//! ```
//! use breach_ccg::core::{Action, GameConfig, Side};
//! use breach_ccg::policy::HeuristicOpponent;
//! use breach_ccg::session::Session;
//!
//! let mut session = Session::new(&GameConfig::default(), HeuristicOpponent::new(Side::Defender)).unwrap();
//!
//! // Intruder: Draw -> Resource -> Main -> Combat, then the defender plays its turn.
//! for _ in 0..4 {
//!     session.submit(Action::EndPhase).unwrap();
//! }
//! assert_eq!(session.state().active_side(), Side::Intruder);
//! assert_eq!(session.state().turn_number(), 2);
//! ```

use crate::core::action::{Action, ActionKind, ActionRecord};
use crate::core::config::GameConfig;
use crate::core::error::{ConfigError, EngineError};
use crate::core::rng::GameRng;
use crate::core::side::Side;
use crate::core::state::GameState;
use crate::policy::OpponentPolicy;
use crate::rules::{apply_action, Effect, Outcome};
use crate::snapshot::{SaveGame, SnapshotError};

/// Upper bound on consecutive opponent actions before the loop gives up.
pub const OPPONENT_STEP_LIMIT: usize = 10_000;

/// One applied action, as reported to observers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Step {
    pub side: Side,
    pub action: Action,
    pub effect: Effect,
}

/// Receives a snapshot after every applied action.
pub trait StateObserver {
    fn on_step(&mut self, state: &GameState, step: &Step);
}

impl<F: FnMut(&GameState, &Step)> StateObserver for F {
    fn on_step(&mut self, state: &GameState, step: &Step) {
        self(state, step)
    }
}

/// Result of `Session::submit`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Response {
    /// The action was applied, followed by this many opponent actions.
    Applied { opponent_steps: usize },
    /// A meta action for the caller to handle (help text, save, load, quit).
    Meta(ActionKind),
}

/// Deal a new game, shuffling with a `GameRng` seeded from the config.
pub fn deal(config: &GameConfig) -> Result<GameState, ConfigError> {
    GameState::new_game(config, &mut GameRng::new(config.seed))
}

/// Re-apply recorded actions to `initial`.
///
/// Applying the history of a game to the state it was dealt from
/// reproduces that game exactly.
pub fn replay(initial: &GameState, history: &[ActionRecord]) -> Result<GameState, EngineError> {
    history.iter().try_fold(initial.clone(), |state, record| {
        Ok(apply_action(&state, record.side, record.action)?
            .into_state()
            .unwrap_or(state))
    })
}

/// Result of `play_out`.
#[derive(Clone, Debug)]
pub struct PlayOut {
    pub state: GameState,
    pub actions: usize,
}

/// Let two policies play from `state` until the game ends, a policy has
/// nothing to do, or `max_actions` is reached.
pub fn play_out<'a>(
    mut state: GameState,
    intruder: &mut (dyn OpponentPolicy + 'a),
    defender: &mut (dyn OpponentPolicy + 'a),
    max_actions: usize,
) -> Result<PlayOut, EngineError> {
    let mut actions = 0;
    while !state.is_over() && actions < max_actions {
        let side = state.priority();
        let policy = match side {
            Side::Intruder => &mut *intruder,
            Side::Defender => &mut *defender,
        };
        let Some(action) = policy.next_action(&state) else {
            break;
        };
        if let Some(next) = apply_action(&state, side, action)?.into_state() {
            state = next;
        }
        actions += 1;
    }
    Ok(PlayOut { state, actions })
}

/// The game loop for one interactive side against a policy.
pub struct Session<P: OpponentPolicy> {
    state: GameState,
    interactive: Side,
    opponent: P,
    observers: Vec<Box<dyn StateObserver>>,
}

impl<P: OpponentPolicy> Session<P> {
    /// Deal a new game. The interactive side is whichever side `opponent`
    /// does not play.
    pub fn new(config: &GameConfig, opponent: P) -> Result<Self, ConfigError> {
        Ok(Self::from_state(deal(config)?, opponent))
    }

    /// Resume from an existing state.
    ///
    /// If the opponent holds priority, it is not run until the next call
    /// to `submit` or `run_opponent`.
    #[must_use]
    pub fn from_state(state: GameState, opponent: P) -> Self {
        Self {
            state,
            interactive: opponent.side().opponent(),
            opponent,
            observers: Vec::new(),
        }
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn interactive_side(&self) -> Side {
        self.interactive
    }

    #[must_use]
    pub fn opponent(&self) -> &P {
        &self.opponent
    }

    pub fn add_observer(&mut self, observer: impl StateObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Apply an action from the interactive side, then let the opponent
    /// act until priority comes back or the game ends.
    ///
    /// On error the state is unchanged.
    pub fn submit(&mut self, action: Action) -> Result<Response, EngineError> {
        match apply_action(&self.state, self.interactive, action)? {
            Outcome::Meta(kind) => Ok(Response::Meta(kind)),
            Outcome::Applied { state, effect } => {
                self.commit(self.interactive, action, state, effect);
                let opponent_steps = self.run_opponent()?;
                Ok(Response::Applied { opponent_steps })
            }
        }
    }

    /// Run the opponent while it holds priority. Returns the number of
    /// actions it took.
    pub fn run_opponent(&mut self) -> Result<usize, EngineError> {
        let side = self.opponent.side();
        let mut steps = 0;
        while !self.state.is_over() && self.state.priority() == side {
            if steps == OPPONENT_STEP_LIMIT {
                tracing::warn!(%side, steps, "opponent step limit reached");
                break;
            }
            let Some(action) = self.opponent.next_action(&self.state) else {
                break;
            };
            if let Outcome::Applied { state, effect } = apply_action(&self.state, side, action)? {
                self.commit(side, action, state, effect);
            }
            steps += 1;
        }
        Ok(steps)
    }

    /// Capture the current state for the persistence collaborator.
    #[must_use]
    pub fn save(&self, description: impl Into<String>, timestamp: u64) -> SaveGame {
        SaveGame::capture(&self.state, description, timestamp)
    }

    /// Replace the current state with a validated save.
    pub fn load(&mut self, save: SaveGame) -> Result<(), SnapshotError> {
        save.validate()?;
        self.state = save.into_state();
        tracing::info!(turn = self.state.turn_number(), "session restored");
        Ok(())
    }

    fn commit(&mut self, side: Side, action: Action, state: GameState, effect: Effect) {
        self.state = state;
        let step = Step { side, action, effect };
        for observer in &mut self.observers {
            observer.on_step(&self.state, &step);
        }
    }
}

impl<P: OpponentPolicy + std::fmt::Debug> std::fmt::Debug for Session<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("interactive", &self.interactive)
            .field("opponent", &self.opponent)
            .field("turn", &self.state.turn_number())
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::Phase;
    use crate::policy::{HeuristicOpponent, UniformOpponent};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn session() -> Session<HeuristicOpponent> {
        Session::new(&GameConfig::default(), HeuristicOpponent::new(Side::Defender)).unwrap()
    }

    #[test]
    fn test_interactive_side_is_opposite_of_policy() {
        assert_eq!(session().interactive_side(), Side::Intruder);
    }

    #[test]
    fn test_submit_runs_opponent_turn() {
        let mut session = session();
        for _ in 0..3 {
            assert_eq!(
                session.submit(Action::EndPhase).unwrap(),
                Response::Applied { opponent_steps: 0 }
            );
        }

        let response = session.submit(Action::EndPhase).unwrap();

        assert!(matches!(response, Response::Applied { opponent_steps } if opponent_steps >= 3));
        let state = session.state();
        assert_eq!((state.active_side(), state.phase()), (Side::Intruder, Phase::Draw));
        assert_eq!(state.turn_number(), 2);
        assert!(state.defender().resource_total() > 0);
    }

    #[test]
    fn test_observers_see_every_step() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut session = session();
        session.add_observer(move |state: &GameState, step: &Step| {
            sink.borrow_mut().push((step.side, state.phase()));
        });

        session.submit(Action::EndPhase).unwrap();

        assert_eq!(seen.borrow().as_slice(), &[(Side::Intruder, Phase::Resource)]);
    }

    #[test]
    fn test_rejected_submit_keeps_state() {
        let mut session = session();
        let before = session.state().clone();

        assert!(session.submit(Action::PlayCard { hand_index: 0 }).is_err());
        assert_eq!(session.state(), &before);
    }

    #[test]
    fn test_meta_actions_returned() {
        let mut session = session();
        assert_eq!(session.submit(Action::Help).unwrap(), Response::Meta(ActionKind::Help));
        assert_eq!(session.submit(Action::Quit).unwrap(), Response::Meta(ActionKind::Quit));
    }

    #[test]
    fn test_save_and_load() {
        let mut session = session();
        let save = session.save("turn one", 42);
        session.submit(Action::EndPhase).unwrap();

        session.load(save).unwrap();

        assert_eq!(session.state().phase(), Phase::Draw);
        assert!(session.state().history().is_empty());
    }

    #[test]
    fn test_replay_reproduces_game() {
        let config = GameConfig::default();
        let initial = deal(&config).unwrap();
        let mut intruder = UniformOpponent::new(Side::Intruder, 3);
        let mut defender = HeuristicOpponent::new(Side::Defender);

        let played = play_out(initial.clone(), &mut intruder, &mut defender, 300).unwrap();
        let history: Vec<_> = played.state.history().iter().cloned().collect();

        assert_eq!(replay(&initial, &history).unwrap(), played.state);
    }

    #[test]
    fn test_play_out_with_boxed_policies() {
        let initial = deal(&GameConfig::default()).unwrap();
        let mut intruder: Box<dyn OpponentPolicy> = Box::new(UniformOpponent::new(Side::Intruder, 9));
        let mut defender: Box<dyn OpponentPolicy> = Box::new(HeuristicOpponent::new(Side::Defender));

        let played = play_out(initial, &mut *intruder, &mut *defender, 25).unwrap();

        assert!(played.actions <= 25);
        assert!(played.state.check_integrity().is_ok());
    }

    #[test]
    fn test_heuristic_self_play_finishes() {
        let initial = deal(&GameConfig::default()).unwrap();
        let mut intruder = HeuristicOpponent::new(Side::Intruder);
        let mut defender = HeuristicOpponent::new(Side::Defender);

        let played = play_out(initial, &mut intruder, &mut defender, 5_000).unwrap();

        assert!(played.state.is_over());
        assert!(played.state.winner().is_some());
        assert!(played.state.check_integrity().is_ok());
    }
}
