//! Named heuristic rules for the scripted opponent.
//!
//! Each rule looks at the state from one side's point of view and either
//! decides (act, or stay idle) or defers to the next rule. `default_rules`
//! lists them in evaluation order.

use crate::cards::CardCategory;
use crate::combat;
use crate::core::action::Action;
use crate::core::side::Side;
use crate::core::state::{GameState, Phase};

/// A rule's decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// Submit this action.
    Act(Action),
    /// Nothing to do right now.
    Idle,
}

/// One rule in the opponent's priority list.
pub trait Heuristic: Send + Sync {
    /// Stable kebab-case name, used in diagnostics.
    fn name(&self) -> &'static str;

    /// Decide for `side`, or return `None` to defer to the next rule.
    fn propose(&self, state: &GameState, side: Side) -> Option<Verdict>;
}

/// Answer a pending attack with the first (oldest) barrier able to block,
/// or let it through unblocked.
#[derive(Clone, Copy, Debug, Default)]
pub struct BlockWithOldestBarrier;

impl Heuristic for BlockWithOldestBarrier {
    fn name(&self) -> &'static str {
        "block-with-oldest-barrier"
    }

    fn propose(&self, state: &GameState, side: Side) -> Option<Verdict> {
        let attacker_index = state.pending_attack()?;
        if state.is_over() || state.priority() != side || side != Side::Defender {
            return None;
        }
        let blocker_index = (0..state.side(side).field().len()).find(|&i| combat::can_block(state, i));
        Some(Verdict::Act(Action::Block {
            attacker_index,
            blocker_index,
        }))
    }
}

/// Stay idle while the other side holds priority, or after the game ended.
#[derive(Clone, Copy, Debug, Default)]
pub struct AwaitTurn;

impl Heuristic for AwaitTurn {
    fn name(&self) -> &'static str {
        "await-turn"
    }

    fn propose(&self, state: &GameState, side: Side) -> Option<Verdict> {
        (state.is_over() || state.priority() != side).then_some(Verdict::Idle)
    }
}

/// Draw and Resource do their work on entry; move on.
#[derive(Clone, Copy, Debug, Default)]
pub struct PassSetupPhases;

impl Heuristic for PassSetupPhases {
    fn name(&self) -> &'static str {
        "pass-setup-phases"
    }

    fn propose(&self, state: &GameState, _side: Side) -> Option<Verdict> {
        matches!(state.phase(), Phase::Draw | Phase::Resource).then_some(Verdict::Act(Action::EndPhase))
    }
}

/// In Main, install the first affordable Resource card in hand order.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlayFirstResource;

impl Heuristic for PlayFirstResource {
    fn name(&self) -> &'static str {
        "play-first-resource"
    }

    fn propose(&self, state: &GameState, side: Side) -> Option<Verdict> {
        if state.phase() != Phase::Main {
            return None;
        }
        first_affordable(state, side, |category| category == CardCategory::Resource)
            .map(|hand_index| Verdict::Act(Action::PlayResource { hand_index }))
    }
}

/// In Main, install the first affordable Unit (Intruder) or Barrier (Defender).
#[derive(Clone, Copy, Debug, Default)]
pub struct InstallFirstAffordable;

impl Heuristic for InstallFirstAffordable {
    fn name(&self) -> &'static str {
        "install-first-affordable"
    }

    fn propose(&self, state: &GameState, side: Side) -> Option<Verdict> {
        if state.phase() != Phase::Main {
            return None;
        }
        first_affordable(state, side, |category| category.restricted_to() == Some(side))
            .map(|hand_index| Verdict::Act(Action::PlayCard { hand_index }))
    }
}

/// In Combat, attack with the first unit that has not attacked yet.
#[derive(Clone, Copy, Debug, Default)]
pub struct AttackWithReadyUnit;

impl Heuristic for AttackWithReadyUnit {
    fn name(&self) -> &'static str {
        "attack-with-ready-unit"
    }

    fn propose(&self, state: &GameState, side: Side) -> Option<Verdict> {
        if side != Side::Intruder || state.phase() != Phase::Combat || state.pending_attack().is_some() {
            return None;
        }
        state
            .side(side)
            .field()
            .iter()
            .position(|card| card.is_unit() && !state.has_attacked(card.id))
            .map(|field_index| Verdict::Act(Action::Attack { field_index }))
    }
}

/// Fallback: end the phase.
#[derive(Clone, Copy, Debug, Default)]
pub struct EndPhase;

impl Heuristic for EndPhase {
    fn name(&self) -> &'static str {
        "end-phase"
    }

    fn propose(&self, _state: &GameState, _side: Side) -> Option<Verdict> {
        Some(Verdict::Act(Action::EndPhase))
    }
}

/// The rules in evaluation order.
#[must_use]
pub fn default_rules() -> Vec<Box<dyn Heuristic>> {
    vec![
        Box::new(BlockWithOldestBarrier),
        Box::new(AwaitTurn),
        Box::new(PassSetupPhases),
        Box::new(PlayFirstResource),
        Box::new(InstallFirstAffordable),
        Box::new(AttackWithReadyUnit),
        Box::new(EndPhase),
    ]
}

fn first_affordable(state: &GameState, side: Side, wanted: impl Fn(CardCategory) -> bool) -> Option<usize> {
    let player = state.side(side);
    player
        .hand()
        .iter()
        .position(|card| wanted(card.category) && card.cost <= player.resource_available())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Card, Subtype};
    use crate::core::entity::CardId;
    use crate::core::state::fixtures::*;

    #[test]
    fn test_rule_names_are_unique() {
        let rules = default_rules();
        let mut names: Vec<_> = rules.iter().map(|r| r.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), rules.len());
    }

    #[test]
    fn test_await_turn() {
        let state = new_game();

        assert_eq!(AwaitTurn.propose(&state, Side::Defender), Some(Verdict::Idle));
        assert_eq!(AwaitTurn.propose(&state, Side::Intruder), None);
    }

    #[test]
    fn test_block_skips_non_barriers() {
        let mut state = new_game();
        install(&mut state, Side::Intruder, Card::unit(CardId(0), "Corroder", 1, 2, 2, None));
        install(&mut state, Side::Defender, Card::resource(CardId(0), "Credit Chip", 0));
        install(
            &mut state,
            Side::Defender,
            Card::barrier(CardId(0), "Ice Wall", 1, 2, 3, Some(Subtype::Barrier)),
        );
        install(
            &mut state,
            Side::Defender,
            Card::barrier(CardId(0), "Tollbooth", 2, 2, 4, Some(Subtype::CodeGate)),
        );
        enter_combat(&mut state);
        combat::declare_attack(&mut state, 0).unwrap();

        assert_eq!(
            BlockWithOldestBarrier.propose(&state, Side::Defender),
            Some(Verdict::Act(Action::Block {
                attacker_index: 0,
                blocker_index: Some(1),
            }))
        );
    }

    #[test]
    fn test_block_declines_without_barrier() {
        let mut state = new_game();
        install(&mut state, Side::Intruder, Card::unit(CardId(0), "Corroder", 1, 2, 2, None));
        enter_combat(&mut state);
        combat::declare_attack(&mut state, 0).unwrap();

        assert_eq!(
            BlockWithOldestBarrier.propose(&state, Side::Defender),
            Some(Verdict::Act(Action::Block {
                attacker_index: 0,
                blocker_index: None,
            }))
        );
    }

    #[test]
    fn test_resource_before_barrier() {
        let mut state = new_game();
        state.active_side = Side::Defender;
        state.priority = Side::Defender;
        state.phase = Phase::Main;

        // Unshuffled defender hand: four Credit Chips.
        assert_eq!(
            PlayFirstResource.propose(&state, Side::Defender),
            Some(Verdict::Act(Action::PlayResource { hand_index: 0 }))
        );
        assert_eq!(InstallFirstAffordable.propose(&state, Side::Defender), None);
    }

    #[test]
    fn test_install_skips_foreign_category() {
        let mut state = new_game();
        state.active_side = Side::Defender;
        state.priority = Side::Defender;
        state.phase = Phase::Main;
        for mut card in [
            Card::unit(CardId(0), "Stray Fracter", 0, 2, 2, None),
            Card::barrier(CardId(0), "Ice Wall", 0, 1, 3, Some(Subtype::Barrier)),
        ] {
            card.id = state.ids.alloc();
            state.sides[Side::Defender].zones.push_hand(card);
            state.dealt[Side::Defender] += 1;
        }
        let wall = state.defender().hand().len() - 1;

        assert_eq!(
            InstallFirstAffordable.propose(&state, Side::Defender),
            Some(Verdict::Act(Action::PlayCard { hand_index: wall }))
        );
    }

    #[test]
    fn test_attack_picks_first_ready_unit() {
        let mut state = new_game();
        let first = install(&mut state, Side::Intruder, Card::unit(CardId(0), "A", 1, 2, 2, None));
        install(&mut state, Side::Intruder, Card::unit(CardId(0), "B", 1, 2, 2, None));
        enter_combat(&mut state);
        state.combat.attacked.push_back(first);

        assert_eq!(
            AttackWithReadyUnit.propose(&state, Side::Intruder),
            Some(Verdict::Act(Action::Attack { field_index: 1 }))
        );
        assert_eq!(AttackWithReadyUnit.propose(&state, Side::Defender), None);
    }
}
