//! Game state.
//!
//! ## GameState
//!
//! The single authoritative state of a game:
//! - Turn number, active side, phase, and which side holds priority
//! - Per-side zones and resources
//! - The defender's core health
//! - Combat bookkeeping (pending attack, units that already attacked)
//! - Event log and action history
//! - Terminal flag and winner
//!
//! Fields are crate-visible only. Callers outside the crate read through
//! accessors; every mutation goes through `rules::store`, and the rule
//! pipeline always works on a clone, so a failed operation leaves the
//! original untouched. The `im` collections make that clone O(1).

use im::Vector;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::action::ActionRecord;
use super::config::GameConfig;
use super::entity::{CardId, IdAllocator};
use super::error::{ConfigError, IntegrityError};
use super::log::{GameLog, LogCategory};
use super::rng::DeckShuffle;
use super::side::{Side, SideMap};
use crate::cards::{build_deck, Card, CardCategory};
use crate::zones::Zones;

/// Turn phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Draw,
    Resource,
    Main,
    /// Intruder turns only.
    Combat,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Draw => write!(f, "Draw"),
            Phase::Resource => write!(f, "Resource"),
            Phase::Main => write!(f, "Main"),
            Phase::Combat => write!(f, "Combat"),
        }
    }
}

/// Zones and resources of one side.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSide {
    pub(crate) zones: Zones,
    pub(crate) resource_available: u32,
    pub(crate) resource_total: u32,
}

impl PlayerSide {
    pub(crate) fn new(deck: Vec<Card>) -> Self {
        Self {
            zones: Zones::with_deck(deck),
            resource_available: 0,
            resource_total: 0,
        }
    }

    #[must_use]
    pub fn zones(&self) -> &Zones {
        &self.zones
    }

    #[must_use]
    pub fn deck(&self) -> &Vector<Card> {
        self.zones.deck()
    }

    #[must_use]
    pub fn hand(&self) -> &Vector<Card> {
        self.zones.hand()
    }

    #[must_use]
    pub fn field(&self) -> &Vector<Card> {
        self.zones.field()
    }

    #[must_use]
    pub fn resource_available(&self) -> u32 {
        self.resource_available
    }

    #[must_use]
    pub fn resource_total(&self) -> u32 {
        self.resource_total
    }
}

/// The defender's health pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefenderCore {
    pub(crate) max_health: u32,
    pub(crate) current_health: u32,
}

impl DefenderCore {
    #[must_use]
    pub fn new(max_health: u32) -> Self {
        Self {
            max_health,
            current_health: max_health,
        }
    }

    #[must_use]
    pub fn max_health(&self) -> u32 {
        self.max_health
    }

    #[must_use]
    pub fn current_health(&self) -> u32 {
        self.current_health
    }
}

/// Combat bookkeeping for the current Combat phase.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatState {
    /// Intruder field index of an attack awaiting its block declaration.
    pub(crate) pending_attack: Option<usize>,
    /// Units that already attacked this Combat phase.
    pub(crate) attacked: Vector<CardId>,
}

/// Full game state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub(crate) turn_number: u32,
    pub(crate) active_side: Side,
    pub(crate) phase: Phase,
    /// Side allowed to submit game actions right now.
    pub(crate) priority: Side,
    pub(crate) sides: SideMap<PlayerSide>,
    pub(crate) core: DefenderCore,
    pub(crate) combat: CombatState,
    pub(crate) log: GameLog,
    pub(crate) is_over: bool,
    pub(crate) winner: Option<Side>,
    pub(crate) history: Vector<ActionRecord>,
    pub(crate) action_sequence: u32,
    pub(crate) ids: IdAllocator,
    /// Cards drawn on entering the Draw phase.
    pub(crate) draw_per_turn: usize,
    pub(crate) dealt: SideMap<u32>,
    pub(crate) destroyed: SideMap<u32>,
}

impl GameState {
    /// Build decks, shuffle them, and deal opening hands.
    ///
    /// The game starts on turn 1 in the Intruder's Draw phase. The opening
    /// hands stand in for that first draw, so the Draw entry action is not
    /// run for it.
    pub fn new_game(config: &GameConfig, shuffle: &mut impl DeckShuffle) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut ids = IdAllocator::new();
        let intruder_deck = build_deck(&config.decks[Side::Intruder], &mut ids, shuffle);
        let defender_deck = build_deck(&config.decks[Side::Defender], &mut ids, shuffle);
        let dealt = SideMap::new(|side| match side {
            Side::Intruder => intruder_deck.len() as u32,
            Side::Defender => defender_deck.len() as u32,
        });

        let mut sides = SideMap::new(|_| PlayerSide::new(Vec::new()));
        sides[Side::Intruder] = PlayerSide::new(intruder_deck);
        sides[Side::Defender] = PlayerSide::new(defender_deck);

        for (side, player) in sides.iter_mut() {
            for _ in 0..config.opening_hand[side] {
                player.zones.draw_front();
            }
        }

        let mut log = GameLog::new(config.log_capacity);
        log.append(
            format!(
                "Game started: Intruder holds {} cards, Defender holds {} cards, core at {}",
                sides[Side::Intruder].hand().len(),
                sides[Side::Defender].hand().len(),
                config.max_health
            ),
            LogCategory::Game,
            None,
        );

        tracing::info!(seed = config.seed, max_health = config.max_health, "new game");

        Ok(Self {
            turn_number: 1,
            active_side: Side::Intruder,
            phase: Phase::Draw,
            priority: Side::Intruder,
            sides,
            core: DefenderCore::new(config.max_health),
            combat: CombatState::default(),
            log,
            is_over: false,
            winner: None,
            history: Vector::new(),
            action_sequence: 0,
            ids,
            draw_per_turn: config.draw_per_turn,
            dealt,
            destroyed: SideMap::with_value(0),
        })
    }

    // === Progression ===

    #[must_use]
    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    #[must_use]
    pub fn active_side(&self) -> Side {
        self.active_side
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The side expected to submit the next game action.
    #[must_use]
    pub fn priority(&self) -> Side {
        self.priority
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.is_over
    }

    #[must_use]
    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    // === Sides ===

    #[must_use]
    pub fn side(&self, side: Side) -> &PlayerSide {
        &self.sides[side]
    }

    #[must_use]
    pub fn intruder(&self) -> &PlayerSide {
        &self.sides[Side::Intruder]
    }

    #[must_use]
    pub fn defender(&self) -> &PlayerSide {
        &self.sides[Side::Defender]
    }

    #[must_use]
    pub fn core(&self) -> &DefenderCore {
        &self.core
    }

    // === Combat ===

    /// Intruder field index of the attack awaiting a block, if any.
    #[must_use]
    pub fn pending_attack(&self) -> Option<usize> {
        self.combat.pending_attack
    }

    /// Whether a unit already attacked this Combat phase.
    #[must_use]
    pub fn has_attacked(&self, id: CardId) -> bool {
        self.combat.attacked.contains(&id)
    }

    // === Log and history ===

    #[must_use]
    pub fn log(&self) -> &GameLog {
        &self.log
    }

    #[must_use]
    pub fn history(&self) -> &Vector<ActionRecord> {
        &self.history
    }

    // === Card accounting ===

    /// Cards dealt to a side at setup.
    #[must_use]
    pub fn dealt(&self, side: Side) -> u32 {
        self.dealt[side]
    }

    /// Cards of a side destroyed in combat.
    #[must_use]
    pub fn destroyed(&self, side: Side) -> u32 {
        self.destroyed[side]
    }

    /// Verify every state invariant.
    ///
    /// Run on entry to each rule operation and on snapshot load. A failure
    /// here means the state was corrupted, not that an action was illegal.
    pub fn check_integrity(&self) -> Result<(), IntegrityError> {
        if self.turn_number == 0 {
            return Err(IntegrityError::ZeroTurnNumber);
        }
        if self.core.max_health == 0 {
            return Err(IntegrityError::NonPositiveMaxHealth);
        }
        if self.core.current_health > self.core.max_health {
            return Err(IntegrityError::HealthOutOfRange {
                current: self.core.current_health,
                max: self.core.max_health,
            });
        }
        if self.core.current_health == 0 && !self.is_over {
            return Err(IntegrityError::DeadCoreNotOver);
        }
        if self.is_over != self.winner.is_some() {
            return Err(IntegrityError::WinnerMismatch);
        }
        if self.phase == Phase::Combat && self.active_side != Side::Intruder {
            return Err(IntegrityError::CombatOutsideIntruderTurn {
                side: self.active_side,
            });
        }
        if self.combat.pending_attack.is_some() && self.phase != Phase::Combat {
            return Err(IntegrityError::PendingAttackOutsideCombat);
        }
        if !self.combat.attacked.is_empty() && self.phase != Phase::Combat {
            return Err(IntegrityError::AttackedOutsideCombat);
        }

        // An attack awaiting its block hands priority to the Defender;
        // otherwise the active side holds it.
        let expected = match self.combat.pending_attack {
            Some(_) => Side::Defender,
            None => self.active_side,
        };
        if self.priority != expected {
            return Err(IntegrityError::PriorityMismatch {
                priority: self.priority,
                expected,
            });
        }

        let intruder_field = self.sides[Side::Intruder].field();
        if let Some(index) = self.combat.pending_attack {
            if index >= intruder_field.len() {
                return Err(IntegrityError::PendingAttackerMissing {
                    index,
                    len: intruder_field.len(),
                });
            }
        }
        if let Some(&id) = self
            .combat
            .attacked
            .iter()
            .find(|&&id| !intruder_field.iter().any(|c| c.id == id))
        {
            return Err(IntegrityError::StaleAttacker { id });
        }

        let mut seen = FxHashSet::default();
        for (side, player) in self.sides.iter() {
            if player.resource_available > player.resource_total {
                return Err(IntegrityError::ResourceOverflow {
                    side,
                    available: player.resource_available,
                    total: player.resource_total,
                });
            }

            let held = player.zones.total();
            if held as u64 + u64::from(self.destroyed[side]) != u64::from(self.dealt[side]) {
                return Err(IntegrityError::CardCountMismatch {
                    side,
                    held,
                    destroyed: self.destroyed[side],
                    dealt: self.dealt[side],
                });
            }

            for card in player.zones.all_cards() {
                if !seen.insert(card.id) {
                    return Err(IntegrityError::DuplicateCard { id: card.id });
                }
                if !card.stats_consistent() {
                    return Err(IntegrityError::MissingStats { id: card.id });
                }
            }

            let foreign = match side {
                Side::Intruder => CardCategory::Barrier,
                Side::Defender => CardCategory::Unit,
            };
            if let Some(card) = player.field().iter().find(|c| c.category == foreign) {
                return Err(IntegrityError::ForeignCategory {
                    id: card.id,
                    category: card.category,
                    side,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Hand-assembled states for unit tests.

    use super::*;
    use crate::core::rng::NoShuffle;

    /// Default game, unshuffled.
    pub(crate) fn new_game() -> GameState {
        GameState::new_game(&GameConfig::default(), &mut NoShuffle).unwrap()
    }

    /// Put a card directly onto a side's field, keeping card accounting valid.
    pub(crate) fn install(state: &mut GameState, side: Side, mut card: Card) -> CardId {
        card.id = state.ids.alloc();
        let id = card.id;
        state.sides[side].zones.push_field(card);
        state.dealt[side] += 1;
        id
    }

    /// Jump to the Intruder's Combat phase with priority on the Intruder.
    pub(crate) fn enter_combat(state: &mut GameState) {
        state.active_side = Side::Intruder;
        state.phase = Phase::Combat;
        state.priority = Side::Intruder;
    }
}
