//! Battle phase sequencing.
//!
//! A battle is a small state machine:
//! `Ranged -> Melee { round: 1 } -> Melee { round: 2 } -> ... -> Resolved`.
//! The ranged phase is a single pass of missile fire; melee rounds repeat
//! regular weapon fire until one side has no living ships. Elimination is
//! checked after every ship's turn, so a battle can end mid-pass.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::targeting::fire_volley;
use crate::fleet::{Fleet, Side, Volley};

/// Default melee round cap used by [`BattleRules::default`].
pub const DEFAULT_MAX_ROUNDS: u32 = 1000;

/// Sequence in which ships take their turns within a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FiringOrder {
    /// Fleet insertion order.
    #[default]
    Fleet,
    /// Initiative descending, defenders first on ties.
    Initiative,
}

impl FiringOrder {
    pub fn from_name(name: &str) -> Option<FiringOrder> {
        match name.to_ascii_lowercase().as_str() {
            "fleet" => Some(FiringOrder::Fleet),
            "initiative" => Some(FiringOrder::Initiative),
            _ => None,
        }
    }
}

/// Parameters that shape how a single battle runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleRules {
    /// Melee rounds allowed before the battle is called a stalemate.
    /// `None` lets the melee phase run until one side is eliminated.
    pub max_rounds: Option<u32>,
    pub firing_order: FiringOrder,
}

impl Default for BattleRules {
    fn default() -> Self {
        BattleRules {
            max_rounds: Some(DEFAULT_MAX_ROUNDS),
            firing_order: FiringOrder::Fleet,
        }
    }
}

impl BattleRules {
    /// Rules without a round cap. A battle in which no side can ever
    /// eliminate the other never finishes under these rules.
    pub fn unbounded() -> Self {
        BattleRules {
            max_rounds: None,
            ..BattleRules::default()
        }
    }
}

/// Final result of one battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Victory(Side),
    /// The round cap was reached with both sides still alive.
    Stalemate { rounds: u32 },
}

impl Outcome {
    pub fn winner(self) -> Option<Side> {
        match self {
            Outcome::Victory(side) => Some(side),
            Outcome::Stalemate { .. } => None,
        }
    }
}

/// Where a battle currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattlePhase {
    Ranged,
    Melee { round: u32 },
    Resolved(Outcome),
}

/// One battle in progress over a fleet it mutates in place.
pub struct Battle<'a> {
    fleet: &'a mut Fleet,
    rules: BattleRules,
    order: Vec<usize>,
    phase: BattlePhase,
}

impl<'a> Battle<'a> {
    /// Prepares a battle. A fleet that already lacks living ships on a side
    /// starts out resolved.
    pub fn new(fleet: &'a mut Fleet, rules: BattleRules) -> Self {
        let order = match rules.firing_order {
            FiringOrder::Fleet => (0..fleet.len()).collect(),
            FiringOrder::Initiative => fleet.initiative_order(),
        };
        let phase = match (
            fleet.has_living(Side::Attacker),
            fleet.has_living(Side::Defender),
        ) {
            (true, true) => BattlePhase::Ranged,
            (true, false) => BattlePhase::Resolved(Outcome::Victory(Side::Attacker)),
            (false, true) => BattlePhase::Resolved(Outcome::Victory(Side::Defender)),
            (false, false) => BattlePhase::Resolved(Outcome::Stalemate { rounds: 0 }),
        };
        Battle {
            fleet,
            rules,
            order,
            phase,
        }
    }

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn fleet(&self) -> &Fleet {
        &*self.fleet
    }

    /// Runs the current phase (or one melee round) and returns the new phase.
    pub fn step(&mut self, rng: &mut impl Rng) -> BattlePhase {
        self.phase = match self.phase {
            BattlePhase::Ranged => match self.pass(Volley::Missiles, rng) {
                Some(winner) => BattlePhase::Resolved(Outcome::Victory(winner)),
                None => BattlePhase::Melee { round: 1 },
            },
            BattlePhase::Melee { round } => {
                if self.rules.max_rounds.is_some_and(|cap| round > cap) {
                    BattlePhase::Resolved(Outcome::Stalemate { rounds: round - 1 })
                } else {
                    match self.pass(Volley::Weapons, rng) {
                        Some(winner) => BattlePhase::Resolved(Outcome::Victory(winner)),
                        None => BattlePhase::Melee { round: round + 1 },
                    }
                }
            }
            resolved @ BattlePhase::Resolved(_) => resolved,
        };
        self.phase
    }

    /// Steps until the battle is resolved.
    pub fn run(mut self, rng: &mut impl Rng) -> Outcome {
        loop {
            if let BattlePhase::Resolved(outcome) = self.step(rng) {
                return outcome;
            }
        }
    }

    /// One pass over the firing order. Returns the winning side as soon as
    /// a ship's turn leaves the other side without living ships.
    fn pass(&mut self, volley: Volley, rng: &mut impl Rng) -> Option<Side> {
        for i in 0..self.order.len() {
            let idx = self.order[i];
            let ship = self.fleet.ship(idx);
            if ship.is_destroyed() {
                continue;
            }
            let side = ship.side;
            fire_volley(self.fleet, idx, volley, rng);
            if !self.fleet.has_living(side.opponent()) {
                return Some(side);
            }
        }
        None
    }
}

/// Resolves one full battle on `fleet`, mutating it in place.
pub fn resolve_battle(fleet: &mut Fleet, rules: BattleRules, rng: &mut impl Rng) -> Outcome {
    Battle::new(fleet, rules).run(rng)
}
