//! Single firing events: hit determination and target assignment.
//!
//! A shot that clears `roll + attack >= 6` walks the targeting order. A
//! candidate accepts it on a natural 6 or when `roll + attack - defense >= 6`.
//! Among accepting candidates the shot goes to the first one it would
//! destroy, or to the last candidate in the order if nothing earlier was
//! taken. Only the chosen target is mutated; the order is rebuilt for the
//! next shot.

use rand::Rng;

use crate::fleet::{Fleet, Ship, Side, Volley, DIE_FACES};

/// One weapon discharge with its die already rolled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shot {
    pub roll: u8,
    pub attack_bonus: u8,
    pub damage: u8,
}

impl Shot {
    /// Whether the shot can hit anything at all.
    pub fn clears_base(&self) -> bool {
        u16::from(self.roll) + u16::from(self.attack_bonus) >= u16::from(DIE_FACES)
    }

    /// Whether `target` accepts the hit after its defense bonus.
    pub fn penetrates(&self, target: &Ship) -> bool {
        self.roll == DIE_FACES
            || u16::from(self.roll) + u16::from(self.attack_bonus)
                >= u16::from(DIE_FACES) + u16::from(target.defense_bonus)
    }

    /// Whether the hit would finish `target` from its current hull.
    pub fn is_lethal(&self, target: &Ship) -> bool {
        i32::from(self.damage) > target.remaining_hull()
    }
}

/// Result of one firing event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotOutcome {
    /// The roll did not clear the base threshold.
    Miss,
    /// No candidate took the hit.
    Wasted,
    /// Damage was applied to the ship at `target`.
    Hit { target: usize, destroyed: bool },
}

/// Rolls one combat die.
pub fn roll_die(rng: &mut impl Rng) -> u8 {
    rng.gen_range(1..=DIE_FACES)
}

/// Resolves one shot fired by a ship of `side`.
pub fn resolve_shot(fleet: &mut Fleet, side: Side, shot: Shot) -> ShotOutcome {
    if !shot.clears_base() {
        return ShotOutcome::Miss;
    }

    let candidates = fleet.target_order(side);
    let last = candidates.len().saturating_sub(1);

    for (pos, &idx) in candidates.iter().enumerate() {
        let target = fleet.ship(idx);
        if !shot.penetrates(target) {
            continue;
        }
        if !shot.is_lethal(target) && pos != last {
            continue;
        }
        let destroyed = fleet.ship_mut(idx).apply_damage(shot.damage);
        return ShotOutcome::Hit {
            target: idx,
            destroyed,
        };
    }

    ShotOutcome::Wasted
}

/// Fires every weapon of the given volley carried by the ship at `firer`.
pub fn fire_volley(fleet: &mut Fleet, firer: usize, volley: Volley, rng: &mut impl Rng) {
    let (side, attack_bonus, count) = {
        let ship = fleet.ship(firer);
        (ship.side, ship.attack_bonus, ship.volley(volley).len())
    };

    for w in 0..count {
        let damage = fleet.ship(firer).volley(volley)[w].damage;
        let shot = Shot {
            roll: roll_die(rng),
            attack_bonus,
            damage,
        };
        resolve_shot(fleet, side, shot);
    }
}
