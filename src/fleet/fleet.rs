//! Ordered collection of ships from both sides.
//!
//! Fleet order is the default firing sequence. Targeting and display
//! orderings are derived on demand as index lists, so the fleet itself is
//! never re-sorted.

use std::cmp::Reverse;
use std::fmt;

use super::ship::{Ship, Side};

/// All ships engaged in one battle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fleet {
    ships: Vec<Ship>,
}

impl Fleet {
    pub fn new() -> Self {
        Fleet { ships: Vec::new() }
    }

    pub fn from_ships(ships: Vec<Ship>) -> Self {
        Fleet { ships }
    }

    pub fn push(&mut self, ship: Ship) {
        self.ships.push(ship);
    }

    /// Removes and returns the ship at `index`, if present.
    pub fn remove(&mut self, index: usize) -> Option<Ship> {
        if index < self.ships.len() {
            Some(self.ships.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.ships.clear();
    }

    pub fn len(&self) -> usize {
        self.ships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ships.is_empty()
    }

    pub fn ships(&self) -> &[Ship] {
        &self.ships
    }

    pub fn ship(&self, index: usize) -> &Ship {
        &self.ships[index]
    }

    pub fn ship_mut(&mut self, index: usize) -> &mut Ship {
        &mut self.ships[index]
    }

    /// Number of ships on `side`, destroyed or not.
    pub fn count(&self, side: Side) -> usize {
        self.ships.iter().filter(|s| s.side == side).count()
    }

    /// Number of non-destroyed ships on `side`.
    pub fn living(&self, side: Side) -> usize {
        self.ships
            .iter()
            .filter(|s| s.side == side && !s.is_destroyed())
            .count()
    }

    pub fn has_living(&self, side: Side) -> bool {
        self.ships
            .iter()
            .any(|s| s.side == side && !s.is_destroyed())
    }

    /// Returns the indices of living enemies of `firing_side` in the order
    /// a shot tries them: remaining hull descending, then missile count
    /// descending, then fleet order.
    pub fn target_order(&self, firing_side: Side) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.ships.len())
            .filter(|&i| {
                let s = &self.ships[i];
                s.side != firing_side && !s.is_destroyed()
            })
            .collect();
        order.sort_by_key(|&i| {
            let s = &self.ships[i];
            (Reverse(s.remaining_hull()), Reverse(s.missiles().len()))
        });
        order
    }

    /// Returns all indices sorted by initiative descending. On equal
    /// initiative defenders come first; remaining ties keep fleet order.
    pub fn initiative_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.ships.len()).collect();
        order.sort_by_key(|&i| {
            let s = &self.ships[i];
            (Reverse(s.initiative), s.side != Side::Defender)
        });
        order
    }

    /// Returns the living ships of `side` sorted by type, for display.
    pub fn display_order(&self, side: Side) -> Vec<&Ship> {
        let mut ships: Vec<&Ship> = self
            .ships
            .iter()
            .filter(|s| s.side == side && !s.is_destroyed())
            .collect();
        ships.sort_by_key(|s| s.ship_type);
        ships
    }
}

impl fmt::Display for Fleet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, side) in [Side::Attacker, Side::Defender].into_iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(f, "{}:", if side == Side::Attacker { "Attacker" } else { "Defender" })?;
            for ship in self.display_order(side) {
                writeln!(f, "{}", ship)?;
            }
        }
        Ok(())
    }
}
