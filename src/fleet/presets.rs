//! Fixed-stat defender ships.

use super::ship::{Ship, ShipType, Side};

pub fn ancient() -> Ship {
    Ship::new(ShipType::Ancient, Side::Defender)
        .with_initiative(2)
        .with_attack(1)
        .with_hull(1)
        .with_weapons(&[1, 1])
}

pub fn guardian() -> Ship {
    Ship::new(ShipType::Guardian, Side::Defender)
        .with_initiative(3)
        .with_attack(2)
        .with_hull(2)
        .with_weapons(&[1, 1, 1])
}

pub fn gcds() -> Ship {
    Ship::new(ShipType::Gcds, Side::Defender)
        .with_attack(2)
        .with_hull(7)
        .with_weapons(&[1, 1, 1, 1])
}

/// Returns the preset ship for `ship_type`, or `None` for player hulls.
pub fn preset(ship_type: ShipType) -> Option<Ship> {
    match ship_type {
        ShipType::Ancient => Some(ancient()),
        ShipType::Guardian => Some(guardian()),
        ShipType::Gcds => Some(gcds()),
        _ => None,
    }
}
