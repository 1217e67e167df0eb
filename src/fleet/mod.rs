//! Fleet representation.
//!
//! Contains ships, their weapons and sides, fleets as ordered collections,
//! and the fixed-stat defender presets.

pub mod fleet;
pub mod presets;
pub mod ship;

pub use fleet::Fleet;
pub use presets::preset;
pub use ship::{
    Ship, ShipError, ShipType, Side, Volley, Weapon, ALL_SHIP_TYPES, DIE_FACES, MAX_BONUS,
    MAX_DAMAGE, MAX_HULL, MAX_INITIATIVE, MIN_DAMAGE,
};
