//! JSON scenario files.
//!
//! A scenario lists ship entries and may carry simulation settings:
//!
//! ```json
//! {
//!   "trials": 50000,
//!   "seed": 7,
//!   "max_rounds": 500,
//!   "ships": [
//!     { "side": "attacker", "type": "cruiser", "count": 2,
//!       "initiative": 2, "attack": 1, "hull": 1, "weapons": [1], "missiles": [2] },
//!     { "side": "defender", "type": "ancient", "count": 2 }
//!   ]
//! }
//! ```
//!
//! Entries for preset types may omit every stat. Missing stats on other
//! types default to zero.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::fleet::{preset, Fleet, Ship, ShipError, ShipType, Side};
use crate::protocol::notation::MAX_COUNT;

/// Errors raised while loading a scenario file.
#[derive(Debug, thiserror::Error)]
pub enum FleetFileError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse fleet JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("ship entry {index}: count {count} out of range 1-{max}", max = MAX_COUNT)]
    Count { index: usize, count: usize },

    #[error("ship entry {index}: {ship_type} presets are defender ships")]
    PresetSide { index: usize, ship_type: &'static str },

    #[error("ship entry {index}: {source}")]
    Ship { index: usize, source: ShipError },
}

fn default_count() -> usize {
    1
}

/// One ship line in a scenario file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipEntry {
    pub side: Side,
    #[serde(rename = "type")]
    pub ship_type: ShipType,
    #[serde(default = "default_count")]
    pub count: usize,
    #[serde(default)]
    pub initiative: Option<u8>,
    #[serde(default)]
    pub attack: Option<u8>,
    #[serde(default)]
    pub defense: Option<u8>,
    #[serde(default)]
    pub hull: Option<u8>,
    #[serde(default)]
    pub weapons: Option<Vec<u8>>,
    #[serde(default)]
    pub missiles: Option<Vec<u8>>,
}

impl ShipEntry {
    fn has_stats(&self) -> bool {
        self.initiative.is_some()
            || self.attack.is_some()
            || self.defense.is_some()
            || self.hull.is_some()
            || self.weapons.is_some()
            || self.missiles.is_some()
    }

    /// Builds and validates the ships described by this entry.
    fn to_ships(&self, index: usize) -> Result<Vec<Ship>, FleetFileError> {
        if !(1..=MAX_COUNT).contains(&self.count) {
            return Err(FleetFileError::Count {
                index,
                count: self.count,
            });
        }

        let ship = match preset(self.ship_type) {
            Some(p) if !self.has_stats() => {
                if self.side != p.side {
                    return Err(FleetFileError::PresetSide {
                        index,
                        ship_type: self.ship_type.name(),
                    });
                }
                p
            }
            _ => Ship::new(self.ship_type, self.side)
                .with_initiative(self.initiative.unwrap_or(0))
                .with_attack(self.attack.unwrap_or(0))
                .with_defense(self.defense.unwrap_or(0))
                .with_hull(self.hull.unwrap_or(0))
                .with_weapons(self.weapons.as_deref().unwrap_or(&[]))
                .with_missiles(self.missiles.as_deref().unwrap_or(&[])),
        };
        ship.validate()
            .map_err(|source| FleetFileError::Ship { index, source })?;

        Ok(vec![ship; self.count])
    }
}

/// A parsed scenario file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetFile {
    pub ships: Vec<ShipEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trials: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_rounds: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threads: Option<usize>,
}

impl FleetFile {
    /// Expands the entries into a fleet in file order.
    pub fn fleet(&self) -> Result<Fleet, FleetFileError> {
        let mut fleet = Fleet::new();
        for (index, entry) in self.ships.iter().enumerate() {
            for ship in entry.to_ships(index)? {
                fleet.push(ship);
            }
        }
        Ok(fleet)
    }
}

/// Loads a scenario from a JSON file at the given path.
pub fn load_fleet_file(path: &Path) -> Result<FleetFile, FleetFileError> {
    let data = fs::read_to_string(path).map_err(|source| FleetFileError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_fleet_file_from_str(&data)
}

/// Loads a scenario from a JSON string.
pub fn load_fleet_file_from_str(json: &str) -> Result<FleetFile, FleetFileError> {
    Ok(serde_json::from_str(json)?)
}
