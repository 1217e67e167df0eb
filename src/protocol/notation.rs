//! Compact text notation for ships and fleets.
//!
//! A ship entry is `[count]<side><type>[:<init>.<atk>.<def>.<hull>:<weapons>:<missiles>]`
//! where side is `A` or `D`, type is one of `i c d s n g x`, and each
//! weapon or missile is written as one damage digit. The stats block may be
//! dropped for preset types (`n` ancient, `g` guardian, `x` GCDS), which are
//! always defenders. A fleet is a `/`-separated list of entries, or `-` for
//! an empty fleet.
//!
//! Examples: `2Ai:3.0.0.1:11:`, `Dc:2.1.1.3:1:2`, `Dx`, `3Dn/Ad:1.0.0.5:111:`.

use crate::fleet::{preset, Fleet, Ship, ShipError, ShipType, Side};

/// Largest count accepted in front of a single entry.
pub const MAX_COUNT: usize = 12;

/// Errors that can occur while parsing ship or fleet notation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotationError {
    #[error("empty ship entry")]
    EmptyEntry,

    #[error("invalid ship count '{0}' (expected 1-{max})", max = MAX_COUNT)]
    InvalidCount(String),

    #[error("invalid side character: '{0}'")]
    InvalidSide(char),

    #[error("invalid ship type character: '{0}'")]
    InvalidShipType(char),

    #[error("invalid ship entry: '{0}'")]
    InvalidEntry(String),

    #[error("expected 3 ':'-separated fields after the ship type, got {0}")]
    WrongFieldCount(usize),

    #[error("expected 4 '.'-separated stats, got {0}")]
    WrongStatCount(usize),

    #[error("invalid stat value: '{0}'")]
    InvalidStat(String),

    #[error("invalid damage digit: '{0}'")]
    InvalidDamage(char),

    #[error("{0} has no preset; stats are required")]
    MissingStats(&'static str),

    #[error("{0} presets are defender ships")]
    PresetSide(&'static str),

    #[error(transparent)]
    Ship(#[from] ShipError),
}

/// Splits a leading decimal count off an entry head.
fn parse_count(head: &str) -> Result<(usize, &str), NotationError> {
    let digits = head.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return Ok((1, head));
    }
    let (count_str, rest) = head.split_at(digits);
    let count: usize = count_str
        .parse()
        .map_err(|_| NotationError::InvalidCount(count_str.to_string()))?;
    if !(1..=MAX_COUNT).contains(&count) {
        return Err(NotationError::InvalidCount(count_str.to_string()));
    }
    Ok((count, rest))
}

/// Parses the `<side><type>` pair.
fn parse_kind(s: &str, entry: &str) -> Result<(Side, ShipType), NotationError> {
    let mut chars = s.chars();
    let (side_char, type_char) = match (chars.next(), chars.next(), chars.next()) {
        (Some(a), Some(b), None) => (a, b),
        _ => return Err(NotationError::InvalidEntry(entry.to_string())),
    };
    let side = Side::from_notation_char(side_char).ok_or(NotationError::InvalidSide(side_char))?;
    let ship_type =
        ShipType::from_notation_char(type_char).ok_or(NotationError::InvalidShipType(type_char))?;
    Ok((side, ship_type))
}

/// Parses `init.atk.def.hull`.
fn parse_stats(s: &str) -> Result<[u8; 4], NotationError> {
    let parts: Vec<&str> = s.split('.').collect();
    if parts.len() != 4 {
        return Err(NotationError::WrongStatCount(parts.len()));
    }
    let mut stats = [0u8; 4];
    for (slot, part) in stats.iter_mut().zip(&parts) {
        *slot = part
            .parse()
            .map_err(|_| NotationError::InvalidStat(part.to_string()))?;
    }
    Ok(stats)
}

/// Parses a run of damage digits. Range checks happen in ship validation.
fn parse_damages(s: &str) -> Result<Vec<u8>, NotationError> {
    s.chars()
        .map(|c| {
            c.to_digit(10)
                .map(|d| d as u8)
                .ok_or(NotationError::InvalidDamage(c))
        })
        .collect()
}

/// Parses one ship entry, expanded to `count` identical ships.
pub fn parse_ships(entry: &str) -> Result<Vec<Ship>, NotationError> {
    let entry = entry.trim();
    if entry.is_empty() {
        return Err(NotationError::EmptyEntry);
    }

    let (head, body) = match entry.split_once(':') {
        Some((h, b)) => (h, Some(b)),
        None => (entry, None),
    };
    let (count, kind) = parse_count(head)?;
    let (side, ship_type) = parse_kind(kind, entry)?;

    let ship = match body {
        None => {
            let ship = preset(ship_type).ok_or(NotationError::MissingStats(ship_type.name()))?;
            if side != ship.side {
                return Err(NotationError::PresetSide(ship_type.name()));
            }
            ship
        }
        Some(body) => {
            let fields: Vec<&str> = body.split(':').collect();
            if fields.len() != 3 {
                return Err(NotationError::WrongFieldCount(fields.len()));
            }
            let [initiative, attack, defense, hull] = parse_stats(fields[0])?;
            Ship::new(ship_type, side)
                .with_initiative(initiative)
                .with_attack(attack)
                .with_defense(defense)
                .with_hull(hull)
                .with_weapons(&parse_damages(fields[1])?)
                .with_missiles(&parse_damages(fields[2])?)
        }
    };
    ship.validate()?;

    Ok(vec![ship; count])
}

/// Parses a `/`-separated fleet, or `-` for an empty one.
pub fn parse_fleet(s: &str) -> Result<Fleet, NotationError> {
    let s = s.trim();
    let mut fleet = Fleet::new();
    if s == "-" {
        return Ok(fleet);
    }
    for entry in s.split('/') {
        for ship in parse_ships(entry)? {
            fleet.push(ship);
        }
    }
    Ok(fleet)
}

fn encode_damages(weapons: &[crate::fleet::Weapon]) -> String {
    weapons.iter().map(|w| char::from(b'0' + w.damage)).collect()
}

/// Encodes a ship in the full canonical form (no count prefix).
pub fn format_ship(ship: &Ship) -> String {
    format!(
        "{}{}:{}.{}.{}.{}:{}:{}",
        ship.side.notation_char(),
        ship.ship_type.notation_char(),
        ship.initiative,
        ship.attack_bonus,
        ship.defense_bonus,
        ship.hull,
        encode_damages(ship.weapons()),
        encode_damages(ship.missiles())
    )
}

/// Encodes a fleet, folding runs of identical ships into a count prefix.
/// Damage state is not encoded.
pub fn format_fleet(fleet: &Fleet) -> String {
    if fleet.is_empty() {
        return "-".to_string();
    }

    let mut entries: Vec<String> = Vec::new();
    let mut run: Option<(String, usize)> = None;
    for ship in fleet.ships() {
        let encoded = format_ship(ship);
        run = match run {
            Some((prev, n)) if prev == encoded && n < MAX_COUNT => Some((prev, n + 1)),
            Some((prev, n)) => {
                entries.push(with_count(&prev, n));
                Some((encoded, 1))
            }
            None => Some((encoded, 1)),
        };
    }
    if let Some((prev, n)) = run {
        entries.push(with_count(&prev, n));
    }
    entries.join("/")
}

fn with_count(encoded: &str, n: usize) -> String {
    if n == 1 {
        encoded.to_string()
    } else {
        format!("{}{}", n, encoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fleet::presets;

    #[test]
    fn parse_full_entry() {
        let ships = parse_ships("Ac:2.1.1.3:12:2").unwrap();
        assert_eq!(ships.len(), 1);
        let s = &ships[0];
        assert_eq!(s.side, Side::Attacker);
        assert_eq!(s.ship_type, ShipType::Cruiser);
        assert_eq!((s.initiative, s.attack_bonus, s.defense_bonus, s.hull), (2, 1, 1, 3));
        assert_eq!(s.weapons().iter().map(|w| w.damage).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(s.missiles().len(), 1);
    }

    #[test]
    fn parse_count_prefix() {
        let ships = parse_ships("12Ai:3.0.0.0:1:").unwrap();
        assert_eq!(ships.len(), 12);
        assert!(ships.iter().all(|s| s.missiles().is_empty()));
    }

    #[test]
    fn parse_preset_shortcut() {
        assert_eq!(parse_ships("Dx").unwrap(), vec![presets::gcds()]);
        assert_eq!(parse_ships("2Dn").unwrap().len(), 2);
    }

    #[test]
    fn parse_fleet_entries() {
        let fleet = parse_fleet("2Ai:3.0.0.1:1:/Dg/Ds:0.0.2.4:11:").unwrap();
        assert_eq!(fleet.len(), 4);
        assert_eq!(fleet.count(Side::Attacker), 2);
        assert_eq!(fleet.ship(2).ship_type, ShipType::Guardian);
        assert!(parse_fleet("-").unwrap().is_empty());
    }

    #[test]
    fn format_roundtrip_folds_runs() {
        let text = "3Ai:3.0.0.1:1:/Dc:2.1.1.3:12:2/Dn:2.1.0.1:11:";
        let fleet = parse_fleet(text).unwrap();
        assert_eq!(format_fleet(&fleet), text);
        assert_eq!(format_fleet(&Fleet::new()), "-");
    }

    #[test]
    fn error_invalid_side() {
        assert_eq!(parse_ships("Xc:1.1.1.1::"), Err(NotationError::InvalidSide('X')));
    }

    #[test]
    fn error_invalid_type() {
        assert_eq!(parse_ships("Aq:1.1.1.1::"), Err(NotationError::InvalidShipType('q')));
    }

    #[test]
    fn error_count_out_of_range() {
        assert_eq!(
            parse_ships("13Dn"),
            Err(NotationError::InvalidCount("13".to_string()))
        );
        assert_eq!(
            parse_ships("0Dn"),
            Err(NotationError::InvalidCount("0".to_string()))
        );
    }

    #[test]
    fn error_missing_stats_for_player_hull() {
        assert_eq!(parse_ships("Ac"), Err(NotationError::MissingStats("Cruiser")));
    }

    #[test]
    fn error_attacker_preset() {
        assert_eq!(parse_ships("Ag"), Err(NotationError::PresetSide("Guardian")));
    }

    #[test]
    fn error_field_and_stat_counts() {
        assert_eq!(parse_ships("Ac:1.1.1.1:1"), Err(NotationError::WrongFieldCount(2)));
        assert_eq!(parse_ships("Ac:1.1.1:1:"), Err(NotationError::WrongStatCount(3)));
        assert_eq!(
            parse_ships("Ac:1.x.1.1::"),
            Err(NotationError::InvalidStat("x".to_string()))
        );
    }

    #[test]
    fn error_bad_damage() {
        assert_eq!(parse_ships("Ac:1.1.1.1:1a:"), Err(NotationError::InvalidDamage('a')));
        assert_eq!(
            parse_ships("Ac:1.1.1.1:5:"),
            Err(NotationError::Ship(ShipError::WeaponDamage(5)))
        );
    }

    #[test]
    fn error_out_of_range_stats() {
        assert_eq!(
            parse_ships("Ac:7.0.0.1::"),
            Err(NotationError::Ship(ShipError::Initiative(7)))
        );
        assert_eq!(
            parse_ships("Ac:1.0.0.16::"),
            Err(NotationError::Ship(ShipError::Hull(16)))
        );
    }

    #[test]
    fn error_empty_and_malformed() {
        assert_eq!(parse_ships("  "), Err(NotationError::EmptyEntry));
        assert_eq!(
            parse_fleet("Dn//Dg"),
            Err(NotationError::EmptyEntry)
        );
        assert_eq!(
            parse_ships("Acc:1.1.1.1::"),
            Err(NotationError::InvalidEntry("Acc:1.1.1.1::".to_string()))
        );
    }
}
