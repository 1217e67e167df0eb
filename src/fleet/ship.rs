//! Ships, weapons, and the side they fight for.
//!
//! A ship's weapon lists are fixed once it is built; only its hull damage
//! and destroyed flag change while a battle is resolved.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Highest face of the combat die. Rolling it always penetrates defense.
pub const DIE_FACES: u8 = 6;

/// Maximum initiative a ship may have.
pub const MAX_INITIATIVE: u8 = 6;
/// Maximum attack or defense bonus a ship may have.
pub const MAX_BONUS: u8 = 5;
/// Maximum hull capacity a ship may have.
pub const MAX_HULL: u8 = 15;
/// Valid damage range for a single weapon or missile.
pub const MIN_DAMAGE: u8 = 1;
pub const MAX_DAMAGE: u8 = 4;

/// Dice glyphs indexed by weapon damage.
const DAMAGE_GLYPHS: [&str; 7] = ["", "⚀", "⚁", "⚂", "⚃", "⚄", "⚅"];

/// Errors raised when a ship's stats fall outside the playable ranges.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShipError {
    #[error("initiative {0} out of range 0-{max}", max = MAX_INITIATIVE)]
    Initiative(u8),

    #[error("attack bonus {0} out of range 0-{max}", max = MAX_BONUS)]
    Attack(u8),

    #[error("defense bonus {0} out of range 0-{max}", max = MAX_BONUS)]
    Defense(u8),

    #[error("hull {0} out of range 0-{max}", max = MAX_HULL)]
    Hull(u8),

    #[error("weapon damage {0} out of range {min}-{max}", min = MIN_DAMAGE, max = MAX_DAMAGE)]
    WeaponDamage(u8),

    #[error("missile damage {0} out of range {min}-{max}", min = MIN_DAMAGE, max = MAX_DAMAGE)]
    MissileDamage(u8),
}

/// One of the two parties in a battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Attacker,
    Defender,
}

impl Side {
    /// Returns the opposing side.
    pub const fn opponent(self) -> Side {
        match self {
            Side::Attacker => Side::Defender,
            Side::Defender => Side::Attacker,
        }
    }

    /// Returns the single-character notation abbreviation.
    pub const fn notation_char(self) -> char {
        match self {
            Side::Attacker => 'A',
            Side::Defender => 'D',
        }
    }

    /// Parses a side from its notation abbreviation.
    pub fn from_notation_char(c: char) -> Option<Side> {
        match c {
            'A' => Some(Side::Attacker),
            'D' => Some(Side::Defender),
            _ => None,
        }
    }

    /// Lowercase name used in reports.
    pub const fn name(self) -> &'static str {
        match self {
            Side::Attacker => "attacker",
            Side::Defender => "defender",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Hull class of a ship. Only used for presets and display ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShipType {
    Interceptor,
    Cruiser,
    Dreadnought,
    Starbase,
    Ancient,
    Guardian,
    Gcds,
}

/// All ship types in display order.
pub const ALL_SHIP_TYPES: [ShipType; 7] = [
    ShipType::Interceptor,
    ShipType::Cruiser,
    ShipType::Dreadnought,
    ShipType::Starbase,
    ShipType::Ancient,
    ShipType::Guardian,
    ShipType::Gcds,
];

impl ShipType {
    /// Returns the single-character notation abbreviation.
    pub const fn notation_char(self) -> char {
        match self {
            ShipType::Interceptor => 'i',
            ShipType::Cruiser => 'c',
            ShipType::Dreadnought => 'd',
            ShipType::Starbase => 's',
            ShipType::Ancient => 'n',
            ShipType::Guardian => 'g',
            ShipType::Gcds => 'x',
        }
    }

    /// Parses a ship type from its notation abbreviation.
    pub fn from_notation_char(c: char) -> Option<ShipType> {
        ALL_SHIP_TYPES
            .iter()
            .copied()
            .find(|t| t.notation_char() == c)
    }

    /// Parses a ship type from its full lowercase name.
    pub fn from_name(name: &str) -> Option<ShipType> {
        ALL_SHIP_TYPES
            .iter()
            .copied()
            .find(|t| t.name().eq_ignore_ascii_case(name))
    }

    pub const fn name(self) -> &'static str {
        match self {
            ShipType::Interceptor => "Interceptor",
            ShipType::Cruiser => "Cruiser",
            ShipType::Dreadnought => "Dreadnought",
            ShipType::Starbase => "Starbase",
            ShipType::Ancient => "Ancient",
            ShipType::Guardian => "Guardian",
            ShipType::Gcds => "GCDS",
        }
    }

    /// Whether this type is a fixed-stat defender preset.
    pub const fn is_preset(self) -> bool {
        matches!(self, ShipType::Ancient | ShipType::Guardian | ShipType::Gcds)
    }
}

/// A weapon with a fixed damage rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Weapon {
    pub damage: u8,
}

impl Weapon {
    pub const fn new(damage: u8) -> Self {
        Weapon { damage }
    }
}

/// Which weapon list a ship fires during a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Volley {
    /// One-shot ranged salvo.
    Missiles,
    /// Regular weapons, fired every melee round.
    Weapons,
}

/// A combat ship and its current damage state.
///
/// `destroyed` is true exactly when `hull_damage > hull`; damage equal to
/// the hull capacity leaves the ship alive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ship {
    pub ship_type: ShipType,
    pub side: Side,
    pub initiative: u8,
    pub attack_bonus: u8,
    pub defense_bonus: u8,
    pub hull: u8,
    hull_damage: u16,
    destroyed: bool,
    weapons: Vec<Weapon>,
    missiles: Vec<Weapon>,
}

impl Ship {
    /// Creates an undamaged ship with zero stats and no weapons.
    pub fn new(ship_type: ShipType, side: Side) -> Self {
        Ship {
            ship_type,
            side,
            initiative: 0,
            attack_bonus: 0,
            defense_bonus: 0,
            hull: 0,
            hull_damage: 0,
            destroyed: false,
            weapons: Vec::new(),
            missiles: Vec::new(),
        }
    }

    pub fn with_initiative(mut self, initiative: u8) -> Self {
        self.initiative = initiative;
        self
    }

    pub fn with_attack(mut self, attack_bonus: u8) -> Self {
        self.attack_bonus = attack_bonus;
        self
    }

    pub fn with_defense(mut self, defense_bonus: u8) -> Self {
        self.defense_bonus = defense_bonus;
        self
    }

    pub fn with_hull(mut self, hull: u8) -> Self {
        self.hull = hull;
        self
    }

    /// Sets the regular weapons from a list of damage values.
    pub fn with_weapons(mut self, damages: &[u8]) -> Self {
        self.weapons = damages.iter().map(|&d| Weapon::new(d)).collect();
        self
    }

    /// Sets the missiles from a list of damage values.
    pub fn with_missiles(mut self, damages: &[u8]) -> Self {
        self.missiles = damages.iter().map(|&d| Weapon::new(d)).collect();
        self
    }

    pub fn weapons(&self) -> &[Weapon] {
        &self.weapons
    }

    pub fn missiles(&self) -> &[Weapon] {
        &self.missiles
    }

    /// Returns the weapon list fired in the given volley.
    pub fn volley(&self, volley: Volley) -> &[Weapon] {
        match volley {
            Volley::Missiles => &self.missiles,
            Volley::Weapons => &self.weapons,
        }
    }

    pub fn hull_damage(&self) -> u16 {
        self.hull_damage
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Hull capacity minus accumulated damage. Negative after overkill.
    pub fn remaining_hull(&self) -> i32 {
        i32::from(self.hull) - i32::from(self.hull_damage)
    }

    /// Applies damage and returns whether the ship is now destroyed.
    pub fn apply_damage(&mut self, damage: u8) -> bool {
        self.hull_damage = self.hull_damage.saturating_add(u16::from(damage));
        if self.hull_damage > u16::from(self.hull) {
            self.destroyed = true;
        }
        self.destroyed
    }

    /// Checks every stat against the playable ranges.
    pub fn validate(&self) -> Result<(), ShipError> {
        if self.initiative > MAX_INITIATIVE {
            return Err(ShipError::Initiative(self.initiative));
        }
        if self.attack_bonus > MAX_BONUS {
            return Err(ShipError::Attack(self.attack_bonus));
        }
        if self.defense_bonus > MAX_BONUS {
            return Err(ShipError::Defense(self.defense_bonus));
        }
        if self.hull > MAX_HULL {
            return Err(ShipError::Hull(self.hull));
        }
        if let Some(w) = self.weapons.iter().find(|w| !valid_damage(w.damage)) {
            return Err(ShipError::WeaponDamage(w.damage));
        }
        if let Some(m) = self.missiles.iter().find(|m| !valid_damage(m.damage)) {
            return Err(ShipError::MissileDamage(m.damage));
        }
        Ok(())
    }
}

fn valid_damage(damage: u8) -> bool {
    (MIN_DAMAGE..=MAX_DAMAGE).contains(&damage)
}

fn write_glyphs(f: &mut fmt::Formatter<'_>, weapons: &[Weapon]) -> fmt::Result {
    for w in weapons {
        let glyph = DAMAGE_GLYPHS
            .get(usize::from(w.damage))
            .copied()
            .unwrap_or("?");
        write!(f, "{} ", glyph)?;
    }
    Ok(())
}

impl fmt::Display for Ship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: Init: {}, Atk: {}, Def: {}, Hull: {}",
            self.ship_type.name(),
            self.initiative,
            self.attack_bonus,
            self.defense_bonus,
            self.hull
        )?;
        if !self.missiles.is_empty() {
            f.write_str("\tMissiles: ")?;
            write_glyphs(f, &self.missiles)?;
        }
        if !self.weapons.is_empty() {
            f.write_str("\tWeapons: ")?;
            write_glyphs(f, &self.weapons)?;
        }
        if self.destroyed {
            f.write_str(" 💥")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn cruiser() -> Ship {
        Ship::new(ShipType::Cruiser, Side::Attacker)
            .with_initiative(2)
            .with_attack(1)
            .with_hull(2)
            .with_weapons(&[1, 2])
            .with_missiles(&[2])
    }

    #[test]
    fn damage_equal_to_hull_does_not_destroy() {
        let mut ship = cruiser();
        assert!(!ship.apply_damage(2));
        assert_eq!(ship.remaining_hull(), 0);
        assert!(!ship.is_destroyed());
        assert!(ship.apply_damage(1));
        assert!(ship.is_destroyed());
        assert_eq!(ship.remaining_hull(), -1);
    }

    #[test]
    fn zero_hull_ship_dies_to_any_hit() {
        let mut ship = Ship::new(ShipType::Interceptor, Side::Defender);
        assert!(ship.apply_damage(1));
    }

    #[test]
    fn clone_is_independent() {
        let original = cruiser();
        let mut copy = original.clone();
        copy.apply_damage(3);
        assert!(copy.is_destroyed());
        assert_eq!(original.hull_damage(), 0);
        assert!(!original.is_destroyed());
        assert_eq!(copy.weapons(), original.weapons());
    }

    #[test]
    fn volley_selects_weapon_list() {
        let ship = cruiser();
        assert_eq!(ship.volley(Volley::Missiles), &[Weapon::new(2)]);
        assert_eq!(ship.volley(Volley::Weapons).len(), 2);
    }

    #[test]
    fn validate_rejects_out_of_range_stats() {
        assert_eq!(cruiser().validate(), Ok(()));
        assert_eq!(
            cruiser().with_initiative(7).validate(),
            Err(ShipError::Initiative(7))
        );
        assert_eq!(cruiser().with_attack(6).validate(), Err(ShipError::Attack(6)));
        assert_eq!(cruiser().with_defense(9).validate(), Err(ShipError::Defense(9)));
        assert_eq!(cruiser().with_hull(16).validate(), Err(ShipError::Hull(16)));
        assert_eq!(
            cruiser().with_weapons(&[1, 5]).validate(),
            Err(ShipError::WeaponDamage(5))
        );
        assert_eq!(
            cruiser().with_missiles(&[0]).validate(),
            Err(ShipError::MissileDamage(0))
        );
    }

    #[test]
    fn side_and_type_chars() {
        assert_eq!(Side::from_notation_char('A'), Some(Side::Attacker));
        assert_eq!(Side::from_notation_char('D'), Some(Side::Defender));
        assert_eq!(Side::from_notation_char('x'), None);
        assert_eq!(Side::Attacker.opponent(), Side::Defender);
        for t in ALL_SHIP_TYPES {
            assert_eq!(ShipType::from_notation_char(t.notation_char()), Some(t));
            assert_eq!(ShipType::from_name(t.name()), Some(t));
        }
        assert_eq!(ShipType::from_name("gcds"), Some(ShipType::Gcds));
    }

    #[test]
    fn display_shows_dice_and_wreck_marker() {
        let mut ship = cruiser();
        let text = ship.to_string();
        assert!(text.starts_with("Cruiser: Init: 2, Atk: 1, Def: 0, Hull: 2"));
        assert!(text.contains("Missiles: ⚁"));
        assert!(text.contains("Weapons: ⚀ ⚁"));
        assert!(!text.contains('💥'));
        ship.apply_damage(4);
        assert!(ship.to_string().ends_with('💥'));
    }

    proptest! {
        #[test]
        fn destroyed_iff_damage_exceeds_hull(hull in 0u8..=15, hits in proptest::collection::vec(1u8..=4, 0..12)) {
            let mut ship = Ship::new(ShipType::Dreadnought, Side::Defender).with_hull(hull);
            let mut total = 0u16;
            for d in hits {
                total += u16::from(d);
                ship.apply_damage(d);
                prop_assert_eq!(ship.is_destroyed(), total > u16::from(hull));
                prop_assert_eq!(ship.remaining_hull(), i32::from(hull) - i32::from(total));
            }
        }
    }
}
