//! Interactive session state.
//!
//! Holds the fleet being assembled and the session options, and runs the
//! simulation for the `simulate` command.

use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

use tracing::warn;

use crate::fleet::{Fleet, Ship, Side};
use crate::protocol::fleet_file::{load_fleet_file, FleetFileError};
use crate::protocol::notation::format_fleet;
use crate::resolve::FiringOrder;
use crate::simulate::{simulate, SimulationConfig, SimulationError};

/// Errors reported back to the session user.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("no ship at index {0}")]
    NoShip(usize),

    #[error(transparent)]
    FleetFile(#[from] FleetFileError),

    #[error(transparent)]
    Simulation(#[from] SimulationError),

    #[error("output error: {0}")]
    Io(#[from] std::io::Error),
}

/// Holds the mutable state of the session between commands.
pub struct Session {
    pub fleet: Fleet,
    pub options: HashMap<String, String>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Creates a session with an empty fleet and no options.
    pub fn new() -> Self {
        Session {
            fleet: Fleet::new(),
            options: HashMap::new(),
        }
    }

    /// Appends ships to the fleet in order.
    pub fn add_ships(&mut self, ships: Vec<Ship>) {
        for ship in ships {
            self.fleet.push(ship);
        }
    }

    /// Removes the ship at `index`.
    pub fn remove_ship(&mut self, index: usize) -> Result<Ship, SessionError> {
        self.fleet.remove(index).ok_or(SessionError::NoShip(index))
    }

    pub fn clear(&mut self) {
        self.fleet.clear();
    }

    /// Replaces the fleet from a scenario file. Settings present in the
    /// file are stored as session options.
    pub fn load(&mut self, path: &Path) -> Result<(), SessionError> {
        let file = load_fleet_file(path)?;
        self.fleet = file.fleet()?;
        if let Some(trials) = file.trials {
            self.options.insert("Trials".to_string(), trials.to_string());
        }
        if let Some(seed) = file.seed {
            self.options.insert("Seed".to_string(), seed.to_string());
        }
        if let Some(max_rounds) = file.max_rounds {
            self.options
                .insert("MaxRounds".to_string(), max_rounds.to_string());
        }
        if let Some(threads) = file.threads {
            self.options.insert("Threads".to_string(), threads.to_string());
        }
        Ok(())
    }

    /// Sets a session option.
    pub fn set_option(&mut self, name: String, value: Option<String>) {
        self.options.insert(name, value.unwrap_or_default());
    }

    fn option<T: std::str::FromStr>(&self, name: &str) -> Option<T> {
        let raw = self.options.get(name)?;
        match raw.parse::<T>() {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(option = name, value = raw.as_str(), "ignoring unparsable option");
                None
            }
        }
    }

    /// Builds the simulation config from the session options.
    ///
    /// `MaxRounds 0` removes the round cap.
    pub fn config(&self) -> SimulationConfig {
        let mut config = SimulationConfig::default();
        if let Some(trials) = self.option::<usize>("Trials") {
            config.trials = trials;
        }
        if let Some(threads) = self.option::<usize>("Threads") {
            config.threads = threads.max(1);
        }
        if let Some(seed) = self.option::<u64>("Seed") {
            config.seed = seed;
        }
        if let Some(max_rounds) = self.option::<u32>("MaxRounds") {
            config.rules.max_rounds = (max_rounds > 0).then_some(max_rounds);
        }
        if let Some(name) = self.options.get("FiringOrder") {
            match FiringOrder::from_name(name) {
                Some(order) => config.rules.firing_order = order,
                None => warn!(value = name.as_str(), "unknown firing order"),
            }
        }
        config
    }

    /// Handles the `isready` command.
    pub fn handle_isready<W: Write>(&self, out: &mut W) -> Result<(), SessionError> {
        writeln!(out, "readyok")?;
        out.flush()?;
        Ok(())
    }

    /// Prints each ship with its index, then the fleet notation.
    pub fn handle_list<W: Write>(&self, out: &mut W) -> Result<(), SessionError> {
        for (i, ship) in self.fleet.ships().iter().enumerate() {
            writeln!(out, "{}: {}: {}", i, ship.side, ship)?;
        }
        writeln!(out, "fleet {}", format_fleet(&self.fleet))?;
        out.flush()?;
        Ok(())
    }

    /// Runs the simulation and writes a `result` line with the fractions.
    pub fn handle_simulate<W: Write>(
        &self,
        trials: Option<usize>,
        out: &mut W,
    ) -> Result<(), SessionError> {
        let mut config = self.config();
        if let Some(trials) = trials {
            config.trials = trials;
        }
        let report = simulate(&self.fleet, &config)?;
        writeln!(
            out,
            "result attacker {:.5} defender {:.5} stalemate {:.5}",
            report.win_fraction(Side::Attacker),
            report.win_fraction(Side::Defender),
            report.stalemate_fraction()
        )?;
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fleet::{presets, ShipType};
    use crate::resolve::DEFAULT_MAX_ROUNDS;

    fn killer() -> Ship {
        Ship::new(ShipType::Dreadnought, Side::Attacker)
            .with_attack(5)
            .with_hull(3)
            .with_missiles(&[4])
    }

    #[test]
    fn new_session_is_empty() {
        let session = Session::new();
        assert!(session.fleet.is_empty());
        assert!(session.options.is_empty());
    }

    #[test]
    fn add_and_remove_ships() {
        let mut session = Session::new();
        session.add_ships(vec![killer(), presets::ancient()]);
        assert_eq!(session.fleet.len(), 2);
        assert!(matches!(session.remove_ship(5), Err(SessionError::NoShip(5))));
        assert_eq!(session.remove_ship(0).unwrap(), killer());
        session.clear();
        assert!(session.fleet.is_empty());
    }

    #[test]
    fn config_reads_options() {
        let mut session = Session::new();
        session.set_option("Trials".to_string(), Some("250".to_string()));
        session.set_option("Seed".to_string(), Some("17".to_string()));
        session.set_option("Threads".to_string(), Some("0".to_string()));
        session.set_option("FiringOrder".to_string(), Some("initiative".to_string()));
        let config = session.config();
        assert_eq!(config.trials, 250);
        assert_eq!(config.seed, 17);
        assert_eq!(config.threads, 1);
        assert_eq!(config.rules.firing_order, FiringOrder::Initiative);
        assert_eq!(config.rules.max_rounds, Some(DEFAULT_MAX_ROUNDS));
    }

    #[test]
    fn max_rounds_zero_removes_cap() {
        let mut session = Session::new();
        session.set_option("MaxRounds".to_string(), Some("0".to_string()));
        assert_eq!(session.config().rules.max_rounds, None);
        session.set_option("MaxRounds".to_string(), Some("40".to_string()));
        assert_eq!(session.config().rules.max_rounds, Some(40));
    }

    #[test]
    fn bad_option_values_fall_back_to_defaults() {
        let mut session = Session::new();
        session.set_option("Trials".to_string(), Some("lots".to_string()));
        session.set_option("FiringOrder".to_string(), None);
        let config = session.config();
        assert_eq!(config.trials, SimulationConfig::default().trials);
        assert_eq!(config.rules.firing_order, FiringOrder::Fleet);
    }

    #[test]
    fn simulate_writes_result_line() {
        let mut session = Session::new();
        session.add_ships(vec![killer(), presets::ancient()]);
        session.set_option("Seed".to_string(), Some("5".to_string()));
        let mut out = Vec::new();
        session.handle_simulate(Some(200), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text.trim(),
            "result attacker 1.00000 defender 0.00000 stalemate 0.00000"
        );
    }

    #[test]
    fn simulate_without_defender_fails() {
        let mut session = Session::new();
        session.add_ships(vec![killer()]);
        let mut out = Vec::new();
        let err = session.handle_simulate(Some(10), &mut out).unwrap_err();
        assert!(matches!(
            err,
            SessionError::Simulation(SimulationError::MissingSide(Side::Defender))
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn list_prints_indexed_ships_and_notation() {
        let mut session = Session::new();
        session.add_ships(vec![presets::guardian()]);
        let mut out = Vec::new();
        session.handle_list(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("0: defender: Guardian"));
        assert!(text.contains("fleet Dg:3.2.0.2:111:"));
    }
}
