//! Session command parser.
//!
//! Parses incoming line commands from raw text into structured `Command`
//! variants that the session loop can dispatch on.

use tracing::warn;

use crate::fleet::{preset, Ship, ShipType};
use crate::protocol::notation::{parse_ships, MAX_COUNT};

/// A parsed session command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Append ships: `add <notation>`.
    Add { ships: Vec<Ship> },

    /// Append preset defenders: `preset <ancient|guardian|gcds> [count]`.
    Preset { ships: Vec<Ship> },

    /// Remove the ship at a fleet index: `remove <index>`.
    Remove { index: usize },

    /// Remove every ship.
    Clear,

    /// Print the fleet.
    List,

    /// Replace the fleet from a scenario file: `load <path>`.
    Load { path: String },

    /// Set a session option: `setoption name <id> [value <x>]`.
    SetOption { name: String, value: Option<String> },

    /// Run the Monte Carlo simulation, optionally overriding the trial count.
    Simulate { trials: Option<usize> },

    /// Synchronization ping; the session must reply `readyok`.
    IsReady,

    /// Terminate the session.
    Quit,
}

/// Parses a single line of input into a `Command`.
///
/// Returns `None` for empty lines or unrecognized commands. Malformed
/// arguments for known commands also return `None` after logging a warning.
pub fn parse_command(line: &str) -> Option<Command> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    let tokens: Vec<&str> = trimmed.split_whitespace().collect();

    match tokens[0] {
        "isready" => Some(Command::IsReady),
        "quit" => Some(Command::Quit),
        "clear" => Some(Command::Clear),
        "list" => Some(Command::List),

        "add" => parse_add(&tokens),
        "preset" => parse_preset(&tokens),
        "remove" => parse_remove(&tokens),
        "load" => parse_load(&tokens, trimmed),
        "setoption" => parse_setoption(&tokens),
        "simulate" => parse_simulate(&tokens),

        other => {
            warn!(command = other, "unknown command");
            None
        }
    }
}

/// Parses `add <notation>` where the notation may hold several `/`-separated entries.
fn parse_add(tokens: &[&str]) -> Option<Command> {
    if tokens.len() != 2 {
        warn!("malformed add: expected 'add <ship notation>'");
        return None;
    }
    let mut ships = Vec::new();
    for entry in tokens[1].split('/') {
        match parse_ships(entry) {
            Ok(parsed) => ships.extend(parsed),
            Err(e) => {
                warn!(entry, error = %e, "malformed add");
                return None;
            }
        }
    }
    Some(Command::Add { ships })
}

/// Parses `preset <type> [count]`.
fn parse_preset(tokens: &[&str]) -> Option<Command> {
    if tokens.len() < 2 || tokens.len() > 3 {
        warn!("malformed preset: expected 'preset <ancient|guardian|gcds> [count]'");
        return None;
    }
    let ship = match ShipType::from_name(tokens[1]).and_then(preset) {
        Some(s) => s,
        None => {
            warn!(name = tokens[1], "unknown preset");
            return None;
        }
    };
    let count = match tokens.get(2) {
        Some(t) => match t.parse::<usize>() {
            Ok(n) if (1..=MAX_COUNT).contains(&n) => n,
            _ => {
                warn!(count = *t, "invalid preset count");
                return None;
            }
        },
        None => 1,
    };
    Some(Command::Preset {
        ships: vec![ship; count],
    })
}

/// Parses `remove <index>`.
fn parse_remove(tokens: &[&str]) -> Option<Command> {
    match tokens.get(1).and_then(|t| t.parse::<usize>().ok()) {
        Some(index) if tokens.len() == 2 => Some(Command::Remove { index }),
        _ => {
            warn!("malformed remove: expected 'remove <index>'");
            None
        }
    }
}

/// Parses `load <path>`. The path is the rest of the line and may contain spaces.
fn parse_load(tokens: &[&str], full_line: &str) -> Option<Command> {
    if tokens.len() < 2 {
        warn!("malformed load: expected 'load <path>'");
        return None;
    }
    let path = full_line["load".len()..].trim().to_string();
    Some(Command::Load { path })
}

/// Parses `setoption name <id> [value <x>]`.
fn parse_setoption(tokens: &[&str]) -> Option<Command> {
    if tokens.len() < 3 || tokens[1] != "name" {
        warn!("malformed setoption: expected 'setoption name <id> [value <x>]'");
        return None;
    }

    let value_idx = tokens.iter().position(|&t| t == "value");

    let (name, value) = match value_idx {
        Some(vi) => {
            let name_parts = &tokens[2..vi];
            let value_parts = &tokens[vi + 1..];
            if name_parts.is_empty() {
                warn!("malformed setoption: empty name");
                return None;
            }
            let value = if value_parts.is_empty() {
                None
            } else {
                Some(value_parts.join(" "))
            };
            (name_parts.join(" "), value)
        }
        None => (tokens[2..].join(" "), None),
    };

    Some(Command::SetOption { name, value })
}

/// Parses `simulate [trials]`.
fn parse_simulate(tokens: &[&str]) -> Option<Command> {
    match tokens.get(1) {
        None => Some(Command::Simulate { trials: None }),
        Some(t) => match t.parse::<usize>() {
            Ok(n) if tokens.len() == 2 => Some(Command::Simulate { trials: Some(n) }),
            _ => {
                warn!("malformed simulate: expected 'simulate [trials]'");
                None
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fleet::{presets, Side};

    #[test]
    fn parse_simple_commands() {
        assert_eq!(parse_command("isready"), Some(Command::IsReady));
        assert_eq!(parse_command("quit"), Some(Command::Quit));
        assert_eq!(parse_command("  list  "), Some(Command::List));
        assert_eq!(parse_command("clear"), Some(Command::Clear));
    }

    #[test]
    fn parse_empty_line_returns_none() {
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("   "), None);
    }

    #[test]
    fn parse_unknown_command_returns_none() {
        assert_eq!(parse_command("fire"), None);
    }

    #[test]
    fn parse_add_multiple_entries() {
        match parse_command("add 2Ai:3.0.0.1:1:/Dg") {
            Some(Command::Add { ships }) => {
                assert_eq!(ships.len(), 3);
                assert_eq!(ships[0].side, Side::Attacker);
                assert_eq!(ships[2], presets::guardian());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn parse_add_malformed_returns_none() {
        assert_eq!(parse_command("add"), None);
        assert_eq!(parse_command("add Aq:1.1.1.1::"), None);
        assert_eq!(parse_command("add Dn Dg"), None);
    }

    #[test]
    fn parse_preset_with_count() {
        assert_eq!(
            parse_command("preset ancient 2"),
            Some(Command::Preset {
                ships: vec![presets::ancient(), presets::ancient()]
            })
        );
        assert_eq!(
            parse_command("preset GCDS"),
            Some(Command::Preset {
                ships: vec![presets::gcds()]
            })
        );
    }

    #[test]
    fn parse_preset_malformed_returns_none() {
        assert_eq!(parse_command("preset cruiser"), None);
        assert_eq!(parse_command("preset ancient 13"), None);
        assert_eq!(parse_command("preset"), None);
    }

    #[test]
    fn parse_remove_index() {
        assert_eq!(parse_command("remove 3"), Some(Command::Remove { index: 3 }));
        assert_eq!(parse_command("remove"), None);
        assert_eq!(parse_command("remove x"), None);
    }

    #[test]
    fn parse_load_keeps_spaces() {
        assert_eq!(
            parse_command("load /tmp/my fleet.json"),
            Some(Command::Load {
                path: "/tmp/my fleet.json".to_string()
            })
        );
        assert_eq!(parse_command("load"), None);
    }

    #[test]
    fn parse_setoption_with_value() {
        assert_eq!(
            parse_command("setoption name Trials value 5000"),
            Some(Command::SetOption {
                name: "Trials".to_string(),
                value: Some("5000".to_string()),
            })
        );
    }

    #[test]
    fn parse_setoption_no_value() {
        assert_eq!(
            parse_command("setoption name MaxRounds"),
            Some(Command::SetOption {
                name: "MaxRounds".to_string(),
                value: None,
            })
        );
    }

    #[test]
    fn parse_setoption_malformed_returns_none() {
        assert_eq!(parse_command("setoption"), None);
        assert_eq!(parse_command("setoption foo"), None);
        assert_eq!(parse_command("setoption name value 3"), None);
    }

    #[test]
    fn parse_simulate_trials() {
        assert_eq!(
            parse_command("simulate"),
            Some(Command::Simulate { trials: None })
        );
        assert_eq!(
            parse_command("simulate 1000"),
            Some(Command::Simulate { trials: Some(1000) })
        );
        assert_eq!(parse_command("simulate many"), None);
    }
}
