//! Batch battle-odds CLI.
//!
//! Simulates one fleet many times and prints each side's victory rate.
//!
//! Usage:
//!   cargo run --release --bin simulate -- [OPTIONS]
//!
//! Options:
//!   --fleet NOTATION     Fleet in ship notation, e.g. "2Ai:3.0.0.1:1:/Dn"
//!   --file PATH          JSON scenario file (settings in it are defaults)
//!   --trials N           Number of battles (default: 100000)
//!   --threads N          Worker threads (default: all cores)
//!   --seed N             Base seed, 0 for entropy (default: 0)
//!   --max-rounds N       Melee round cap, 0 for none (default: 1000)
//!   --firing-order ORD   fleet | initiative (default: fleet)
//!   --json               Print the report as JSON
//!   --quiet              Only log warnings

use std::env;
use std::io::{self, Write};
use std::path::Path;
use std::process;
use std::str::FromStr;

use broadside::fleet::{Fleet, Side};
use broadside::protocol::fleet_file::load_fleet_file;
use broadside::protocol::notation::{format_fleet, parse_fleet};
use broadside::resolve::FiringOrder;
use broadside::simulate::{simulate, SimulationConfig};

fn main() {
    let args: Vec<String> = env::args().collect();
    let mut config = SimulationConfig::default();
    let mut fleet_notation: Option<String> = None;
    let mut file_path: Option<String> = None;
    let mut trials: Option<usize> = None;
    let mut threads: Option<usize> = None;
    let mut seed: Option<u64> = None;
    let mut max_rounds: Option<u32> = None;
    let mut firing_order: Option<FiringOrder> = None;
    let mut json = false;
    let mut quiet = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--fleet" => fleet_notation = Some(next_value(&args, &mut i)),
            "--file" => file_path = Some(next_value(&args, &mut i)),
            "--trials" => trials = Some(parse_value(&args, &mut i)),
            "--threads" => threads = Some(parse_value(&args, &mut i)),
            "--seed" => seed = Some(parse_value(&args, &mut i)),
            "--max-rounds" => max_rounds = Some(parse_value(&args, &mut i)),
            "--firing-order" => {
                let name = next_value(&args, &mut i);
                match FiringOrder::from_name(&name) {
                    Some(order) => firing_order = Some(order),
                    None => fail(&format!("invalid --firing-order value: {}", name)),
                }
            }
            "--json" => json = true,
            "--quiet" => quiet = true,
            "--help" | "-h" => {
                print_usage();
                return;
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    broadside::logging::init(if quiet { "warn" } else { "info" });

    let fleet = match (fleet_notation, file_path) {
        (Some(notation), None) => match parse_fleet(&notation) {
            Ok(f) => f,
            Err(e) => fail(&format!("invalid --fleet: {}", e)),
        },
        (None, Some(path)) => {
            let file = match load_fleet_file(Path::new(&path)) {
                Ok(f) => f,
                Err(e) => fail(&e.to_string()),
            };
            config.trials = file.trials.unwrap_or(config.trials);
            config.seed = file.seed.unwrap_or(config.seed);
            config.threads = file.threads.unwrap_or(config.threads);
            if let Some(cap) = file.max_rounds {
                config.rules.max_rounds = (cap > 0).then_some(cap);
            }
            match file.fleet() {
                Ok(f) => f,
                Err(e) => fail(&e.to_string()),
            }
        }
        (Some(_), Some(_)) => fail("--fleet and --file are mutually exclusive"),
        (None, None) => {
            print_usage();
            process::exit(1);
        }
    };

    config.trials = trials.unwrap_or(config.trials);
    config.threads = threads.unwrap_or(config.threads).max(1);
    config.seed = seed.unwrap_or(config.seed);
    if let Some(cap) = max_rounds {
        config.rules.max_rounds = (cap > 0).then_some(cap);
    }
    if let Some(order) = firing_order {
        config.rules.firing_order = order;
    }

    if !quiet {
        print_fleet(&fleet);
    }

    let report = match simulate(&fleet, &config) {
        Ok(r) => r,
        Err(e) => fail(&e.to_string()),
    };

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let written = if json {
        serde_json::to_writer(&mut out, &report)
            .map_err(io::Error::from)
            .and_then(|_| writeln!(out))
    } else {
        report.write_summary(&mut out)
    };
    if let Err(e) = written.and_then(|_| out.flush()) {
        fail(&format!("failed to write output: {}", e));
    }
}

/// Prints the fleet the way it will be simulated.
fn print_fleet(fleet: &Fleet) {
    eprint!("{}", fleet);
    eprintln!(
        "{} attacker vs {} defender ships: {}",
        fleet.count(Side::Attacker),
        fleet.count(Side::Defender),
        format_fleet(fleet)
    );
}

fn next_value(args: &[String], i: &mut usize) -> String {
    *i += 1;
    match args.get(*i) {
        Some(v) => v.clone(),
        None => fail(&format!("missing value for {}", args[*i - 1])),
    }
}

fn parse_value<T: FromStr>(args: &[String], i: &mut usize) -> T {
    let raw = next_value(args, i);
    match raw.parse() {
        Ok(v) => v,
        Err(_) => fail(&format!("invalid {} value: {}", args[*i - 1], raw)),
    }
}

fn fail(message: &str) -> ! {
    eprintln!("error: {}", message);
    process::exit(1);
}

fn print_usage() {
    eprintln!("Usage: simulate (--fleet NOTATION | --file PATH) [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --fleet NOTATION     Fleet in ship notation, e.g. \"2Ai:3.0.0.1:1:/Dn\"");
    eprintln!("  --file PATH          JSON scenario file");
    eprintln!("  --trials N           Number of battles (default: 100000)");
    eprintln!("  --threads N          Worker threads (default: all cores)");
    eprintln!("  --seed N             Base seed, 0 for entropy (default: 0)");
    eprintln!("  --max-rounds N       Melee round cap, 0 for none (default: 1000)");
    eprintln!("  --firing-order ORD   fleet | initiative (default: fleet)");
    eprintln!("  --json               Print the report as JSON");
    eprintln!("  --quiet              Only log warnings");
}
