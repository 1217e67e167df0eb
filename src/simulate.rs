//! Monte Carlo win-probability estimation.
//!
//! Runs many independent battles on copies of a template fleet and tallies
//! who won. Each trial owns its RNG, seeded from a base seed plus the trial
//! index, so a run is reproducible from its base seed regardless of thread
//! count or the order in which trials finish.

use std::time::{Duration, Instant};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::fleet::{Fleet, Side};
use crate::resolve::{resolve_battle, BattleRules, Outcome};

/// Number of trials run when none is configured.
pub const DEFAULT_TRIALS: usize = 100_000;

/// Errors that prevent a simulation from starting.
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    #[error("trial count must be at least 1")]
    NoTrials,

    #[error("fleet has no {0} ships")]
    MissingSide(Side),

    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("simulation worker thread panicked")]
    WorkerPanicked,
}

/// Configuration for a Monte Carlo run.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Number of battles to simulate.
    pub trials: usize,
    /// Worker threads. `1` runs trials on the calling thread.
    pub threads: usize,
    /// Base seed (0 = draw one from entropy).
    pub seed: u64,
    /// Rules applied to every battle.
    pub rules: BattleRules,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            trials: DEFAULT_TRIALS,
            threads: default_threads(),
            seed: 0,
            rules: BattleRules::default(),
        }
    }
}

/// Available hardware parallelism, or 1 when it cannot be queried.
pub fn default_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Aggregated outcome counts of a finished run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    pub trials: usize,
    pub attacker_wins: usize,
    pub defender_wins: usize,
    pub stalemates: usize,
    /// Base seed the per-trial seeds were derived from.
    pub seed: u64,
    #[serde(skip)]
    pub elapsed: Duration,
}

impl SimulationReport {
    fn empty(trials: usize, seed: u64) -> Self {
        SimulationReport {
            trials,
            attacker_wins: 0,
            defender_wins: 0,
            stalemates: 0,
            seed,
            elapsed: Duration::ZERO,
        }
    }

    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Victory(Side::Attacker) => self.attacker_wins += 1,
            Outcome::Victory(Side::Defender) => self.defender_wins += 1,
            Outcome::Stalemate { .. } => self.stalemates += 1,
        }
    }

    /// Total outcomes recorded so far.
    pub fn recorded(&self) -> usize {
        self.attacker_wins + self.defender_wins + self.stalemates
    }

    pub fn wins(&self, side: Side) -> usize {
        match side {
            Side::Attacker => self.attacker_wins,
            Side::Defender => self.defender_wins,
        }
    }

    /// Fraction of trials won by `side`, in [0, 1].
    pub fn win_fraction(&self, side: Side) -> f64 {
        self.wins(side) as f64 / self.trials.max(1) as f64
    }

    /// Fraction of trials stopped by the round cap.
    pub fn stalemate_fraction(&self) -> f64 {
        self.stalemates as f64 / self.trials.max(1) as f64
    }

    /// Writes the percentage summary lines.
    pub fn write_summary<W: std::io::Write>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(
            out,
            "Attacker victory rate: {:.5}%",
            self.win_fraction(Side::Attacker) * 100.0
        )?;
        writeln!(
            out,
            "Defender victory rate: {:.5}%",
            self.win_fraction(Side::Defender) * 100.0
        )?;
        if self.stalemates > 0 {
            writeln!(
                out,
                "Stalemate rate: {:.5}%",
                self.stalemate_fraction() * 100.0
            )?;
        }
        Ok(())
    }
}

/// Builds the RNG for one trial.
pub fn trial_rng(base_seed: u64, trial: usize) -> SmallRng {
    SmallRng::seed_from_u64(base_seed.wrapping_add(trial as u64))
}

/// Runs one battle on a fresh copy of `fleet`.
pub fn run_trial(fleet: &Fleet, rules: BattleRules, rng: &mut impl Rng) -> Outcome {
    let mut copy = fleet.clone();
    resolve_battle(&mut copy, rules, rng)
}

/// Checks that a run can start.
fn validate(fleet: &Fleet, config: &SimulationConfig) -> Result<(), SimulationError> {
    if config.trials == 0 {
        return Err(SimulationError::NoTrials);
    }
    for side in [Side::Attacker, Side::Defender] {
        if !fleet.has_living(side) {
            return Err(SimulationError::MissingSide(side));
        }
    }
    Ok(())
}

/// Runs `config.trials` independent battles and tallies the outcomes.
///
/// When `config.threads > 1`, trials run concurrently on a rayon pool.
pub fn simulate(fleet: &Fleet, config: &SimulationConfig) -> Result<SimulationReport, SimulationError> {
    validate(fleet, config)?;

    let base_seed = if config.seed != 0 {
        config.seed
    } else {
        SmallRng::from_entropy().gen_range(1..=u64::MAX)
    };
    info!(
        trials = config.trials,
        threads = config.threads,
        seed = base_seed,
        ships = fleet.len(),
        "starting simulation"
    );

    let start = Instant::now();
    let mut report = if config.threads > 1 {
        simulate_parallel(fleet, config, base_seed)?
    } else {
        simulate_sequential(fleet, config, base_seed)
    };
    report.elapsed = start.elapsed();

    if report.stalemates > 0 {
        warn!(
            stalemates = report.stalemates,
            max_rounds = ?config.rules.max_rounds,
            "some battles reached the round cap"
        );
    }
    info!(
        attacker = report.win_fraction(Side::Attacker),
        defender = report.win_fraction(Side::Defender),
        elapsed_ms = report.elapsed.as_millis() as u64,
        "simulation finished"
    );
    Ok(report)
}

/// Sequential simulation on the calling thread.
fn simulate_sequential(fleet: &Fleet, config: &SimulationConfig, base_seed: u64) -> SimulationReport {
    let mut report = SimulationReport::empty(config.trials, base_seed);
    for i in 0..config.trials {
        let mut rng = trial_rng(base_seed, i);
        report.record(run_trial(fleet, config.rules, &mut rng));
        log_progress(i + 1, config.trials);
    }
    report
}

/// Parallel simulation: trials run on a rayon pool and send their outcome
/// over a channel; the calling thread counts every outcome before returning.
fn simulate_parallel(
    fleet: &Fleet,
    config: &SimulationConfig,
    base_seed: u64,
) -> Result<SimulationReport, SimulationError> {
    use rayon::prelude::*;
    use std::sync::mpsc;

    let (tx, rx) = mpsc::channel::<Outcome>();

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()?;

    let template = fleet.clone();
    let trials = config.trials;
    let rules = config.rules;
    let handle = std::thread::spawn(move || {
        pool.install(|| {
            (0..trials).into_par_iter().for_each_with(tx, |tx, i| {
                let mut rng = trial_rng(base_seed, i);
                let outcome = run_trial(&template, rules, &mut rng);
                let _ = tx.send(outcome);
            });
        });
    });

    let mut report = SimulationReport::empty(trials, base_seed);
    for outcome in rx {
        report.record(outcome);
        log_progress(report.recorded(), trials);
    }

    handle.join().map_err(|_| SimulationError::WorkerPanicked)?;
    if report.recorded() != trials {
        return Err(SimulationError::WorkerPanicked);
    }
    Ok(report)
}

/// Logs a debug line at every tenth of the run.
fn log_progress(done: usize, total: usize) {
    let step = (total / 10).max(1);
    if done % step == 0 || done == total {
        debug!(done, total, "trials completed");
    }
}
