//! Battle resolution.
//!
//! Resolves firing events against a fleet and sequences them into the
//! ranged and melee phases of a full battle.

pub mod battle;
pub mod targeting;

pub use battle::{
    resolve_battle, Battle, BattlePhase, BattleRules, FiringOrder, Outcome, DEFAULT_MAX_ROUNDS,
};
pub use targeting::{fire_volley, resolve_shot, roll_die, Shot, ShotOutcome};
