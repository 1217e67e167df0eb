//! Text and file formats for describing fleets.
//!
//! Provides the compact ship/fleet notation, JSON scenario files, and the
//! line-command parser used by the interactive session.

pub mod fleet_file;
pub mod notation;
pub mod parser;
