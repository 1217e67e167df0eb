//! Broadside battle-odds library.
//!
//! Exposes the fleet model, battle resolver, Monte Carlo driver, and text
//! formats for use by integration tests and the binary entry points.

pub mod fleet;
pub mod logging;
pub mod protocol;
pub mod resolve;
pub mod session;
pub mod simulate;
