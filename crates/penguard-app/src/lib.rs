//! Headless penguard host.
//!
//! Wires the simulation, quality and progress crates together: a game
//! loop thread driven by a frame clock, a command channel into it, and
//! progress persistence on phase transitions.

pub mod game_loop;
pub mod host;
pub mod progress;
pub mod session;
pub mod state;

pub use penguard_core as core;
