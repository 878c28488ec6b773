//! Simulation core for penguard.
//!
//! Owns the hecs ECS world, builds lanes, runs the enemy, tower and
//! projectile systems once per frame, and produces GameStateSnapshots
//! for the UI.

pub mod components;
pub mod economy;
pub mod engine;
pub mod game_state;
pub mod observer;
pub mod pathing;
pub mod scene;
pub mod systems;
pub mod waves;
pub mod world_setup;

pub use engine::{SimConfig, SimulationEngine};
pub use game_state::{GameConfig, GameState};
pub use penguard_core as core;

#[cfg(test)]
mod tests;
