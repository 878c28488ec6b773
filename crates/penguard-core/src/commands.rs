//! Player commands sent from the host to the simulation.
//!
//! Commands are queued and processed at the next tick boundary. Each one
//! maps onto a controller method that fails closed.

use serde::{Deserialize, Serialize};

use crate::types::TowerId;

/// All possible player actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    /// Begin the next wave (only valid while placing).
    StartWave,
    /// Buy a tower of `tower_type` on a grid cell.
    PlaceTower {
        tower_type: String,
        grid_x: i32,
        grid_y: i32,
    },
    /// Buy the next level of a placed tower.
    UpgradeTower { tower_id: TowerId },
    /// Remove a placed tower for a partial refund.
    SellTower { tower_id: TowerId },
    /// Set the simulation speed multiplier (1, 2 or 3).
    SetGameSpeed { speed: u8 },
}
