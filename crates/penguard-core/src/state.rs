//! Game state snapshot: the complete visible state handed to the UI after each tick.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::GameEvent;
use crate::types::{EnemyId, ProjectileId, SimTime, TowerId, WorldPos};

/// Immutable copy of the session state. Owned by the receiver.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    /// Current wave number; 0 before the first wave starts.
    pub wave: u32,
    pub total_waves: u32,
    pub money: u32,
    pub lives: u32,
    pub score: u32,
    pub game_speed: GameSpeed,
    /// Star rating; only meaningful once the session is won.
    pub stars: u8,
    pub enemies: Vec<EnemyView>,
    pub towers: Vec<TowerView>,
    pub projectiles: Vec<ProjectileView>,
    /// Events raised since the previous snapshot.
    pub events: Vec<GameEvent>,
}

impl GameStateSnapshot {
    pub fn is_over(&self) -> bool {
        self.phase.is_over()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyView {
    pub id: EnemyId,
    pub enemy_type: String,
    pub position: WorldPos,
    pub hp: f32,
    pub max_hp: f32,
    pub path_id: String,
    pub path_index: usize,
    pub slowed: bool,
    pub burning: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TowerView {
    pub id: TowerId,
    pub tower_type: String,
    pub level: usize,
    pub grid_x: i32,
    pub grid_y: i32,
    pub total_spent: u32,
    /// Cost of the next upgrade; `None` at max level.
    pub next_upgrade_cost: Option<u32>,
    pub sell_value: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileView {
    pub id: ProjectileId,
    pub target_id: EnemyId,
    pub position: WorldPos,
}
