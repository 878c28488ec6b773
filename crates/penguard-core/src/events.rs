//! Events emitted by the simulation for UI and audio feedback.

use serde::{Deserialize, Serialize};

use crate::types::{EnemyId, TowerId};

/// Something noteworthy that happened during a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    WaveStarted { wave: u32, enemy_count: u32 },
    EnemySpawned { enemy_id: EnemyId, enemy_type: String },
    /// An enemy walked off the end of its path.
    EnemyReachedPen { enemy_id: EnemyId, lives_left: u32 },
    EnemyKilled { enemy_id: EnemyId, reward: u32 },
    TowerFired { tower_id: TowerId, target_id: EnemyId },
    WaveComplete { wave: u32 },
    GameOver { won: bool, stars: u8 },
}
