//! ECS components for hecs entities.
//!
//! Components are plain data. Behavior lives in the systems.

use std::sync::Arc;

use penguard_core::catalog::{EnemyType, TowerType};
use penguard_core::types::{BuiltPath, EnemyId, ProjectileId, TowerId, VisualHandle, WorldPos};

/// World-space position of an entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position(pub WorldPos);

/// Rendering-side visual owned by the entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visual(pub VisualHandle);

/// A live enemy walking a lane.
#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: EnemyId,
    pub kind: Arc<EnemyType>,
    pub hp: f32,
    pub max_hp: f32,
    /// Base speed in world units per second.
    pub speed: f32,
    pub path: Arc<BuiltPath>,
    /// Index of the waypoint last reached. Never decreases.
    pub path_index: usize,
    /// Seconds of slow remaining.
    pub slow_timer: f32,
    pub burn: Option<Burn>,
    pub done: bool,
}

/// Damage over time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Burn {
    pub damage_per_sec: f32,
    pub remaining: f32,
}

/// A placed tower.
#[derive(Debug, Clone)]
pub struct Tower {
    pub id: TowerId,
    pub kind: Arc<TowerType>,
    /// Upgrade level, `0..=kind.max_level()`.
    pub level: usize,
    pub grid_x: i32,
    pub grid_y: i32,
    /// Seconds until the tower may fire again.
    pub fire_timer: f32,
    pub total_spent: u32,
}

/// A homing projectile. The target is held by id and looked up every tick.
#[derive(Debug, Clone)]
pub struct Projectile {
    pub id: ProjectileId,
    pub target: EnemyId,
    pub speed: f32,
    pub payload: Payload,
}

/// Everything a hit applies, captured from the firing tower when the shot
/// leaves the barrel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Payload {
    pub damage: f32,
    pub crit_chance: Option<f32>,
    /// Seconds of slow; slowed enemies always move at `SLOW_FACTOR`.
    pub slow: Option<f32>,
    /// `(damage per second, seconds)`.
    pub burn: Option<(f32, f32)>,
    /// Radius around the target.
    pub splash: Option<f32>,
    /// `(total targets including the primary, hop range)`.
    pub chain: Option<(u32, f32)>,
}
