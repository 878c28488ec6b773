//! Entity spawn factories.
//!
//! Each factory registers the rendering-side visual and spawns the
//! matching component bundle.

use std::sync::Arc;

use hecs::{Entity, World};

use penguard_core::catalog::{EnemyType, TowerType};
use penguard_core::constants::{PROJECTILE_HEIGHT, PROJECTILE_SPEED};
use penguard_core::enums::VisualKind;
use penguard_core::types::{BuiltPath, EnemyId, ProjectileId, TowerId, WorldPos};

use crate::components::{Enemy, Payload, Position, Projectile, Tower, Visual};
use crate::scene::SceneSink;

/// Enemies are drawn in a neutral color; their type decides the model.
const ENEMY_COLOR: &str = "#ffffff";

/// Spawn an enemy on the first waypoint of its lane.
pub fn spawn_enemy(
    world: &mut World,
    scene: &mut dyn SceneSink,
    id: EnemyId,
    kind: Arc<EnemyType>,
    path: Arc<BuiltPath>,
    hp_scale: f32,
) -> Entity {
    let start = path.waypoints.first().copied().unwrap_or_default();
    let visual = scene.add_visual(VisualKind::Enemy, start, ENEMY_COLOR);
    let hp = (kind.hp * hp_scale).round();

    world.spawn((
        Enemy {
            id,
            hp,
            max_hp: hp,
            speed: kind.speed,
            kind,
            path,
            path_index: 0,
            slow_timer: 0.0,
            burn: None,
            done: false,
        },
        Position(start),
        Visual(visual),
    ))
}

/// Spawn a tower at level 0 on the board surface.
pub fn spawn_tower(
    world: &mut World,
    scene: &mut dyn SceneSink,
    id: TowerId,
    kind: Arc<TowerType>,
    grid_x: i32,
    grid_y: i32,
    world_pos: WorldPos,
) -> Entity {
    let position = WorldPos::new(world_pos.x, 0.0, world_pos.z);
    let visual = scene.add_visual(VisualKind::Tower, position, &kind.color);

    world.spawn((
        Tower {
            id,
            total_spent: kind.cost,
            kind,
            level: 0,
            grid_x,
            grid_y,
            fire_timer: 0.0,
        },
        Position(position),
        Visual(visual),
    ))
}

/// Spawn a projectile at firing height above `from`.
pub fn spawn_projectile(
    world: &mut World,
    scene: &mut dyn SceneSink,
    id: ProjectileId,
    from: WorldPos,
    target: EnemyId,
    payload: Payload,
    color: &str,
) -> Entity {
    let position = WorldPos::new(from.x, PROJECTILE_HEIGHT, from.z);
    let visual = scene.add_visual(VisualKind::Projectile, position, color);

    world.spawn((
        Projectile {
            id,
            target,
            speed: PROJECTILE_SPEED,
            payload,
        },
        Position(position),
        Visual(visual),
    ))
}
