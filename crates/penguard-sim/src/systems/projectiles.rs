//! Homing projectiles.
//!
//! Projectiles re-aim at their target's current position every tick. A
//! target that is gone means the projectile is dropped without a hit.

use std::collections::{BTreeMap, HashMap};

use hecs::{Entity, World};

use penguard_core::constants::{PROJECTILE_HEIGHT, PROJECTILE_HIT_RADIUS};
use penguard_core::types::{EnemyId, ProjectileId, WorldPos};

use crate::components::{Payload, Position, Projectile, Visual};
use crate::scene::SceneSink;
use crate::world_setup;

/// A projectile reached its target this tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub projectile_id: ProjectileId,
    pub target_id: EnemyId,
    pub payload: Payload,
}

#[derive(Debug, Default)]
pub struct ProjectileSystem {
    index: BTreeMap<ProjectileId, Entity>,
    next_id: u32,
}

impl ProjectileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Launch a projectile from `from` toward `target`.
    pub fn fire(
        &mut self,
        world: &mut World,
        scene: &mut dyn SceneSink,
        from: WorldPos,
        target: EnemyId,
        payload: Payload,
        color: &str,
    ) -> ProjectileId {
        self.next_id += 1;
        let id = ProjectileId(self.next_id);
        let entity = world_setup::spawn_projectile(world, scene, id, from, target, payload, color);
        self.index.insert(id, entity);
        id
    }

    /// Move every projectile and collect hits.
    ///
    /// A step that would reach or pass the target counts as a hit, so large
    /// frame deltas cannot tunnel through.
    pub fn update(
        &mut self,
        world: &mut World,
        scene: &mut dyn SceneSink,
        dt: f32,
        enemies: &HashMap<EnemyId, WorldPos>,
    ) -> Vec<Hit> {
        let mut hits = Vec::new();
        let mut finished = Vec::new();

        for (&id, &entity) in &self.index {
            let Ok((projectile, pos, visual)) =
                world.query_one_mut::<(&Projectile, &mut Position, &Visual)>(entity)
            else {
                continue;
            };

            let Some(target_pos) = enemies.get(&projectile.target) else {
                finished.push(id);
                continue;
            };

            let aim = WorldPos::new(target_pos.x, PROJECTILE_HEIGHT, target_pos.z);
            let offset = aim - pos.0;
            let dist = offset.length();
            let step = projectile.speed * dt;

            if dist < PROJECTILE_HIT_RADIUS || step >= dist {
                hits.push(Hit {
                    projectile_id: id,
                    target_id: projectile.target,
                    payload: projectile.payload,
                });
                finished.push(id);
            } else {
                pos.0 += offset / dist * step;
                scene.move_visual(visual.0, pos.0);
            }
        }

        for id in finished {
            self.remove(world, scene, id);
        }

        hits
    }

    pub fn count(&self) -> usize {
        self.index.len()
    }

    /// In-flight projectiles in id order, for snapshots.
    pub fn iter<'a>(&'a self, world: &'a World) -> impl Iterator<Item = (ProjectileId, EnemyId, WorldPos)> + 'a {
        self.index.iter().filter_map(move |(&id, &entity)| {
            let projectile = world.get::<&Projectile>(entity).ok()?;
            let pos = world.get::<&Position>(entity).ok()?;
            Some((id, projectile.target, pos.0))
        })
    }

    /// Remove every projectile.
    pub fn clear(&mut self, world: &mut World, scene: &mut dyn SceneSink) {
        let ids: Vec<ProjectileId> = self.index.keys().copied().collect();
        for id in ids {
            self.remove(world, scene, id);
        }
    }

    fn remove(&mut self, world: &mut World, scene: &mut dyn SceneSink, id: ProjectileId) {
        let Some(entity) = self.index.remove(&id) else {
            return;
        };
        if let Ok(visual) = world.get::<&Visual>(entity).map(|v| *v) {
            scene.remove_visual(visual.0);
        }
        let _ = world.despawn(entity);
    }
}
