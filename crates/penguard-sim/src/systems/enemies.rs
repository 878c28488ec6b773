//! Enemy spawning, lane walking and status effects.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

use hecs::{Entity, World};
use tracing::debug;

use penguard_core::catalog::EnemyType;
use penguard_core::constants::{ENEMY_SPAWN_DELAY_MS, SLOW_FACTOR};
use penguard_core::types::{BuiltPath, EnemyId, WorldPos};

use crate::components::{Burn, Enemy, Position, Visual};
use crate::economy::hp_scale;
use crate::scene::SceneSink;
use crate::world_setup;

/// Enemy waiting in the spawn queue.
#[derive(Debug, Clone)]
struct QueuedEnemy {
    kind: Arc<EnemyType>,
    path: Arc<BuiltPath>,
    hp_scale: f32,
}

/// An enemy that left the board, either through the pen or by dying.
#[derive(Debug, Clone, PartialEq)]
pub struct RemovedEnemy {
    pub id: EnemyId,
    pub kind: Arc<EnemyType>,
    pub position: WorldPos,
}

/// Outcome of one enemy update.
#[derive(Debug, Default)]
pub struct EnemyTickReport {
    pub spawned: Vec<(EnemyId, String)>,
    /// Enemies that walked off the end of their lane. Each costs one life.
    pub reached: Vec<RemovedEnemy>,
    /// Enemies killed by burn damage.
    pub killed: Vec<RemovedEnemy>,
}

#[derive(Debug)]
pub struct EnemySystem {
    index: BTreeMap<EnemyId, Entity>,
    spawn_queue: VecDeque<QueuedEnemy>,
    spawn_timer_ms: f32,
    next_id: u32,
    apply_hp_scaling: bool,
}

impl EnemySystem {
    pub fn new(apply_hp_scaling: bool) -> Self {
        Self {
            index: BTreeMap::new(),
            spawn_queue: VecDeque::new(),
            spawn_timer_ms: 0.0,
            next_id: 0,
            apply_hp_scaling,
        }
    }

    /// Append `count` enemies of one type to the spawn queue, all on `path`.
    pub fn queue_wave(
        &mut self,
        kind: &Arc<EnemyType>,
        count: u32,
        path: &Arc<BuiltPath>,
        wave: u32,
    ) {
        let scale = if self.apply_hp_scaling {
            hp_scale(wave)
        } else {
            1.0
        };
        for _ in 0..count {
            self.spawn_queue.push_back(QueuedEnemy {
                kind: Arc::clone(kind),
                path: Arc::clone(path),
                hp_scale: scale,
            });
        }
    }

    /// Spawn from the queue, walk every live enemy and tick status effects.
    pub fn update(
        &mut self,
        world: &mut World,
        scene: &mut dyn SceneSink,
        dt: f32,
        game_speed: f32,
    ) -> EnemyTickReport {
        let mut report = EnemyTickReport::default();
        let step = dt * game_speed;

        self.spawn_timer_ms -= dt * 1000.0 * game_speed;
        if self.spawn_timer_ms <= 0.0 {
            if let Some(queued) = self.spawn_queue.pop_front() {
                let kind_id = queued.kind.id.clone();
                let id = self.spawn(world, scene, queued);
                report.spawned.push((id, kind_id));
                self.spawn_timer_ms = ENEMY_SPAWN_DELAY_MS;
            }
        }

        let mut finished = Vec::new();
        for (&id, &entity) in &self.index {
            let Ok((enemy, pos, visual)) =
                world.query_one_mut::<(&mut Enemy, &mut Position, &Visual)>(entity)
            else {
                continue;
            };
            if enemy.done {
                continue;
            }

            let speed_mult = if enemy.slow_timer > 0.0 {
                SLOW_FACTOR
            } else {
                1.0
            };
            let distance = enemy.speed * speed_mult * step;
            advance_along_path(enemy, &mut pos.0, distance);
            scene.move_visual(visual.0, pos.0);

            if enemy.slow_timer > 0.0 {
                enemy.slow_timer -= step;
            }

            if enemy.path_index + 1 >= enemy.path.waypoints.len() {
                enemy.done = true;
                finished.push((id, false));
                continue;
            }

            if let Some(burn) = enemy.burn.as_mut() {
                let burn_step = step.min(burn.remaining);
                enemy.hp -= burn.damage_per_sec * burn_step;
                burn.remaining -= step;
                if burn.remaining <= 0.0 {
                    enemy.burn = None;
                }
                if enemy.hp <= 0.0 {
                    finished.push((id, true));
                }
            }
        }

        for (id, killed) in finished {
            if let Some(removed) = self.remove(world, scene, id) {
                if killed {
                    report.killed.push(removed);
                } else {
                    report.reached.push(removed);
                }
            }
        }

        report
    }

    /// Apply damage. Returns the enemy if this killed it; unknown ids are a no-op.
    pub fn damage(
        &mut self,
        world: &mut World,
        scene: &mut dyn SceneSink,
        id: EnemyId,
        amount: f32,
    ) -> Option<RemovedEnemy> {
        let entity = *self.index.get(&id)?;
        let dead = {
            let mut enemy = world.get::<&mut Enemy>(entity).ok()?;
            enemy.hp -= amount;
            enemy.hp <= 0.0
        };
        if dead {
            self.remove(world, scene, id)
        } else {
            None
        }
    }

    /// Slow an enemy for `duration` seconds. A longer running slow is kept.
    pub fn apply_slow(&mut self, world: &mut World, id: EnemyId, duration: f32) {
        if let Some(mut enemy) = self.enemy_mut(world, id) {
            enemy.slow_timer = enemy.slow_timer.max(duration);
        }
    }

    /// Set an enemy burning. Re-applying refreshes the duration and keeps
    /// the stronger damage.
    pub fn apply_burn(&mut self, world: &mut World, id: EnemyId, damage_per_sec: f32, duration: f32) {
        if let Some(mut enemy) = self.enemy_mut(world, id) {
            let damage_per_sec = enemy
                .burn
                .map_or(damage_per_sec, |b| b.damage_per_sec.max(damage_per_sec));
            enemy.burn = Some(Burn {
                damage_per_sec,
                remaining: duration,
            });
        }
    }

    /// Whether the wave still has anything alive or waiting to spawn.
    pub fn has_enemies_or_queue(&self) -> bool {
        !self.index.is_empty() || !self.spawn_queue.is_empty()
    }

    pub fn live_count(&self) -> usize {
        self.index.len()
    }

    pub fn queued_count(&self) -> usize {
        self.spawn_queue.len()
    }

    /// Live enemy positions in spawn order.
    pub fn positions(&self, world: &World) -> Vec<(EnemyId, WorldPos)> {
        self.index
            .iter()
            .filter_map(|(&id, &entity)| {
                world
                    .get::<&Position>(entity)
                    .ok()
                    .map(|pos| (id, pos.0))
            })
            .collect()
    }

    pub fn position(&self, world: &World, id: EnemyId) -> Option<WorldPos> {
        let entity = *self.index.get(&id)?;
        world.get::<&Position>(entity).ok().map(|pos| pos.0)
    }

    /// Read access to one enemy.
    pub fn enemy<'w>(&self, world: &'w World, id: EnemyId) -> Option<hecs::Ref<'w, Enemy>> {
        let entity = *self.index.get(&id)?;
        world.get::<&Enemy>(entity).ok()
    }

    /// Live enemies in spawn order, for snapshots.
    pub fn iter<'a>(&'a self, world: &'a World) -> impl Iterator<Item = (Enemy, WorldPos)> + 'a {
        self.index.values().filter_map(move |&entity| {
            let enemy = world.get::<&Enemy>(entity).ok()?;
            let pos = world.get::<&Position>(entity).ok()?;
            Some(((*enemy).clone(), pos.0))
        })
    }

    /// Remove every enemy and drop the queue.
    pub fn clear(&mut self, world: &mut World, scene: &mut dyn SceneSink) {
        let ids: Vec<EnemyId> = self.index.keys().copied().collect();
        for id in ids {
            self.remove(world, scene, id);
        }
        self.spawn_queue.clear();
        self.spawn_timer_ms = 0.0;
    }

    fn enemy_mut<'w>(&self, world: &'w World, id: EnemyId) -> Option<hecs::RefMut<'w, Enemy>> {
        let entity = *self.index.get(&id)?;
        world.get::<&mut Enemy>(entity).ok()
    }

    fn spawn(&mut self, world: &mut World, scene: &mut dyn SceneSink, queued: QueuedEnemy) -> EnemyId {
        self.next_id += 1;
        let id = EnemyId(self.next_id);
        let entity = world_setup::spawn_enemy(world, scene, id, queued.kind, queued.path, queued.hp_scale);
        self.index.insert(id, entity);
        debug!(enemy = %id, "spawned");
        id
    }

    /// Idempotent: removing an id twice returns `None` the second time.
    fn remove(&mut self, world: &mut World, scene: &mut dyn SceneSink, id: EnemyId) -> Option<RemovedEnemy> {
        let entity = self.index.remove(&id)?;
        let (enemy, pos, visual) = world.remove::<(Enemy, Position, Visual)>(entity).ok()?;
        let _ = world.despawn(entity);
        scene.remove_visual(visual.0);
        Some(RemovedEnemy {
            id,
            kind: enemy.kind,
            position: pos.0,
        })
    }
}

impl Default for EnemySystem {
    fn default() -> Self {
        Self::new(false)
    }
}

/// Move `distance` toward the next waypoint. Overshooting snaps onto the
/// waypoint and advances `path_index`; leftover distance is not carried over.
fn advance_along_path(enemy: &mut Enemy, pos: &mut WorldPos, distance: f32) {
    let Some(&target) = enemy.path.waypoints.get(enemy.path_index + 1) else {
        return;
    };
    let remaining = pos.distance(target);
    if distance >= remaining {
        *pos = target;
        enemy.path_index += 1;
    } else {
        *pos += (target - *pos).normalize_or_zero() * distance;
    }
}
