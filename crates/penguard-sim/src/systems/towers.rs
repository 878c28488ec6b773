//! Tower placement, upgrades, sales and target acquisition.

use std::collections::BTreeMap;
use std::sync::Arc;

use hecs::{Entity, World};
use tracing::debug;

use penguard_core::catalog::{level_value, TowerType};
use penguard_core::constants::DEFAULT_SLOW_DURATION;
use penguard_core::types::{EnemyId, TowerId, WorldPos};

use crate::components::{Payload, Position, Tower, Visual};
use crate::economy::sell_value;
use crate::scene::SceneSink;
use crate::world_setup;

/// A tower decided to fire this tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Shot {
    pub tower_id: TowerId,
    pub target_id: EnemyId,
    pub origin: WorldPos,
    pub payload: Payload,
    pub color: String,
}

#[derive(Debug, Default)]
pub struct TowerSystem {
    index: BTreeMap<TowerId, Entity>,
    next_id: u32,
}

impl TowerSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a tower. Affordability and cell checks are the caller's job.
    pub fn place_tower(
        &mut self,
        world: &mut World,
        scene: &mut dyn SceneSink,
        kind: &TowerType,
        grid_x: i32,
        grid_y: i32,
        world_pos: WorldPos,
    ) -> TowerId {
        self.next_id += 1;
        let id = TowerId(self.next_id);
        let entity = world_setup::spawn_tower(
            world,
            scene,
            id,
            Arc::new(kind.clone()),
            grid_x,
            grid_y,
            world_pos,
        );
        self.index.insert(id, entity);
        debug!(tower = %id, kind = %kind.id, grid_x, grid_y, "tower placed");
        id
    }

    /// Cost of the tower's next level, or `None` at max level or for an unknown id.
    pub fn next_upgrade_cost(&self, world: &World, id: TowerId) -> Option<u32> {
        let entity = *self.index.get(&id)?;
        let tower = world.get::<&Tower>(entity).ok()?;
        tower.kind.upgrade_cost_at(tower.level)
    }

    /// Raise the tower one level. Returns the cost added to its spend, or 0
    /// when nothing was bought (max level or unknown id).
    pub fn upgrade_tower(&mut self, world: &mut World, id: TowerId) -> u32 {
        let Some(&entity) = self.index.get(&id) else {
            return 0;
        };
        let Ok(mut tower) = world.get::<&mut Tower>(entity) else {
            return 0;
        };
        let Some(cost) = tower.kind.upgrade_cost_at(tower.level) else {
            return 0;
        };
        tower.level += 1;
        tower.total_spent += cost;
        debug!(tower = %id, level = tower.level, cost, "tower upgraded");
        cost
    }

    /// Remove the tower and return its refund, `floor(total_spent * 0.6)`.
    pub fn sell_tower(&mut self, world: &mut World, scene: &mut dyn SceneSink, id: TowerId) -> Option<u32> {
        let entity = self.index.remove(&id)?;
        let (tower, visual) = world.remove::<(Tower, Visual)>(entity).ok()?;
        let _ = world.despawn(entity);
        scene.remove_visual(visual.0);
        let value = sell_value(tower.total_spent);
        debug!(tower = %id, value, "tower sold");
        Some(value)
    }

    /// Whether a tower stands on the cell.
    pub fn occupied(&self, world: &World, grid_x: i32, grid_y: i32) -> bool {
        self.index.values().any(|&entity| {
            world
                .get::<&Tower>(entity)
                .is_ok_and(|t| t.grid_x == grid_x && t.grid_y == grid_y)
        })
    }

    pub fn count(&self) -> usize {
        self.index.len()
    }

    /// Count down fire timers and pick targets. At most one shot per tower.
    ///
    /// `enemies` must be in a fixed order; the first of several equally
    /// close enemies wins.
    pub fn update(&mut self, world: &mut World, dt: f32, enemies: &[(EnemyId, WorldPos)]) -> Vec<Shot> {
        let mut shots = Vec::new();

        for &entity in self.index.values() {
            let Ok((tower, pos)) = world.query_one_mut::<(&mut Tower, &Position)>(entity) else {
                continue;
            };
            tower.fire_timer -= dt;
            if tower.fire_timer > 0.0 {
                continue;
            }

            let range = tower.kind.range_at(tower.level);
            let mut closest: Option<(f32, EnemyId)> = None;
            for &(enemy_id, enemy_pos) in enemies {
                let dist = pos.0.distance(enemy_pos);
                if dist <= range && closest.map_or(true, |(best, _)| dist < best) {
                    closest = Some((dist, enemy_id));
                }
            }

            if let Some((_, target_id)) = closest {
                tower.fire_timer = 1.0 / tower.kind.fire_rate_at(tower.level);
                shots.push(Shot {
                    tower_id: tower.id,
                    target_id,
                    origin: pos.0,
                    payload: payload_for(&tower.kind, tower.level),
                    color: tower.kind.color.clone(),
                });
            }
        }

        shots
    }

    /// Placed towers in id order, for snapshots.
    pub fn iter<'a>(&'a self, world: &'a World) -> impl Iterator<Item = Tower> + 'a {
        self.index
            .values()
            .filter_map(move |&entity| world.get::<&Tower>(entity).ok().map(|t| (*t).clone()))
    }

    /// Remove every tower.
    pub fn clear(&mut self, world: &mut World, scene: &mut dyn SceneSink) {
        for (_, entity) in std::mem::take(&mut self.index) {
            if let Ok(visual) = world.get::<&Visual>(entity).map(|v| *v) {
                scene.remove_visual(visual.0);
            }
            let _ = world.despawn(entity);
        }
    }
}

/// Hit effects of a tower type at a given level.
pub fn payload_for(kind: &TowerType, level: usize) -> Payload {
    Payload {
        damage: kind.damage_at(level),
        crit_chance: kind.crit_chance,
        slow: kind.slow_power.map(|_| {
            kind.slow_duration
                .as_deref()
                .map_or(DEFAULT_SLOW_DURATION, |d| level_value(d, level))
        }),
        burn: kind.burn_damage.as_deref().map(|table| {
            (level_value(table, level), kind.burn_duration.unwrap_or_default())
        }),
        splash: kind.splash.as_deref().map(|table| level_value(table, level)),
        chain: kind.chain_targets.as_deref().map(|table| {
            (level_value(table, level), kind.chain_range.unwrap_or_default())
        }),
    }
}
