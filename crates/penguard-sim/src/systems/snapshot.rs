//! Snapshot system: reads the world and builds a complete GameStateSnapshot.
//!
//! This system is read-only. It never modifies the world.

use hecs::World;

use penguard_core::events::GameEvent;
use penguard_core::state::*;
use penguard_core::types::SimTime;

use crate::economy::sell_value;
use crate::game_state::GameState;
use crate::systems::enemies::EnemySystem;
use crate::systems::projectiles::ProjectileSystem;
use crate::systems::towers::TowerSystem;

/// Build a complete GameStateSnapshot from the current world state.
pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    state: &GameState,
    enemies: &EnemySystem,
    towers: &TowerSystem,
    projectiles: &ProjectileSystem,
    events: Vec<GameEvent>,
) -> GameStateSnapshot {
    GameStateSnapshot {
        time: *time,
        phase: state.phase(),
        wave: state.wave(),
        total_waves: state.total_waves(),
        money: state.money(),
        lives: state.lives(),
        score: state.score(),
        game_speed: state.game_speed(),
        stars: state.stars(),
        enemies: build_enemies(world, enemies),
        towers: build_towers(world, towers),
        projectiles: build_projectiles(world, projectiles),
        events,
    }
}

fn build_enemies(world: &World, enemies: &EnemySystem) -> Vec<EnemyView> {
    enemies
        .iter(world)
        .map(|(enemy, position)| EnemyView {
            id: enemy.id,
            enemy_type: enemy.kind.id.clone(),
            position,
            hp: enemy.hp,
            max_hp: enemy.max_hp,
            path_id: enemy.path.id.clone(),
            path_index: enemy.path_index,
            slowed: enemy.slow_timer > 0.0,
            burning: enemy.burn.is_some(),
        })
        .collect()
}

fn build_towers(world: &World, towers: &TowerSystem) -> Vec<TowerView> {
    towers
        .iter(world)
        .map(|tower| TowerView {
            id: tower.id,
            tower_type: tower.kind.id.clone(),
            level: tower.level,
            grid_x: tower.grid_x,
            grid_y: tower.grid_y,
            total_spent: tower.total_spent,
            next_upgrade_cost: tower.kind.upgrade_cost_at(tower.level),
            sell_value: sell_value(tower.total_spent),
        })
        .collect()
}

fn build_projectiles(world: &World, projectiles: &ProjectileSystem) -> Vec<ProjectileView> {
    projectiles
        .iter(world)
        .map(|(id, target_id, position)| ProjectileView {
            id,
            target_id,
            position,
        })
        .collect()
}
