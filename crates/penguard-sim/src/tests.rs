//! Tests for pathing, the entity systems and the game controller.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

use hecs::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use penguard_core::catalog::Catalog;
use penguard_core::commands::PlayerCommand;
use penguard_core::constants::MAX_GRID_DIM;
use penguard_core::enums::*;
use penguard_core::map::MapDefinition;
use penguard_core::state::GameStateSnapshot;
use penguard_core::types::{BuiltPath, EnemyId, GridPoint, TowerId, VisualHandle, WorldPos};

use crate::components::Payload;
use crate::engine::{SimConfig, SimulationEngine};
use crate::game_state::{GameConfig, GameState};
use crate::observer::GameObserver;
use crate::pathing::{self, grid_to_world};
use crate::scene::{NullScene, SceneSink};
use crate::systems::enemies::EnemySystem;
use crate::systems::projectiles::ProjectileSystem;
use crate::systems::towers::{payload_for, TowerSystem};
use crate::waves::WaveComposition;

const FRAME: f32 = 1.0 / 60.0;

fn rink() -> MapDefinition {
    MapDefinition::blank("rink", Theme::Hockey, 11, 11)
        .with_path_node(0, 5, None, 0.0)
        .with_path_node(10, 5, None, 1.0)
}

fn rink_config() -> GameConfig {
    GameConfig::new(Theme::Hockey, Catalog::hockey(), rink())
}

/// Hockey catalog whose Slap Shot one-shots a Puck at a high fire rate.
fn strong_catalog() -> Catalog {
    let mut catalog = Catalog::hockey();
    let slap = &mut catalog.towers[0];
    slap.damage = vec![100.0; 4];
    slap.range = vec![3.0; 4];
    slap.fire_rate = vec![10.0; 4];
    catalog
}

fn single_wave(enemy: &str, count: u32) -> Vec<WaveComposition> {
    vec![WaveComposition::new(vec![(enemy.to_string(), count)])]
}

#[derive(Debug, Default)]
struct Calls {
    updates: usize,
    wave_complete: Vec<u32>,
    game_over: Vec<bool>,
}

struct Recorder(Rc<RefCell<Calls>>);

impl GameObserver for Recorder {
    fn on_state_update(&mut self, _snapshot: &GameStateSnapshot) {
        self.0.borrow_mut().updates += 1;
    }

    fn on_wave_complete(&mut self, wave: u32) {
        self.0.borrow_mut().wave_complete.push(wave);
    }

    fn on_game_over(&mut self, won: bool) {
        self.0.borrow_mut().game_over.push(won);
    }
}

/// Scene that tracks live visual handles.
struct TrackingScene(Rc<RefCell<Vec<VisualHandle>>>, u64);

impl SceneSink for TrackingScene {
    fn add_visual(&mut self, _kind: VisualKind, _position: WorldPos, _color: &str) -> VisualHandle {
        self.1 += 1;
        let handle = VisualHandle(self.1);
        self.0.borrow_mut().push(handle);
        handle
    }

    fn move_visual(&mut self, _handle: VisualHandle, _position: WorldPos) {}

    fn remove_visual(&mut self, handle: VisualHandle) {
        self.0.borrow_mut().retain(|h| *h != handle);
    }
}

fn observed(engine: SimulationEngine) -> (SimulationEngine, Rc<RefCell<Calls>>) {
    let calls = Rc::new(RefCell::new(Calls::default()));
    let engine = engine.with_observer(Box::new(Recorder(Rc::clone(&calls))));
    (engine, calls)
}

/// Tick until the phase leaves `WaveActive` or `max_ticks` run out.
fn run_wave(engine: &mut SimulationEngine, max_ticks: usize) {
    for _ in 0..max_ticks {
        engine.tick(FRAME);
        if engine.phase() != GamePhase::WaveActive {
            return;
        }
    }
}

fn lane(points: &[(i32, i32)]) -> Arc<BuiltPath> {
    Arc::new(BuiltPath {
        id: "main".into(),
        waypoints: points
            .iter()
            .map(|&(x, y)| grid_to_world(GridPoint::new(x, y), 11, 11))
            .collect(),
    })
}

// ---- Pathing ----

#[test]
fn test_linear_path_sorted_by_order() {
    let map = MapDefinition::blank("m", Theme::Hockey, 11, 11)
        .with_path_node(8, 2, None, 3.0)
        .with_path_node(0, 5, None, 0.0)
        .with_path_node(4, 4, None, 1.5)
        .with_path_node(6, 3, None, 2.0);
    let paths = pathing::build_paths(&map, &mut ChaCha8Rng::seed_from_u64(1));
    assert_eq!(paths.len(), 1);
    let path = &paths.main_paths[0];
    assert_eq!(path.id, "main");
    let expected: Vec<WorldPos> = [(0, 5), (4, 4), (6, 3), (8, 2)]
        .iter()
        .map(|&(x, y)| grid_to_world(GridPoint::new(x, y), 11, 11))
        .collect();
    assert_eq!(path.waypoints, expected);
}

#[test]
fn test_linear_ignores_lane_ids() {
    let map = MapDefinition::blank("m", Theme::Hockey, 11, 11)
        .with_path_node(0, 1, Some("A"), 0.0)
        .with_path_node(10, 1, Some("B"), 1.0);
    let paths = pathing::build_paths(&map, &mut ChaCha8Rng::seed_from_u64(1));
    assert_eq!(paths.len(), 1);
    assert_eq!(paths.main_paths[0].waypoints.len(), 2);
}

#[test]
fn test_linear_fallback_walks_every_column() {
    let map = MapDefinition::blank("m", Theme::Hockey, 14, 9).with_path_node(3, 3, None, 0.0);
    let paths = pathing::build_paths(&map, &mut ChaCha8Rng::seed_from_u64(9));
    let path = &paths.main_paths[0];
    assert_eq!(path.waypoints.len(), 14);
    assert_eq!(
        pathing::world_to_grid(path.waypoints[0], 14, 9),
        Some(GridPoint::new(0, 4))
    );
    let cells: Vec<GridPoint> = path
        .waypoints
        .iter()
        .map(|w| pathing::world_to_grid(*w, 14, 9).unwrap())
        .collect();
    for (col, pair) in cells.windows(2).enumerate() {
        assert_eq!(pair[0].x, col as i32);
        assert_eq!(pair[1].x, col as i32 + 1);
        assert!((pair[0].y - pair[1].y).abs() <= 1);
    }
}

#[test]
fn test_linear_fallback_same_seed_same_lane() {
    let map = MapDefinition::blank("m", Theme::Soccer, 20, 12);
    let a = pathing::build_paths(&map, &mut ChaCha8Rng::seed_from_u64(5));
    let b = pathing::build_paths(&map, &mut ChaCha8Rng::seed_from_u64(5));
    assert_eq!(a.main_paths[0], b.main_paths[0]);
}

#[test]
fn test_fallback_lane_on_single_column_map_has_two_waypoints() {
    let map = MapDefinition::blank("m", Theme::Hockey, 1, 1);
    let paths = pathing::build_paths(&map, &mut ChaCha8Rng::seed_from_u64(1));
    assert_eq!(paths.main_paths[0].waypoints.len(), 2);

    let map = map.with_pathing(PathingType::Multipath);
    let paths = pathing::build_paths(&map, &mut ChaCha8Rng::seed_from_u64(1));
    assert!(paths.main_paths.iter().all(|p| p.waypoints.len() == 2));
}

#[test]
fn test_multipath_groups_by_lane() {
    let map = MapDefinition::blank("m", Theme::Hockey, 11, 11)
        .with_pathing(PathingType::Multipath)
        .with_path_node(10, 2, Some("B"), 2.0)
        .with_path_node(0, 2, Some("B"), 0.0)
        .with_path_node(0, 8, Some("A"), 0.0)
        .with_path_node(10, 8, Some("A"), 1.0)
        .with_path_node(5, 5, None, 1.0)
        .with_path_node(0, 5, None, 0.0)
        .with_path_node(3, 3, Some("C"), 0.0);
    let paths = pathing::build_paths(&map, &mut ChaCha8Rng::seed_from_u64(1));
    let ids: Vec<&str> = paths.main_paths.iter().map(|p| p.id.as_str()).collect();
    // First-seen order; the single-node lane "C" is dropped.
    assert_eq!(ids, vec!["B", "A", "main"]);
    let b = &paths.main_paths[0];
    assert_eq!(b.waypoints[0], grid_to_world(GridPoint::new(0, 2), 11, 11));
    assert_eq!(b.waypoints[1], grid_to_world(GridPoint::new(10, 2), 11, 11));
}

#[test]
fn test_multipath_fallback_two_lanes() {
    let map = MapDefinition::blank("m", Theme::Hockey, 12, 10).with_pathing(PathingType::Multipath);
    let paths = pathing::build_paths(&map, &mut ChaCha8Rng::seed_from_u64(1));
    assert_eq!(paths.len(), 2);
    let (a, b) = (&paths.main_paths[0], &paths.main_paths[1]);
    assert_eq!(a.id, "A");
    assert_eq!(b.id, "B");
    assert_eq!(a.waypoints.len(), 12);
    assert_eq!(b.waypoints.len(), 12);
    assert_eq!(pathing::world_to_grid(a.waypoints[0], 12, 10), Some(GridPoint::new(0, 2)));
    assert_eq!(pathing::world_to_grid(b.waypoints[11], 12, 10), Some(GridPoint::new(11, 7)));
}

#[test]
fn test_fallback_lanes_on_oversized_boards_stay_bounded() {
    let wide = MapDefinition::blank("wide", Theme::Hockey, 3_000_000_000, 3);
    let paths = pathing::build_paths(&wide, &mut ChaCha8Rng::seed_from_u64(1));
    assert_eq!(paths.main_paths[0].waypoints.len(), MAX_GRID_DIM as usize);

    let tall = MapDefinition::blank("tall", Theme::Hockey, 4, 2_000_000_000)
        .with_pathing(PathingType::Multipath);
    let paths = pathing::build_paths(&tall, &mut ChaCha8Rng::seed_from_u64(1));
    assert_eq!(paths.len(), 2);
    assert!(paths.main_paths.iter().all(|p| p.waypoints.len() == 4));

    let huge = MapDefinition::blank("huge", Theme::Hockey, u32::MAX, u32::MAX);
    let paths = pathing::build_paths(&huge, &mut ChaCha8Rng::seed_from_u64(1));
    assert!(paths.main_paths[0].waypoints.len() >= 2);
}

// ---- Game state ----

#[test]
fn test_lose_life_reaches_lost_exactly_at_zero() {
    let config = rink_config().with_start_lives(5);
    let mut state = GameState::new(&config);
    state.start_wave();
    for i in 1..=5 {
        let lost = state.lose_life();
        assert_eq!(lost, i == 5);
        if i < 5 {
            assert_eq!(state.phase(), GamePhase::WaveActive);
        }
    }
    assert_eq!(state.lives(), 0);
    assert_eq!(state.phase(), GamePhase::Lost);
    assert_eq!(state.stars(), 0);
}

#[test]
fn test_wave_complete_transitions() {
    let config = rink_config().with_total_waves(2);
    let mut state = GameState::new(&config);
    assert!(state.start_wave());
    assert!(!state.start_wave());
    state.wave_complete();
    assert_eq!(state.phase(), GamePhase::Placing);
    assert!(state.start_wave());
    state.wave_complete();
    assert_eq!(state.phase(), GamePhase::Won);
    assert!(state.is_over());
    assert_eq!(state.stars(), 5);
}

#[test]
fn test_spend_money_never_negative() {
    let config = rink_config().with_start_money(100);
    let mut state = GameState::new(&config);
    assert!(!state.spend_money(101));
    assert_eq!(state.money(), 100);
    assert!(state.spend_money(100));
    assert_eq!(state.money(), 0);
    assert!(!state.spend_money(1));
    assert_eq!(state.money(), 0);
}

#[test]
fn test_rewards_score_refunds_do_not() {
    let mut state = GameState::new(&rink_config());
    state.add_money(10);
    state.refund(84);
    assert_eq!(state.money(), 744);
    assert_eq!(state.score(), 10);
}

// ---- Enemy system ----

#[test]
fn test_enemy_spawns_on_first_waypoint_and_walks() {
    let mut world = World::new();
    let mut scene = NullScene::default();
    let mut enemies = EnemySystem::default();
    let puck = Arc::new(Catalog::hockey().enemies[0].clone());
    let path = lane(&[(0, 5), (10, 5)]);
    enemies.queue_wave(&puck, 2, &path, 1);
    assert_eq!(enemies.queued_count(), 2);

    let report = enemies.update(&mut world, &mut scene, 0.0, 1.0);
    assert_eq!(report.spawned.len(), 1);
    assert_eq!(enemies.positions(&world), vec![(EnemyId(1), path.waypoints[0])]);

    // The second spawn waits for the 450 ms delay.
    enemies.update(&mut world, &mut scene, 0.4, 1.0);
    assert_eq!(enemies.live_count(), 1);
    enemies.update(&mut world, &mut scene, 0.06, 1.0);
    assert_eq!(enemies.live_count(), 2);
    assert_eq!(enemies.queued_count(), 0);

    let first = enemies.position(&world, EnemyId(1)).unwrap();
    assert!((first.x - (-5.0 + 2.4 * 0.46)).abs() < 1e-4);
    assert_eq!(scene.live_visuals(), 2);
}

#[test]
fn test_enemy_reaching_end_is_reported_once() {
    let mut world = World::new();
    let mut scene = NullScene::default();
    let mut enemies = EnemySystem::default();
    let puck = Arc::new(Catalog::hockey().enemies[0].clone());
    enemies.queue_wave(&puck, 1, &lane(&[(0, 5), (1, 5)]), 1);

    let mut reached = 0;
    for _ in 0..20 {
        reached += enemies.update(&mut world, &mut scene, 0.1, 1.0).reached.len();
    }
    assert_eq!(reached, 1);
    assert!(!enemies.has_enemies_or_queue());
    assert_eq!(enemies.damage(&mut world, &mut scene, EnemyId(1), 10.0), None);
    assert_eq!(scene.live_visuals(), 0);
}

#[test]
fn test_damage_kills_once() {
    let mut world = World::new();
    let mut scene = NullScene::default();
    let mut enemies = EnemySystem::default();
    let puck = Arc::new(Catalog::hockey().enemies[0].clone());
    enemies.queue_wave(&puck, 1, &lane(&[(0, 5), (10, 5)]), 1);
    enemies.update(&mut world, &mut scene, 0.0, 1.0);

    assert_eq!(enemies.damage(&mut world, &mut scene, EnemyId(99), 10.0), None);
    assert_eq!(enemies.damage(&mut world, &mut scene, EnemyId(1), 30.0), None);
    assert_eq!(enemies.enemy(&world, EnemyId(1)).unwrap().hp, 20.0);
    let killed = enemies.damage(&mut world, &mut scene, EnemyId(1), 30.0).unwrap();
    assert_eq!(killed.id, EnemyId(1));
    assert_eq!(enemies.damage(&mut world, &mut scene, EnemyId(1), 30.0), None);
}

#[test]
fn test_slow_halves_speed() {
    let mut world = World::new();
    let mut scene = NullScene::default();
    let mut enemies = EnemySystem::default();
    let puck = Arc::new(Catalog::hockey().enemies[0].clone());
    enemies.queue_wave(&puck, 1, &lane(&[(0, 5), (10, 5)]), 1);
    enemies.update(&mut world, &mut scene, 0.0, 1.0);

    enemies.apply_slow(&mut world, EnemyId(1), 2.0);
    enemies.update(&mut world, &mut scene, 0.1, 1.0);
    let pos = enemies.position(&world, EnemyId(1)).unwrap();
    assert!((pos.x - (-5.0 + 2.4 * 0.5 * 0.1)).abs() < 1e-4);
}

#[test]
fn test_slowed_speed_is_fixed_whatever_the_tower_power() {
    let mut catalog = Catalog::hockey();
    let slower = catalog
        .towers
        .iter_mut()
        .find(|t| t.slow_power.is_some())
        .unwrap();
    slower.slow_power = Some(0.9);
    let duration = payload_for(slower, 0).slow.unwrap();
    assert!(duration > 0.1);

    let mut world = World::new();
    let mut scene = NullScene::default();
    let mut enemies = EnemySystem::default();
    let puck = Arc::new(catalog.enemies[0].clone());
    enemies.queue_wave(&puck, 1, &lane(&[(0, 5), (10, 5)]), 1);
    enemies.update(&mut world, &mut scene, 0.0, 1.0);

    enemies.apply_slow(&mut world, EnemyId(1), duration);
    enemies.update(&mut world, &mut scene, 0.1, 1.0);
    let pos = enemies.position(&world, EnemyId(1)).unwrap();
    assert!((pos.x - (-5.0 + 2.4 * 0.5 * 0.1)).abs() < 1e-4);
}

#[test]
fn test_burn_damage_kills_and_reports() {
    let mut world = World::new();
    let mut scene = NullScene::default();
    let mut enemies = EnemySystem::default();
    let puck = Arc::new(Catalog::hockey().enemies[0].clone());
    enemies.queue_wave(&puck, 1, &lane(&[(0, 5), (10, 5)]), 1);
    enemies.update(&mut world, &mut scene, 0.0, 1.0);

    enemies.apply_burn(&mut world, EnemyId(1), 300.0, 3.0);
    let report = enemies.update(&mut world, &mut scene, 0.1, 1.0);
    assert!(report.killed.is_empty());
    assert!((enemies.enemy(&world, EnemyId(1)).unwrap().hp - 20.0).abs() < 1e-3);

    let report = enemies.update(&mut world, &mut scene, 0.1, 1.0);
    assert_eq!(report.killed.len(), 1);
    assert!(report.reached.is_empty());
    assert!(!enemies.has_enemies_or_queue());
}

#[test]
fn test_game_speed_scales_spawn_timer_and_movement() {
    let mut world = World::new();
    let mut scene = NullScene::default();
    let mut enemies = EnemySystem::default();
    let puck = Arc::new(Catalog::hockey().enemies[0].clone());
    enemies.queue_wave(&puck, 2, &lane(&[(0, 5), (10, 5)]), 1);
    enemies.update(&mut world, &mut scene, 0.0, 3.0);
    enemies.update(&mut world, &mut scene, 0.16, 3.0);
    assert_eq!(enemies.live_count(), 2);
    let pos = enemies.position(&world, EnemyId(1)).unwrap();
    assert!((pos.x - (-5.0 + 2.4 * 3.0 * 0.16)).abs() < 1e-4);
}

// ---- Tower system ----

#[test]
fn test_tower_targets_closest_first_on_ties() {
    let mut world = World::new();
    let mut scene = NullScene::default();
    let mut towers = TowerSystem::new();
    let kind = Catalog::hockey().towers[0].clone();
    let id = towers.place_tower(&mut world, &mut scene, &kind, 5, 5, WorldPos::ZERO);

    let enemies = vec![
        (EnemyId(3), WorldPos::new(2.0, 0.0, 0.0)),
        (EnemyId(2), WorldPos::new(1.0, 0.0, 0.0)),
        (EnemyId(1), WorldPos::new(-1.0, 0.0, 0.0)),
    ];
    let shots = towers.update(&mut world, 0.0, &enemies);
    assert_eq!(shots.len(), 1);
    assert_eq!(shots[0].tower_id, id);
    assert_eq!(shots[0].target_id, EnemyId(2));
    assert_eq!(shots[0].payload.damage, 25.0);

    // Reloading: 1 / 1.2 shots per second.
    assert!(towers.update(&mut world, 0.5, &enemies).is_empty());
    assert_eq!(towers.update(&mut world, 0.4, &enemies).len(), 1);
}

#[test]
fn test_tower_without_target_stays_ready() {
    let mut world = World::new();
    let mut scene = NullScene::default();
    let mut towers = TowerSystem::new();
    let kind = Catalog::hockey().towers[0].clone();
    towers.place_tower(&mut world, &mut scene, &kind, 5, 5, WorldPos::ZERO);

    let far = vec![(EnemyId(1), WorldPos::new(5.0, 0.0, 0.0))];
    assert!(towers.update(&mut world, 0.1, &far).is_empty());
    let near = vec![(EnemyId(1), WorldPos::new(2.7, 0.0, 0.0))];
    assert_eq!(towers.update(&mut world, 0.0, &near).len(), 1);
}

#[test]
fn test_upgrades_exhaust() {
    let mut world = World::new();
    let mut scene = NullScene::default();
    let mut towers = TowerSystem::new();
    let kind = Catalog::hockey().towers[0].clone();
    let id = towers.place_tower(&mut world, &mut scene, &kind, 0, 0, WorldPos::ZERO);

    let costs: Vec<u32> = (0..kind.upgrade_costs.len())
        .map(|_| towers.upgrade_tower(&mut world, id))
        .collect();
    assert_eq!(costs, vec![60, 100, 170]);
    assert_eq!(towers.upgrade_tower(&mut world, id), 0);
    assert_eq!(towers.next_upgrade_cost(&world, id), None);
    let tower = towers.iter(&world).next().unwrap();
    assert_eq!(tower.level, 3);
    assert_eq!(tower.total_spent, 80 + 60 + 100 + 170);
}

#[test]
fn test_sell_value_after_one_upgrade() {
    let mut world = World::new();
    let mut scene = NullScene::default();
    let mut towers = TowerSystem::new();
    let kind = Catalog::hockey().towers[0].clone();
    let id = towers.place_tower(&mut world, &mut scene, &kind, 0, 0, WorldPos::ZERO);
    towers.upgrade_tower(&mut world, id);
    assert_eq!(towers.sell_tower(&mut world, &mut scene, id), Some(84));
    assert_eq!(towers.sell_tower(&mut world, &mut scene, id), None);
    assert_eq!(towers.count(), 0);
    assert_eq!(scene.live_visuals(), 0);
}

// ---- Projectile system ----

#[test]
fn test_projectile_lost_target_is_discarded() {
    let mut world = World::new();
    let mut scene = NullScene::default();
    let mut projectiles = ProjectileSystem::new();
    projectiles.fire(&mut world, &mut scene, WorldPos::ZERO, EnemyId(7), Payload::default(), "#fff");
    let hits = projectiles.update(&mut world, &mut scene, FRAME, &HashMap::new());
    assert!(hits.is_empty());
    assert_eq!(projectiles.count(), 0);
}

#[test]
fn test_projectile_homes_and_hits() {
    let mut world = World::new();
    let mut scene = NullScene::default();
    let mut projectiles = ProjectileSystem::new();
    let payload = Payload {
        damage: 40.0,
        ..Payload::default()
    };
    projectiles.fire(&mut world, &mut scene, WorldPos::ZERO, EnemyId(1), payload, "#fff");

    let mut live = HashMap::new();
    live.insert(EnemyId(1), WorldPos::new(2.0, 0.0, 0.0));
    // 14 * 0.1 = 1.4 units: not there yet.
    assert!(projectiles.update(&mut world, &mut scene, 0.1, &live).is_empty());
    let (_, _, pos) = projectiles.iter(&world).next().unwrap();
    assert!((pos.x - 1.4).abs() < 1e-4);
    assert_eq!(pos.y, 0.5);

    // The target moved; the projectile follows and connects.
    live.insert(EnemyId(1), WorldPos::new(2.0, 0.0, 0.5));
    let hits = projectiles.update(&mut world, &mut scene, 0.1, &live);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].target_id, EnemyId(1));
    assert_eq!(hits[0].payload.damage, 40.0);
    assert_eq!(projectiles.count(), 0);
}

// ---- Controller ----

#[test]
fn test_scenario_place_tower_on_rink() {
    let mut engine = SimulationEngine::new(rink_config(), SimConfig::default());
    assert_eq!(engine.paths().len(), 1);
    assert_eq!(engine.paths().main_paths[0].waypoints.len(), 2);

    assert!(engine.try_place_tower("t1", 5, 6).is_some());
    let state = engine.get_state();
    assert_eq!(state.money, 570);
    assert_eq!(state.towers.len(), 1);
}

#[test]
fn test_scenario_wave_of_five_pucks_killed() {
    let config = GameConfig::new(Theme::Hockey, strong_catalog(), rink())
        .with_waves(vec![
            WaveComposition::new(vec![("e1".into(), 5)]),
            WaveComposition::new(vec![("e1".into(), 5)]),
        ]);
    let (mut engine, calls) = observed(SimulationEngine::new(config, SimConfig::default()));
    engine.try_place_tower("t1", 5, 6).unwrap();
    assert!(engine.start_wave());
    run_wave(&mut engine, 60 * 30);

    let state = engine.get_state();
    assert_eq!(state.phase, GamePhase::Placing);
    assert_eq!(state.lives, 20);
    assert_eq!(state.score, 50);
    assert_eq!(state.money, 570 + 50);
    assert!(state.enemies.is_empty());
    assert!(state.projectiles.is_empty());
    assert_eq!(calls.borrow().wave_complete, vec![1]);
    assert!(calls.borrow().game_over.is_empty());
}

#[test]
fn test_scenario_breach_with_one_life_loses_once() {
    let config = rink_config()
        .with_start_lives(1)
        .with_waves(single_wave("e1", 1));
    let (mut engine, calls) = observed(SimulationEngine::new(config, SimConfig::default()));
    engine.start_wave();
    run_wave(&mut engine, 60 * 30);

    assert_eq!(engine.phase(), GamePhase::Lost);
    assert_eq!(engine.state().lives(), 0);
    assert_eq!(engine.get_state().stars, 0);
    // Lost pre-empts the win that the emptied last wave would otherwise give.
    assert_eq!(calls.borrow().game_over, vec![false]);
    assert!(calls.borrow().wave_complete.is_empty());

    let updates = calls.borrow().updates;
    for _ in 0..120 {
        engine.tick(FRAME);
    }
    assert_eq!(calls.borrow().game_over, vec![false]);
    assert_eq!(calls.borrow().updates, updates);
    assert!(!engine.start_wave());
    assert!(engine.try_place_tower("t1", 5, 6).is_none());
}

#[test]
fn test_last_wave_cleared_wins() {
    let config = GameConfig::new(Theme::Hockey, strong_catalog(), rink())
        .with_waves(single_wave("e1", 2));
    let (mut engine, calls) = observed(SimulationEngine::new(config, SimConfig::default()));
    engine.try_place_tower("t1", 5, 6).unwrap();
    engine.start_wave();
    run_wave(&mut engine, 60 * 30);

    assert_eq!(engine.phase(), GamePhase::Won);
    assert_eq!(engine.state().stars(), 5);
    assert_eq!(calls.borrow().game_over, vec![true]);
    assert!(calls.borrow().wave_complete.is_empty());
}

#[test]
fn test_failed_placement_leaves_state_unchanged() {
    let config = rink_config().with_start_money(100);
    let mut engine = SimulationEngine::new(config, SimConfig::default());
    let before = engine.get_state();

    assert!(engine.try_place_tower("t2", 1, 1).is_none()); // 150 > 100
    assert!(engine.try_place_tower("t99", 1, 1).is_none());
    assert!(engine.try_place_tower("t1", 11, 0).is_none());
    assert!(engine.try_place_tower("t1", -1, 0).is_none());
    assert_eq!(engine.get_state(), before);

    assert!(engine.try_place_tower("t1", 1, 1).is_some());
    assert!(engine.try_place_tower("t1", 1, 1).is_none()); // occupied
    assert!(engine.try_place_tower("t1", 2, 1).is_none()); // 20 left
    let state = engine.get_state();
    assert_eq!(state.money, 20);
    assert_eq!(state.towers.len(), 1);
}

#[test]
fn test_obstacle_cells_refuse_towers() {
    let config = GameConfig::new(Theme::Hockey, Catalog::hockey(), rink().with_obstacle(3, 3));
    let mut engine = SimulationEngine::new(config, SimConfig::default());
    let before = engine.get_state();

    assert!(engine.try_place_tower("t1", 3, 3).is_none());
    assert_eq!(engine.get_state(), before);
    assert!(engine.try_place_tower("t1", 3, 4).is_some());
}

#[test]
fn test_upgrade_and_sell_through_controller() {
    let mut engine = SimulationEngine::new(rink_config(), SimConfig::default());
    let id = engine.try_place_tower("t1", 2, 2).unwrap();
    assert!(engine.try_upgrade_tower(id));
    assert_eq!(engine.state().money(), 650 - 140);
    assert_eq!(engine.sell_tower(id), Some(84));
    assert_eq!(engine.state().money(), 650 - 140 + 84);
    assert_eq!(engine.state().score(), 0);
    assert_eq!(engine.sell_tower(id), None);
    assert!(!engine.try_upgrade_tower(TowerId(42)));
}

#[test]
fn test_upgrade_needs_funds() {
    let config = rink_config().with_start_money(100);
    let mut engine = SimulationEngine::new(config, SimConfig::default());
    let id = engine.try_place_tower("t1", 2, 2).unwrap();
    assert!(!engine.try_upgrade_tower(id)); // 60 > 20
    let state = engine.get_state();
    assert_eq!(state.money, 20);
    assert_eq!(state.towers[0].level, 0);
}

#[test]
fn test_start_wave_only_from_placing() {
    let mut engine = SimulationEngine::new(rink_config(), SimConfig::default());
    assert!(engine.start_wave());
    assert!(!engine.start_wave());
    assert_eq!(engine.state().wave(), 1);
}

#[test]
fn test_game_speed_values() {
    let mut engine = SimulationEngine::new(rink_config(), SimConfig::default());
    assert!(engine.set_game_speed(3));
    assert_eq!(engine.state().game_speed(), GameSpeed::Triple);
    assert!(!engine.set_game_speed(0));
    assert!(!engine.set_game_speed(4));
    assert_eq!(engine.state().game_speed(), GameSpeed::Triple);
}

#[test]
fn test_commands_apply_at_tick_boundary() {
    let mut engine = SimulationEngine::new(rink_config(), SimConfig::default());
    engine.queue_commands([
        PlayerCommand::PlaceTower {
            tower_type: "t1".into(),
            grid_x: 5,
            grid_y: 6,
        },
        PlayerCommand::SetGameSpeed { speed: 2 },
        PlayerCommand::StartWave,
    ]);
    assert_eq!(engine.phase(), GamePhase::Placing);
    let snapshot = engine.tick(FRAME);
    assert_eq!(snapshot.phase, GamePhase::WaveActive);
    assert_eq!(snapshot.towers.len(), 1);
    assert_eq!(snapshot.game_speed, GameSpeed::Double);
    assert_eq!(snapshot.enemies.len(), 1);
}

#[test]
fn test_frame_delta_is_clamped() {
    let config = rink_config().with_waves(single_wave("e1", 1));
    let mut engine = SimulationEngine::new(config, SimConfig::default());
    engine.start_wave();
    engine.tick(5.0);
    let enemy = &engine.get_state().enemies[0];
    assert!((enemy.position.x - (-5.0 + 2.4 * 0.1)).abs() < 1e-4);
    assert!((engine.time().elapsed_secs - 0.1).abs() < 1e-6);
}

#[test]
fn test_path_index_is_monotone() {
    let config = rink_config()
        .with_start_lives(100)
        .with_waves(single_wave("e3", 8));
    let map = MapDefinition::blank("zigzag", Theme::Hockey, 11, 11)
        .with_path_node(0, 0, None, 0.0)
        .with_path_node(10, 0, None, 1.0)
        .with_path_node(10, 10, None, 2.0)
        .with_path_node(0, 10, None, 3.0);
    let config = GameConfig { map, ..config };
    let mut engine = SimulationEngine::new(config, SimConfig::default());
    engine.start_wave();

    let mut last: HashMap<EnemyId, usize> = HashMap::new();
    for _ in 0..60 * 20 {
        let snapshot = engine.tick(FRAME);
        for enemy in snapshot.enemies {
            let prev = last.insert(enemy.id, enemy.path_index).unwrap_or(0);
            assert!(enemy.path_index >= prev);
        }
    }
    assert!(last.values().any(|&i| i >= 2));
}

#[test]
fn test_wave_dispatch_round_robin_across_lanes() {
    let map = MapDefinition::blank("lanes", Theme::Hockey, 11, 11).with_pathing(PathingType::Multipath);
    let config = GameConfig::new(Theme::Hockey, Catalog::hockey(), map).with_waves(vec![
        WaveComposition::new(vec![
            ("e1".into(), 1),
            ("e2".into(), 0),
            ("e3".into(), 1),
            ("e4".into(), 1),
        ]),
    ]);
    let mut engine = SimulationEngine::new(config, SimConfig::default());
    engine.start_wave();
    let mut lanes = Vec::new();
    for _ in 0..60 * 2 {
        for enemy in engine.tick(FRAME).enemies {
            if !lanes.iter().any(|(id, _)| *id == enemy.id) {
                lanes.push((enemy.id, enemy.path_id));
            }
        }
    }
    let lanes: Vec<&str> = lanes.iter().map(|(_, lane)| lane.as_str()).collect();
    assert_eq!(lanes, vec!["A", "B", "A"]);
}

#[test]
fn test_wave_hp_scaling_is_opt_in() {
    let config = rink_config().with_waves(single_wave("e1", 1));
    let mut plain = SimulationEngine::new(config.clone(), SimConfig::default());
    plain.start_wave();
    assert_eq!(plain.tick(FRAME).enemies[0].max_hp, 50.0);

    let mut scaled = SimulationEngine::new(
        config,
        SimConfig {
            apply_wave_hp_scaling: true,
            ..Default::default()
        },
    );
    scaled.start_wave();
    assert_eq!(scaled.tick(FRAME).enemies[0].max_hp, 56.0);
}

#[test]
fn test_destroy_releases_visuals_and_is_idempotent() {
    let visuals = Rc::new(RefCell::new(Vec::new()));
    let scene = TrackingScene(Rc::clone(&visuals), 0);
    let mut engine = SimulationEngine::new(rink_config(), SimConfig::default()).with_scene(Box::new(scene));
    engine.try_place_tower("t1", 5, 6).unwrap();
    engine.try_place_tower("t2", 5, 4).unwrap();
    engine.start_wave();
    for _ in 0..90 {
        engine.tick(FRAME);
    }
    assert!(visuals.borrow().len() >= 3);

    engine.destroy();
    assert!(visuals.borrow().is_empty());
    assert!(engine.is_destroyed());
    engine.destroy();
    assert!(visuals.borrow().is_empty());
    assert!(!engine.start_wave());
    assert!(engine.try_place_tower("t1", 1, 1).is_none());
}

#[test]
fn test_every_command_notifies() {
    let (mut engine, calls) = observed(SimulationEngine::new(rink_config(), SimConfig::default()));
    let id = engine.try_place_tower("t1", 1, 1).unwrap();
    engine.try_upgrade_tower(id);
    engine.sell_tower(id);
    engine.set_game_speed(2);
    engine.start_wave();
    assert_eq!(calls.borrow().updates, 5);
    engine.tick(FRAME);
    assert_eq!(calls.borrow().updates, 6);
}

// ---- Determinism ----

fn determinism_engine(seed: u64) -> SimulationEngine {
    let map = MapDefinition::blank("open", Theme::Hockey, 16, 9);
    let config = GameConfig::new(Theme::Hockey, Catalog::hockey(), map).with_total_waves(3);
    let mut engine = SimulationEngine::new(
        config,
        SimConfig {
            seed,
            ..Default::default()
        },
    );
    engine.queue_commands([
        PlayerCommand::PlaceTower {
            tower_type: "t8".into(),
            grid_x: 7,
            grid_y: 3,
        },
        PlayerCommand::PlaceTower {
            tower_type: "t7".into(),
            grid_x: 9,
            grid_y: 5,
        },
        PlayerCommand::StartWave,
    ]);
    engine
}

#[test]
fn test_determinism_same_seed() {
    let mut engine_a = determinism_engine(12345);
    let mut engine_b = determinism_engine(12345);

    for _ in 0..900 {
        let snap_a = engine_a.tick(FRAME);
        let snap_b = engine_b.tick(FRAME);

        let json_a = serde_json::to_string(&snap_a).unwrap();
        let json_b = serde_json::to_string(&snap_b).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed");
    }
}

#[test]
fn test_snapshot_round_trips_through_json() {
    let mut engine = determinism_engine(7);
    for _ in 0..120 {
        engine.tick(FRAME);
    }
    let snapshot = engine.get_state();
    let json = serde_json::to_string(&snapshot).unwrap();
    let back: GameStateSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(back.enemies.len(), snapshot.enemies.len());
    assert_eq!(back.towers, snapshot.towers);
}
