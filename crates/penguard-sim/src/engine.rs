//! Simulation engine: the game controller.
//!
//! `SimulationEngine` owns the hecs world, the session state and the three
//! entity systems. It runs them in a fixed order once per frame, processes
//! player commands, and reports through the observer. Completely headless,
//! which keeps it deterministic and testable.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use hecs::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use penguard_core::commands::PlayerCommand;
use penguard_core::constants::MAX_FRAME_DT;
use penguard_core::enums::{GamePhase, GameSpeed};
use penguard_core::events::GameEvent;
use penguard_core::state::GameStateSnapshot;
use penguard_core::types::{EnemyId, GridPoint, SimTime, TowerId, WorldPos};

use crate::game_state::{GameConfig, GameState};
use crate::observer::{GameObserver, NullObserver};
use crate::pathing::{self, BuiltPaths};
use crate::scene::{NullScene, SceneSink};
use crate::systems;
use crate::systems::damage;
use crate::systems::enemies::{EnemySystem, RemovedEnemy};
use crate::systems::projectiles::ProjectileSystem;
use crate::systems::towers::TowerSystem;

/// Engine tuning that is not part of the game rules.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Largest frame delta accepted by one tick (seconds).
    pub max_frame_dt: f32,
    /// Scale spawned enemy HP by `1 + wave * 0.12`.
    pub apply_wave_hp_scaling: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            max_frame_dt: MAX_FRAME_DT,
            apply_wave_hp_scaling: false,
        }
    }
}

/// The simulation engine. Owns the ECS world and all session state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    rng: ChaCha8Rng,
    config: GameConfig,
    max_frame_dt: f32,
    state: GameState,
    paths: BuiltPaths,
    enemies: EnemySystem,
    towers: TowerSystem,
    projectiles: ProjectileSystem,
    scene: Box<dyn SceneSink>,
    observer: Box<dyn GameObserver>,
    command_queue: VecDeque<PlayerCommand>,
    events: Vec<GameEvent>,
    destroyed: bool,
}

impl SimulationEngine {
    /// Build a session: lanes are generated here, once.
    pub fn new(config: GameConfig, sim: SimConfig) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(sim.seed);
        let paths = pathing::build_paths(&config.map, &mut rng);
        let state = GameState::new(&config);
        info!(
            map = %config.map.id,
            theme = config.theme.as_str(),
            lanes = paths.len(),
            waves = config.total_waves(),
            seed = sim.seed,
            "session created"
        );

        Self {
            world: World::new(),
            time: SimTime::default(),
            rng,
            config,
            max_frame_dt: sim.max_frame_dt,
            state,
            paths,
            enemies: EnemySystem::new(sim.apply_wave_hp_scaling),
            towers: TowerSystem::new(),
            projectiles: ProjectileSystem::new(),
            scene: Box::new(NullScene::default()),
            observer: Box::new(NullObserver),
            command_queue: VecDeque::new(),
            events: Vec::new(),
            destroyed: false,
        }
    }

    /// Attach the rendering collaborator. Call before the first command.
    pub fn with_scene(mut self, scene: Box<dyn SceneSink>) -> Self {
        self.scene = scene;
        self
    }

    /// Attach the UI observer.
    pub fn with_observer(mut self, observer: Box<dyn GameObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    // --- Commands ---

    /// `Placing -> WaveActive`: queue the next wave's enemies, one lane per
    /// enemy type in round-robin order. No-op outside `Placing`.
    pub fn start_wave(&mut self) -> bool {
        if self.destroyed || !self.state.start_wave() {
            return false;
        }
        let wave = self.state.wave();
        let composition = self
            .config
            .waves
            .get(wave as usize - 1)
            .cloned()
            .unwrap_or_default();

        let mut lane = 0;
        for (type_id, count) in &composition.groups {
            if *count == 0 {
                continue;
            }
            let Some(kind) = self.config.catalog.enemy(type_id) else {
                warn!(enemy_type = %type_id, "wave references unknown enemy type");
                continue;
            };
            let Some(path) = self.paths.round_robin(lane) else {
                break;
            };
            self.enemies
                .queue_wave(&Arc::new(kind.clone()), *count, path, wave);
            lane += 1;
        }

        info!(wave, enemies = composition.total(), "wave started");
        self.events.push(GameEvent::WaveStarted {
            wave,
            enemy_count: composition.total(),
        });
        self.notify();
        true
    }

    /// Buy and place a tower. Fails closed, with no mutation, on an unknown
    /// type, a cell off the board, blocked by an obstacle or already taken,
    /// insufficient funds, or a finished session.
    pub fn try_place_tower(&mut self, tower_type: &str, grid_x: i32, grid_y: i32) -> Option<TowerId> {
        if self.destroyed || self.state.is_over() {
            return None;
        }
        let catalog = Arc::clone(&self.config.catalog);
        let kind = catalog.tower(tower_type)?;
        let map = &self.config.map;
        let cell = GridPoint::new(grid_x, grid_y);
        if !map.contains(cell)
            || map.is_blocked(cell)
            || self.towers.occupied(&self.world, grid_x, grid_y)
        {
            return None;
        }
        if !self.state.spend_money(kind.cost) {
            debug!(tower_type, cost = kind.cost, money = self.state.money(), "cannot afford tower");
            return None;
        }

        let world_pos = pathing::grid_to_world(GridPoint::new(grid_x, grid_y), map.cols, map.rows);
        let id = self.towers.place_tower(
            &mut self.world,
            self.scene.as_mut(),
            kind,
            grid_x,
            grid_y,
            world_pos,
        );
        self.notify();
        Some(id)
    }

    /// Buy the tower's next level. `false` at max level, for an unknown id,
    /// or when the upgrade is unaffordable.
    pub fn try_upgrade_tower(&mut self, id: TowerId) -> bool {
        if self.destroyed || self.state.is_over() {
            return false;
        }
        let Some(cost) = self.towers.next_upgrade_cost(&self.world, id) else {
            return false;
        };
        if !self.state.spend_money(cost) {
            return false;
        }
        self.towers.upgrade_tower(&mut self.world, id);
        self.notify();
        true
    }

    /// Sell a tower. Returns the refund, which adds money but not score.
    pub fn sell_tower(&mut self, id: TowerId) -> Option<u32> {
        if self.destroyed || self.state.is_over() {
            return None;
        }
        let value = self
            .towers
            .sell_tower(&mut self.world, self.scene.as_mut(), id)?;
        self.state.refund(value);
        self.notify();
        Some(value)
    }

    /// Set the speed multiplier (1, 2 or 3). Takes effect next tick.
    pub fn set_game_speed(&mut self, speed: u8) -> bool {
        let Ok(speed) = GameSpeed::try_from(speed) else {
            return false;
        };
        self.state.set_game_speed(speed);
        self.notify();
        true
    }

    // --- Queries ---

    /// Immutable copy of the current state.
    pub fn get_state(&self) -> GameStateSnapshot {
        self.build_snapshot(self.events.clone())
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase()
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn paths(&self) -> &BuiltPaths {
        &self.paths
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn enemies(&self) -> &EnemySystem {
        &self.enemies
    }

    pub fn towers(&self) -> &TowerSystem {
        &self.towers
    }

    pub fn projectiles(&self) -> &ProjectileSystem {
        &self.projectiles
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    // --- Frame ---

    /// Advance by one frame of `dt` real seconds and return the snapshot.
    ///
    /// Queued commands run first. `dt` is clamped to `[0, max_frame_dt]` and
    /// then multiplied by the game speed for every system. A finished or
    /// destroyed session does not simulate.
    pub fn tick(&mut self, dt: f32) -> GameStateSnapshot {
        self.process_commands();

        if self.destroyed || self.state.is_over() {
            return self.take_snapshot();
        }

        let dt = if dt.is_finite() {
            dt.clamp(0.0, self.max_frame_dt)
        } else {
            0.0
        };
        if self.state.phase() == GamePhase::WaveActive {
            self.run_systems(dt);
        }

        let snapshot = self.take_snapshot();
        self.observer.on_state_update(&snapshot);
        snapshot
    }

    /// Release every entity and its visual. Safe to call more than once.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        let scene = self.scene.as_mut();
        self.enemies.clear(&mut self.world, scene);
        self.towers.clear(&mut self.world, scene);
        self.projectiles.clear(&mut self.world, scene);
        self.world.clear();
        self.command_queue.clear();
        self.destroyed = true;
        info!(map = %self.config.map.id, "session destroyed");
    }

    /// Enemy -> Tower -> Projectile -> reconciliation.
    fn run_systems(&mut self, dt: f32) {
        let speed = self.state.game_speed().multiplier();
        let step = dt * speed;
        self.time.advance(step);

        let report = self
            .enemies
            .update(&mut self.world, self.scene.as_mut(), dt, speed);
        for (enemy_id, enemy_type) in report.spawned {
            debug!(enemy = %enemy_id, %enemy_type, "enemy entered the board");
            self.events.push(GameEvent::EnemySpawned {
                enemy_id,
                enemy_type,
            });
        }

        // A breach that ends the session pre-empts everything else this tick.
        for enemy in &report.reached {
            let lost = self.state.lose_life();
            self.events.push(GameEvent::EnemyReachedPen {
                enemy_id: enemy.id,
                lives_left: self.state.lives(),
            });
            if lost {
                self.finish(false);
                return;
            }
        }
        self.credit_kills(report.killed);

        let live = self.enemies.positions(&self.world);
        let shots = self.towers.update(&mut self.world, step, &live);
        for shot in shots {
            self.projectiles.fire(
                &mut self.world,
                self.scene.as_mut(),
                shot.origin,
                shot.target_id,
                shot.payload,
                &shot.color,
            );
            self.events.push(GameEvent::TowerFired {
                tower_id: shot.tower_id,
                target_id: shot.target_id,
            });
        }

        let live: HashMap<EnemyId, WorldPos> = live.into_iter().collect();
        let hits = self
            .projectiles
            .update(&mut self.world, self.scene.as_mut(), step, &live);
        let kills = damage::resolve_hits(
            &mut self.world,
            self.scene.as_mut(),
            &mut self.enemies,
            &mut self.rng,
            &hits,
        );
        self.credit_kills(kills);

        if !self.enemies.has_enemies_or_queue() {
            self.projectiles.clear(&mut self.world, self.scene.as_mut());
            self.state.wave_complete();
            let wave = self.state.wave();
            self.events.push(GameEvent::WaveComplete { wave });
            if self.state.phase() == GamePhase::Won {
                self.finish(true);
            } else {
                info!(wave, money = self.state.money(), lives = self.state.lives(), "wave complete");
                self.observer.on_wave_complete(wave);
            }
        }
    }

    fn credit_kills(&mut self, kills: Vec<RemovedEnemy>) {
        for enemy in kills {
            self.state.add_money(enemy.kind.reward);
            self.events.push(GameEvent::EnemyKilled {
                enemy_id: enemy.id,
                reward: enemy.kind.reward,
            });
        }
    }

    /// Enter a terminal phase. Called exactly once per session.
    fn finish(&mut self, won: bool) {
        let stars = self.state.stars();
        info!(
            won,
            wave = self.state.wave(),
            lives = self.state.lives(),
            score = self.state.score(),
            stars,
            "game over"
        );
        self.events.push(GameEvent::GameOver { won, stars });
        self.observer.on_game_over(won);
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single player command.
    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::StartWave => {
                self.start_wave();
            }
            PlayerCommand::PlaceTower {
                tower_type,
                grid_x,
                grid_y,
            } => {
                self.try_place_tower(&tower_type, grid_x, grid_y);
            }
            PlayerCommand::UpgradeTower { tower_id } => {
                self.try_upgrade_tower(tower_id);
            }
            PlayerCommand::SellTower { tower_id } => {
                self.sell_tower(tower_id);
            }
            PlayerCommand::SetGameSpeed { speed } => {
                self.set_game_speed(speed);
            }
        }
    }

    fn notify(&mut self) {
        let snapshot = self.build_snapshot(self.events.clone());
        self.observer.on_state_update(&snapshot);
    }

    fn take_snapshot(&mut self) -> GameStateSnapshot {
        let events = std::mem::take(&mut self.events);
        self.build_snapshot(events)
    }

    fn build_snapshot(&self, events: Vec<GameEvent>) -> GameStateSnapshot {
        systems::snapshot::build_snapshot(
            &self.world,
            &self.time,
            &self.state,
            &self.enemies,
            &self.towers,
            &self.projectiles,
            events,
        )
    }
}
