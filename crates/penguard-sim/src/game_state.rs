//! Session state: phase, wave counter and the economy ledger.
//!
//! All mutation goes through the methods here so money can never go
//! negative and the phase machine only moves along legal edges.

use std::sync::Arc;

use penguard_core::catalog::{Catalog, MapPreset};
use penguard_core::constants::{DEFAULT_START_LIVES, DEFAULT_START_MONEY, DEFAULT_TOTAL_WAVES};
use penguard_core::enums::{GamePhase, GameSpeed, Theme};
use penguard_core::map::MapDefinition;

use crate::economy::calculate_stars;
use crate::waves::{self, WaveComposition};

/// Everything a session is built from. Immutable once the session starts.
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub theme: Theme,
    pub catalog: Arc<Catalog>,
    pub map: MapDefinition,
    /// One composition per wave; its length is the wave count.
    pub waves: Vec<WaveComposition>,
    pub start_money: u32,
    pub start_lives: u32,
}

impl GameConfig {
    pub fn new(theme: Theme, catalog: Catalog, map: MapDefinition) -> Self {
        let waves = waves::generate(DEFAULT_TOTAL_WAVES, &catalog.enemies);
        Self {
            theme,
            catalog: Arc::new(catalog),
            map,
            waves,
            start_money: DEFAULT_START_MONEY,
            start_lives: DEFAULT_START_LIVES,
        }
    }

    /// Regenerate compositions for a different wave count.
    pub fn with_total_waves(mut self, total_waves: u32) -> Self {
        self.waves = waves::generate(total_waves, &self.catalog.enemies);
        self
    }

    /// Take wave count, money and lives from a built-in map preset.
    pub fn with_preset(self, preset: &MapPreset) -> Self {
        let mut config = self.with_total_waves(preset.waves);
        config.start_money = preset.start_money;
        config.start_lives = preset.lives;
        config
    }

    pub fn with_waves(mut self, waves: Vec<WaveComposition>) -> Self {
        self.waves = waves;
        self
    }

    pub fn with_start_money(mut self, money: u32) -> Self {
        self.start_money = money;
        self
    }

    pub fn with_start_lives(mut self, lives: u32) -> Self {
        self.start_lives = lives;
        self
    }

    pub fn total_waves(&self) -> u32 {
        self.waves.len() as u32
    }
}

/// Mutable per-session counters.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    phase: GamePhase,
    wave: u32,
    money: u32,
    lives: u32,
    score: u32,
    game_speed: GameSpeed,
    start_lives: u32,
    total_waves: u32,
}

impl GameState {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            phase: GamePhase::Placing,
            wave: 0,
            money: config.start_money,
            lives: config.start_lives,
            score: 0,
            game_speed: GameSpeed::Normal,
            start_lives: config.start_lives,
            total_waves: config.total_waves(),
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn wave(&self) -> u32 {
        self.wave
    }

    pub fn money(&self) -> u32 {
        self.money
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn game_speed(&self) -> GameSpeed {
        self.game_speed
    }

    pub fn start_lives(&self) -> u32 {
        self.start_lives
    }

    pub fn total_waves(&self) -> u32 {
        self.total_waves
    }

    pub fn is_over(&self) -> bool {
        self.phase.is_over()
    }

    /// Stars the session is worth so far; a lost session earns none.
    pub fn stars(&self) -> u8 {
        if self.phase == GamePhase::Lost {
            return 0;
        }
        calculate_stars(self.lives, self.start_lives)
    }

    /// Deduct `amount` if affordable. Leaves money untouched otherwise.
    pub fn spend_money(&mut self, amount: u32) -> bool {
        match self.money.checked_sub(amount) {
            Some(rest) => {
                self.money = rest;
                true
            }
            None => false,
        }
    }

    /// Credit a kill reward. Rewards count toward the score too.
    pub fn add_money(&mut self, amount: u32) {
        self.money = self.money.saturating_add(amount);
        self.score = self.score.saturating_add(amount);
    }

    /// Credit a sale. Refunds do not score.
    pub fn refund(&mut self, amount: u32) {
        self.money = self.money.saturating_add(amount);
    }

    /// Remove one life. Returns `true` when this call ended the session.
    pub fn lose_life(&mut self) -> bool {
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            self.phase = GamePhase::Lost;
            return true;
        }
        false
    }

    /// `Placing -> WaveActive`. Returns `false` from any other phase.
    pub fn start_wave(&mut self) -> bool {
        if self.phase != GamePhase::Placing {
            return false;
        }
        self.wave += 1;
        self.phase = GamePhase::WaveActive;
        true
    }

    /// `WaveActive -> Won` after the last wave, `-> Placing` otherwise.
    pub fn wave_complete(&mut self) {
        if self.phase != GamePhase::WaveActive {
            return;
        }
        self.phase = if self.wave >= self.total_waves {
            GamePhase::Won
        } else {
            GamePhase::Placing
        };
    }

    pub fn set_game_speed(&mut self, speed: GameSpeed) {
        self.game_speed = speed;
    }
}
