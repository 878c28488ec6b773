//! Turning host options into a session configuration.

use std::str::FromStr;

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use penguard_core::catalog::{map_presets, Catalog};
use penguard_core::commands::PlayerCommand;
use penguard_core::enums::Theme;
use penguard_core::map::MapDefinition;
use penguard_core::pack::PackExport;
use penguard_sim::{GameConfig, SimConfig};

/// A tower to buy before the first wave, written `<type>@<x>,<y>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TowerPlacement {
    pub tower_type: String,
    pub grid_x: i32,
    pub grid_y: i32,
}

impl TowerPlacement {
    pub fn command(&self) -> PlayerCommand {
        PlayerCommand::PlaceTower {
            tower_type: self.tower_type.clone(),
            grid_x: self.grid_x,
            grid_y: self.grid_y,
        }
    }
}

impl FromStr for TowerPlacement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (tower_type, cell) = s
            .split_once('@')
            .ok_or_else(|| format!("expected <type>@<x>,<y>, got '{s}'"))?;
        let (x, y) = cell
            .split_once(',')
            .ok_or_else(|| format!("expected <x>,<y> after '@', got '{cell}'"))?;
        if tower_type.is_empty() {
            return Err("tower type is empty".into());
        }
        Ok(Self {
            tower_type: tower_type.to_string(),
            grid_x: x.trim().parse().map_err(|e| format!("bad x '{x}': {e}"))?,
            grid_y: y.trim().parse().map_err(|e| format!("bad y '{y}': {e}"))?,
        })
    }
}

/// What the host knows before a session exists.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub theme: Theme,
    pub slot: u8,
    /// Raw map JSON; overrides the pack and the blank preset board.
    pub map_json: Option<String>,
    pub waves: Option<u32>,
    pub seed: u64,
    pub hp_scaling: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            theme: Theme::Hockey,
            slot: 1,
            map_json: None,
            waves: None,
            seed: SimConfig::default().seed,
            hp_scaling: false,
        }
    }
}

pub struct Session {
    pub game: GameConfig,
    pub sim: SimConfig,
}

impl Session {
    pub fn map_id(&self) -> &str {
        &self.game.map.id
    }
}

/// Pick the map (explicit JSON, then the pack's slot, then a blank board
/// of the preset's size) and apply the slot's preset economy.
pub fn build_session(options: &SessionOptions, pack: &PackExport) -> Result<Session> {
    let map = match &options.map_json {
        Some(json) => MapDefinition::from_json(json).context("failed to load map")?,
        None => match pack.map_for_slot(options.theme, options.slot) {
            Some(map) => map.clone(),
            None => blank_preset_map(options.theme, options.slot)?,
        },
    };

    let theme = map.theme;
    if theme != options.theme {
        warn!(requested = %options.theme.as_str(), map = %theme.as_str(), "map theme overrides requested theme");
    }

    let mut game = GameConfig::new(theme, Catalog::for_theme(theme), map);
    match map_presets(theme).into_iter().find(|p| p.slot == game.map.slot) {
        Some(preset) => game = game.with_preset(&preset),
        None => warn!(slot = game.map.slot, "no preset for map slot, using defaults"),
    }
    if let Some(waves) = options.waves {
        if waves == 0 {
            bail!("wave count must be at least 1");
        }
        game = game.with_total_waves(waves);
    }

    let sim = SimConfig {
        seed: options.seed,
        apply_wave_hp_scaling: options.hp_scaling,
        ..SimConfig::default()
    };

    info!(
        map = %game.map.id,
        theme = theme.as_str(),
        waves = game.total_waves(),
        money = game.start_money,
        lives = game.start_lives,
        "session configured"
    );
    Ok(Session { game, sim })
}

/// A board with no path nodes; the pathing engine lays fallback lanes.
fn blank_preset_map(theme: Theme, slot: u8) -> Result<MapDefinition> {
    let Some(preset) = map_presets(theme).into_iter().find(|p| p.slot == slot) else {
        bail!("no built-in map in slot {slot}");
    };
    let mut map = MapDefinition::blank(preset.id.clone(), theme, preset.cols, preset.rows);
    map.name = preset.name.clone();
    map.slot = slot;
    Ok(map)
}
