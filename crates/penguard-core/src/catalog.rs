//! Static tower, enemy and map-preset catalogs.
//!
//! Catalogs are immutable configuration handed to a session at
//! construction time. Nothing here is global mutable state.

use serde::{Deserialize, Serialize};

use crate::enums::Theme;

/// Static enemy template shared by all of its spawned instances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemyType {
    pub id: String,
    pub name: String,
    pub hp: f32,
    /// World units per second.
    pub speed: f32,
    pub reward: u32,
    pub size: f32,
    /// Fraction of incoming damage absorbed (0.0 - 1.0).
    #[serde(default)]
    pub armor: Option<f32>,
    #[serde(default)]
    pub fire: bool,
    #[serde(default)]
    pub flying: bool,
    #[serde(default)]
    pub boss: bool,
}

/// Static tower template. Per-level arrays are indexed by upgrade level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TowerType {
    pub id: String,
    pub name: String,
    pub cost: u32,
    pub color: String,
    pub damage: Vec<f32>,
    pub range: Vec<f32>,
    /// Shots per second.
    pub fire_rate: Vec<f32>,
    pub upgrade_costs: Vec<u32>,
    pub projectile: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub splash: Option<Vec<f32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slow_power: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slow_duration: Option<Vec<f32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub burn_damage: Option<Vec<f32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub burn_duration: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_targets: Option<Vec<u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_range: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crit_chance: Option<f32>,
}

impl TowerType {
    /// Highest reachable level (`upgrade_costs.len()`).
    pub fn max_level(&self) -> usize {
        self.upgrade_costs.len()
    }

    pub fn damage_at(&self, level: usize) -> f32 {
        level_value(&self.damage, level)
    }

    pub fn range_at(&self, level: usize) -> f32 {
        level_value(&self.range, level)
    }

    pub fn fire_rate_at(&self, level: usize) -> f32 {
        level_value(&self.fire_rate, level)
    }

    /// Cost of going from `level` to `level + 1`, if any.
    pub fn upgrade_cost_at(&self, level: usize) -> Option<u32> {
        self.upgrade_costs.get(level).copied()
    }
}

/// Per-level lookup that clamps to the last entry for short tables.
pub fn level_value<T: Copy + Default>(table: &[T], level: usize) -> T {
    table
        .get(level)
        .or_else(|| table.last())
        .copied()
        .unwrap_or_default()
}

/// Per-map session parameters for the built-in slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapPreset {
    pub id: String,
    pub name: String,
    pub slot: u8,
    pub cols: u32,
    pub rows: u32,
    pub waves: u32,
    pub start_money: u32,
    pub lives: u32,
    pub difficulty: u8,
}

/// Tower and enemy tables for one theme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub towers: Vec<TowerType>,
    pub enemies: Vec<EnemyType>,
}

impl Catalog {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Hockey => Self::hockey(),
            Theme::Soccer => Self::soccer(),
        }
    }

    pub fn tower(&self, id: &str) -> Option<&TowerType> {
        self.towers.iter().find(|t| t.id == id)
    }

    pub fn enemy(&self, id: &str) -> Option<&EnemyType> {
        self.enemies.iter().find(|e| e.id == id)
    }

    pub fn hockey() -> Self {
        Self {
            towers: vec![
                tower("t1", "Slap Shot", 80, "#00d4ff", "puck")
                    .levels([25.0, 40.0, 60.0, 90.0], [2.8, 3.2, 3.6, 4.1], [1.2, 1.4, 1.7, 2.0])
                    .upgrades([60, 100, 170]),
                tower("t2", "Sniper", 150, "#ef4444", "dart")
                    .levels([70.0, 110.0, 165.0, 250.0], [4.5, 5.0, 5.6, 6.2], [0.5, 0.6, 0.72, 0.85])
                    .upgrades([110, 190, 320]),
                TowerType {
                    splash: Some(vec![1.2, 1.5, 1.8, 2.2]),
                    ..tower("t3", "Enforcer", 120, "#f97316", "hammer")
                        .levels([45.0, 70.0, 105.0, 160.0], [2.5, 2.9, 3.3, 3.8], [0.55, 0.65, 0.78, 0.92])
                        .upgrades([90, 155, 260])
                },
                TowerType {
                    slow_power: Some(0.5),
                    slow_duration: Some(vec![2.0, 2.5, 3.2, 4.0]),
                    ..tower("t4", "Ice Spray", 90, "#38bdf8", "shard")
                        .levels([18.0, 28.0, 42.0, 60.0], [3.0, 3.4, 3.8, 4.3], [1.3, 1.55, 1.8, 2.1])
                        .upgrades([65, 115, 190])
                },
                tower("t5", "Goalie", 200, "#ffd700", "glove")
                    .levels([100.0, 155.0, 230.0, 350.0], [2.0, 2.4, 2.8, 3.2], [0.7, 0.85, 1.0, 1.2])
                    .upgrades([140, 250, 420]),
                TowerType {
                    chain_targets: Some(vec![2, 3, 4, 6]),
                    chain_range: Some(2.2),
                    ..tower("t6", "Power Play", 160, "#a855f7", "lightning")
                        .levels([35.0, 55.0, 82.0, 125.0], [3.5, 4.0, 4.5, 5.1], [0.85, 1.0, 1.15, 1.35])
                        .upgrades([120, 200, 340])
                },
                TowerType {
                    burn_damage: Some(vec![10.0, 16.0, 24.0, 35.0]),
                    burn_duration: Some(3.0),
                    ..tower("t7", "Hot Stick", 140, "#f97316", "fireball")
                        .levels([15.0, 24.0, 36.0, 52.0], [2.6, 3.0, 3.4, 3.9], [3.5, 4.2, 5.0, 6.0])
                        .upgrades([100, 175, 290])
                },
                TowerType {
                    crit_chance: Some(0.4),
                    ..tower("t8", "Captain", 280, "#fbbf24", "star")
                        .levels([200.0, 320.0, 480.0, 720.0], [5.5, 6.1, 6.8, 7.5], [0.2, 0.26, 0.33, 0.42])
                        .upgrades([200, 360, 600])
                },
            ],
            enemies: vec![
                enemy("e1", "Puck", 50.0, 2.4, 10, 1.0),
                EnemyType { fire: true, ..enemy("e2", "Hot Puck", 70.0, 2.0, 15, 1.0) },
                EnemyType { flying: true, ..enemy("e3", "Flying Puck", 45.0, 2.8, 12, 0.9) },
                EnemyType { armor: Some(0.4), ..enemy("e4", "Heavy Puck", 250.0, 0.7, 35, 1.4) },
                EnemyType {
                    fire: true,
                    armor: Some(0.3),
                    ..enemy("e5", "Inferno Puck", 400.0, 0.55, 55, 1.5)
                },
                EnemyType {
                    flying: true,
                    fire: true,
                    ..enemy("e6", "Flying Fire", 120.0, 2.2, 25, 1.0)
                },
                EnemyType {
                    armor: Some(0.35),
                    boss: true,
                    ..enemy("e7", "Boss Puck", 2500.0, 0.35, 350, 2.2)
                },
            ],
        }
    }

    pub fn soccer() -> Self {
        Self {
            towers: vec![
                tower("t1", "Striker", 80, "#22c55e", "ball")
                    .levels([28.0, 44.0, 66.0, 100.0], [2.6, 3.0, 3.4, 3.9], [1.15, 1.35, 1.6, 1.9])
                    .upgrades([60, 100, 170]),
                tower("t2", "Free Kick", 150, "#fbbf24", "curveBall")
                    .levels([75.0, 118.0, 175.0, 265.0], [4.8, 5.3, 5.9, 6.5], [0.48, 0.58, 0.7, 0.84])
                    .upgrades([110, 190, 320]),
                TowerType {
                    splash: Some(vec![1.3, 1.6, 2.0, 2.4]),
                    ..tower("t3", "Header", 120, "#3b82f6", "headButt")
                        .levels([50.0, 78.0, 118.0, 178.0], [2.8, 3.2, 3.6, 4.1], [0.5, 0.6, 0.72, 0.86])
                        .upgrades([90, 155, 260])
                },
                TowerType {
                    slow_power: Some(0.5),
                    slow_duration: Some(vec![1.8, 2.4, 3.0, 3.8]),
                    ..tower("t4", "Tackle", 90, "#f97316", "tackle")
                        .levels([20.0, 32.0, 48.0, 70.0], [2.8, 3.2, 3.6, 4.1], [1.25, 1.48, 1.72, 2.0])
                        .upgrades([65, 115, 190])
                },
                tower("t5", "Keeper", 200, "#a855f7", "glove")
                    .levels([110.0, 170.0, 255.0, 385.0], [1.8, 2.2, 2.6, 3.0], [0.75, 0.9, 1.05, 1.25])
                    .upgrades([140, 250, 420]),
                TowerType {
                    chain_targets: Some(vec![2, 3, 5, 7]),
                    chain_range: Some(2.5),
                    ..tower("t6", "Playmaker", 160, "#06b6d4", "chain")
                        .levels([38.0, 60.0, 90.0, 135.0], [3.8, 4.3, 4.9, 5.5], [0.82, 0.96, 1.12, 1.3])
                        .upgrades([120, 200, 340])
                },
                TowerType {
                    burn_damage: Some(vec![12.0, 18.0, 28.0, 40.0]),
                    burn_duration: Some(3.5),
                    ..tower("t7", "Flare", 140, "#ef4444", "flare")
                        .levels([16.0, 26.0, 40.0, 58.0], [2.4, 2.8, 3.2, 3.7], [3.2, 3.9, 4.7, 5.6])
                        .upgrades([100, 175, 290])
                },
                TowerType {
                    crit_chance: Some(0.45),
                    ..tower("t8", "Legend", 280, "#fbbf24", "legend")
                        .levels([220.0, 350.0, 525.0, 790.0], [5.2, 5.8, 6.5, 7.2], [0.18, 0.24, 0.31, 0.4])
                        .upgrades([200, 360, 600])
                },
            ],
            enemies: vec![
                enemy("e1", "Ball", 45.0, 2.5, 10, 1.0),
                EnemyType { fire: true, ..enemy("e2", "Fire Ball", 65.0, 2.1, 15, 1.0) },
                EnemyType { flying: true, ..enemy("e3", "Flying Ball", 40.0, 3.0, 12, 0.9) },
                EnemyType { armor: Some(0.45), ..enemy("e4", "Heavy Ball", 280.0, 0.65, 35, 1.4) },
                EnemyType {
                    fire: true,
                    armor: Some(0.35),
                    ..enemy("e5", "Inferno Ball", 450.0, 0.5, 55, 1.5)
                },
                EnemyType {
                    flying: true,
                    fire: true,
                    ..enemy("e6", "Flying Fire", 130.0, 2.3, 25, 1.0)
                },
                EnemyType {
                    armor: Some(0.38),
                    boss: true,
                    ..enemy("e7", "Boss Ball", 2800.0, 0.32, 400, 2.2)
                },
            ],
        }
    }
}

/// Built-in map presets (slot 1..=10) for a theme.
pub fn map_presets(theme: Theme) -> Vec<MapPreset> {
    let names: [&str; 10] = match theme {
        Theme::Hockey => [
            "Practice Rink",
            "Local Arena",
            "College Ice",
            "Pro Stadium",
            "Stanley Cup",
            "Frozen Lake",
            "Winter Classic",
            "World Championships",
            "All-Star Arena",
            "Hall of Fame",
        ],
        Theme::Soccer => [
            "Backyard",
            "School Field",
            "Club Ground",
            "Premier League",
            "World Cup",
            "Street Pitch",
            "Beach Field",
            "Champions League",
            "Olympic Stadium",
            "Legendary Final",
        ],
    };
    const WAVES: [u32; 10] = [15, 20, 25, 30, 40, 45, 50, 55, 60, 65];
    const MONEY: [u32; 10] = [650, 700, 750, 850, 1000, 1200, 1300, 1400, 1500, 1600];
    const LIVES: [u32; 10] = [20, 18, 15, 12, 10, 8, 7, 6, 5, 4];

    names
        .iter()
        .enumerate()
        .map(|(i, name)| MapPreset {
            id: format!("map{}", i + 1),
            name: (*name).to_owned(),
            slot: i as u8 + 1,
            cols: 18 + 2 * i as u32,
            rows: 11 + i as u32,
            waves: WAVES[i],
            start_money: MONEY[i],
            lives: LIVES[i],
            difficulty: i as u8 + 1,
        })
        .collect()
}

fn tower(id: &str, name: &str, cost: u32, color: &str, projectile: &str) -> TowerType {
    TowerType {
        id: id.to_owned(),
        name: name.to_owned(),
        cost,
        color: color.to_owned(),
        damage: Vec::new(),
        range: Vec::new(),
        fire_rate: Vec::new(),
        upgrade_costs: Vec::new(),
        projectile: projectile.to_owned(),
        splash: None,
        slow_power: None,
        slow_duration: None,
        burn_damage: None,
        burn_duration: None,
        chain_targets: None,
        chain_range: None,
        crit_chance: None,
    }
}

impl TowerType {
    fn levels(mut self, damage: [f32; 4], range: [f32; 4], fire_rate: [f32; 4]) -> Self {
        self.damage = damage.to_vec();
        self.range = range.to_vec();
        self.fire_rate = fire_rate.to_vec();
        self
    }

    fn upgrades(mut self, costs: [u32; 3]) -> Self {
        self.upgrade_costs = costs.to_vec();
        self
    }
}

fn enemy(id: &str, name: &str, hp: f32, speed: f32, reward: u32, size: f32) -> EnemyType {
    EnemyType {
        id: id.to_owned(),
        name: name.to_owned(),
        hp,
        speed,
        reward,
        size,
        armor: None,
        fire: false,
        flying: false,
        boss: false,
    }
}
