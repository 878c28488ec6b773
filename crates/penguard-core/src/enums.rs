//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Game phase (top-level state machine position).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GamePhase {
    /// Between waves: towers may be placed, the next wave may be started.
    #[default]
    Placing,
    /// Enemies are spawning and walking.
    WaveActive,
    /// Every wave cleared. Terminal.
    Won,
    /// Lives ran out. Terminal.
    Lost,
}

impl GamePhase {
    /// Whether the phase is terminal (`Won` or `Lost`).
    pub fn is_over(self) -> bool {
        matches!(self, GamePhase::Won | GamePhase::Lost)
    }
}

/// Simulation speed multiplier. Serialized as the bare number 1, 2 or 3.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum GameSpeed {
    #[default]
    Normal,
    Double,
    Triple,
}

impl GameSpeed {
    pub fn multiplier(self) -> f32 {
        match self {
            GameSpeed::Normal => 1.0,
            GameSpeed::Double => 2.0,
            GameSpeed::Triple => 3.0,
        }
    }
}

impl TryFrom<u8> for GameSpeed {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(GameSpeed::Normal),
            2 => Ok(GameSpeed::Double),
            3 => Ok(GameSpeed::Triple),
            other => Err(format!("game speed must be 1, 2 or 3, got {other}")),
        }
    }
}

impl From<GameSpeed> for u8 {
    fn from(speed: GameSpeed) -> Self {
        match speed {
            GameSpeed::Normal => 1,
            GameSpeed::Double => 2,
            GameSpeed::Triple => 3,
        }
    }
}

/// Visual theme; selects the tower and enemy catalogs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Theme {
    #[default]
    Hockey,
    Soccer,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Hockey => "hockey",
            Theme::Soccer => "soccer",
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hockey" => Ok(Theme::Hockey),
            "soccer" => Ok(Theme::Soccer),
            other => Err(format!("unknown theme '{other}'")),
        }
    }
}

/// How a map's path nodes are turned into lanes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PathingType {
    /// One globally ordered lane.
    #[default]
    Linear,
    /// One lane per `pathId`.
    Multipath,
}

/// Lane selection hint carried by maps. Dispatch is always round-robin by
/// enemy-type index; the other values are accepted and preserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PathPick {
    Random,
    RoundRobin,
    Weighted,
}

/// What a visual handle stands for on the rendering side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VisualKind {
    Tower,
    Enemy,
    Projectile,
}
