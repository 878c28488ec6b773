//! Fundamental geometric and simulation types.

use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// World-space position. x = columns, z = rows, y = height above the board.
pub type WorldPos = Vec3;

/// Integer cell coordinate on a map grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPoint {
    pub x: i32,
    pub y: i32,
}

impl GridPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "_{}"), self.0)
            }
        }
    };
}

id_type!(
    /// Unique per spawned enemy within a session. Allocated in spawn order.
    EnemyId,
    "enemy"
);
id_type!(
    /// Unique per placed tower within a session.
    TowerId,
    "tower"
);
id_type!(
    /// Unique per fired projectile within a session.
    ProjectileId,
    "proj"
);

/// Opaque handle to a visual owned by the rendering collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VisualHandle(pub u64);

/// An ordered sequence of world positions enemies walk along.
///
/// Always holds at least two waypoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuiltPath {
    pub id: String,
    pub waypoints: Vec<WorldPos>,
}

impl BuiltPath {
    /// Total polyline length in world units.
    pub fn length(&self) -> f32 {
        self.waypoints
            .windows(2)
            .map(|pair| pair[0].distance(pair[1]))
            .sum()
    }
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTime {
    /// Number of simulated ticks.
    pub tick: u64,
    /// Elapsed simulation time in seconds (after game-speed scaling).
    pub elapsed_secs: f64,
}

impl SimTime {
    /// Advance by one tick of `dt` simulated seconds.
    pub fn advance(&mut self, dt: f32) {
        self.tick += 1;
        self.elapsed_secs += f64::from(dt);
    }
}
