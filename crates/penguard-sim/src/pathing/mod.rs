//! Pathing engine: turns a map's path nodes into ordered world-space lanes.
//!
//! Two variants exist, selected by the map's pathing type. Both degrade to
//! procedurally generated lanes when the map carries too few path nodes.

mod linear;
mod multipath;

use std::sync::Arc;

use rand_chacha::ChaCha8Rng;

use penguard_core::constants::{CELL_SIZE, MAX_GRID_DIM};
use penguard_core::enums::PathingType;
use penguard_core::map::MapDefinition;
use penguard_core::types::{BuiltPath, GridPoint, WorldPos};

pub use linear::LinearPathing;
pub use multipath::MultipathPathing;

/// Lanes built for one session. Shared with every enemy walking them.
#[derive(Debug, Clone, Default)]
pub struct BuiltPaths {
    pub main_paths: Vec<Arc<BuiltPath>>,
}

impl BuiltPaths {
    pub fn is_empty(&self) -> bool {
        self.main_paths.is_empty()
    }

    pub fn len(&self) -> usize {
        self.main_paths.len()
    }

    /// Lane used for the `index`-th dispatched group (round-robin).
    pub fn round_robin(&self, index: usize) -> Option<&Arc<BuiltPath>> {
        if self.main_paths.is_empty() {
            None
        } else {
            self.main_paths.get(index % self.main_paths.len())
        }
    }
}

/// Strategy that builds lanes for a map.
///
/// Randomness (fallback lanes) comes from the session RNG so the same seed
/// always yields the same lanes.
pub trait PathingEngine {
    fn build(&self, map: &MapDefinition, rng: &mut ChaCha8Rng) -> BuiltPaths;
}

/// Build lanes with the engine matching the map's pathing type.
pub fn build_paths(map: &MapDefinition, rng: &mut ChaCha8Rng) -> BuiltPaths {
    match map.pathing.kind {
        PathingType::Linear => LinearPathing.build(map, rng),
        PathingType::Multipath => MultipathPathing.build(map, rng),
    }
}

/// Center of a grid cell in world space. The board is centered on the origin.
pub fn grid_to_world(point: GridPoint, cols: u32, rows: u32) -> WorldPos {
    let offset_x = cols as f32 * CELL_SIZE / 2.0;
    let offset_z = rows as f32 * CELL_SIZE / 2.0;
    WorldPos::new(
        point.x as f32 * CELL_SIZE - offset_x + CELL_SIZE / 2.0,
        0.0,
        point.y as f32 * CELL_SIZE - offset_z + CELL_SIZE / 2.0,
    )
}

/// Grid cell containing a world position, or `None` off the board.
pub fn world_to_grid(pos: WorldPos, cols: u32, rows: u32) -> Option<GridPoint> {
    let offset_x = cols as f32 * CELL_SIZE / 2.0;
    let offset_z = rows as f32 * CELL_SIZE / 2.0;
    let x = ((pos.x + offset_x) / CELL_SIZE).floor();
    let y = ((pos.z + offset_z) / CELL_SIZE).floor();
    if x < 0.0 || y < 0.0 || x >= cols as f32 || y >= rows as f32 {
        return None;
    }
    Some(GridPoint::new(x as i32, y as i32))
}

/// Number of columns a generated lane walks. Never fewer than two so a
/// fallback lane always has a start and an end, never more than
/// `MAX_GRID_DIM`.
pub(crate) fn fallback_columns(cols: u32) -> i32 {
    grid_index(u64::from(cols.clamp(2, MAX_GRID_DIM)))
}

/// Grid coordinate for a cell count, saturating instead of wrapping.
pub(crate) fn grid_index(n: u64) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

/// Straight lane along one row.
pub(crate) fn straight_lane(id: &str, row: i32, cols: u32, rows: u32) -> BuiltPath {
    BuiltPath {
        id: id.to_owned(),
        waypoints: (0..fallback_columns(cols))
            .map(|col| grid_to_world(GridPoint::new(col, row), cols, rows))
            .collect(),
    }
}

/// Waypoints for the given nodes, sorted by order. The sort is stable so
/// equal orders keep declaration order.
pub(crate) fn ordered_waypoints(
    mut nodes: Vec<(GridPoint, f64)>,
    cols: u32,
    rows: u32,
) -> Vec<WorldPos> {
    nodes.sort_by(|a, b| a.1.total_cmp(&b.1));
    nodes
        .into_iter()
        .map(|(point, _)| grid_to_world(point, cols, rows))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_to_world_centers_cells() {
        let p = grid_to_world(GridPoint::new(0, 5), 11, 11);
        assert_eq!(p, WorldPos::new(-5.0, 0.0, 0.0));
        let p = grid_to_world(GridPoint::new(10, 5), 11, 11);
        assert_eq!(p, WorldPos::new(5.0, 0.0, 0.0));
        let p = grid_to_world(GridPoint::new(0, 0), 4, 2);
        assert_eq!(p, WorldPos::new(-1.5, 0.0, -0.5));
    }

    #[test]
    fn world_to_grid_inverts_grid_to_world() {
        for (x, y) in [(0, 0), (3, 1), (7, 9), (10, 10)] {
            let point = GridPoint::new(x, y);
            assert_eq!(world_to_grid(grid_to_world(point, 11, 11), 11, 11), Some(point));
        }
    }

    #[test]
    fn world_to_grid_rejects_off_board() {
        assert_eq!(world_to_grid(WorldPos::new(-6.0, 0.0, 0.0), 11, 11), None);
        assert_eq!(world_to_grid(WorldPos::new(0.0, 0.0, 5.5), 11, 11), None);
    }

    #[test]
    fn round_robin_wraps() {
        let lane = |id: &str| Arc::new(straight_lane(id, 0, 3, 3));
        let paths = BuiltPaths {
            main_paths: vec![lane("A"), lane("B")],
        };
        assert_eq!(paths.round_robin(0).unwrap().id, "A");
        assert_eq!(paths.round_robin(3).unwrap().id, "B");
        assert!(BuiltPaths::default().round_robin(0).is_none());
    }
}
