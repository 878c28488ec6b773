use std::sync::Arc;

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::warn;

use penguard_core::map::MapDefinition;
use penguard_core::types::{BuiltPath, GridPoint};

use super::{fallback_columns, grid_index, grid_to_world, ordered_waypoints, BuiltPaths, PathingEngine};

/// Single lane through every path node in ascending order.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearPathing;

impl PathingEngine for LinearPathing {
    fn build(&self, map: &MapDefinition, rng: &mut ChaCha8Rng) -> BuiltPaths {
        let nodes: Vec<(GridPoint, f64)> = map
            .path_nodes()
            .filter_map(|e| e.path_node().map(|(_, order)| (e.grid(), order)))
            .collect();

        let path = if nodes.len() >= 2 {
            BuiltPath {
                id: "main".into(),
                waypoints: ordered_waypoints(nodes, map.cols, map.rows),
            }
        } else {
            warn!(map = %map.id, nodes = nodes.len(), "too few path nodes, generating lane");
            wandering_lane(map.cols, map.rows, rng)
        };

        BuiltPaths {
            main_paths: vec![Arc::new(path)],
        }
    }
}

/// Left-to-right lane starting on the middle row, drifting at most one row
/// per column and never leaving the board.
fn wandering_lane(cols: u32, rows: u32, rng: &mut ChaCha8Rng) -> BuiltPath {
    let last_row = grid_index(u64::from(rows.saturating_sub(1)));
    let columns = fallback_columns(cols);
    let mut row = grid_index(u64::from(rows / 2));
    let mut waypoints = Vec::with_capacity(columns.unsigned_abs() as usize);

    for col in 0..columns {
        waypoints.push(grid_to_world(GridPoint::new(col, row), cols, rows));
        if col < columns - 1 {
            let shift: i32 = rng.gen_range(-1..=1);
            row = row.saturating_add(shift).clamp(0, last_row);
        }
    }

    BuiltPath {
        id: "main".into(),
        waypoints,
    }
}
