use std::sync::Arc;

use rand_chacha::ChaCha8Rng;
use tracing::warn;

use penguard_core::map::MapDefinition;
use penguard_core::types::{BuiltPath, GridPoint};

use super::{grid_index, ordered_waypoints, straight_lane, BuiltPaths, PathingEngine};

/// Lane id for path nodes that carry no `pathId`.
const DEFAULT_LANE: &str = "main";

/// One lane per `pathId`, each sorted by order independently.
#[derive(Debug, Clone, Copy, Default)]
pub struct MultipathPathing;

impl PathingEngine for MultipathPathing {
    fn build(&self, map: &MapDefinition, _rng: &mut ChaCha8Rng) -> BuiltPaths {
        // Lanes keep the order their first node was declared in.
        let mut lanes: Vec<(String, Vec<(GridPoint, f64)>)> = Vec::new();
        for entity in map.path_nodes() {
            let Some((path_id, order)) = entity.path_node() else {
                continue;
            };
            let lane_id = path_id.unwrap_or(DEFAULT_LANE);
            match lanes.iter_mut().find(|(id, _)| id == lane_id) {
                Some((_, nodes)) => nodes.push((entity.grid(), order)),
                None => lanes.push((lane_id.to_owned(), vec![(entity.grid(), order)])),
            }
        }

        let main_paths: Vec<Arc<BuiltPath>> = lanes
            .into_iter()
            .filter_map(|(id, nodes)| {
                if nodes.len() < 2 {
                    warn!(map = %map.id, lane = %id, "dropping lane with a single path node");
                    return None;
                }
                Some(Arc::new(BuiltPath {
                    waypoints: ordered_waypoints(nodes, map.cols, map.rows),
                    id,
                }))
            })
            .collect();

        if !main_paths.is_empty() {
            return BuiltPaths { main_paths };
        }

        warn!(map = %map.id, "no usable lanes, generating two straight lanes");
        let rows = u64::from(map.rows);
        let top = grid_index(rows / 4);
        let bottom = grid_index(rows * 3 / 4);
        BuiltPaths {
            main_paths: vec![
                Arc::new(straight_lane("A", top, map.cols, map.rows)),
                Arc::new(straight_lane("B", bottom, map.cols, map.rows)),
            ],
        }
    }
}
