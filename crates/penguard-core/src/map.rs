//! Map definitions produced by the map-authoring collaborator.
//!
//! Entities arrive as loosely typed JSON (`meta.kind`, `meta.pathId`,
//! `meta.order`). They are converted into a tagged [`EntityKind`] at load
//! time so the simulation never inspects optional metadata.

use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::enums::{PathPick, PathingType, Theme};
use crate::error::MapError;
use crate::types::GridPoint;
use crate::validate;

/// A complete map. Immutable once a session starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapDefinition {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub theme: Theme,
    pub slot: u8,
    pub cols: u32,
    pub rows: u32,
    pub pathing: MapPathing,
    #[serde(deserialize_with = "lenient_entities")]
    pub entities: Vec<MapEntity>,
    #[serde(default)]
    pub created_at: u64,
    #[serde(default)]
    pub updated_at: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapPathing {
    #[serde(rename = "type")]
    pub kind: PathingType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<PathingRules>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathingRules {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pick: Option<PathPick>,
}

/// One placed entity on the map grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawEntity", into = "RawEntity")]
pub struct MapEntity {
    pub asset_id: String,
    pub x: i32,
    pub y: i32,
    pub rotation_deg: f32,
    pub scale: f32,
    pub kind: EntityKind,
}

/// Role of a map entity. Each variant carries only the fields it needs.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityKind {
    Spawn,
    Pen,
    Obstacle,
    TowerSpot,
    PathNode {
        /// Lane the node belongs to; `None` means the implicit `"main"` lane.
        path_id: Option<String>,
        /// Sort key along the lane.
        order: f64,
    },
    /// Purely cosmetic entity without a gameplay role.
    Decoration,
}

impl MapEntity {
    pub fn grid(&self) -> GridPoint {
        GridPoint::new(self.x, self.y)
    }

    /// Path-node data, if this entity is a path node.
    pub fn path_node(&self) -> Option<(Option<&str>, f64)> {
        match &self.kind {
            EntityKind::PathNode { path_id, order } => Some((path_id.as_deref(), *order)),
            _ => None,
        }
    }
}

impl MapDefinition {
    /// Parse and validate a map from JSON.
    ///
    /// Field problems are reported all at once. Individual malformed
    /// entities are skipped rather than failing the whole map.
    pub fn from_json(json: &str) -> Result<Self, MapError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, MapError> {
        validate::validate_map(&value).map_err(MapError::Invalid)?;
        Ok(serde_json::from_value(value)?)
    }

    /// Whether a cell lies inside the grid.
    pub fn contains(&self, point: GridPoint) -> bool {
        point.x >= 0 && point.y >= 0 && (point.x as u32) < self.cols && (point.y as u32) < self.rows
    }

    /// Whether an obstacle blocks the given cell.
    pub fn is_blocked(&self, point: GridPoint) -> bool {
        self.entities
            .iter()
            .any(|e| e.grid() == point && matches!(e.kind, EntityKind::Obstacle))
    }

    /// Iterator over path-node entities in declaration order.
    pub fn path_nodes(&self) -> impl Iterator<Item = &MapEntity> {
        self.entities.iter().filter(|e| e.path_node().is_some())
    }
}

fn lenient_entities<'de, D>(deserializer: D) -> Result<Vec<MapEntity>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Vec<serde_json::Value> = Vec::deserialize(deserializer)?;
    let mut entities = Vec::with_capacity(raw.len());
    for (index, value) in raw.into_iter().enumerate() {
        match serde_json::from_value::<MapEntity>(value) {
            Ok(entity) => entities.push(entity),
            Err(err) => warn!(index, %err, "skipping malformed map entity"),
        }
    }
    Ok(entities)
}

/// Wire shape of an entity as written by the editor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEntity {
    #[serde(default)]
    asset_id: String,
    x: i32,
    y: i32,
    #[serde(default)]
    rotation_deg: f32,
    #[serde(default = "default_scale")]
    scale: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    meta: Option<RawMeta>,
}

/// Wire shape of `MapEntity::meta`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    path_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    order: Option<f64>,
}

fn default_scale() -> f32 {
    1.0
}

impl TryFrom<RawEntity> for MapEntity {
    type Error = String;

    fn try_from(raw: RawEntity) -> Result<Self, Self::Error> {
        let meta = raw.meta.unwrap_or_default();
        let kind = match meta.kind.as_deref() {
            None => EntityKind::Decoration,
            Some("spawn") => EntityKind::Spawn,
            Some("pen") => EntityKind::Pen,
            Some("obstacle") => EntityKind::Obstacle,
            Some("towerSpot") => EntityKind::TowerSpot,
            Some("pathNode") => EntityKind::PathNode {
                path_id: meta.path_id,
                order: meta.order.unwrap_or(0.0),
            },
            Some(other) => return Err(format!("unknown entity kind '{other}'")),
        };
        Ok(MapEntity {
            asset_id: raw.asset_id,
            x: raw.x,
            y: raw.y,
            rotation_deg: raw.rotation_deg,
            scale: raw.scale,
            kind,
        })
    }
}

impl From<MapEntity> for RawEntity {
    fn from(entity: MapEntity) -> Self {
        let meta = match entity.kind {
            EntityKind::Decoration => None,
            EntityKind::Spawn => Some(kind_only("spawn")),
            EntityKind::Pen => Some(kind_only("pen")),
            EntityKind::Obstacle => Some(kind_only("obstacle")),
            EntityKind::TowerSpot => Some(kind_only("towerSpot")),
            EntityKind::PathNode { path_id, order } => Some(RawMeta {
                kind: Some("pathNode".into()),
                path_id,
                order: Some(order),
            }),
        };
        RawEntity {
            asset_id: entity.asset_id,
            x: entity.x,
            y: entity.y,
            rotation_deg: entity.rotation_deg,
            scale: entity.scale,
            meta,
        }
    }
}

fn kind_only(kind: &str) -> RawMeta {
    RawMeta {
        kind: Some(kind.into()),
        ..RawMeta::default()
    }
}

/// Builder helpers for maps assembled in code (tests, defaults).
impl MapDefinition {
    pub fn blank(id: impl Into<String>, theme: Theme, cols: u32, rows: u32) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            theme,
            slot: 1,
            cols,
            rows,
            pathing: MapPathing::default(),
            entities: Vec::new(),
            created_at: 0,
            updated_at: 0,
        }
    }

    pub fn with_pathing(mut self, kind: PathingType) -> Self {
        self.pathing.kind = kind;
        self
    }

    pub fn with_path_node(mut self, x: i32, y: i32, path_id: Option<&str>, order: f64) -> Self {
        self.entities.push(MapEntity {
            asset_id: String::new(),
            x,
            y,
            rotation_deg: 0.0,
            scale: 1.0,
            kind: EntityKind::PathNode {
                path_id: path_id.map(str::to_owned),
                order,
            },
        });
        self
    }

    pub fn with_obstacle(mut self, x: i32, y: i32) -> Self {
        self.entities.push(MapEntity {
            asset_id: String::new(),
            x,
            y,
            rotation_deg: 0.0,
            scale: 1.0,
            kind: EntityKind::Obstacle,
        });
        self
    }
}
