//! Field-by-field validation of externally supplied JSON.
//!
//! Validators never stop at the first problem: every violated field is
//! reported so the caller can show a complete list.

use std::fmt;

use serde_json::{Map, Value};

use crate::constants::{MAP_SLOTS, MAX_GRID_DIM};

pub const ASSET_CATEGORIES: [&str; 10] = [
    "tower",
    "enemy",
    "obstacle",
    "pen",
    "ui",
    "character",
    "fx",
    "projectile",
    "prop",
    "terrain",
];

pub const THEME_IDS: [&str; 3] = ["hockey", "soccer", "shared"];

pub const PATHING_TYPES: [&str; 2] = ["linear", "multipath"];

/// Every problem found while validating one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<String>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.0.push(message.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Append another document's errors under a path prefix such as `maps[2]`.
    pub fn extend_prefixed(&mut self, prefix: &str, other: ValidationErrors) {
        self.0
            .extend(other.0.into_iter().map(|e| format!("{prefix}: {e}")));
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Borrow `value` as an object or record `message` and return `Err`.
pub fn as_object<'a>(value: &'a Value, message: &str) -> Result<&'a Map<String, Value>, ValidationErrors> {
    value
        .as_object()
        .ok_or_else(|| ValidationErrors(vec![message.to_owned()]))
}

pub fn is_non_empty_str(value: Option<&Value>) -> bool {
    value.and_then(Value::as_str).is_some_and(|s| !s.is_empty())
}

fn is_one_of(value: Option<&Value>, allowed: &[&str]) -> bool {
    value
        .and_then(Value::as_str)
        .is_some_and(|s| allowed.contains(&s))
}

pub fn validate_asset(asset: &Value) -> Result<(), ValidationErrors> {
    let a = as_object(asset, "Asset must be an object")?;
    let mut errors = ValidationErrors::default();

    if !is_non_empty_str(a.get("id")) {
        errors.push("Asset.id must be a non-empty string");
    }
    if !is_non_empty_str(a.get("name")) {
        errors.push("Asset.name must be a non-empty string");
    }
    if !is_one_of(a.get("category"), &ASSET_CATEGORIES) {
        errors.push(format!(
            "Asset.category must be one of: {}",
            ASSET_CATEGORIES.join(", ")
        ));
    }
    if !is_one_of(a.get("theme"), &THEME_IDS) {
        errors.push(format!("Asset.theme must be one of: {}", THEME_IDS.join(", ")));
    }
    if !is_one_of(a.get("sizeHint"), &["normal", "big"]) {
        errors.push("Asset.sizeHint must be 'normal' or 'big'");
    }

    errors.into_result()
}

pub fn validate_map(map: &Value) -> Result<(), ValidationErrors> {
    let m = as_object(map, "Map must be an object")?;
    let mut errors = ValidationErrors::default();

    if !is_non_empty_str(m.get("id")) {
        errors.push("Map.id must be a non-empty string");
    }
    if !is_non_empty_str(m.get("name")) {
        errors.push("Map.name must be a non-empty string");
    }
    if !is_one_of(m.get("theme"), &["hockey", "soccer"]) {
        errors.push("Map.theme must be 'hockey' or 'soccer'");
    }
    let slot_ok = m
        .get("slot")
        .and_then(Value::as_u64)
        .is_some_and(|s| u8::try_from(s).is_ok_and(|s| MAP_SLOTS.contains(&s)));
    if !slot_ok {
        errors.push(format!(
            "Map.slot must be one of: {}",
            MAP_SLOTS.map(|s| s.to_string()).collect::<Vec<_>>().join(", ")
        ));
    }
    let dim_ok = |key: &str| {
        m.get(key)
            .and_then(Value::as_u64)
            .is_some_and(|n| (1..=u64::from(MAX_GRID_DIM)).contains(&n))
    };
    if !dim_ok("cols") {
        errors.push(format!("Map.cols must be between 1 and {MAX_GRID_DIM}"));
    }
    if !dim_ok("rows") {
        errors.push(format!("Map.rows must be between 1 and {MAX_GRID_DIM}"));
    }

    match m.get("pathing").and_then(Value::as_object) {
        None => errors.push("Map.pathing must be an object"),
        Some(p) => {
            if !is_one_of(p.get("type"), &PATHING_TYPES) {
                errors.push(format!(
                    "Map.pathing.type must be one of: {}",
                    PATHING_TYPES.join(", ")
                ));
            }
        }
    }

    if !m.get("entities").is_some_and(Value::is_array) {
        errors.push("Map.entities must be an array");
    }
    if !m.get("createdAt").is_some_and(Value::is_number) {
        errors.push("Map.createdAt must be a number");
    }
    if !m.get("updatedAt").is_some_and(Value::is_number) {
        errors.push("Map.updatedAt must be a number");
    }

    errors.into_result()
}

pub fn validate_pack(pack: &Value) -> Result<(), ValidationErrors> {
    let d = as_object(pack, "Pack must be an object")?;
    let mut errors = ValidationErrors::default();

    if !d.get("version").is_some_and(Value::is_number) {
        errors.push("Pack.version must be a number");
    }

    match d.get("assets").and_then(Value::as_array) {
        None => errors.push("Pack.assets must be an array"),
        Some(assets) => {
            for (i, asset) in assets.iter().enumerate() {
                if let Err(e) = validate_asset(asset) {
                    errors.extend_prefixed(&format!("assets[{i}]"), e);
                }
            }
        }
    }

    match d.get("maps").and_then(Value::as_array) {
        None => errors.push("Pack.maps must be an array"),
        Some(maps) => {
            for (i, map) in maps.iter().enumerate() {
                if let Err(e) = validate_map(map) {
                    errors.extend_prefixed(&format!("maps[{i}]"), e);
                }
            }
        }
    }

    errors.into_result()
}
