//! The versioned save blob and the load/save entry points.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use penguard_core::constants::{GAME_STATE_KEY, PACK_KEY};
use penguard_core::enums::Theme;
use penguard_core::pack::PackExport;
use penguard_core::validate::{as_object, ValidationErrors};
use penguard_quality::QualitySetting;

use crate::error::ProgressError;
use crate::storage::Storage;

pub const SAVE_VERSION: u32 = 1;

/// Best stars a single map can award.
const MAX_STARS: u64 = 5;

const GRAPHICS_SETTINGS: [&str; 4] = ["auto", "low", "medium", "high"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveSettings {
    pub graphics: QualitySetting,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveMeta {
    pub total_wins: u32,
    pub total_games: u32,
}

/// Everything remembered between sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveState {
    pub version: u32,
    pub last_theme: Theme,
    /// Best stars per map id.
    pub stars: BTreeMap<String, u8>,
    pub last_played_map: Option<String>,
    #[serde(default)]
    pub settings: SaveSettings,
    #[serde(default)]
    pub meta: SaveMeta,
}

impl Default for SaveState {
    fn default() -> Self {
        Self {
            version: SAVE_VERSION,
            last_theme: Theme::Hockey,
            stars: BTreeMap::new(),
            last_played_map: None,
            settings: SaveSettings::default(),
            meta: SaveMeta::default(),
        }
    }
}

impl SaveState {
    /// Parse and validate a blob; every invalid field is reported.
    pub fn from_json(json: &str) -> Result<Self, ProgressError> {
        let value: Value = serde_json::from_str(json)?;
        validate_save(&value).map_err(ProgressError::Invalid)?;
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_json(&self) -> Result<String, ProgressError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn best_stars(&self, map_id: &str) -> u8 {
        self.stars.get(map_id).copied().unwrap_or(0)
    }

    /// Record a finished session. Stars only ever improve.
    pub fn record_result(&mut self, map_id: &str, stars: u8, won: bool) {
        let best = self.stars.entry(map_id.to_string()).or_insert(0);
        *best = (*best).max(stars);
        self.meta.total_games += 1;
        if won {
            self.meta.total_wins += 1;
        }
        self.last_played_map = Some(map_id.to_string());
    }

    pub fn set_last_played(&mut self, theme: Theme, map_id: &str) {
        self.last_theme = theme;
        self.last_played_map = Some(map_id.to_string());
    }

    pub fn set_graphics(&mut self, setting: QualitySetting) {
        self.settings.graphics = setting;
    }

    /// Sum of best stars over every map of the save.
    pub fn total_stars(&self) -> u32 {
        self.stars.values().map(|&s| u32::from(s)).sum()
    }
}

/// Field-by-field check of a raw save blob.
pub fn validate_save(value: &Value) -> Result<(), ValidationErrors> {
    let d = as_object(value, "SaveState must be an object")?;
    let mut errors = ValidationErrors::default();

    match d.get("version").and_then(Value::as_u64) {
        None => errors.push("SaveState.version must be a number"),
        Some(v) if v != u64::from(SAVE_VERSION) => {
            errors.push(format!("SaveState.version {v} is not supported"))
        }
        Some(_) => {}
    }

    if !d
        .get("lastTheme")
        .and_then(Value::as_str)
        .is_some_and(|t| t.parse::<Theme>().is_ok())
    {
        errors.push("SaveState.lastTheme must be 'hockey' or 'soccer'");
    }

    match d.get("stars").and_then(Value::as_object) {
        None => errors.push("SaveState.stars must be an object"),
        Some(stars) => {
            for (map_id, s) in stars {
                if !s.as_u64().is_some_and(|s| s <= MAX_STARS) {
                    errors.push(format!("SaveState.stars.{map_id} must be an integer 0..=5"));
                }
            }
        }
    }

    match d.get("lastPlayedMap") {
        None | Some(Value::Null) | Some(Value::String(_)) => {}
        Some(_) => errors.push("SaveState.lastPlayedMap must be a string or null"),
    }

    if let Some(settings) = d.get("settings") {
        let graphics = settings.get("graphics").and_then(Value::as_str);
        if !graphics.is_some_and(|g| GRAPHICS_SETTINGS.contains(&g)) {
            errors.push("SaveState.settings.graphics must be auto, low, medium or high");
        }
    }

    if let Some(meta) = d.get("meta") {
        for field in ["totalWins", "totalGames"] {
            if !meta.get(field).is_some_and(Value::is_u64) {
                errors.push(format!("SaveState.meta.{field} must be a non-negative integer"));
            }
        }
    }

    errors.into_result()
}

/// Load the save blob, falling back to defaults on any problem.
pub fn load_game_state(storage: &dyn Storage) -> SaveState {
    let raw = match storage.get(GAME_STATE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return SaveState::default(),
        Err(e) => {
            warn!(error = %e, "could not read save data, using defaults");
            return SaveState::default();
        }
    };
    match SaveState::from_json(&raw) {
        Ok(state) => state,
        Err(e) => {
            warn!(error = %e, "corrupted save data, using defaults");
            SaveState::default()
        }
    }
}

pub fn save_game_state(storage: &mut dyn Storage, state: &SaveState) -> Result<(), ProgressError> {
    storage.set(GAME_STATE_KEY, &state.to_json()?)?;
    debug!(maps = state.stars.len(), "saved game state");
    Ok(())
}

/// Load the editor pack, falling back to an empty one on any problem.
pub fn load_pack(storage: &dyn Storage) -> PackExport {
    let raw = match storage.get(PACK_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return PackExport::default(),
        Err(e) => {
            warn!(error = %e, "could not read pack, using an empty one");
            return PackExport::default();
        }
    };
    match PackExport::from_json(&raw) {
        Ok(pack) => pack,
        Err(e) => {
            warn!(error = %e, "invalid pack, using an empty one");
            PackExport::default()
        }
    }
}

pub fn save_pack(storage: &mut dyn Storage, pack: &PackExport) -> Result<(), ProgressError> {
    storage.set(PACK_KEY, &serde_json::to_string_pretty(pack)?)
}
