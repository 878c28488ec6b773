//! Content packs exported by the editor: assets plus maps.

use serde::{Deserialize, Serialize};

use crate::constants::PACK_VERSION;
use crate::error::MapError;
use crate::map::MapDefinition;
use crate::validate;

/// Editor asset. The simulation only cares about ids and categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    pub name: String,
    pub category: String,
    pub theme: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    pub size_hint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackExport {
    pub version: u32,
    pub assets: Vec<Asset>,
    pub maps: Vec<MapDefinition>,
}

impl Default for PackExport {
    fn default() -> Self {
        Self {
            version: PACK_VERSION,
            assets: Vec::new(),
            maps: Vec::new(),
        }
    }
}

impl PackExport {
    /// Parse and validate a whole pack; every invalid field is reported.
    pub fn from_json(json: &str) -> Result<Self, MapError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        validate::validate_pack(&value).map_err(MapError::Invalid)?;
        Ok(serde_json::from_value(value)?)
    }

    /// Map occupying the given slot for a theme.
    pub fn map_for_slot(&self, theme: crate::enums::Theme, slot: u8) -> Option<&MapDefinition> {
        self.maps.iter().find(|m| m.theme == theme && m.slot == slot)
    }
}
