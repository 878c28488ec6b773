//! Quality tiers and the render settings each one maps to.

use serde::{Deserialize, Serialize};

/// Render quality tier, ordered from cheapest to most expensive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    Low,
    Medium,
    High,
}

impl QualityTier {
    /// Next cheaper tier, if any.
    pub fn lower(self) -> Option<Self> {
        match self {
            QualityTier::High => Some(QualityTier::Medium),
            QualityTier::Medium => Some(QualityTier::Low),
            QualityTier::Low => None,
        }
    }

    /// Next more expensive tier, if any.
    pub fn higher(self) -> Option<Self> {
        match self {
            QualityTier::Low => Some(QualityTier::Medium),
            QualityTier::Medium => Some(QualityTier::High),
            QualityTier::High => None,
        }
    }

    pub fn settings(self) -> RenderSettings {
        match self {
            QualityTier::Low => RenderSettings {
                pixel_ratio: 1.0,
                shadow_map_size: 1024,
                bloom_strength: 0.3,
                particle_density: 0.3,
                postprocessing: false,
            },
            QualityTier::Medium => RenderSettings {
                pixel_ratio: 1.5,
                shadow_map_size: 1024,
                bloom_strength: 0.5,
                particle_density: 0.6,
                postprocessing: true,
            },
            QualityTier::High => RenderSettings {
                pixel_ratio: 2.0,
                shadow_map_size: 2048,
                bloom_strength: 0.8,
                particle_density: 1.0,
                postprocessing: true,
            },
        }
    }
}

/// What the player picked: adaptive, or a pinned tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualitySetting {
    #[default]
    Auto,
    Low,
    Medium,
    High,
}

impl QualitySetting {
    /// The pinned tier, or `None` in auto mode.
    pub fn tier(self) -> Option<QualityTier> {
        match self {
            QualitySetting::Auto => None,
            QualitySetting::Low => Some(QualityTier::Low),
            QualitySetting::Medium => Some(QualityTier::Medium),
            QualitySetting::High => Some(QualityTier::High),
        }
    }
}

impl From<QualityTier> for QualitySetting {
    fn from(tier: QualityTier) -> Self {
        match tier {
            QualityTier::Low => QualitySetting::Low,
            QualityTier::Medium => QualitySetting::Medium,
            QualityTier::High => QualitySetting::High,
        }
    }
}

/// Knobs handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderSettings {
    pub pixel_ratio: f32,
    pub shadow_map_size: u32,
    pub bloom_strength: f32,
    /// Fraction of the full particle budget.
    pub particle_density: f32,
    pub postprocessing: bool,
}
