//! FPS sampling and automatic tier selection.

use std::collections::VecDeque;

use tracing::{debug, info};

use crate::tiers::{QualitySetting, QualityTier, RenderSettings};

/// Control-loop tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityThresholds {
    /// Downgrade while the average is below this.
    pub min_fps: f64,
    /// Upgrade while the average is above this and the window is full.
    pub max_fps: f64,
    /// Number of FPS samples averaged.
    pub window: usize,
    /// Minimum time between samples (milliseconds).
    pub sample_interval_ms: f64,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            min_fps: 45.0,
            max_fps: 65.0,
            window: 5,
            sample_interval_ms: 1000.0,
        }
    }
}

/// A tier switch made by the control loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierChange {
    pub from: QualityTier,
    pub to: QualityTier,
}

/// Average reported before any sample exists.
const ASSUMED_FPS: f64 = 60.0;

#[derive(Debug, Clone)]
pub struct QualityManager {
    thresholds: QualityThresholds,
    setting: QualitySetting,
    tier: QualityTier,
    fps: u32,
    history: VecDeque<u32>,
    frame_count: u32,
    last_sample_ms: f64,
}

impl QualityManager {
    /// Start in auto mode at the high tier. `now_ms` is the clock origin.
    pub fn new(now_ms: f64) -> Self {
        Self::with_thresholds(QualityThresholds::default(), now_ms)
    }

    pub fn with_thresholds(thresholds: QualityThresholds, now_ms: f64) -> Self {
        Self {
            thresholds,
            setting: QualitySetting::Auto,
            tier: QualityTier::High,
            fps: ASSUMED_FPS as u32,
            history: VecDeque::with_capacity(thresholds.window),
            frame_count: 0,
            last_sample_ms: now_ms,
        }
    }

    /// Count one rendered frame. Once per sample interval this computes
    /// the FPS and, in auto mode, may move one tier.
    pub fn record_frame(&mut self, now_ms: f64) -> Option<TierChange> {
        self.frame_count += 1;
        let elapsed = now_ms - self.last_sample_ms;
        if elapsed < self.thresholds.sample_interval_ms {
            return None;
        }

        self.fps = (f64::from(self.frame_count) * 1000.0 / elapsed).round() as u32;
        self.history.push_back(self.fps);
        while self.history.len() > self.thresholds.window {
            self.history.pop_front();
        }
        self.frame_count = 0;
        self.last_sample_ms = now_ms;
        debug!(fps = self.fps, average = self.average_fps(), "fps sample");

        if self.setting == QualitySetting::Auto {
            self.auto_adjust()
        } else {
            None
        }
    }

    /// Pick a setting. A pinned tier disables adaptation; `Auto` restarts
    /// it from the high tier.
    pub fn set_quality(&mut self, setting: QualitySetting) {
        self.setting = setting;
        self.tier = setting.tier().unwrap_or(QualityTier::High);
        info!(?setting, tier = ?self.tier, "quality setting changed");
    }

    /// Mean of the sample window, or 60 before the first sample.
    pub fn average_fps(&self) -> f64 {
        if self.history.is_empty() {
            return ASSUMED_FPS;
        }
        let sum: u32 = self.history.iter().sum();
        f64::from(sum) / self.history.len() as f64
    }

    pub fn tier(&self) -> QualityTier {
        self.tier
    }

    pub fn setting(&self) -> QualitySetting {
        self.setting
    }

    /// Most recent FPS sample.
    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn render_settings(&self) -> RenderSettings {
        self.tier.settings()
    }

    fn auto_adjust(&mut self) -> Option<TierChange> {
        let average = self.average_fps();
        let next = if average < self.thresholds.min_fps {
            self.tier.lower()
        } else if average > self.thresholds.max_fps && self.history.len() >= self.thresholds.window {
            self.tier.higher()
        } else {
            None
        }?;

        let change = TierChange {
            from: self.tier,
            to: next,
        };
        self.tier = next;
        info!(from = ?change.from, to = ?change.to, average, "auto-adjusted quality");
        Some(change)
    }
}
