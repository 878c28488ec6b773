//! Tests for FPS sampling and tier selection.

use crate::manager::{QualityManager, QualityThresholds, TierChange};
use crate::tiers::{QualitySetting, QualityTier};

/// Feed `seconds` of frames at a steady `fps`, returning every tier change.
fn run(manager: &mut QualityManager, start_ms: f64, seconds: u32, fps: u32) -> (f64, Vec<TierChange>) {
    let frame_ms = 1000.0 / f64::from(fps);
    let mut now = start_ms;
    let mut changes = Vec::new();
    for _ in 0..seconds * fps {
        now += frame_ms;
        if let Some(change) = manager.record_frame(now) {
            changes.push(change);
        }
    }
    (now, changes)
}

#[test]
fn test_starts_auto_high() {
    let manager = QualityManager::new(0.0);
    assert_eq!(manager.setting(), QualitySetting::Auto);
    assert_eq!(manager.tier(), QualityTier::High);
    assert_eq!(manager.average_fps(), 60.0);
}

#[test]
fn test_fps_sampled_once_per_second() {
    let mut manager = QualityManager::new(0.0);
    for i in 1..50 {
        manager.record_frame(f64::from(i) * 20.0);
    }
    assert_eq!(manager.fps(), 60); // no sample yet
    manager.record_frame(1000.0);
    assert_eq!(manager.fps(), 50);
}

#[test]
fn test_low_fps_downgrades_one_tier_per_sample() {
    let mut manager = QualityManager::new(0.0);
    let (_, changes) = run(&mut manager, 0.0, 3, 30);
    assert_eq!(
        changes[0],
        TierChange {
            from: QualityTier::High,
            to: QualityTier::Medium
        }
    );
    assert_eq!(changes[1].to, QualityTier::Low);
    assert_eq!(changes.len(), 2);
    assert_eq!(manager.tier(), QualityTier::Low);
}

#[test]
fn test_upgrade_needs_full_window() {
    let mut manager = QualityManager::new(0.0);
    let (now, _) = run(&mut manager, 0.0, 3, 30);
    assert_eq!(manager.tier(), QualityTier::Low);

    // Average climbs above 65 only once enough fast samples arrive, and
    // nothing upgrades before the window holds five samples.
    let (_, changes) = run(&mut manager, now, 10, 120);
    assert!(!changes.is_empty());
    assert_eq!(changes[0].from, QualityTier::Low);
    assert_eq!(changes[0].to, QualityTier::Medium);
    assert_eq!(manager.tier(), QualityTier::High);
}

#[test]
fn test_manual_tier_disables_auto() {
    let mut manager = QualityManager::new(0.0);
    manager.set_quality(QualitySetting::Medium);
    assert_eq!(manager.tier(), QualityTier::Medium);
    let (now, changes) = run(&mut manager, 0.0, 5, 20);
    assert!(changes.is_empty());
    assert_eq!(manager.tier(), QualityTier::Medium);

    manager.set_quality(QualitySetting::Auto);
    assert_eq!(manager.tier(), QualityTier::High);
    let (_, changes) = run(&mut manager, now, 1, 20);
    assert_eq!(changes.len(), 1);
}

#[test]
fn test_steady_fps_in_band_holds_tier() {
    let mut manager = QualityManager::new(0.0);
    let (_, changes) = run(&mut manager, 0.0, 10, 60);
    assert!(changes.is_empty());
    assert_eq!(manager.tier(), QualityTier::High);
}

#[test]
fn test_custom_window() {
    let thresholds = QualityThresholds {
        window: 2,
        ..Default::default()
    };
    let mut manager = QualityManager::with_thresholds(thresholds, 0.0);
    manager.set_quality(QualitySetting::Auto);
    let (now, _) = run(&mut manager, 0.0, 2, 20);
    assert_eq!(manager.tier(), QualityTier::Low);
    let (_, changes) = run(&mut manager, now, 1, 200);
    assert_eq!(changes.len(), 1);
    assert_eq!(manager.tier(), QualityTier::Medium);
}

#[test]
fn test_tier_ordering_and_settings() {
    assert!(QualityTier::Low < QualityTier::Medium);
    assert!(QualityTier::Medium < QualityTier::High);
    assert_eq!(QualityTier::Low.lower(), None);
    assert_eq!(QualityTier::High.higher(), None);
    assert!(!QualityTier::Low.settings().postprocessing);
    assert_eq!(QualityTier::High.settings().shadow_map_size, 2048);
    assert_eq!(QualityTier::Medium.settings().pixel_ratio, 1.5);
}

#[test]
fn test_setting_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&QualitySetting::Auto).unwrap(), "\"auto\"");
    let tier: QualityTier = serde_json::from_str("\"medium\"").unwrap();
    assert_eq!(tier, QualityTier::Medium);
    assert_eq!(QualitySetting::from(QualityTier::Low), QualitySetting::Low);
}
