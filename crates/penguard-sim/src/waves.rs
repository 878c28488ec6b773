//! Wave composition: how many enemies of each type every wave sends.
//!
//! Compositions are generated once per session from a fixed formula over
//! the theme's enemy list (by index, weakest first).

use serde::{Deserialize, Serialize};

use penguard_core::catalog::EnemyType;

/// Ordered `(enemy type id, count)` pairs for one wave.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WaveComposition {
    pub groups: Vec<(String, u32)>,
}

impl WaveComposition {
    pub fn new(groups: Vec<(String, u32)>) -> Self {
        Self { groups }
    }

    /// Total number of enemies in the wave.
    pub fn total(&self) -> u32 {
        self.groups.iter().map(|(_, n)| n).sum()
    }

    fn push(&mut self, enemies: &[EnemyType], index: usize, count: u32) {
        if let Some(enemy) = enemies.get(index) {
            self.groups.push((enemy.id.clone(), count));
        }
    }
}

/// Compositions for waves `1..=total_waves`.
pub fn generate(total_waves: u32, enemies: &[EnemyType]) -> Vec<WaveComposition> {
    (1..=total_waves).map(|w| composition(w, enemies)).collect()
}

/// Composition of wave `w` (1-based). Types missing from a short enemy
/// list are skipped.
pub fn composition(w: u32, enemies: &[EnemyType]) -> WaveComposition {
    let wf = f64::from(w);
    let mut wave = WaveComposition::default();

    wave.push(enemies, 0, 5 + (wf * 1.3).floor() as u32);
    if w >= 2 {
        wave.push(enemies, 1, (wf * 0.6).floor() as u32);
    }
    if w >= 3 {
        wave.push(enemies, 2, (wf * 0.7).floor() as u32);
    }
    if w >= 5 {
        wave.push(enemies, 3, ((wf - 3.0) * 0.4).floor() as u32);
    }
    if w >= 8 {
        wave.push(enemies, 4, ((wf - 6.0) * 0.25).floor() as u32);
    }
    if w >= 10 {
        wave.push(enemies, 5, ((wf - 8.0) * 0.35).floor() as u32);
    }
    if w % 5 == 0 {
        wave.push(enemies, 6, 1 + w / 12);
    }

    wave
}

#[cfg(test)]
mod tests {
    use super::*;
    use penguard_core::catalog::Catalog;

    fn counts(w: u32) -> Vec<(String, u32)> {
        composition(w, &Catalog::hockey().enemies).groups
    }

    #[test]
    fn first_wave_is_pucks_only() {
        assert_eq!(counts(1), vec![("e1".to_string(), 6)]);
    }

    #[test]
    fn boss_every_fifth_wave() {
        let five = counts(5);
        assert_eq!(five.last(), Some(&("e7".to_string(), 1)));
        let ten = counts(10);
        assert_eq!(
            ten,
            vec![
                ("e1".to_string(), 18),
                ("e2".to_string(), 6),
                ("e3".to_string(), 7),
                ("e4".to_string(), 2),
                ("e5".to_string(), 1),
                ("e6".to_string(), 0),
                ("e7".to_string(), 1),
            ]
        );
        assert_eq!(counts(60).last(), Some(&("e7".to_string(), 6)));
    }

    #[test]
    fn short_enemy_list_skips_missing_types() {
        let enemies = &Catalog::hockey().enemies[..2];
        let wave = composition(10, enemies);
        assert_eq!(wave.groups.len(), 2);
        assert_eq!(wave.total(), 24);
    }

    #[test]
    fn generate_covers_every_wave() {
        let waves = generate(15, &Catalog::soccer().enemies);
        assert_eq!(waves.len(), 15);
        assert!(waves.windows(2).all(|w| w[0].groups[0].1 <= w[1].groups[0].1));
    }
}
