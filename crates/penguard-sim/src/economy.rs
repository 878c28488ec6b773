//! Economy rules: star rating, sell value and per-wave HP growth.

use penguard_core::constants::{
    ENEMY_HP_SCALE_PER_WAVE, SELL_VALUE_MULTIPLIER, THREE_STAR_LIVES_FRACTION,
};

/// Star rating at the end of a won session: 5 with no lives lost, 3 while at
/// least 70% of lives remain, otherwise 1.
pub fn calculate_stars(lives_remaining: u32, total_lives: u32) -> u8 {
    if lives_remaining == total_lives {
        5
    } else if lives_remaining as f32 >= total_lives as f32 * THREE_STAR_LIVES_FRACTION {
        3
    } else {
        1
    }
}

/// Refund for selling a tower: `floor(total_spent * 0.6)`.
pub fn sell_value(total_spent: u32) -> u32 {
    (total_spent as f32 * SELL_VALUE_MULTIPLIER).floor() as u32
}

/// Multiplier applied to enemy HP for a given wave.
pub fn hp_scale(wave: u32) -> f32 {
    1.0 + wave as f32 * ENEMY_HP_SCALE_PER_WAVE
}

/// Base HP scaled for a wave, rounded to the nearest whole point.
pub fn scaled_enemy_hp(base_hp: f32, wave: u32) -> f32 {
    (base_hp * hp_scale(wave)).round()
}
