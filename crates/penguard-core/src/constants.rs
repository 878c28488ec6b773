//! Simulation constants and tuning parameters.

// --- Frame clock ---

/// Largest frame delta (seconds) accepted by a single tick.
pub const MAX_FRAME_DT: f32 = 0.1;

// --- Grid ---

/// World units per grid cell.
pub const CELL_SIZE: f32 = 1.0;

// --- Session defaults ---

pub const DEFAULT_START_MONEY: u32 = 650;
pub const DEFAULT_START_LIVES: u32 = 20;
pub const DEFAULT_TOTAL_WAVES: u32 = 10;

// --- Enemies ---

/// Delay between two spawns from the queue (milliseconds).
pub const ENEMY_SPAWN_DELAY_MS: f32 = 450.0;

/// Per-wave HP growth used by `scaled_enemy_hp`.
pub const ENEMY_HP_SCALE_PER_WAVE: f32 = 0.12;

/// Speed factor applied while an enemy's slow timer is running.
pub const SLOW_FACTOR: f32 = 0.5;

/// Slow duration (seconds) for tower types that slow but carry no duration table.
pub const DEFAULT_SLOW_DURATION: f32 = 2.0;

// --- Towers ---

/// Fraction of total spend returned on sale.
pub const SELL_VALUE_MULTIPLIER: f32 = 0.6;

/// Damage multiplier on a critical hit.
pub const CRIT_MULTIPLIER: f32 = 2.0;

// --- Projectiles ---

/// Constant projectile travel speed (world units per second).
pub const PROJECTILE_SPEED: f32 = 14.0;

/// Distance under which a projectile counts as hitting its target.
pub const PROJECTILE_HIT_RADIUS: f32 = 0.3;

/// Flight height of projectiles above the board.
pub const PROJECTILE_HEIGHT: f32 = 0.5;

// --- Star rating ---

/// Lives fraction needed for a three-star rating.
pub const THREE_STAR_LIVES_FRACTION: f32 = 0.7;

// --- Persistence ---

/// Storage key of the persisted game progress blob.
pub const GAME_STATE_KEY: &str = "td:game:v1";

/// Storage key of the imported content pack.
pub const PACK_KEY: &str = "td:pack:v1";

/// Current pack format version.
pub const PACK_VERSION: u32 = 1;

/// Largest accepted map width or height, in cells.
pub const MAX_GRID_DIM: u32 = 256;

/// Valid map slots.
pub const MAP_SLOTS: std::ops::RangeInclusive<u8> = 1..=10;
