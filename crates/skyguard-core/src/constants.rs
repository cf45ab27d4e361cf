//! Simulation constants and tuning parameters that are not part of the
//! loadable balance tables.

// --- Frame timing ---

/// Host frame rate the loop is scheduled at (Hz).
pub const FRAME_RATE: u32 = 60;

/// Reference frame length enemy speeds are expressed against (ms).
/// An enemy with speed 1.0 moves one pixel per reference frame.
pub const REFERENCE_FRAME_MS: f64 = 16.6667;

/// Largest real frame delta accepted per frame (ms). Longer stalls are clamped
/// so a background tab does not teleport enemies.
pub const MAX_FRAME_DELTA_MS: f64 = 34.0;

/// Allowed time-scale values.
pub const TIME_SCALE_NORMAL: f64 = 1.0;
pub const TIME_SCALE_FAST: f64 = 2.0;

// --- Field ---

/// Default field size (pixels).
pub const DEFAULT_FIELD_WIDTH: f64 = 960.0;
pub const DEFAULT_FIELD_HEIGHT: f64 = 600.0;

/// Minimum vertical padding of the spawn band (pixels).
pub const SPAWN_BAND_MIN_PAD: f64 = 50.0;

/// Spawn band padding as a share of the field height.
pub const SPAWN_BAND_PAD_RATIO: f64 = 0.18;

/// Minimum height of the spawn band (pixels).
pub const SPAWN_BAND_MIN_HEIGHT: f64 = 20.0;

/// Spawn x for regular enemies and bosses (off-screen left).
pub const ENEMY_SPAWN_X: f64 = -50.0;
pub const BOSS_SPAWN_X: f64 = -70.0;

// --- Placement ---

/// Distance from any field edge where building is not allowed (pixels).
pub const PLACEMENT_EDGE_MARGIN: f64 = 28.0;

/// Width of the no-build bands at the entry (left) and exit (right) (pixels).
pub const NO_BUILD_ZONE_WIDTH: f64 = 60.0;

/// Minimum distance between two towers (pixels).
pub const MIN_TOWER_SPACING: f64 = 50.0;

/// Pick radius when selecting a placed tower by pointer (pixels).
pub const TOWER_PICK_RADIUS: f64 = 26.0;

// --- Towers ---

// --- Enemy scaling floors ---

/// Hard floors applied after the configured minimums.
pub const ENEMY_HEALTH_FLOOR: f64 = 10.0;
pub const ENEMY_SPEED_FLOOR: f64 = 0.05;

/// Most enemies (regular or boss) a single wave may hold.
pub const MAX_WAVE_ENEMIES: u32 = 1000;

/// Highest tower level.
pub const MAX_TOWER_LEVEL: u8 = 3;

/// Default upgrade step fractions per level.
pub const DEFAULT_RANGE_STEP: f64 = 0.12;
pub const DEFAULT_DAMAGE_STEP: f64 = 0.35;
pub const DEFAULT_FIRERATE_STEP: f64 = 0.18;

// --- Status effects ---

/// Bounds for a resolved slow multiplier.
pub const SLOW_MULT_MIN: f64 = 0.35;
pub const SLOW_MULT_MAX: f64 = 0.98;

/// Minimum duration of a resolved slow descriptor (ms).
pub const SLOW_DURATION_MIN_MS: f64 = 250.0;

/// Minimum duration of an applied slow (ms).
pub const SLOW_APPLY_MIN_MS: f64 = 150.0;

/// Fallbacks used when a slow descriptor omits its values.
pub const DEFAULT_SLOW_MULT: f64 = 0.75;
pub const DEFAULT_SLOW_DURATION_MS: f64 = 900.0;

// --- Projectiles ---

/// Homing missile speed (pixels per second).
pub const MISSILE_SPEED: f64 = 560.0;

/// Upper bound of a missile's lifetime (ms).
pub const MISSILE_MAX_LIFE_MS: f64 = 1600.0;

/// Lifetime slack added to the straight-line flight time (ms).
pub const MISSILE_LIFE_PAD_MS: f64 = 250.0;

/// Maximum live projectiles; the oldest are dropped beyond this.
pub const PROJECTILE_LIMIT: usize = 60;

// --- Visual effects ---

/// Maximum buffered visual effects; the oldest are dropped beyond this.
pub const EFFECT_LIMIT: usize = 260;

pub const BEAM_EFFECT_MS: f64 = 140.0;
pub const MUZZLE_EFFECT_MS: f64 = 120.0;
pub const EXPLOSION_EFFECT_MS: f64 = 240.0;
pub const SHOCKWAVE_EFFECT_MS: f64 = 560.0;

// --- Score ---

pub const SCORE_PER_WAVE: f64 = 1000.0;
pub const SCORE_PER_KILL: f64 = 40.0;
pub const SCORE_PER_LEAK: f64 = 120.0;

/// Storage key of the best-run record.
pub const RECORD_KEY: &str = "skyguard_defense_record_v1";
