//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// How a tower picks its target among in-range enemies.
///
/// Unknown strings parse to `Nearest`, so balance files and commands with
/// a stale or misspelled mode still load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum TargetingMode {
    /// Minimum distance to the tower.
    #[default]
    Nearest,
    /// Furthest along the path (largest x).
    First,
    /// Least far along the path (smallest x).
    Last,
    /// Highest current health.
    Strongest,
}

impl TargetingMode {
    pub const ALL: [TargetingMode; 4] = [
        TargetingMode::Nearest,
        TargetingMode::First,
        TargetingMode::Last,
        TargetingMode::Strongest,
    ];

    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "first" => TargetingMode::First,
            "last" => TargetingMode::Last,
            "strongest" => TargetingMode::Strongest,
            _ => TargetingMode::Nearest,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetingMode::Nearest => "nearest",
            TargetingMode::First => "first",
            TargetingMode::Last => "last",
            TargetingMode::Strongest => "strongest",
        }
    }
}

impl From<String> for TargetingMode {
    fn from(raw: String) -> Self {
        TargetingMode::parse(&raw)
    }
}

/// Enemy archetype.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyKind {
    #[default]
    Standard,
    Fast,
    Armored,
    Boss,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 4] = [
        EnemyKind::Standard,
        EnemyKind::Fast,
        EnemyKind::Armored,
        EnemyKind::Boss,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EnemyKind::Standard => "standard",
            EnemyKind::Fast => "fast",
            EnemyKind::Armored => "armored",
            EnemyKind::Boss => "boss",
        }
    }
}

/// How a tower's shot reaches its target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeaponDelivery {
    /// Hitscan: damage lands the tick the tower fires.
    #[default]
    Beam,
    /// Homing projectile that travels to the target.
    Missile,
}

/// Coarse session phase derived from the engine flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Session built, defense not yet started.
    #[default]
    Setup,
    /// Wave in progress, clock advancing.
    Running,
    /// Clock frozen by the player or by losing visibility.
    Paused,
    /// Current wave cleared, waiting for the next one.
    WaveClear,
    /// Health reached zero. Terminal.
    GameOver,
}

/// Visual effect kind for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectKind {
    /// Hitscan line from tower to target.
    Beam,
    /// Flash at a missile launcher when it fires.
    Muzzle,
    /// Burst where an enemy died or a missile struck.
    Explosion,
    /// Expanding ring around a destroyed enemy.
    Shockwave,
}
