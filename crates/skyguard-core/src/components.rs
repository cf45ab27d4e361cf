//! ECS components for hecs entities, plus the plain records the engine keeps
//! outside the world (towers, spawn events, visual effects).
//!
//! Components are plain data structs with no methods.
//! Game logic lives in systems, not components.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::Position;

/// Per-enemy constants fixed at spawn time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Enemy {
    pub kind: EnemyKind,
    /// Pixels per reference frame before slows.
    pub base_speed: f64,
    pub reward: u32,
    pub leak_damage: u32,
    /// Multiplier on incoming damage.
    pub damage_mul: f64,
    pub size: f64,
    pub is_boss: bool,
}

/// Hit points. `current` never increases after spawn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Health {
    pub current: f64,
    pub max: f64,
}

/// Active slow. `until_ms == 0` with `mul == 1.0` means none.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlowStatus {
    pub until_ms: f64,
    pub mul: f64,
}

impl Default for SlowStatus {
    fn default() -> Self {
        Self {
            until_ms: 0.0,
            mul: 1.0,
        }
    }
}

/// Stats computed by the spawner for one enemy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyStats {
    pub kind: EnemyKind,
    pub speed: f64,
    pub health: f64,
    pub reward: u32,
    pub leak_damage: u32,
    pub damage_mul: f64,
    pub size: f64,
    pub is_boss: bool,
}

/// A scheduled enemy spawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnEvent {
    /// Simulated time (ms) at which the enemy enters.
    pub at: f64,
    pub position: Position,
    pub stats: EnemyStats,
}

/// Stable identifier of a placed tower. Never reused within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(pub u32);

/// Range, damage and fire rate of a tower at its current level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TowerStats {
    pub range: f64,
    pub damage: f64,
    /// Shots per second.
    pub firerate: f64,
}

/// Resolved on-hit effect carried by towers and projectiles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OnHitEffect {
    Slow { mult: f64, duration_ms: f64 },
}

/// A placed tower.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tower {
    pub id: TowerId,
    pub position: Position,
    /// Index into the balance tower roster.
    pub type_index: usize,
    pub level: u8,
    /// Total resources sunk into this tower (placement plus upgrades).
    pub spent: u32,
    pub stats: TowerStats,
    pub effects: Vec<OnHitEffect>,
    pub targeting: TargetingMode,
    pub delivery: WeaponDelivery,
    /// Simulated time of the last shot (ms).
    pub last_fire_ms: f64,
}

/// Short-lived render-only effect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisualEffect {
    pub kind: EffectKind,
    pub from: Position,
    /// End point for beams; same as `from` for point effects.
    pub to: Position,
    pub started_ms: f64,
    pub duration_ms: f64,
}
