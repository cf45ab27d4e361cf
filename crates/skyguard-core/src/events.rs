//! Events emitted by the simulation for UI and audio feedback.
//!
//! The engine buffers events during commands and ticks; the host drains
//! them once per frame.

use serde::{Deserialize, Serialize};

use crate::components::TowerId;
use crate::enums::*;
use crate::score::{Record, RunStats};

/// Game events, in emission order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// A fresh session was built.
    SessionStarted { health: i32, resources: u32 },
    WaveStarted {
        wave: u32,
        total_enemies: u32,
        bosses: u32,
    },
    EnemyKilled { kind: EnemyKind, reward: u32 },
    EnemyLeaked {
        kind: EnemyKind,
        leak_damage: u32,
        health: i32,
    },
    TowerPlaced {
        tower_id: TowerId,
        type_index: usize,
        cost: u32,
    },
    TowerUpgraded {
        tower_id: TowerId,
        level: u8,
        cost: u32,
    },
    TowerSold { tower_id: TowerId, refund: u32 },
    TargetingChanged {
        tower_id: TowerId,
        mode: TargetingMode,
    },
    PauseChanged { paused: bool, auto: bool },
    SpeedChanged { time_scale: f64 },
    /// The game was paused while hidden; shown once on return.
    AutoPauseNotice,
    WaveComplete(WaveSummary),
    GameOver(GameOverReport),
    /// A command the engine declined; state unchanged.
    ActionRejected {
        reason: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        code: Option<String>,
    },
}

/// Read-only result of a cleared wave.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaveSummary {
    pub wave: u32,
    pub total: u32,
    pub kills: u32,
    pub leaks: u32,
    pub reward: u32,
    pub standard: u32,
    pub fast: u32,
    pub armored: u32,
    pub boss: u32,
    pub start_health: i32,
    pub end_health: i32,
}

/// Final result of a session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameOverReport {
    /// Wave in progress when the base fell.
    pub wave: u32,
    /// Wall-clock length of the session.
    pub duration_secs: u64,
    pub run: RunStats,
    pub score: u32,
    pub record: Record,
    pub new_best_score: bool,
}
