//! Session snapshot: the complete visible state handed to the renderer
//! after each frame.

use serde::{Deserialize, Serialize};

use crate::components::{OnHitEffect, TowerId, VisualEffect};
use crate::enums::*;
use crate::types::{FieldSize, Position};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Simulated time (ms).
    pub time_ms: f64,
    pub field: FieldSize,
    pub hud: HudView,
    pub towers: Vec<TowerView>,
    pub enemies: Vec<EnemyView>,
    pub projectiles: Vec<ProjectileView>,
    pub effects: Vec<VisualEffect>,
    pub placement: Option<PlacementView>,
    pub selected_tower: Option<TowerPanelView>,
}

/// Heads-up display numbers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HudView {
    pub phase: SessionPhase,
    pub health: i32,
    pub resources: u32,
    pub wave: u32,
    pub enemies_remaining: u32,
    pub enemies_total: u32,
    pub time_scale: f64,
    pub paused: bool,
    pub auto_paused: bool,
    pub kills: u32,
    pub leaks: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TowerView {
    pub id: TowerId,
    pub type_index: usize,
    pub position: Position,
    pub level: u8,
    pub range: f64,
    pub targeting: TargetingMode,
    pub icon: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyView {
    pub id: u64,
    pub kind: EnemyKind,
    pub position: Position,
    pub health: f64,
    pub max_health: f64,
    pub size: f64,
    pub is_boss: bool,
    pub slowed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileView {
    pub position: Position,
    pub aim: Position,
}

/// Hover preview while a tower type is selected for placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementView {
    pub type_index: usize,
    pub position: Option<Position>,
    pub range: f64,
    pub valid: bool,
    /// Rejection reason code when `valid` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Data for the selected tower's action panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TowerPanelView {
    pub id: TowerId,
    pub name: String,
    pub level: u8,
    pub range: f64,
    pub damage: f64,
    pub firerate: f64,
    pub targeting: TargetingMode,
    /// `None` at max level.
    pub upgrade_cost: Option<u32>,
    pub can_upgrade: bool,
    pub sell_refund: u32,
    pub effects: Vec<OnHitEffect>,
}
