//! Player commands sent from the host to the simulation.
//!
//! Commands are applied between frames, never in the middle of a tick.

use serde::{Deserialize, Serialize};

use crate::components::TowerId;
use crate::enums::*;

/// All possible player actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Session ---
    /// Leave setup and launch wave 1.
    StartDefense,
    /// Launch the next wave. Only valid after the current one is cleared.
    NextWave,
    /// Abandon the session. The host stops scheduling frames.
    ReturnToMenu,

    // --- Placement ---
    /// Pick a tower type from the roster for placement.
    SelectTowerType { index: usize },
    ClearPlacementSelection,
    /// Pointer hover; updates the placement preview.
    PointerMoved { x: f64, y: f64 },
    /// Place the selected tower type at a point.
    PlaceTower { x: f64, y: f64 },

    // --- Placed towers ---
    /// Open the action panel for the tower under a point.
    SelectPlacedTower { x: f64, y: f64 },
    CloseTowerActions,
    UpgradeTower { tower_id: TowerId },
    SellTower { tower_id: TowerId },
    SetTargeting {
        tower_id: TowerId,
        mode: TargetingMode,
    },

    // --- Clock ---
    TogglePause,
    /// Flip time scale between 1x and 2x.
    ToggleSpeed,
    /// Host lost focus (tab hidden); auto-pauses a running game.
    VisibilityLost,
    VisibilityRegained,

    // --- Field ---
    ResizeField { width: f64, height: f64 },
}
