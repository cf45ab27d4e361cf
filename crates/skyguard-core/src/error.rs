//! Error types shared across the workspace.

use thiserror::Error;

use crate::components::TowerId;
use crate::enums::SessionPhase;

/// Failure reading a balance table. Always recovered with defaults.
#[derive(Debug, Error)]
pub enum BalanceError {
    #[error("balance source unavailable")]
    Unavailable,
    #[error("failed to read {file}: {source}")]
    Io {
        file: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {file}: {source}")]
    Json {
        file: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("{file}: {reason}")]
    Shape { file: String, reason: String },
}

/// Why a tower cannot be placed at a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlacementRejection {
    #[error("too close to the field edge")]
    Edge,
    #[error("inside the entry zone")]
    EntryZone,
    #[error("inside the exit zone")]
    ExitZone,
    #[error("not enough resources")]
    InsufficientResources,
    #[error("too close to another tower")]
    TooClose,
}

impl PlacementRejection {
    /// Stable reason code for UIs.
    pub fn code(&self) -> &'static str {
        match self {
            PlacementRejection::Edge => "edge",
            PlacementRejection::EntryZone => "entry-zone",
            PlacementRejection::ExitZone => "exit-zone",
            PlacementRejection::InsufficientResources => "insufficient-resources",
            PlacementRejection::TooClose => "too-close",
        }
    }
}

/// A player action the engine declined. State is unchanged when returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ActionError {
    #[error("placement rejected: {0}")]
    Placement(#[from] PlacementRejection),
    #[error("not enough resources: need {needed}, have {available}")]
    InsufficientResources { needed: u32, available: u32 },
    #[error("tower {0:?} is already at max level")]
    MaxLevel(TowerId),
    #[error("no tower with id {0:?}")]
    UnknownTower(TowerId),
    #[error("no tower type at index {0}")]
    UnknownTowerType(usize),
    #[error("no tower type selected")]
    NoTypeSelected,
    #[error("not allowed while {0:?}")]
    WrongPhase(SessionPhase),
    #[error("session is over")]
    GameOver,
}

/// Record persistence failure. Logged and swallowed by callers.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record store unavailable")]
    Unavailable,
    #[error("record store I/O: {0}")]
    Io(#[from] std::io::Error),
    #[error("record encoding: {0}")]
    Json(#[from] serde_json::Error),
}
