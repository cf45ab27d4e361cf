//! Fundamental geometric types.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_FIELD_HEIGHT, DEFAULT_FIELD_WIDTH, SPAWN_BAND_MIN_HEIGHT, SPAWN_BAND_MIN_PAD,
    SPAWN_BAND_PAD_RATIO,
};

/// 2D position on the defense field (pixels).
/// x grows toward the exit on the right, y grows downward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another position.
    pub fn distance_to(&self, other: &Position) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    pub fn as_vec(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }
}

impl From<DVec2> for Position {
    fn from(v: DVec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

/// Size of the playable field. Enemies enter on the left edge and
/// leak when they cross `width`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldSize {
    pub width: f64,
    pub height: f64,
}

impl Default for FieldSize {
    fn default() -> Self {
        Self {
            width: DEFAULT_FIELD_WIDTH,
            height: DEFAULT_FIELD_HEIGHT,
        }
    }
}

impl FieldSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Vertical band enemies spawn in: `(min_y, max_y)`.
    pub fn spawn_band(&self) -> (f64, f64) {
        let pad = SPAWN_BAND_MIN_PAD.max((self.height * SPAWN_BAND_PAD_RATIO).round());
        let max_y = (pad + SPAWN_BAND_MIN_HEIGHT).max(self.height - pad);
        (pad, max_y)
    }
}

/// Round to a fixed number of decimal places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
