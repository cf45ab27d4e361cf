//! Homing projectile data.
//!
//! Projectiles live in the hecs world next to enemies but hold an
//! `Entity` handle to their target, so the type stays in this crate.

use hecs::Entity;

use skyguard_core::components::OnHitEffect;
use skyguard_core::constants::{MISSILE_LIFE_PAD_MS, MISSILE_MAX_LIFE_MS};
use skyguard_core::types::Position;

/// A missile in flight.
#[derive(Debug, Clone)]
pub struct Projectile {
    pub target: Entity,
    /// Last known target position. Kept after the target dies.
    pub aim: Position,
    /// Pixels per second.
    pub speed: f64,
    pub damage: f64,
    pub effects: Vec<OnHitEffect>,
    pub launched_ms: f64,
    pub life_ms: f64,
    /// Launch order, used to drop the oldest first.
    pub seq: u64,
}

/// Lifetime for a missile launched `distance` px from its target.
pub fn missile_life_ms(distance: f64, speed: f64) -> f64 {
    if speed <= 0.0 {
        return MISSILE_MAX_LIFE_MS;
    }
    MISSILE_MAX_LIFE_MS.min(distance / speed * 1000.0 + MISSILE_LIFE_PAD_MS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn life_is_flight_time_plus_pad_capped() {
        assert_eq!(missile_life_ms(280.0, 560.0), 750.0);
        assert_eq!(missile_life_ms(5000.0, 560.0), 1600.0);
        assert_eq!(missile_life_ms(10.0, 0.0), 1600.0);
    }
}
