//! Status effects on enemies. Currently only slows.

use skyguard_core::components::{OnHitEffect, SlowStatus};
use skyguard_core::constants::SLOW_APPLY_MIN_MS;

/// Apply on-hit effects at simulated time `now`.
///
/// Slows never weaken an active slow: the multiplier takes the min and the
/// expiry takes the max.
pub fn apply(slow: &mut SlowStatus, effects: &[OnHitEffect], now: f64) {
    for effect in effects {
        match *effect {
            OnHitEffect::Slow { mult, duration_ms } => {
                let duration = duration_ms.round().max(SLOW_APPLY_MIN_MS);
                slow.mul = slow.mul.min(mult);
                slow.until_ms = slow.until_ms.max(now + duration);
            }
        }
    }
}

/// Effective speed multiplier at `now`. Resets an expired slow.
pub fn speed_mul(slow: &mut SlowStatus, now: f64) -> f64 {
    if slow.until_ms > 0.0 && now < slow.until_ms {
        return slow.mul;
    }
    if slow.until_ms != 0.0 || slow.mul != 1.0 {
        *slow = SlowStatus::default();
    }
    1.0
}

pub fn is_slowed(slow: &SlowStatus, now: f64) -> bool {
    slow.until_ms > now && slow.mul < 1.0
}
