//! Simulated clock: pause, time scale and auto-pause bookkeeping.
//!
//! Every gameplay timestamp (spawns, cooldowns, slows, effects) is compared
//! against `now_ms`, never against the wall clock.

use skyguard_core::constants::{MAX_FRAME_DELTA_MS, TIME_SCALE_FAST, TIME_SCALE_NORMAL};

#[derive(Debug, Clone, PartialEq)]
pub struct SimClock {
    now_ms: f64,
    paused: bool,
    /// Paused because the host lost visibility; cleared on manual resume
    /// or when the notice is delivered.
    auto_paused: bool,
    time_scale: f64,
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new(TIME_SCALE_NORMAL)
    }
}

impl SimClock {
    pub fn new(time_scale: f64) -> Self {
        Self {
            now_ms: 0.0,
            paused: false,
            auto_paused: false,
            time_scale: if time_scale >= TIME_SCALE_FAST {
                TIME_SCALE_FAST
            } else {
                TIME_SCALE_NORMAL
            },
        }
    }

    pub fn now(&self) -> f64 {
        self.now_ms
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn auto_paused(&self) -> bool {
        self.auto_paused
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Simulated delta for a real frame delta: clamped to `[0, 34]` ms,
    /// zero while paused, scaled otherwise.
    pub fn frame_delta(&self, real_delta_ms: f64) -> f64 {
        if self.paused || !real_delta_ms.is_finite() {
            return 0.0;
        }
        real_delta_ms.clamp(0.0, MAX_FRAME_DELTA_MS) * self.time_scale
    }

    /// Move simulated time forward. No-op while paused.
    pub fn advance(&mut self, sim_delta_ms: f64) {
        if self.paused || !sim_delta_ms.is_finite() {
            return;
        }
        self.now_ms += sim_delta_ms.max(0.0);
    }

    pub fn set_paused(&mut self, paused: bool) {
        if !paused {
            self.auto_paused = false;
        }
        self.paused = paused;
    }

    /// Returns the new paused state.
    pub fn toggle_pause(&mut self) -> bool {
        self.set_paused(!self.paused);
        self.paused
    }

    /// Flip between 1x and 2x. Returns the new scale.
    pub fn toggle_speed(&mut self) -> f64 {
        self.time_scale = if self.time_scale >= TIME_SCALE_FAST {
            TIME_SCALE_NORMAL
        } else {
            TIME_SCALE_FAST
        };
        self.time_scale
    }

    /// Pause because the host went hidden. Returns true if this paused the
    /// clock; an already paused clock is left alone.
    pub fn visibility_lost(&mut self) -> bool {
        if self.paused {
            return false;
        }
        self.paused = true;
        self.auto_paused = true;
        true
    }

    /// Host visible again. Returns true exactly once per auto-pause, when
    /// the player should be told the game was paused. Does not resume.
    pub fn visibility_regained(&mut self) -> bool {
        std::mem::take(&mut self.auto_paused)
    }
}
