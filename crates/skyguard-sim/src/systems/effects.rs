//! Visual effect buffer. Render-only; nothing in the simulation reads it.

use std::collections::VecDeque;

use skyguard_core::components::VisualEffect;
use skyguard_core::constants::*;
use skyguard_core::enums::EffectKind;
use skyguard_core::types::Position;

#[derive(Debug, Clone, Default)]
pub struct EffectBuffer {
    items: VecDeque<VisualEffect>,
}

impl EffectBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an effect, dropping the oldest beyond the cap.
    pub fn push(&mut self, effect: VisualEffect) {
        self.items.push_back(effect);
        while self.items.len() > EFFECT_LIMIT {
            self.items.pop_front();
        }
    }

    pub fn beam(&mut self, from: Position, to: Position, now: f64) {
        self.push(effect(EffectKind::Beam, from, to, now, BEAM_EFFECT_MS));
    }

    pub fn muzzle(&mut self, at: Position, now: f64) {
        self.push(effect(EffectKind::Muzzle, at, at, now, MUZZLE_EFFECT_MS));
    }

    pub fn explosion(&mut self, at: Position, now: f64) {
        self.push(effect(EffectKind::Explosion, at, at, now, EXPLOSION_EFFECT_MS));
    }

    pub fn shockwave(&mut self, at: Position, now: f64) {
        self.push(effect(EffectKind::Shockwave, at, at, now, SHOCKWAVE_EFFECT_MS));
    }

    /// Drop effects whose lifetime ended before `now`.
    pub fn prune(&mut self, now: f64) {
        self.items.retain(|e| now - e.started_ms <= e.duration_ms);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn to_vec(&self) -> Vec<VisualEffect> {
        self.items.iter().copied().collect()
    }
}

fn effect(kind: EffectKind, from: Position, to: Position, now: f64, duration_ms: f64) -> VisualEffect {
    VisualEffect {
        kind,
        from,
        to,
        started_ms: now,
        duration_ms,
    }
}
