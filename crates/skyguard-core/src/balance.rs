//! Balance tables: tower templates, economy, wave curve, enemy scaling and
//! archetypes.
//!
//! Every field is optional in the JSON form and falls back to the built-in
//! value, so a partial `waves.json` only overrides what it names. Keys are
//! camelCase to match the data files.

use serde::{Deserialize, Serialize};

use crate::components::{EnemyStats, OnHitEffect, TowerStats};
use crate::constants::*;
use crate::enums::{EnemyKind, TargetingMode, WeaponDelivery};
use crate::types::round_to;

/// Complete, immutable balance for a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceConfig {
    pub towers: Vec<TowerType>,
    pub economy: Economy,
    pub wave: WaveParams,
    pub scaling: Scaling,
    pub chances: Chances,
    pub archetypes: ArchetypeTable,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            towers: default_towers(),
            economy: Economy::default(),
            wave: WaveParams::default(),
            scaling: Scaling::default(),
            chances: Chances::default(),
            archetypes: ArchetypeTable::default(),
        }
    }
}

impl BalanceConfig {
    pub fn tower_type(&self, index: usize) -> Option<&TowerType> {
        self.towers.get(index)
    }

    /// Stats snapshot for one enemy of `kind` on `wave`.
    pub fn enemy_stats(&self, kind: EnemyKind, wave: u32) -> EnemyStats {
        let wave_f = f64::from(wave);
        let sc = &self.scaling;
        let base_speed = sc.base_speed + wave_f * sc.speed_per_wave;
        let base_health = sc.base_health + wave_f * sc.health_per_wave;

        let arch = self.archetypes.get(kind);
        let mut health = base_health * arch.hp_mul;
        if arch.base_hp > 0.0 {
            health += arch.base_hp + arch.hp_per_wave * wave_f;
        }

        // Configured minimums never go below the hard floors.
        let min_speed = sc.min_speed.max(ENEMY_SPEED_FLOOR);
        let min_health = sc.min_health.max(ENEMY_HEALTH_FLOOR);

        EnemyStats {
            kind,
            speed: round_to(base_speed * arch.speed_mul, 3).max(min_speed),
            health: health.round().max(min_health),
            reward: arch.reward,
            leak_damage: arch.leak_damage.max(1),
            damage_mul: arch.dmg_mul,
            size: arch.size.max(8.0),
            is_boss: arch.is_boss,
        }
    }
}

// --- Towers ---

/// Immutable tower template. Placed towers derive their stats from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TowerType {
    pub name: String,
    pub range: f64,
    pub damage: f64,
    /// Shots per second.
    pub firerate: f64,
    pub cost: u32,
    pub icon: String,
    pub color: String,
    pub description: String,
    #[serde(alias = "targeting")]
    pub targeting_default: TargetingMode,
    pub delivery: WeaponDelivery,
    pub upgrade: UpgradeSteps,
    pub effects: EffectDescriptors,
}

impl Default for TowerType {
    fn default() -> Self {
        Self {
            name: String::new(),
            range: 0.0,
            damage: 0.0,
            firerate: 0.0,
            cost: 0,
            icon: "🏰".into(),
            color: "#C9B07A".into(),
            description: String::new(),
            targeting_default: TargetingMode::Nearest,
            delivery: WeaponDelivery::Beam,
            upgrade: UpgradeSteps::default(),
            effects: EffectDescriptors::default(),
        }
    }
}

impl TowerType {
    /// Stats at `level` (1-based). Levels outside 1..=3 are clamped.
    pub fn stats_at(&self, level: u8) -> TowerStats {
        let step = f64::from(level.clamp(1, MAX_TOWER_LEVEL) - 1);
        let up = &self.upgrade;
        TowerStats {
            range: (self.range * (1.0 + up.range_step * step)).round(),
            damage: (self.damage * (1.0 + up.damage_step * step)).round(),
            firerate: round_to(self.firerate * (1.0 + up.firerate_step * step), 2),
        }
    }

    /// Concrete on-hit effects at `level`.
    pub fn effects_at(&self, level: u8) -> Vec<OnHitEffect> {
        let step = f64::from(level.clamp(1, MAX_TOWER_LEVEL) - 1);
        let mut out = Vec::new();
        if let Some(slow) = &self.effects.slow {
            out.push(slow.resolve(step));
        }
        out
    }
}

/// Fractional stat growth per level above 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpgradeSteps {
    pub range_step: f64,
    pub damage_step: f64,
    pub firerate_step: f64,
}

impl Default for UpgradeSteps {
    fn default() -> Self {
        Self {
            range_step: DEFAULT_RANGE_STEP,
            damage_step: DEFAULT_DAMAGE_STEP,
            firerate_step: DEFAULT_FIRERATE_STEP,
        }
    }
}

/// On-hit effect descriptors attached to a tower template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectDescriptors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slow: Option<SlowDescriptor>,
}

/// Slow descriptor with per-level scaling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SlowDescriptor {
    pub mult: f64,
    pub duration_ms: f64,
    pub scale: SlowScale,
}

impl Default for SlowDescriptor {
    fn default() -> Self {
        Self {
            mult: DEFAULT_SLOW_MULT,
            duration_ms: DEFAULT_SLOW_DURATION_MS,
            scale: SlowScale::default(),
        }
    }
}

impl SlowDescriptor {
    fn resolve(&self, step: f64) -> OnHitEffect {
        OnHitEffect::Slow {
            mult: (self.mult + step * self.scale.mult_step).clamp(SLOW_MULT_MIN, SLOW_MULT_MAX),
            duration_ms: (self.duration_ms + step * self.scale.duration_step)
                .round()
                .max(SLOW_DURATION_MIN_MS),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SlowScale {
    pub mult_step: f64,
    pub duration_step: f64,
}

/// Built-in tower roster.
pub fn default_towers() -> Vec<TowerType> {
    vec![
        TowerType {
            name: "Long-range radar".into(),
            range: 280.0,
            damage: 15.0,
            firerate: 1.0,
            cost: 600,
            icon: "📡".into(),
            color: "#C9B07A".into(),
            description: "Early-warning radar with the longest reach".into(),
            targeting_default: TargetingMode::First,
            delivery: WeaponDelivery::Beam,
            upgrade: UpgradeSteps::default(),
            effects: EffectDescriptors::default(),
        },
        TowerType {
            name: "Guidance radar".into(),
            range: 180.0,
            damage: 30.0,
            firerate: 2.2,
            cost: 400,
            icon: "🎯".into(),
            color: "#D8C3A5".into(),
            description: "Precision tracking, slows what it locks on".into(),
            targeting_default: TargetingMode::Nearest,
            delivery: WeaponDelivery::Beam,
            upgrade: UpgradeSteps::default(),
            effects: EffectDescriptors {
                slow: Some(SlowDescriptor {
                    mult: 0.75,
                    duration_ms: 900.0,
                    scale: SlowScale {
                        mult_step: -0.05,
                        duration_step: 200.0,
                    },
                }),
            },
        },
        TowerType {
            name: "Missile launcher".into(),
            range: 120.0,
            damage: 65.0,
            firerate: 0.4,
            cost: 500,
            icon: "🚀".into(),
            color: "#8C4A3B".into(),
            description: "Fires homing interceptors".into(),
            targeting_default: TargetingMode::Strongest,
            delivery: WeaponDelivery::Missile,
            upgrade: UpgradeSteps {
                range_step: 0.10,
                damage_step: 0.42,
                firerate_step: 0.14,
            },
            effects: EffectDescriptors::default(),
        },
    ]
}

// --- Economy ---

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Economy {
    pub start_health: i32,
    pub start_resources: u32,
    pub upgrade_cost_mul: UpgradeCostMul,
    pub sell_refund_mul: f64,
}

impl Default for Economy {
    fn default() -> Self {
        Self {
            start_health: 100,
            start_resources: 1500,
            upgrade_cost_mul: UpgradeCostMul::default(),
            sell_refund_mul: 0.7,
        }
    }
}

/// Upgrade price as a share of the base cost, per target level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpgradeCostMul {
    pub to2: f64,
    pub to3: f64,
}

impl Default for UpgradeCostMul {
    fn default() -> Self {
        Self { to2: 0.6, to3: 0.9 }
    }
}

// --- Waves ---

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WaveParams {
    pub base_enemies: u32,
    pub enemies_per_wave: u32,
    pub boss_every: u32,
    pub boss_count: u32,
    pub spawn_every_ms: f64,
    pub boss_delay_ms: f64,
}

impl Default for WaveParams {
    fn default() -> Self {
        Self {
            base_enemies: 3,
            enemies_per_wave: 2,
            boss_every: 5,
            boss_count: 1,
            spawn_every_ms: 780.0,
            boss_delay_ms: 1100.0,
        }
    }
}

impl WaveParams {
    /// Regular (non-boss) enemies in `wave`, capped at `MAX_WAVE_ENEMIES`.
    pub fn regular_count(&self, wave: u32) -> u32 {
        self.enemies_per_wave
            .saturating_mul(wave)
            .saturating_add(self.base_enemies)
            .min(MAX_WAVE_ENEMIES)
    }

    /// Bosses in `wave`. `boss_every == 0` disables bosses.
    pub fn boss_count_for(&self, wave: u32) -> u32 {
        if self.boss_every > 0 && wave % self.boss_every == 0 {
            self.boss_count.min(MAX_WAVE_ENEMIES)
        } else {
            0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Scaling {
    pub base_speed: f64,
    pub speed_per_wave: f64,
    pub base_health: f64,
    pub health_per_wave: f64,
    pub min_health: f64,
    pub min_speed: f64,
}

impl Default for Scaling {
    fn default() -> Self {
        Self {
            base_speed: 1.2,
            speed_per_wave: 0.15,
            base_health: 60.0,
            health_per_wave: 12.0,
            min_health: 10.0,
            min_speed: 0.1,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Chances {
    pub fast: FastChance,
    pub armored: ArmoredChance,
}

impl Chances {
    pub fn fast_chance(&self, wave: u32) -> f64 {
        let f = &self.fast;
        f.cap.min(f.base + f64::from(wave) * f.per_wave)
    }

    pub fn armored_chance(&self, wave: u32) -> f64 {
        let a = &self.armored;
        if wave < a.start_wave {
            return 0.0;
        }
        let waves_in = f64::from(wave) - (f64::from(a.start_wave) - 1.0);
        a.cap.min(a.base + waves_in * a.per_wave)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FastChance {
    pub base: f64,
    pub per_wave: f64,
    pub cap: f64,
}

impl Default for FastChance {
    fn default() -> Self {
        Self {
            base: 0.10,
            per_wave: 0.02,
            cap: 0.35,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ArmoredChance {
    pub start_wave: u32,
    pub base: f64,
    pub per_wave: f64,
    pub cap: f64,
}

impl Default for ArmoredChance {
    fn default() -> Self {
        Self {
            start_wave: 4,
            base: 0.05,
            per_wave: 0.02,
            cap: 0.30,
        }
    }
}

// --- Archetypes ---

/// Enemy archetype modifiers applied on top of the wave's base scaling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EnemyArchetype {
    pub name: String,
    pub icon: String,
    pub color: String,
    pub speed_mul: f64,
    pub hp_mul: f64,
    /// Multiplier on damage taken.
    pub dmg_mul: f64,
    pub reward: u32,
    pub leak_damage: u32,
    pub size: f64,
    pub is_boss: bool,
    /// Flat health bonus; zero means none.
    pub base_hp: f64,
    pub hp_per_wave: f64,
}

impl Default for EnemyArchetype {
    fn default() -> Self {
        Self {
            name: String::new(),
            icon: "●".into(),
            color: "#B86B5F".into(),
            speed_mul: 1.0,
            hp_mul: 1.0,
            dmg_mul: 1.0,
            reward: 0,
            leak_damage: 15,
            size: 12.0,
            is_boss: false,
            base_hp: 0.0,
            hp_per_wave: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchetypeTable {
    pub standard: EnemyArchetype,
    pub fast: EnemyArchetype,
    pub armored: EnemyArchetype,
    pub boss: EnemyArchetype,
}

impl ArchetypeTable {
    pub fn get(&self, kind: EnemyKind) -> &EnemyArchetype {
        match kind {
            EnemyKind::Standard => &self.standard,
            EnemyKind::Fast => &self.fast,
            EnemyKind::Armored => &self.armored,
            EnemyKind::Boss => &self.boss,
        }
    }

    pub fn get_mut(&mut self, kind: EnemyKind) -> &mut EnemyArchetype {
        match kind {
            EnemyKind::Standard => &mut self.standard,
            EnemyKind::Fast => &mut self.fast,
            EnemyKind::Armored => &mut self.armored,
            EnemyKind::Boss => &mut self.boss,
        }
    }
}

impl Default for ArchetypeTable {
    fn default() -> Self {
        Self {
            standard: EnemyArchetype {
                name: "Standard target".into(),
                reward: 75,
                ..EnemyArchetype::default()
            },
            fast: EnemyArchetype {
                name: "Fast target".into(),
                icon: "⚡".into(),
                color: "#47D7FF".into(),
                speed_mul: 1.45,
                hp_mul: 0.75,
                reward: 60,
                leak_damage: 12,
                size: 10.0,
                ..EnemyArchetype::default()
            },
            armored: EnemyArchetype {
                name: "Armored target".into(),
                icon: "🛡".into(),
                color: "#FFA500".into(),
                speed_mul: 0.85,
                hp_mul: 1.75,
                dmg_mul: 0.75,
                reward: 110,
                leak_damage: 18,
                size: 13.0,
                ..EnemyArchetype::default()
            },
            boss: EnemyArchetype {
                name: "Boss".into(),
                icon: "☄️".into(),
                color: "#B45CFF".into(),
                speed_mul: 0.70,
                hp_mul: 4.20,
                dmg_mul: 0.65,
                reward: 350,
                leak_damage: 35,
                size: 18.0,
                is_boss: true,
                base_hp: 260.0,
                hp_per_wave: 28.0,
            },
        }
    }
}
