//! Snapshot system: queries the world and assembles a `SessionSnapshot`.
//!
//! This system is read-only; it never modifies the world.

use hecs::World;

use skyguard_core::balance::BalanceConfig;
use skyguard_core::components::{Enemy, Health, SlowStatus, Tower};
use skyguard_core::state::*;
use skyguard_core::types::{FieldSize, Position};

use crate::projectile::Projectile;
use crate::systems::effects::EffectBuffer;
use crate::systems::status;

/// Engine-side state the snapshot needs besides the world.
pub struct SnapshotParts<'a> {
    pub time_ms: f64,
    pub field: FieldSize,
    pub hud: HudView,
    pub towers: &'a [Tower],
    pub balance: &'a BalanceConfig,
    pub effects: &'a EffectBuffer,
    pub placement: Option<PlacementView>,
    pub selected_tower: Option<TowerPanelView>,
}

pub fn build_snapshot(world: &World, parts: SnapshotParts<'_>) -> SessionSnapshot {
    SessionSnapshot {
        time_ms: parts.time_ms,
        field: parts.field,
        hud: parts.hud,
        towers: build_towers(parts.towers, parts.balance),
        enemies: build_enemies(world, parts.time_ms),
        projectiles: build_projectiles(world),
        effects: parts.effects.to_vec(),
        placement: parts.placement,
        selected_tower: parts.selected_tower,
    }
}

fn build_towers(towers: &[Tower], balance: &BalanceConfig) -> Vec<TowerView> {
    towers
        .iter()
        .map(|t| {
            let tower_type = balance.tower_type(t.type_index);
            TowerView {
                id: t.id,
                type_index: t.type_index,
                position: t.position,
                level: t.level,
                range: t.stats.range,
                targeting: t.targeting,
                icon: tower_type.map(|tt| tt.icon.clone()).unwrap_or_default(),
                color: tower_type.map(|tt| tt.color.clone()).unwrap_or_default(),
            }
        })
        .collect()
}

fn build_enemies(world: &World, now: f64) -> Vec<EnemyView> {
    let mut enemies: Vec<EnemyView> = world
        .query::<(&Position, &Enemy, &Health, &SlowStatus)>()
        .iter()
        .map(|(entity, (pos, enemy, health, slow))| EnemyView {
            id: entity.to_bits().get(),
            kind: enemy.kind,
            position: *pos,
            health: health.current,
            max_health: health.max,
            size: enemy.size,
            is_boss: enemy.is_boss,
            slowed: status::is_slowed(slow, now),
        })
        .collect();
    enemies.sort_by_key(|e| e.id);
    enemies
}

fn build_projectiles(world: &World) -> Vec<ProjectileView> {
    let mut flying: Vec<(u64, ProjectileView)> = world
        .query::<(&Position, &Projectile)>()
        .iter()
        .map(|(_, (pos, p))| {
            (
                p.seq,
                ProjectileView {
                    position: *pos,
                    aim: p.aim,
                },
            )
        })
        .collect();
    flying.sort_by_key(|(seq, _)| *seq);
    flying.into_iter().map(|(_, view)| view).collect()
}
