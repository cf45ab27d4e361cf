//! Tower fire: cooldowns, hitscan damage and missile launches.

use hecs::{Entity, World};

use skyguard_core::components::{Enemy, Health, OnHitEffect, SlowStatus, Tower};
use skyguard_core::constants::MISSILE_SPEED;
use skyguard_core::enums::WeaponDelivery;
use skyguard_core::types::Position;

use crate::projectile::{missile_life_ms, Projectile};
use crate::systems::effects::EffectBuffer;
use crate::systems::{status, targeting};

/// Damage after the target's armor multiplier. Never below 1.
pub fn scaled_damage(damage: f64, damage_mul: f64) -> f64 {
    (damage * damage_mul).floor().max(1.0)
}

/// Hit a live enemy. Effects land only if it survives the hit.
/// Returns false when the target is gone or already dead.
pub fn hit(
    world: &mut World,
    target: Entity,
    damage: f64,
    effects: &[OnHitEffect],
    now: f64,
) -> bool {
    let Ok((health, enemy, slow)) =
        world.query_one_mut::<(&mut Health, &Enemy, &mut SlowStatus)>(target)
    else {
        return false;
    };
    if health.current <= 0.0 {
        return false;
    }
    health.current -= scaled_damage(damage, enemy.damage_mul);
    if health.current > 0.0 {
        status::apply(slow, effects, now);
    }
    true
}

/// Let every tower whose cooldown elapsed fire once, in placement order.
/// Returns the number of shots.
pub fn run(
    world: &mut World,
    towers: &mut [Tower],
    now: f64,
    effects: &mut EffectBuffer,
    next_projectile_seq: &mut u64,
) -> usize {
    let mut shots = 0;
    for tower in towers.iter_mut() {
        if tower.stats.firerate <= 0.0 {
            continue;
        }
        let fire_delay = 1000.0 / tower.stats.firerate;
        if now - tower.last_fire_ms < fire_delay {
            continue;
        }
        let Some(target) =
            targeting::pick_target(world, tower.position, tower.stats.range, tower.targeting)
        else {
            continue;
        };
        let Some(target_pos) = world.get::<&Position>(target).ok().map(|p| *p) else {
            continue;
        };

        match tower.delivery {
            WeaponDelivery::Beam => {
                hit(world, target, tower.stats.damage, &tower.effects, now);
                effects.beam(tower.position, target_pos, now);
            }
            WeaponDelivery::Missile => {
                let distance = tower.position.distance_to(&target_pos);
                world.spawn((
                    tower.position,
                    Projectile {
                        target,
                        aim: target_pos,
                        speed: MISSILE_SPEED,
                        damage: tower.stats.damage,
                        effects: tower.effects.clone(),
                        launched_ms: now,
                        life_ms: missile_life_ms(distance, MISSILE_SPEED),
                        seq: *next_projectile_seq,
                    },
                ));
                *next_projectile_seq += 1;
                effects.muzzle(tower.position, now);
            }
        }
        tower.last_fire_ms = now;
        shots += 1;
    }
    shots
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyguard_core::balance::BalanceConfig;
    use skyguard_core::components::{SpawnEvent, TowerId};
    use skyguard_core::enums::{EnemyKind, TargetingMode};

    use crate::economy;
    use crate::systems::spawner;

    fn enemy_at(world: &mut World, kind: EnemyKind, x: f64, y: f64) -> Entity {
        let stats = BalanceConfig::default().enemy_stats(kind, 1);
        spawner::spawn_enemy(
            world,
            &SpawnEvent {
                at: 0.0,
                position: Position::new(x, y),
                stats,
            },
        )
    }

    fn tower(type_index: usize, x: f64, y: f64) -> Tower {
        let balance = BalanceConfig::default();
        economy::build_tower(TowerId(0), type_index, &balance.towers[type_index], Position::new(x, y))
    }

    #[test]
    fn armor_scales_damage_with_floor() {
        assert_eq!(scaled_damage(30.0, 0.75), 22.0);
        assert_eq!(scaled_damage(1.0, 0.1), 1.0);
    }

    #[test]
    fn beam_hits_and_respects_cooldown() {
        let mut world = World::new();
        let target = enemy_at(&mut world, EnemyKind::Standard, 320.0, 300.0);
        let mut towers = vec![tower(1, 300.0, 300.0)];
        let mut fx = EffectBuffer::new();
        let mut seq = 0;

        // Freshly placed: last shot counts as t=0, so the cooldown applies.
        assert_eq!(run(&mut world, &mut towers, 0.0, &mut fx, &mut seq), 0);

        assert_eq!(run(&mut world, &mut towers, 1000.0, &mut fx, &mut seq), 1);
        assert_eq!(world.get::<&Health>(target).unwrap().current, 72.0 - 30.0);
        let slow = *world.get::<&SlowStatus>(target).unwrap();
        assert_eq!(slow.mul, 0.75);
        assert_eq!(slow.until_ms, 1900.0);
        assert_eq!(fx.len(), 1);

        // 2.2 shots/s: next shot no earlier than ~454.5 ms later.
        assert_eq!(run(&mut world, &mut towers, 1400.0, &mut fx, &mut seq), 0);
        assert_eq!(run(&mut world, &mut towers, 1460.0, &mut fx, &mut seq), 1);
        assert_eq!(towers[0].last_fire_ms, 1460.0);
    }

    #[test]
    fn no_target_keeps_cooldown_ready() {
        let mut world = World::new();
        let mut towers = vec![tower(0, 300.0, 300.0)];
        let mut fx = EffectBuffer::new();
        let mut seq = 0;
        assert_eq!(run(&mut world, &mut towers, 5000.0, &mut fx, &mut seq), 0);
        assert_eq!(towers[0].last_fire_ms, 0.0);
    }

    #[test]
    fn lethal_hit_skips_effects() {
        let mut world = World::new();
        let target = enemy_at(&mut world, EnemyKind::Standard, 320.0, 300.0);
        let slow = [OnHitEffect::Slow {
            mult: 0.5,
            duration_ms: 900.0,
        }];
        assert!(hit(&mut world, target, 500.0, &slow, 0.0));
        assert_eq!(*world.get::<&SlowStatus>(target).unwrap(), SlowStatus::default());
        // Already dead: further hits are ignored.
        assert!(!hit(&mut world, target, 10.0, &slow, 0.0));
    }

    #[test]
    fn missile_tower_launches_projectile() {
        let mut world = World::new();
        let target = enemy_at(&mut world, EnemyKind::Standard, 400.0, 300.0);
        let mut towers = vec![tower(2, 300.0, 300.0)];
        assert_eq!(towers[0].targeting, TargetingMode::Strongest);
        let mut fx = EffectBuffer::new();
        let mut seq = 0;

        assert_eq!(run(&mut world, &mut towers, 3000.0, &mut fx, &mut seq), 1);
        assert_eq!(world.get::<&Health>(target).unwrap().current, 72.0);
        let projectiles: Vec<_> = world
            .query::<&Projectile>()
            .iter()
            .map(|(_, p)| p.clone())
            .collect();
        assert_eq!(projectiles.len(), 1);
        assert_eq!(projectiles[0].target, target);
        assert_eq!(projectiles[0].damage, 65.0);
        assert_eq!(seq, 1);
    }
}
