//! Homing projectile flight and impact.

use glam::DVec2;
use hecs::{Entity, World};

use skyguard_core::components::Health;
use skyguard_core::constants::PROJECTILE_LIMIT;
use skyguard_core::types::Position;

use crate::projectile::Projectile;
use crate::systems::combat;
use crate::systems::effects::EffectBuffer;

/// Current position of `target` if it is still alive.
fn live_target_position(world: &World, target: Entity) -> Option<Position> {
    let health = world.get::<&Health>(target).ok()?;
    if health.current <= 0.0 {
        return None;
    }
    world.get::<&Position>(target).ok().map(|p| *p)
}

/// Advance every projectile by `dt_ms` of simulated time.
///
/// A projectile whose target died keeps flying to the last known point and
/// is consumed there without dealing damage. Every arrival leaves an
/// explosion effect.
pub fn run(
    world: &mut World,
    now: f64,
    dt_ms: f64,
    effects: &mut EffectBuffer,
    despawn_buffer: &mut Vec<Entity>,
) -> usize {
    despawn_buffer.clear();
    let mut impacts = 0;

    let mut flying: Vec<(Entity, Position, Projectile)> = world
        .query::<(&Position, &Projectile)>()
        .iter()
        .map(|(e, (pos, p))| (e, *pos, p.clone()))
        .collect();
    flying.sort_by_key(|(_, _, p)| p.seq);

    for (entity, mut pos, mut proj) in flying {
        if now - proj.launched_ms > proj.life_ms {
            despawn_buffer.push(entity);
            continue;
        }

        if let Some(target_pos) = live_target_position(world, proj.target) {
            proj.aim = target_pos;
        }

        let step = proj.speed * dt_ms / 1000.0;
        let to_aim: DVec2 = proj.aim.as_vec() - pos.as_vec();
        let dist = to_aim.length();

        if dist <= step {
            pos = proj.aim;
            if live_target_position(world, proj.target).is_some() {
                combat::hit(world, proj.target, proj.damage, &proj.effects, now);
                impacts += 1;
            }
            effects.explosion(pos, now);
            despawn_buffer.push(entity);
            continue;
        }

        pos = Position::from(pos.as_vec() + to_aim / dist * step);
        if let Ok((p, stored)) = world.query_one_mut::<(&mut Position, &mut Projectile)>(entity) {
            *p = pos;
            stored.aim = proj.aim;
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
    impacts
}

/// Drop the oldest projectiles beyond the cap.
pub fn enforce_limit(world: &mut World) {
    let mut live: Vec<(u64, Entity)> = world
        .query::<&Projectile>()
        .iter()
        .map(|(e, p)| (p.seq, e))
        .collect();
    if live.len() <= PROJECTILE_LIMIT {
        return;
    }
    live.sort_unstable();
    let excess = live.len() - PROJECTILE_LIMIT;
    for (_, entity) in live.into_iter().take(excess) {
        let _ = world.despawn(entity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyguard_core::components::{Enemy, SlowStatus};
    use skyguard_core::enums::{EffectKind, EnemyKind};

    fn enemy(world: &mut World, x: f64, hp: f64) -> Entity {
        world.spawn((
            Position::new(x, 300.0),
            Enemy {
                kind: EnemyKind::Standard,
                base_speed: 1.0,
                reward: 75,
                leak_damage: 15,
                damage_mul: 1.0,
                size: 12.0,
                is_boss: false,
            },
            Health {
                current: hp,
                max: hp,
            },
            SlowStatus::default(),
        ))
    }

    fn missile(world: &mut World, from: f64, target: Entity, aim_x: f64, seq: u64) -> Entity {
        world.spawn((
            Position::new(from, 300.0),
            Projectile {
                target,
                aim: Position::new(aim_x, 300.0),
                speed: 560.0,
                damage: 65.0,
                effects: Vec::new(),
                launched_ms: 0.0,
                life_ms: 1600.0,
                seq,
            },
        ))
    }

    #[test]
    fn flies_then_hits() {
        let mut world = World::new();
        let target = enemy(&mut world, 156.0, 100.0);
        let m = missile(&mut world, 100.0, target, 156.0, 0);
        let mut fx = EffectBuffer::new();
        let mut buf = Vec::new();

        // 56 px at 560 px/s: 50 ms covers half the distance.
        assert_eq!(run(&mut world, 50.0, 50.0, &mut fx, &mut buf), 0);
        assert_eq!(world.get::<&Position>(m).unwrap().x, 128.0);

        assert_eq!(run(&mut world, 100.0, 50.0, &mut fx, &mut buf), 1);
        assert!(!world.contains(m));
        assert_eq!(world.get::<&Health>(target).unwrap().current, 35.0);
    }

    #[test]
    fn dead_target_means_no_damage() {
        let mut world = World::new();
        let target = enemy(&mut world, 120.0, 100.0);
        let m = missile(&mut world, 100.0, target, 120.0, 0);
        world.get::<&mut Health>(target).unwrap().current = 0.0;
        let mut fx = EffectBuffer::new();
        let mut buf = Vec::new();

        assert_eq!(run(&mut world, 50.0, 50.0, &mut fx, &mut buf), 0);
        assert!(!world.contains(m));
        assert_eq!(world.get::<&Health>(target).unwrap().current, 0.0);

        // The impact still shows up at the aim point.
        let shown = fx.to_vec();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].kind, EffectKind::Explosion);
        assert_eq!(shown[0].to.x, 120.0);
    }

    #[test]
    fn removed_target_flies_to_last_point() {
        let mut world = World::new();
        let target = enemy(&mut world, 400.0, 100.0);
        let m = missile(&mut world, 100.0, target, 400.0, 0);
        world.despawn(target).unwrap();
        let mut fx = EffectBuffer::new();
        let mut buf = Vec::new();

        run(&mut world, 100.0, 100.0, &mut fx, &mut buf);
        assert_eq!(world.get::<&Position>(m).unwrap().x, 156.0);
        assert_eq!(world.get::<&Projectile>(m).unwrap().aim.x, 400.0);
        assert!(fx.is_empty());

        // 244 px left: arrives within the next 500 ms and bursts there.
        assert_eq!(run(&mut world, 600.0, 500.0, &mut fx, &mut buf), 0);
        assert!(!world.contains(m));
        assert_eq!(fx.len(), 1);
        assert_eq!(fx.to_vec()[0].to.x, 400.0);
    }

    #[test]
    fn expires_after_lifetime() {
        let mut world = World::new();
        let target = enemy(&mut world, 2000.0, 100.0);
        let m = missile(&mut world, 100.0, target, 2000.0, 0);
        let mut fx = EffectBuffer::new();
        let mut buf = Vec::new();
        run(&mut world, 1601.0, 0.0, &mut fx, &mut buf);
        assert!(!world.contains(m));
    }

    #[test]
    fn limit_drops_oldest() {
        let mut world = World::new();
        let target = enemy(&mut world, 2000.0, 100.0);
        let first = missile(&mut world, 100.0, target, 2000.0, 0);
        for seq in 1..=(PROJECTILE_LIMIT as u64) {
            missile(&mut world, 100.0, target, 2000.0, seq);
        }
        enforce_limit(&mut world);
        assert!(!world.contains(first));
        assert_eq!(world.query::<&Projectile>().iter().count(), PROJECTILE_LIMIT);
    }
}
