//! Enemy movement and leak detection.
//!
//! Enemies walk right along x. Speed is expressed in pixels per reference
//! frame (16.6667 ms), scaled by the active slow.

use hecs::{Entity, World};

use skyguard_core::components::{Enemy, SlowStatus};
use skyguard_core::constants::REFERENCE_FRAME_MS;
use skyguard_core::enums::EnemyKind;
use skyguard_core::types::Position;

use crate::systems::status;

/// An enemy that crossed the right boundary alive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Leak {
    pub kind: EnemyKind,
    pub leak_damage: u32,
    pub position: Position,
}

/// Move every enemy by `sim_delta_ms` and remove those past `field_width`.
/// Leaks are returned in iteration order.
pub fn run(
    world: &mut World,
    now: f64,
    sim_delta_ms: f64,
    field_width: f64,
    despawn_buffer: &mut Vec<Entity>,
) -> Vec<Leak> {
    despawn_buffer.clear();
    let frames = sim_delta_ms / REFERENCE_FRAME_MS;
    let mut leaks = Vec::new();

    for (entity, (pos, enemy, slow)) in
        world.query_mut::<(&mut Position, &Enemy, &mut SlowStatus)>()
    {
        let mul = status::speed_mul(slow, now);
        pos.x += enemy.base_speed * mul * frames;
        if pos.x > field_width {
            leaks.push(Leak {
                kind: enemy.kind,
                leak_damage: enemy.leak_damage,
                position: *pos,
            });
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
    leaks
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyguard_core::components::Health;

    fn enemy(world: &mut World, x: f64, speed: f64, slow: SlowStatus) -> Entity {
        world.spawn((
            Position::new(x, 200.0),
            Enemy {
                kind: EnemyKind::Fast,
                base_speed: speed,
                reward: 60,
                leak_damage: 12,
                damage_mul: 1.0,
                size: 10.0,
                is_boss: false,
            },
            Health {
                current: 40.0,
                max: 40.0,
            },
            slow,
        ))
    }

    #[test]
    fn moves_by_reference_frames() {
        let mut world = World::new();
        let e = enemy(&mut world, 0.0, 1.5, SlowStatus::default());
        let mut buf = Vec::new();
        run(&mut world, 0.0, REFERENCE_FRAME_MS * 2.0, 960.0, &mut buf);
        assert!((world.get::<&Position>(e).unwrap().x - 3.0).abs() < 1e-9);
    }

    #[test]
    fn slow_reduces_speed_until_expiry() {
        let mut world = World::new();
        let slowed = SlowStatus {
            until_ms: 100.0,
            mul: 0.5,
        };
        let e = enemy(&mut world, 0.0, 2.0, slowed);
        let mut buf = Vec::new();
        run(&mut world, 50.0, REFERENCE_FRAME_MS, 960.0, &mut buf);
        assert!((world.get::<&Position>(e).unwrap().x - 1.0).abs() < 1e-9);
        run(&mut world, 150.0, REFERENCE_FRAME_MS, 960.0, &mut buf);
        assert!((world.get::<&Position>(e).unwrap().x - 3.0).abs() < 1e-9);
        assert_eq!(*world.get::<&SlowStatus>(e).unwrap(), SlowStatus::default());
    }

    #[test]
    fn crossing_right_edge_leaks() {
        let mut world = World::new();
        let e = enemy(&mut world, 959.5, 1.0, SlowStatus::default());
        let stays = enemy(&mut world, 100.0, 1.0, SlowStatus::default());
        let mut buf = Vec::new();
        let leaks = run(&mut world, 0.0, REFERENCE_FRAME_MS, 960.0, &mut buf);
        assert_eq!(leaks.len(), 1);
        assert_eq!(leaks[0].leak_damage, 12);
        assert!(!world.contains(e));
        assert!(world.contains(stays));
    }
}
