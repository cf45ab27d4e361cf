//! Cleanup system: reaps destroyed enemies after combat.

use hecs::{Entity, World};

use skyguard_core::components::{Enemy, Health};
use skyguard_core::enums::EnemyKind;
use skyguard_core::types::Position;

/// An enemy removed because its health reached zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kill {
    pub kind: EnemyKind,
    pub reward: u32,
    pub position: Position,
    pub is_boss: bool,
}

/// Despawn every enemy with health ≤ 0 and report it. Each enemy is
/// reported once because it leaves the world here.
pub fn reap(world: &mut World, despawn_buffer: &mut Vec<Entity>) -> Vec<Kill> {
    despawn_buffer.clear();
    let mut kills = Vec::new();

    for (entity, (pos, health, enemy)) in world.query_mut::<(&Position, &Health, &Enemy)>() {
        if health.current <= 0.0 {
            kills.push(Kill {
                kind: enemy.kind,
                reward: enemy.reward,
                position: *pos,
                is_boss: enemy.is_boss,
            });
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
    kills
}
