//! Target selection for towers.

use hecs::{Entity, World};

use skyguard_core::components::{Enemy, Health};
use skyguard_core::enums::TargetingMode;
use skyguard_core::types::Position;

/// A live enemy in range of a tower.
#[derive(Debug, Clone, Copy)]
pub struct Candidate {
    pub entity: Entity,
    pub x: f64,
    pub distance: f64,
    pub health: f64,
}

/// Collect live enemies within `range` of `origin`.
pub fn candidates(world: &World, origin: Position, range: f64) -> Vec<Candidate> {
    world
        .query::<(&Position, &Health, &Enemy)>()
        .iter()
        .filter(|(_, (_, health, _))| health.current > 0.0)
        .filter_map(|(entity, (pos, health, _))| {
            let distance = origin.distance_to(pos);
            (distance <= range).then_some(Candidate {
                entity,
                x: pos.x,
                distance,
                health: health.current,
            })
        })
        .collect()
}

/// Pick one candidate according to `mode`. On a full tie the earlier
/// candidate wins.
pub fn select(candidates: &[Candidate], mode: TargetingMode) -> Option<Entity> {
    let mut best: Option<&Candidate> = None;
    for c in candidates {
        let better = match best {
            None => true,
            Some(b) => match mode {
                TargetingMode::Nearest => c.distance < b.distance,
                TargetingMode::First => c.x > b.x || (c.x == b.x && c.distance < b.distance),
                TargetingMode::Last => c.x < b.x || (c.x == b.x && c.distance < b.distance),
                TargetingMode::Strongest => {
                    c.health > b.health || (c.health == b.health && c.x > b.x)
                }
            },
        };
        if better {
            best = Some(c);
        }
    }
    best.map(|c| c.entity)
}

/// Choose a target for a tower at `origin`.
pub fn pick_target(
    world: &World,
    origin: Position,
    range: f64,
    mode: TargetingMode,
) -> Option<Entity> {
    select(&candidates(world, origin, range), mode)
}
