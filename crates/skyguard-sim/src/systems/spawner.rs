//! Enemy spawner: turns a wave number into a timed spawn queue, and
//! releases due entries into the world each tick.

use std::collections::VecDeque;

use hecs::World;
use rand::Rng;

use skyguard_core::balance::BalanceConfig;
use skyguard_core::components::{Enemy, Health, SlowStatus, SpawnEvent};
use skyguard_core::constants::{BOSS_SPAWN_X, ENEMY_SPAWN_X};
use skyguard_core::enums::EnemyKind;
use skyguard_core::types::{FieldSize, Position};

/// Roll the archetype for one regular slot.
pub fn pick_kind<R: Rng + ?Sized>(wave: u32, balance: &BalanceConfig, rng: &mut R) -> EnemyKind {
    let armored = balance.chances.armored_chance(wave);
    let fast = balance.chances.fast_chance(wave);
    let r: f64 = rng.gen();
    if r < armored {
        EnemyKind::Armored
    } else if r < armored + fast {
        EnemyKind::Fast
    } else {
        EnemyKind::Standard
    }
}

/// Build the spawn queue for `wave`, sorted by spawn time.
///
/// Regular slots draw a kind roll then a y roll; bosses only a y roll and
/// enter after the last regular slot plus the boss delay.
pub fn generate_wave<R: Rng + ?Sized>(
    wave: u32,
    balance: &BalanceConfig,
    field: FieldSize,
    base_time: f64,
    rng: &mut R,
) -> Vec<SpawnEvent> {
    let wave = wave.max(1);
    let params = &balance.wave;
    let regular = params.regular_count(wave);
    let bosses = params.boss_count_for(wave);
    let (y_min, y_max) = field.spawn_band();
    let band = y_max - y_min;

    let mut events = Vec::with_capacity((regular + bosses) as usize);

    for i in 0..regular {
        let kind = pick_kind(wave, balance, rng);
        let y = y_min + rng.gen::<f64>() * band;
        events.push(SpawnEvent {
            at: base_time + f64::from(i) * params.spawn_every_ms,
            position: Position::new(ENEMY_SPAWN_X, y),
            stats: balance.enemy_stats(kind, wave),
        });
    }

    let boss_base = base_time + f64::from(regular) * params.spawn_every_ms + params.boss_delay_ms;
    for j in 0..bosses {
        let y = y_min + (0.25 + rng.gen::<f64>() * 0.5) * band;
        events.push(SpawnEvent {
            at: boss_base + f64::from(j) * params.spawn_every_ms,
            position: Position::new(BOSS_SPAWN_X, y),
            stats: balance.enemy_stats(EnemyKind::Boss, wave),
        });
    }

    events.sort_by(|a, b| a.at.total_cmp(&b.at));
    events
}

/// Spawn every queued enemy due at or before `now`. Returns how many
/// entered the field.
pub fn run(world: &mut World, queue: &mut VecDeque<SpawnEvent>, now: f64) -> usize {
    let mut spawned = 0;
    while queue.front().is_some_and(|e| e.at <= now) {
        let Some(event) = queue.pop_front() else {
            break;
        };
        spawn_enemy(world, &event);
        spawned += 1;
    }
    spawned
}

pub fn spawn_enemy(world: &mut World, event: &SpawnEvent) -> hecs::Entity {
    let s = &event.stats;
    world.spawn((
        event.position,
        Enemy {
            kind: s.kind,
            base_speed: s.speed,
            reward: s.reward,
            leak_damage: s.leak_damage,
            damage_mul: s.damage_mul,
            size: s.size,
            is_boss: s.is_boss,
        },
        Health {
            current: s.health,
            max: s.health,
        },
        SlowStatus::default(),
    ))
}
